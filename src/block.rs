//! Block indication book: reputation-gated intake, indication matching,
//! and the two-sided qualifying-order confirmation protocol.
//!
//! The negotiation for one block trade walks a three-state machine:
//!
//! ```text
//! Pending (match found, no confirmations)
//!   -> PartiallyConfirmed (one qualifying order received)
//!   -> Completed (both received: scored, reputation updated, consumed)
//! ```
//!
//! There is no expiry path: a pending match whose counterparty never
//! confirms stays in the table for the lifetime of the book.

use rustc_hash::FxHashMap;

use crate::book_side::{BookEntry, BookSide};
use crate::config::BlockConfig;
use crate::error::{BookError, RejectReason};
use crate::matching::crosses;
use crate::reputation::{event_score, ReputationLedger};
use crate::tape::{FlushMode, Tape, TapeRecord};
use crate::{MatchId, Order, OrderId, ParticipantId, Quantity, Side, Timestamp};

/// A matched pair of block indications awaiting confirmation.
///
/// Holds independent copies of both indications taken at match time, and a
/// slot per side for the qualifying order that confirms it. Complete once
/// both slots are filled; consumed exactly once on completion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockMatch {
    /// Identity of this match.
    pub id: MatchId,
    /// The buy-side indication as it stood when matched.
    pub buy_indication: Order,
    /// The sell-side indication as it stood when matched.
    pub sell_indication: Order,
    /// `min(buy.quantity, sell.quantity)` at match time.
    pub size: Quantity,
    /// Buy-side qualifying order, once received.
    pub buy_confirmation: Option<Order>,
    /// Sell-side qualifying order, once received.
    pub sell_confirmation: Option<Order>,
}

impl BlockMatch {
    /// True once both sides have confirmed.
    pub fn is_complete(&self) -> bool {
        self.buy_confirmation.is_some() && self.sell_confirmation.is_some()
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Order> {
        match side {
            Side::Buy => &mut self.buy_confirmation,
            Side::Sell => &mut self.sell_confirmation,
        }
    }

    fn indication(&self, side: Side) -> &Order {
        match side {
            Side::Buy => &self.buy_indication,
            Side::Sell => &self.sell_indication,
        }
    }

    fn slot(&self, side: Side) -> Option<&Order> {
        match side {
            Side::Buy => self.buy_confirmation.as_ref(),
            Side::Sell => self.sell_confirmation.as_ref(),
        }
    }
}

/// Outcome of submitting a qualifying order.
#[derive(Clone, Debug, PartialEq)]
pub enum Confirmation {
    /// One slot filled; waiting on the counterparty.
    First,
    /// Both slots filled: reputation updated, indications consumed, match
    /// removed from pending state. The completed match is handed back so
    /// the caller can execute the block trade.
    Complete(BlockMatch),
}

/// The block indication book for a single instrument.
///
/// Same shape as [`crate::OrderBook`] (two priority-ordered sides, an
/// identity counter, a tape) plus the admission gate, the pending-match
/// table, and the reputation ledger.
#[derive(Clone, Debug)]
pub struct BlockIndicationBook {
    buy_side: BookSide,
    sell_side: BookSide,
    /// Next indication identity.
    next_indication_id: u64,
    /// Next qualifying order identity.
    next_qualifying_id: u64,
    /// Next match identity.
    next_match_id: u64,
    /// Matches awaiting confirmation, keyed by match identity.
    pending: FxHashMap<MatchId, BlockMatch>,
    /// Composite reputation scores, process-wide for this book's lifetime.
    reputation: ReputationLedger,
    config: BlockConfig,
    /// Cancellation history for indications.
    tape: Tape,
}

impl BlockIndicationBook {
    /// Create an empty book with the given configuration.
    pub fn new(config: BlockConfig) -> Self {
        Self {
            buy_side: BookSide::new(),
            sell_side: BookSide::new(),
            next_indication_id: 0,
            next_qualifying_id: 0,
            next_match_id: 0,
            pending: FxHashMap::default(),
            reputation: ReputationLedger::new(config.initial_reputation),
            config,
            tape: Tape::new(),
        }
    }

    /// Admit a block indication through the reputation gate.
    ///
    /// First sight of a participant initializes its reputation to the
    /// configured default, even when the indication is then rejected.
    /// Admission requires quantity strictly above the minimum indication
    /// value and reputation strictly above the threshold; rejection
    /// mutates nothing else.
    ///
    /// # Panics
    ///
    /// Panics if the order is not a [`crate::OrderKind::BlockIndication`]; that
    /// is a programming error in the caller, not a runtime rejection.
    pub fn add_indication(&mut self, mut order: Order) -> Result<(OrderId, BookEntry), RejectReason> {
        assert!(
            order.is_indication(),
            "add_indication requires a block indication, got {:?}",
            order.kind
        );

        let score = self.reputation.get_or_init(order.participant);
        if order.quantity <= self.config.min_indication_value {
            return Err(RejectReason::BelowMinimumValue {
                quantity: order.quantity,
                minimum: self.config.min_indication_value,
            });
        }
        if score <= self.config.reputation_threshold {
            return Err(RejectReason::ReputationTooLow {
                participant: order.participant,
                score,
                threshold: self.config.reputation_threshold,
            });
        }

        let id = OrderId(self.next_indication_id);
        self.next_indication_id += 1;
        order.id = id;
        let entry = self.side_mut(order.side).add(order);
        Ok((id, entry))
    }

    /// Cancel a resting indication, recording it on the book's tape.
    pub fn remove_indication(&mut self, time: Timestamp, order: &Order) -> Result<(), BookError> {
        self.side_mut(order.side)
            .remove(order.participant)
            .ok_or(BookError::NoRestingOrder(order.participant))?;
        self.tape.append(TapeRecord::Cancel {
            time,
            order: order.clone(),
        });
        Ok(())
    }

    /// Find the first crossing pair of indications in priority order.
    ///
    /// On success, allocates a match identity and records a pending
    /// [`BlockMatch`] holding copies of both indications with empty
    /// confirmation slots. The indications themselves stay on the book
    /// until the match completes.
    pub fn find_match(&mut self) -> Option<MatchId> {
        for buy in self.buy_side.orders() {
            for sell in self.sell_side.orders() {
                if crosses(buy.quantity, buy.min_exec_size, sell.quantity, sell.min_exec_size) {
                    let id = MatchId(self.next_match_id);
                    self.next_match_id += 1;
                    self.pending.insert(
                        id,
                        BlockMatch {
                            id,
                            buy_indication: buy.clone(),
                            sell_indication: sell.clone(),
                            size: buy.quantity.min(sell.quantity),
                            buy_confirmation: None,
                            sell_confirmation: None,
                        },
                    );
                    return Some(id);
                }
            }
        }
        None
    }

    /// A pending match by identity, for issuing order submission requests.
    pub fn match_by_id(&self, id: MatchId) -> Option<&BlockMatch> {
        self.pending.get(&id)
    }

    /// Submit a qualifying order confirming one side of a pending match.
    ///
    /// Fills the slot for the order's side. A second qualifying order for
    /// an already-filled side overwrites it: last writer wins. When the
    /// second side confirms, both sides are scored against their original
    /// indications, the reputation ledger is updated, the indications are
    /// removed from the book, and the consumed match is returned.
    ///
    /// # Panics
    ///
    /// Panics if the order is not a [`crate::OrderKind::QualifyingOrder`].
    pub fn submit_qualifying_order(&mut self, mut order: Order) -> Result<Confirmation, BookError> {
        let match_id = order
            .confirms()
            .unwrap_or_else(|| panic!("submit_qualifying_order requires a qualifying order, got {:?}", order.kind));

        let pending = self
            .pending
            .get_mut(&match_id)
            .ok_or(BookError::UnknownMatch(match_id))?;

        order.id = OrderId(self.next_qualifying_id);
        self.next_qualifying_id += 1;

        let side = order.side;
        *pending.slot_mut(side) = Some(order);

        if !pending.is_complete() {
            return Ok(Confirmation::First);
        }

        let completed = self
            .pending
            .remove(&match_id)
            .expect("pending match present: just confirmed it");
        self.settle(&completed);
        Ok(Confirmation::Complete(completed))
    }

    /// Score both sides of a completed match, update reputations, and
    /// consume the matched indications.
    fn settle(&mut self, completed: &BlockMatch) {
        for side in [Side::Buy, Side::Sell] {
            let indication = completed.indication(side);
            let confirmation = completed
                .slot(side)
                .expect("completed match has both confirmations");
            let event = event_score(indication, confirmation, &self.config);
            self.reputation
                .apply_event(confirmation.participant, event, self.config.history_weight);
            // The indication is consumed with the match; it may already be
            // gone if the participant cancelled or overwrote it meanwhile.
            self.side_mut(side).remove(indication.participant);
        }
    }

    /// The participant's composite reputation, or `None` if never seen.
    pub fn reputation(&self, participant: ParticipantId) -> Option<f64> {
        self.reputation.get(participant)
    }

    /// Number of matches awaiting confirmation.
    pub fn pending_matches(&self) -> usize {
        self.pending.len()
    }

    /// The requested side.
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.buy_side,
            Side::Sell => &self.sell_side,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.buy_side,
            Side::Sell => &mut self.sell_side,
        }
    }

    /// The configuration this book was built with.
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    /// The indication cancellation tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Return the tape's records, keeping or wiping per `mode`.
    pub fn flush_tape(&mut self, mode: FlushMode) -> Vec<TapeRecord> {
        self.tape.flush(mode)
    }
}

impl Default for BlockIndicationBook {
    fn default() -> Self {
        Self::new(BlockConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indication(time: Timestamp, participant: u64, side: Side, quantity: u64, mes: u64) -> Order {
        Order::indication(time, ParticipantId(participant), side, quantity, mes)
    }

    fn qualifying(participant: u64, side: Side, quantity: u64, mes: u64, match_id: MatchId) -> Order {
        Order::qualifying(100, ParticipantId(participant), side, quantity, mes, match_id)
    }

    #[test]
    fn admission_assigns_ids_and_initializes_reputation() {
        let mut book = BlockIndicationBook::default();

        let (id0, entry0) = book
            .add_indication(indication(100, 0, Side::Buy, 1024, 500))
            .unwrap();
        let (id1, _) = book
            .add_indication(indication(100, 1, Side::Sell, 999, 400))
            .unwrap();

        assert_eq!(id0, OrderId(0));
        assert_eq!(id1, OrderId(1));
        assert_eq!(entry0, BookEntry::Addition);
        assert_eq!(book.reputation(ParticipantId(0)), Some(50.0));
        assert_eq!(book.reputation(ParticipantId(1)), Some(50.0));
    }

    #[test]
    fn rejection_below_miv_still_initializes_reputation() {
        let mut book = BlockIndicationBook::default();

        let err = book
            .add_indication(indication(100, 0, Side::Buy, 15, 5))
            .unwrap_err();

        assert_eq!(
            err,
            RejectReason::BelowMinimumValue {
                quantity: 15,
                minimum: 20
            }
        );
        // Ledger initialized, but nothing admitted.
        assert_eq!(book.reputation(ParticipantId(0)), Some(50.0));
        assert!(book.side(Side::Buy).is_empty());
    }

    #[test]
    fn quantity_equal_to_miv_is_rejected() {
        let mut book = BlockIndicationBook::default();
        // The gate is strict: quantity must exceed the MIV.
        assert!(book.add_indication(indication(100, 0, Side::Buy, 20, 5)).is_err());
        assert!(book.add_indication(indication(100, 0, Side::Buy, 21, 5)).is_ok());
    }

    #[test]
    fn rejection_below_reputation_threshold() {
        let mut book = BlockIndicationBook::new(BlockConfig {
            reputation_threshold: 60.0,
            ..BlockConfig::default()
        });

        let err = book
            .add_indication(indication(100, 0, Side::Buy, 1024, 500))
            .unwrap_err();

        assert_eq!(
            err,
            RejectReason::ReputationTooLow {
                participant: ParticipantId(0),
                score: 50.0,
                threshold: 60.0,
            }
        );
        assert!(book.side(Side::Buy).is_empty());
    }

    #[test]
    #[should_panic(expected = "requires a block indication")]
    fn plain_order_through_indication_intake_panics() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(Order::new(100, ParticipantId(0), Side::Buy, 50, 20))
            .ok();
    }

    #[test]
    fn find_match_records_pending_with_empty_slots() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(indication(100, 0, Side::Buy, 1024, 500))
            .unwrap();
        // Too small for the buy's MES: no match yet.
        book.add_indication(indication(100, 1, Side::Sell, 499, 450))
            .unwrap();
        assert_eq!(book.find_match(), None);

        // The same seller overwrites with enough size.
        book.add_indication(indication(100, 1, Side::Sell, 500, 450))
            .unwrap();
        let id = book.find_match().unwrap();
        assert_eq!(id, MatchId(0));

        let pending = book.match_by_id(id).unwrap();
        assert_eq!(pending.buy_indication.participant, ParticipantId(0));
        assert_eq!(pending.sell_indication.quantity, 500);
        assert_eq!(pending.size, 500);
        assert_eq!(pending.buy_confirmation, None);
        assert_eq!(pending.sell_confirmation, None);
        assert!(!pending.is_complete());
    }

    #[test]
    fn confirmation_protocol_first_then_complete() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(indication(100, 0, Side::Buy, 1024, 500))
            .unwrap();
        book.add_indication(indication(100, 1, Side::Sell, 500, 500))
            .unwrap();
        let id = book.find_match().unwrap();

        let first = book
            .submit_qualifying_order(qualifying(0, Side::Buy, 1024, 500, id))
            .unwrap();
        assert_eq!(first, Confirmation::First);
        assert_eq!(book.pending_matches(), 1);

        let second = book
            .submit_qualifying_order(qualifying(1, Side::Sell, 500, 500, id))
            .unwrap();
        let completed = match second {
            Confirmation::Complete(m) => m,
            other => panic!("expected completion, got {:?}", other),
        };

        assert!(completed.is_complete());
        assert_eq!(completed.buy_confirmation.as_ref().unwrap().id, OrderId(0));
        assert_eq!(completed.sell_confirmation.as_ref().unwrap().id, OrderId(1));
        // Consumed exactly once: gone from pending, indications gone too.
        assert_eq!(book.pending_matches(), 0);
        assert!(book.side(Side::Buy).is_empty());
        assert!(book.side(Side::Sell).is_empty());
        assert!(book.match_by_id(id).is_none());

        // Perfect restatements on both sides: 50 * 0.75 + 100 * 0.25.
        assert_eq!(book.reputation(ParticipantId(0)), Some(62.5));
        assert_eq!(book.reputation(ParticipantId(1)), Some(62.5));
    }

    #[test]
    fn duplicate_confirmation_overwrites_slot() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(indication(100, 0, Side::Buy, 1024, 500))
            .unwrap();
        book.add_indication(indication(100, 1, Side::Sell, 500, 500))
            .unwrap();
        let id = book.find_match().unwrap();

        book.submit_qualifying_order(qualifying(0, Side::Buy, 1024, 500, id))
            .unwrap();
        // Second buy-side confirmation before the sell side's first:
        // last writer wins, match still partially confirmed.
        let again = book
            .submit_qualifying_order(qualifying(0, Side::Buy, 900, 400, id))
            .unwrap();
        assert_eq!(again, Confirmation::First);

        let pending = book.match_by_id(id).unwrap();
        assert_eq!(pending.buy_confirmation.as_ref().unwrap().quantity, 900);
        assert_eq!(pending.sell_confirmation, None);
    }

    #[test]
    fn unknown_match_is_an_error() {
        let mut book = BlockIndicationBook::default();
        let err = book
            .submit_qualifying_order(qualifying(0, Side::Buy, 100, 50, MatchId(9)))
            .unwrap_err();
        assert_eq!(err, BookError::UnknownMatch(MatchId(9)));
    }

    #[test]
    fn completion_scores_shortfalls() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(indication(100, 0, Side::Buy, 1000, 500))
            .unwrap();
        book.add_indication(indication(100, 1, Side::Sell, 500, 500))
            .unwrap();
        let id = book.find_match().unwrap();

        // Buy confirms at 90% quantity: event score 100 - 0 - 10 = 90.
        book.submit_qualifying_order(qualifying(0, Side::Buy, 900, 500, id))
            .unwrap();
        // Sell restates its indication exactly: event score 100.
        book.submit_qualifying_order(qualifying(1, Side::Sell, 500, 500, id))
            .unwrap();

        // Buy: 50 * 0.75 + 90 * 0.25 = 60.0
        assert_eq!(book.reputation(ParticipantId(0)), Some(60.0));
        assert_eq!(book.reputation(ParticipantId(1)), Some(62.5));
    }

    #[test]
    fn non_marketable_confirmation_drops_reputation() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(indication(100, 0, Side::Buy, 1000, 500))
            .unwrap();
        book.add_indication(indication(100, 1, Side::Sell, 500, 400))
            .unwrap();
        let id = book.find_match().unwrap();

        book.submit_qualifying_order(qualifying(0, Side::Buy, 1000, 500, id))
            .unwrap();
        // Sell-side MES above the indication's 400: event score 0.
        book.submit_qualifying_order(qualifying(1, Side::Sell, 500, 450, id))
            .unwrap();

        assert_eq!(book.reputation(ParticipantId(0)), Some(62.5));
        // 50 * 0.75 + 0 * 0.25 = 37.5
        assert_eq!(book.reputation(ParticipantId(1)), Some(37.5));
    }

    #[test]
    fn gate_blocks_participant_after_reputation_decay() {
        let mut book = BlockIndicationBook::new(BlockConfig {
            reputation_threshold: 40.0,
            ..BlockConfig::default()
        });

        // One non-marketable confirmation drives the sell-side
        // participant's score to 50 * 0.75 = 37.5 < 40.
        book.add_indication(indication(100, 0, Side::Buy, 1000, 500))
            .unwrap();
        book.add_indication(indication(100, 1, Side::Sell, 500, 400))
            .unwrap();
        let id = book.find_match().unwrap();
        book.submit_qualifying_order(qualifying(0, Side::Buy, 1000, 500, id))
            .unwrap();
        book.submit_qualifying_order(qualifying(1, Side::Sell, 500, 450, id))
            .unwrap();

        assert_eq!(book.reputation(ParticipantId(1)), Some(37.5));
        let err = book
            .add_indication(indication(200, 1, Side::Sell, 500, 400))
            .unwrap_err();
        assert!(matches!(err, RejectReason::ReputationTooLow { .. }));
    }

    #[test]
    fn zero_mes_negotiation_keeps_reputation_in_bounds() {
        let mut book = BlockIndicationBook::default();
        book.add_indication(indication(100, 0, Side::Buy, 100, 0))
            .unwrap();
        book.add_indication(indication(100, 1, Side::Sell, 100, 0))
            .unwrap();
        let id = book.find_match().unwrap();

        book.submit_qualifying_order(qualifying(0, Side::Buy, 100, 0, id))
            .unwrap();
        book.submit_qualifying_order(qualifying(1, Side::Sell, 100, 0, id))
            .unwrap();

        for participant in [ParticipantId(0), ParticipantId(1)] {
            let score = book.reputation(participant).unwrap();
            assert!(score.is_finite());
            assert!((0.0..=100.0).contains(&score), "score out of bounds: {}", score);
            // Exact restatement on both sides.
            assert_eq!(score, 62.5);
        }
    }

    #[test]
    fn remove_indication_records_cancel() {
        let mut book = BlockIndicationBook::default();
        let bi = indication(100, 0, Side::Buy, 1024, 500);
        book.add_indication(bi.clone()).unwrap();

        book.remove_indication(150, &bi).unwrap();
        assert!(book.side(Side::Buy).is_empty());
        assert_eq!(book.tape().len(), 1);

        let err = book.remove_indication(160, &bi).unwrap_err();
        assert_eq!(err, BookError::NoRestingOrder(ParticipantId(0)));
    }
}
