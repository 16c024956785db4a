//! Participant-facing seams.
//!
//! Strategy behavior lives outside this crate; the engine only needs two
//! narrow contracts: produce-an-order and receive-a-trade-notification.

use crate::tape::TradeRecord;
use crate::{Order, Timestamp};

/// A market participant as the harness drives it.
///
/// Implementations decide what to submit and when; the engine never calls
/// `next_order` itself.
pub trait Participant {
    /// Produce the next order to submit, given the current time and the
    /// participant's own best resting order (if any). `None` means no
    /// action this cycle.
    fn next_order(&mut self, time: Timestamp, best_resting: Option<&Order>) -> Option<Order>;

    /// Record an executed trade this participant was party to.
    fn bookkeep(&mut self, trade: &TradeRecord);
}

/// Receives trade notifications during execution, keyed by participant.
///
/// [`crate::OrderBook::execute`] and `uncross` call this once per party
/// per trade. A harness typically routes each call to the matching
/// [`Participant::bookkeep`].
pub trait Bookkeeper {
    fn bookkeep(&mut self, participant: crate::ParticipantId, trade: &TradeRecord);
}
