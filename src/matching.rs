//! Matching: the MES predicate, first-fit scan, trade execution, and the
//! batch uncross.
//!
//! Two orders match when each side's size can satisfy the other's minimum
//! execution size:
//!
//! ```text
//! buy.quantity >= sell.min_exec_size  &&  buy.min_exec_size <= sell.quantity
//! ```
//!
//! The scan is first-fit in priority order (buy side outer), not best-fit:
//! the book's size-then-time ordering decides which pair trades, not any
//! notion of optimal surplus. Trade size is `min(buy.quantity,
//! sell.quantity)`.

use crate::participant::Bookkeeper;
use crate::tape::{TapeRecord, TradeRecord};
use crate::{OrderBook, ParticipantId, Price, Quantity, Side, Timestamp};

/// A matched pair, identified by participant so execution can take the
/// orders out of their sides. Holds no references into the book.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Buy-side participant.
    pub buyer: ParticipantId,
    /// Sell-side participant.
    pub seller: ParticipantId,
    /// `min(buy.quantity, sell.quantity)` at match time.
    pub size: Quantity,
}

/// True when the pair satisfies the MES predicate.
#[inline]
pub(crate) fn crosses(
    buy_quantity: Quantity,
    buy_mes: Quantity,
    sell_quantity: Quantity,
    sell_mes: Quantity,
) -> bool {
    buy_quantity >= sell_mes && buy_mes <= sell_quantity
}

impl OrderBook {
    /// Find the first matching buy/sell pair in priority order.
    ///
    /// Returns `None` when no pair satisfies the predicate. The book is
    /// not modified.
    pub fn find_match(&self) -> Option<MatchCandidate> {
        for buy in self.side(Side::Buy).orders() {
            for sell in self.side(Side::Sell).orders() {
                if crosses(buy.quantity, buy.min_exec_size, sell.quantity, sell.min_exec_size) {
                    return Some(MatchCandidate {
                        buyer: buy.participant,
                        seller: sell.participant,
                        size: buy.quantity.min(sell.quantity),
                    });
                }
            }
        }
        None
    }

    /// Execute a matched pair at the given time and price.
    ///
    /// Both orders leave their sides; each residual with quantity > 0 is
    /// re-inserted with its MES clamped to the residual. A trade record is
    /// appended and the bookkeeper, if any, is notified for both parties.
    ///
    /// Never fails for a candidate produced by [`OrderBook::find_match`]
    /// on the unchanged book: the predicate already validated the
    /// arithmetic.
    ///
    /// # Panics
    ///
    /// Panics if either participant no longer has a resting order (the
    /// candidate is stale).
    pub fn execute(
        &mut self,
        candidate: MatchCandidate,
        time: Timestamp,
        price: Price,
        bookkeeper: Option<&mut (dyn Bookkeeper + '_)>,
    ) {
        let mut buy = self
            .side_mut(Side::Buy)
            .remove(candidate.buyer)
            .expect("match candidate references a resting buy order");
        let mut sell = self
            .side_mut(Side::Sell)
            .remove(candidate.seller)
            .expect("match candidate references a resting sell order");

        buy.fill(candidate.size);
        sell.fill(candidate.size);

        if buy.quantity > 0 {
            self.side_mut(Side::Buy).add(buy);
        }
        if sell.quantity > 0 {
            self.side_mut(Side::Sell).add(sell);
        }

        let trade = TradeRecord {
            time,
            price,
            quantity: candidate.size,
            buyer: candidate.buyer,
            seller: candidate.seller,
        };
        if let Some(bookkeeper) = bookkeeper {
            bookkeeper.bookkeep(trade.buyer, &trade);
            bookkeeper.bookkeep(trade.seller, &trade);
        }
        self.tape_mut().append(TapeRecord::Trade(trade));
    }

    /// Repeatedly match and execute until no pair remains.
    ///
    /// Each execution strictly reduces total resting quantity, so the loop
    /// terminates; afterwards `find_match` returns `None`. Returns the
    /// number of trades executed.
    pub fn uncross(
        &mut self,
        time: Timestamp,
        price: Price,
        mut bookkeeper: Option<&mut dyn Bookkeeper>,
    ) -> usize {
        let mut trades = 0;
        while let Some(candidate) = self.find_match() {
            // Reborrow so the Option is not consumed by the first iteration.
            self.execute(candidate, time, price, bookkeeper.as_deref_mut());
            trades += 1;
        }
        trades
    }
}
