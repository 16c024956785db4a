//! Exchange facade: one entry point over the continuous book and the
//! block indication book.
//!
//! The two books never interact; a completed block match is handed back to
//! the caller, who decides how the block trade prints. The facade exists so
//! a harness holds one value and routes by order kind.

use crate::block::{BlockIndicationBook, BlockMatch, Confirmation};
use crate::book::OrderBook;
use crate::book_side::BookEntry;
use crate::config::BlockConfig;
use crate::error::{BookError, RejectReason};
use crate::participant::Bookkeeper;
use crate::tape::{FlushMode, TapeRecord};
use crate::{MatchId, Order, OrderId, ParticipantId, Price, Timestamp};

/// A venue instance: continuous order book plus block discovery service.
#[derive(Clone, Debug, Default)]
pub struct Exchange {
    book: OrderBook,
    block_book: BlockIndicationBook,
}

impl Exchange {
    /// Create a venue with default block configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a venue with the given block configuration.
    pub fn with_config(config: BlockConfig) -> Self {
        Self {
            book: OrderBook::new(),
            block_book: BlockIndicationBook::new(config),
        }
    }

    // Continuous book.

    /// Rest an order on the continuous book.
    pub fn add_order(&mut self, order: Order) -> (OrderId, BookEntry) {
        self.book.add_order(order)
    }

    /// Cancel a resting order on the continuous book.
    pub fn remove_order(&mut self, time: Timestamp, order: &Order) -> Result<(), BookError> {
        self.book.remove_order(time, order)
    }

    /// Match and execute on the continuous book until quiescent.
    pub fn uncross(
        &mut self,
        time: Timestamp,
        price: Price,
        bookkeeper: Option<&mut dyn Bookkeeper>,
    ) -> usize {
        self.book.uncross(time, price, bookkeeper)
    }

    /// Flush the continuous book's tape.
    pub fn flush_tape(&mut self, mode: FlushMode) -> Vec<TapeRecord> {
        self.book.flush_tape(mode)
    }

    // Block discovery service.

    /// Submit a block indication through the admission gate.
    pub fn add_indication(&mut self, order: Order) -> Result<(OrderId, BookEntry), RejectReason> {
        self.block_book.add_indication(order)
    }

    /// Cancel a resting block indication.
    pub fn remove_indication(&mut self, time: Timestamp, order: &Order) -> Result<(), BookError> {
        self.block_book.remove_indication(time, order)
    }

    /// Look for a crossing pair of indications, recording it if found.
    pub fn find_block_match(&mut self) -> Option<MatchId> {
        self.block_book.find_match()
    }

    /// A pending block match by identity.
    pub fn match_by_id(&self, id: MatchId) -> Option<&BlockMatch> {
        self.block_book.match_by_id(id)
    }

    /// Confirm one side of a pending block match.
    pub fn submit_qualifying_order(&mut self, order: Order) -> Result<Confirmation, BookError> {
        self.block_book.submit_qualifying_order(order)
    }

    /// The participant's composite reputation, if ever seen.
    pub fn reputation(&self, participant: ParticipantId) -> Option<f64> {
        self.block_book.reputation(participant)
    }

    /// The continuous order book.
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// The block indication book.
    pub fn block_book(&self) -> &BlockIndicationBook {
        &self.block_book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quantity, Side};

    fn order(participant: u64, side: Side, quantity: Quantity, mes: Quantity) -> Order {
        Order::new(100, ParticipantId(participant), side, quantity, mes)
    }

    #[test]
    fn routes_continuous_orders() {
        let mut exchange = Exchange::new();
        exchange.add_order(order(0, Side::Buy, 8, 7));
        exchange.add_order(order(1, Side::Sell, 8, 6));

        let trades = exchange.uncross(200, Price(50), None);
        assert_eq!(trades, 1);
        assert_eq!(exchange.book().tape().len(), 1);
        assert!(exchange.flush_tape(FlushMode::Wipe).len() == 1);
        assert!(exchange.book().tape().is_empty());
    }

    #[test]
    fn routes_block_negotiation() {
        let mut exchange = Exchange::new();
        exchange
            .add_indication(Order::indication(100, ParticipantId(0), Side::Buy, 1024, 500))
            .unwrap();
        exchange
            .add_indication(Order::indication(100, ParticipantId(1), Side::Sell, 500, 500))
            .unwrap();

        let id = exchange.find_block_match().unwrap();
        assert!(exchange.match_by_id(id).is_some());

        exchange
            .submit_qualifying_order(Order::qualifying(
                110,
                ParticipantId(0),
                Side::Buy,
                1024,
                500,
                id,
            ))
            .unwrap();
        let result = exchange
            .submit_qualifying_order(Order::qualifying(
                110,
                ParticipantId(1),
                Side::Sell,
                500,
                500,
                id,
            ))
            .unwrap();

        assert!(matches!(result, Confirmation::Complete(_)));
        assert_eq!(exchange.reputation(ParticipantId(0)), Some(62.5));
    }

    #[test]
    fn books_are_independent() {
        let mut exchange = Exchange::new();
        exchange.add_order(order(0, Side::Buy, 1024, 500));
        exchange
            .add_indication(Order::indication(100, ParticipantId(1), Side::Sell, 1024, 500))
            .unwrap();

        // An order and an indication never cross each other.
        assert_eq!(exchange.find_block_match(), None);
        assert_eq!(exchange.uncross(200, Price(50), None), 0);
    }
}
