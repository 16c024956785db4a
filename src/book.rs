//! OrderBook: both sides of the dark pool for one instrument, plus the
//! identity counter and the tape.
//!
//! Structure and admission live here; the matching algorithm is in
//! [`crate::matching`].

use crate::book_side::{BookEntry, BookSide};
use crate::error::BookError;
use crate::tape::{FlushMode, Tape, TapeRecord};
use crate::{Order, OrderId, Side, Timestamp};

/// The order book for a single instrument.
#[derive(Clone, Debug, Default)]
pub struct OrderBook {
    /// Resting buy orders, size-then-time priority.
    buy_side: BookSide,
    /// Resting sell orders, size-then-time priority.
    sell_side: BookSide,
    /// Next order identity to assign (monotonically increasing).
    next_order_id: u64,
    /// Append-only trade/cancel history.
    tape: Tape,
}

impl OrderBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next order identity.
    fn next_order_id(&mut self) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    /// Admit an order: assign its identity and insert it on its side.
    ///
    /// Returns the assigned identity and whether this was a fresh
    /// [`BookEntry::Addition`] or an [`BookEntry::Overwrite`] of the
    /// participant's previous order on that side.
    pub fn add_order(&mut self, mut order: Order) -> (OrderId, BookEntry) {
        let id = self.next_order_id();
        order.id = id;
        let entry = self.side_mut(order.side).add(order);
        (id, entry)
    }

    /// Cancel the order: remove it from its side and record the
    /// cancellation on the tape.
    ///
    /// The tape holds the order as the caller presented it; the book's
    /// copy is dropped.
    pub fn remove_order(&mut self, time: Timestamp, order: &Order) -> Result<(), BookError> {
        self.side_mut(order.side)
            .remove(order.participant)
            .ok_or(BookError::NoRestingOrder(order.participant))?;
        self.tape.append(TapeRecord::Cancel {
            time,
            order: order.clone(),
        });
        Ok(())
    }

    /// The requested side.
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.buy_side,
            Side::Sell => &self.sell_side,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.buy_side,
            Side::Sell => &mut self.sell_side,
        }
    }

    /// The tape of executed trades and cancellations.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub(crate) fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    /// Return the tape's records, keeping or wiping per `mode`.
    pub fn flush_tape(&mut self, mode: FlushMode) -> Vec<TapeRecord> {
        self.tape.flush(mode)
    }
}
