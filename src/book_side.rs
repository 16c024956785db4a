//! BookSide: one priority-ordered side (bids or asks) of a book.
//!
//! Priority is size-then-time: quantity descending, then submission time
//! ascending. Size-first priority is unusual but intentional for a
//! block-friendly venue; it rewards participants willing to commit to
//! larger size, with time breaking ties so equally sized orders are never
//! starved.

use rustc_hash::FxHashSet;

use crate::{Order, ParticipantId};

/// Whether an `add` created a new resting order or replaced the
/// participant's previous one. Both are successful outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BookEntry {
    /// The participant had no resting order on this side.
    Addition,
    /// The participant's previous resting order was removed first.
    Overwrite,
}

/// One side of a book: the priority-ordered resting orders plus the
/// one-order-per-participant presence set.
///
/// The side exclusively owns its orders; nothing else holds a reference
/// into the sequence once an order is admitted.
#[derive(Clone, Debug, Default)]
pub struct BookSide {
    /// Resting orders, best-first: quantity descending, time ascending.
    orders: Vec<Order>,
    /// Participants with an order currently resting on this side.
    participants: FxHashSet<ParticipantId>,
}

impl BookSide {
    /// Create an empty side.
    pub fn new() -> Self {
        Self::default()
    }

    /// The index at which `candidate` would be inserted to preserve the
    /// sort invariant.
    ///
    /// Linear scan for the first occupant with smaller quantity, or equal
    /// quantity and later submission time. Equal quantity and equal time
    /// sorts after the occupant, so the order is total.
    pub fn insert_position(&self, candidate: &Order) -> usize {
        self.orders
            .iter()
            .position(|resting| {
                candidate.quantity > resting.quantity
                    || (candidate.quantity == resting.quantity
                        && candidate.timestamp < resting.timestamp)
            })
            .unwrap_or(self.orders.len())
    }

    /// Admit an order, replacing any existing order from the same
    /// participant.
    pub fn add(&mut self, order: Order) -> BookEntry {
        let entry = if self.participants.contains(&order.participant) {
            self.remove(order.participant);
            BookEntry::Overwrite
        } else {
            BookEntry::Addition
        };

        self.participants.insert(order.participant);
        let position = self.insert_position(&order);
        self.orders.insert(position, order);
        entry
    }

    /// Remove the participant's resting order, returning it.
    ///
    /// Returns `None` if the participant has nothing resting; the caller
    /// decides whether that is an error.
    pub fn remove(&mut self, participant: ParticipantId) -> Option<Order> {
        if !self.participants.remove(&participant) {
            return None;
        }
        let index = self
            .orders
            .iter()
            .position(|o| o.participant == participant)
            .expect("presence set and order sequence agree");
        Some(self.orders.remove(index))
    }

    /// Resting orders in priority order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of resting orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True if nothing is resting.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// True if the participant has an order resting on this side.
    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.participants.contains(&participant)
    }

    /// The highest-priority resting order.
    pub fn best(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Total resting quantity on this side.
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(|o| o.quantity).sum()
    }
}
