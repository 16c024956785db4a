//! Order representation and lifecycle

use std::fmt;

use crate::{MatchId, OrderId, ParticipantId, Quantity, Side, Timestamp};

/// What role an order plays in the venue.
///
/// A closed tag: every dispatch on kind is an exhaustive `match`, so an
/// unrecognized-kind failure cannot exist at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderKind {
    /// A plain resting order on the lit side of the pool.
    #[default]
    Normal,
    /// A non-binding block indication, subject to reputation gating.
    BlockIndication,
    /// A binding confirmation of a matched indication, carrying the
    /// identity of the match it confirms.
    QualifyingOrder { match_id: MatchId },
}

/// A resting order.
///
/// `quantity` decreases on partial fill and `min_exec_size` is clamped so
/// that it never exceeds the remaining quantity; both invariants are
/// enforced by [`Order::fill`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Identity assigned by the book on admission; `OrderId(0)` placeholder
    /// until then.
    pub id: OrderId,
    /// Submitting participant.
    pub participant: ParticipantId,
    /// Buy or sell.
    pub side: Side,
    /// Quantity still available to trade.
    pub quantity: Quantity,
    /// Minimum execution size: the smallest fill this order accepts.
    pub min_exec_size: Quantity,
    /// Submission time (priority tie-break).
    pub timestamp: Timestamp,
    /// Plain order, block indication, or qualifying order.
    pub kind: OrderKind,
}

impl Order {
    /// Create a plain order.
    ///
    /// # Panics
    ///
    /// Panics if `quantity == 0` or `min_exec_size > quantity`.
    pub fn new(
        timestamp: Timestamp,
        participant: ParticipantId,
        side: Side,
        quantity: Quantity,
        min_exec_size: Quantity,
    ) -> Self {
        Self::with_kind(
            timestamp,
            participant,
            side,
            quantity,
            min_exec_size,
            OrderKind::Normal,
        )
    }

    /// Create a block indication.
    pub fn indication(
        timestamp: Timestamp,
        participant: ParticipantId,
        side: Side,
        quantity: Quantity,
        min_exec_size: Quantity,
    ) -> Self {
        Self::with_kind(
            timestamp,
            participant,
            side,
            quantity,
            min_exec_size,
            OrderKind::BlockIndication,
        )
    }

    /// Create a qualifying order confirming the given match.
    pub fn qualifying(
        timestamp: Timestamp,
        participant: ParticipantId,
        side: Side,
        quantity: Quantity,
        min_exec_size: Quantity,
        match_id: MatchId,
    ) -> Self {
        Self::with_kind(
            timestamp,
            participant,
            side,
            quantity,
            min_exec_size,
            OrderKind::QualifyingOrder { match_id },
        )
    }

    fn with_kind(
        timestamp: Timestamp,
        participant: ParticipantId,
        side: Side,
        quantity: Quantity,
        min_exec_size: Quantity,
        kind: OrderKind,
    ) -> Self {
        assert!(quantity > 0, "order quantity must be positive");
        assert!(
            min_exec_size <= quantity,
            "min_exec_size {} exceeds quantity {}",
            min_exec_size,
            quantity
        );
        Self {
            id: OrderId(0),
            participant,
            side,
            quantity,
            min_exec_size,
            timestamp,
            kind,
        }
    }

    /// Reduce the remaining quantity by a fill and clamp `min_exec_size`
    /// down to the residual, so a partially filled order can still trade.
    ///
    /// # Panics
    ///
    /// Panics if `size > quantity`.
    pub fn fill(&mut self, size: Quantity) {
        assert!(
            size <= self.quantity,
            "fill size {} exceeds remaining {}",
            size,
            self.quantity
        );
        self.quantity -= size;
        if self.min_exec_size > self.quantity {
            self.min_exec_size = self.quantity;
        }
    }

    /// Returns true if this order is a block indication.
    #[inline]
    pub fn is_indication(&self) -> bool {
        self.kind == OrderKind::BlockIndication
    }

    /// The match this order confirms, if it is a qualifying order.
    #[inline]
    pub fn confirms(&self) -> Option<MatchId> {
        match self.kind {
            OrderKind::QualifyingOrder { match_id } => Some(match_id),
            _ => None,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OrderKind::Normal => write!(
                f,
                "Order [{} T={} {} {} Q={} MES={}]",
                self.id, self.timestamp, self.participant, self.side, self.quantity, self.min_exec_size
            ),
            OrderKind::BlockIndication => write!(
                f,
                "BI [{} T={} {} {} Q={} MES={}]",
                self.id, self.timestamp, self.participant, self.side, self.quantity, self.min_exec_size
            ),
            OrderKind::QualifyingOrder { match_id } => write!(
                f,
                "QBO [{} T={} {} {} Q={} MES={} {}]",
                self.id,
                self.timestamp,
                self.participant,
                self.side,
                self.quantity,
                self.min_exec_size,
                match_id
            ),
        }
    }
}
