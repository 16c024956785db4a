//! Typed errors: rejections the caller can react to, and missing-entity
//! conditions. Neither is a panic; fatal programming errors (duplicate
//! admission, wrong-kind submission) assert instead.

use thiserror::Error;

use crate::{MatchId, ParticipantId, Quantity};

/// Why a block indication was refused admission. No state is mutated on
/// rejection (beyond lazily initializing the participant's reputation).
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RejectReason {
    /// The indication's quantity does not exceed the minimum indication
    /// value configured for the book.
    #[error("indication quantity {quantity} does not exceed the minimum indication value {minimum}")]
    BelowMinimumValue { quantity: Quantity, minimum: Quantity },
    /// The participant's composite reputation does not exceed the
    /// threshold gating the block discovery service.
    #[error("participant {participant} reputation {score:.1} does not exceed threshold {threshold:.1}")]
    ReputationTooLow {
        participant: ParticipantId,
        score: f64,
        threshold: f64,
    },
}

/// Missing-entity conditions: the caller named something the book does not
/// hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BookError {
    /// The participant has no order resting on the named side.
    #[error("participant {0} has no resting order on this side")]
    NoRestingOrder(ParticipantId),
    /// No pending match carries this identity.
    #[error("no pending match with id {0}")]
    UnknownMatch(MatchId),
}
