//! Tape: the append-only execution and cancellation history of a book.

use crate::{Order, ParticipantId, Price, Quantity, Timestamp};

/// An executed trade as recorded on the tape and reported to participants.
///
/// Holds independent copies of the fields it needs; never a reference to a
/// still-mutable order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeRecord {
    /// When the trade executed.
    pub time: Timestamp,
    /// Execution price (the caller-supplied uncross price).
    pub price: Price,
    /// Quantity executed.
    pub quantity: Quantity,
    /// Buy-side participant.
    pub buyer: ParticipantId,
    /// Sell-side participant.
    pub seller: ParticipantId,
}

/// One entry on the tape.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum TapeRecord {
    /// A completed trade.
    Trade(TradeRecord),
    /// A cancelled order, recorded as it stood at cancellation.
    Cancel { time: Timestamp, order: Order },
}

/// Whether a flush leaves the tape intact or clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushMode {
    /// Return the records and keep them on the tape.
    Keep,
    /// Return the records and wipe the tape.
    Wipe,
}

/// Append-only history: records are appended, never mutated, and removed
/// only by an explicit [`FlushMode::Wipe`] flush.
#[derive(Clone, Debug, Default)]
pub struct Tape {
    records: Vec<TapeRecord>,
}

impl Tape {
    /// Create an empty tape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn append(&mut self, record: TapeRecord) {
        self.records.push(record);
    }

    /// All records in append order.
    pub fn records(&self) -> &[TapeRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Return the records, keeping or wiping the tape per `mode`.
    pub fn flush(&mut self, mode: FlushMode) -> Vec<TapeRecord> {
        match mode {
            FlushMode::Keep => self.records.clone(),
            FlushMode::Wipe => std::mem::take(&mut self.records),
        }
    }
}
