//! Reputation: per-participant composite scores and event scoring.
//!
//! Every negotiated trade scores how faithfully each party's binding
//! confirmation honored its original indication; the composite score is an
//! exponentially weighted average of those events. History dominates
//! (weight 0.75 by default), so the score moves slowly and a single event
//! cannot swing access to the block discovery service.

use rustc_hash::FxHashMap;

use crate::config::BlockConfig;
use crate::{Order, ParticipantId};

/// Score one completed negotiation event for a single side.
///
/// A confirmation whose MES exceeds the indication's is non-marketable and
/// scores 0. Otherwise the score starts at 100 and loses the percentage
/// shortfall of MES and quantity relative to the indication, clamped to
/// `[config.score_floor, config.score_ceiling]`; a perfect restatement
/// scores 100. An indication with MES 0 cannot be undercut, so its MES
/// term is 0 (the marketability check above already forced the
/// confirmation's MES to 0 too).
pub fn event_score(indication: &Order, confirmation: &Order, config: &BlockConfig) -> f64 {
    if confirmation.min_exec_size > indication.min_exec_size {
        return 0.0;
    }

    let pct_diff = |ind: u64, conf: u64| {
        if ind == 0 {
            0.0
        } else {
            100.0 * (ind as f64 - conf as f64) / ind as f64
        }
    };
    let score = 100.0
        - pct_diff(indication.min_exec_size, confirmation.min_exec_size)
        - pct_diff(indication.quantity, confirmation.quantity);
    score.clamp(config.score_floor, config.score_ceiling)
}

/// The composite reputation ledger, owned by the block indication book.
///
/// Scores live in [0, 100]. Initialization is explicit (`get_or_init`);
/// a plain `get` never mutates.
#[derive(Clone, Debug)]
pub struct ReputationLedger {
    scores: FxHashMap<ParticipantId, f64>,
    initial: f64,
}

impl ReputationLedger {
    /// Create an empty ledger assigning `initial` on first sight.
    pub fn new(initial: f64) -> Self {
        Self {
            scores: FxHashMap::default(),
            initial,
        }
    }

    /// The participant's composite score, or `None` if never seen.
    pub fn get(&self, participant: ParticipantId) -> Option<f64> {
        self.scores.get(&participant).copied()
    }

    /// The participant's composite score, initializing it on first sight.
    pub fn get_or_init(&mut self, participant: ParticipantId) -> f64 {
        *self.scores.entry(participant).or_insert(self.initial)
    }

    /// Fold an event score into the composite:
    /// `score' = score * history_weight + event * (1 - history_weight)`.
    pub fn apply_event(&mut self, participant: ParticipantId, event: f64, history_weight: f64) {
        let score = self.scores.entry(participant).or_insert(self.initial);
        *score = *score * history_weight + event * (1.0 - history_weight);
    }

    /// Number of participants ever seen.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True if no participant has been seen.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
