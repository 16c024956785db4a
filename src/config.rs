//! Configuration surface consumed by the block indication book.

use crate::Quantity;

/// Tunables for block indication admission and reputation scoring.
///
/// Construct via `Default` and override fields as needed:
///
/// ```
/// use darkbook::BlockConfig;
///
/// let config = BlockConfig {
///     min_indication_value: 50,
///     ..BlockConfig::default()
/// };
/// assert_eq!(config.reputation_threshold, 20.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockConfig {
    /// Minimum indication value (MIV): an indication's quantity must
    /// strictly exceed this to be admitted.
    pub min_indication_value: Quantity,
    /// Reputation score threshold (RST): a participant's composite score
    /// must strictly exceed this to use the block discovery service.
    pub reputation_threshold: f64,
    /// Composite score assigned the first time a participant is seen.
    pub initial_reputation: f64,
    /// Weight of the existing composite score in the exponential update;
    /// the new event score carries `1 - history_weight`.
    pub history_weight: f64,
    /// Lower clamp for a marketable confirmation's event score.
    pub score_floor: f64,
    /// Upper clamp for an event score.
    pub score_ceiling: f64,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            min_indication_value: 20,
            reputation_threshold: 20.0,
            initial_reputation: 50.0,
            history_weight: 0.75,
            score_floor: 50.0,
            score_ceiling: 100.0,
        }
    }
}
