use crate::clamp01;
use crate::scoring::{mentioning, ResultSignal};

/// Mean of `1 - rank / N` over mentioning results; rank 1 of 5 scores 0.8.
pub fn dominance_score(signals: &[ResultSignal]) -> f64 {
    let total = signals.len();
    if total == 0 {
        return 0.0;
    }
    let positions: Vec<f64> = mentioning(signals)
        .map(|signal| clamp01(1.0 - signal.rank_position as f64 / total as f64))
        .collect();
    crate::mean(&positions)
}
