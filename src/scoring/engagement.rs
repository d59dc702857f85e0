use crate::scoring::{mentioning, ResultSignal};
use crate::SearchResult;

pub fn engagement_ratio(result: &SearchResult) -> f64 {
    if result.view_count == 0 {
        return 0.0;
    }
    (result.like_count + result.comment_count) as f64 / result.view_count as f64
}

/// Mean of each mentioning result's ratio relative to the best ratio in the
/// whole result set.
pub fn engagement_score(signals: &[ResultSignal]) -> f64 {
    let max_ratio = signals
        .iter()
        .map(|signal| signal.engagement_ratio)
        .fold(0.0_f64, f64::max);
    if max_ratio <= 0.0 {
        return 0.0;
    }

    let relative: Vec<f64> = mentioning(signals)
        .map(|signal| signal.engagement_ratio / max_ratio)
        .collect();
    crate::mean(&relative)
}
