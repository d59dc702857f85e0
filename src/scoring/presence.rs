use crate::scoring::{mentioning, ResultSignal};

pub fn presence_score(signals: &[ResultSignal]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }
    mentioning(signals).count() as f64 / signals.len() as f64
}
