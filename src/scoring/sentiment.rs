use crate::scoring::{mentioning, ResultSignal};

pub fn sentiment_score(signals: &[ResultSignal]) -> f64 {
    let mut mentions = 0usize;
    let mut positive = 0usize;
    for signal in mentioning(signals) {
        mentions += 1;
        if signal.positive {
            positive += 1;
        }
    }
    if mentions == 0 {
        return 0.0;
    }
    positive as f64 / mentions as f64
}
