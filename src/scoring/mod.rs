pub mod dominance;
pub mod engagement;
pub mod pipeline;
pub mod presence;
pub mod sentiment;
pub mod weighted;

pub use pipeline::SovCalculator;
pub use weighted::{SovWeights, SubScores, WeightedScorer};

/// Per-result inputs shared by the four sub-scorers for one brand.
#[derive(Debug, Clone, Copy)]
pub struct ResultSignal {
    pub rank_position: usize,
    pub engagement_ratio: f64,
    pub mentions_brand: bool,
    pub positive: bool,
}

pub(crate) fn mentioning(signals: &[ResultSignal]) -> impl Iterator<Item = &ResultSignal> {
    signals.iter().filter(|signal| signal.mentions_brand)
}
