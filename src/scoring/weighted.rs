use serde::{Deserialize, Serialize};

use crate::SovError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SovWeights {
    pub presence: f64,
    pub engagement: f64,
    pub sentiment: f64,
    pub dominance: f64,
}

impl Default for SovWeights {
    fn default() -> Self {
        Self {
            presence: 0.4,
            engagement: 0.3,
            sentiment: 0.2,
            dominance: 0.1,
        }
    }
}

impl SovWeights {
    pub fn validate(&self) -> Result<(), SovError> {
        let weights = [
            ("presence", self.presence),
            ("engagement", self.engagement),
            ("sentiment", self.sentiment),
            ("dominance", self.dominance),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(SovError::Config(format!(
                    "weight `{}` must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub presence: f64,
    pub engagement: f64,
    pub sentiment: f64,
    pub dominance: f64,
}

#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: SovWeights,
}

impl WeightedScorer {
    pub fn new(weights: SovWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SovWeights {
        &self.weights
    }

    /// Weighted sum on a 0-100 scale, clamped so odd weights cannot escape it.
    pub fn score(&self, scores: &SubScores) -> f64 {
        let mut score = 0.0;

        score += scores.presence * self.weights.presence;
        score += scores.engagement * self.weights.engagement;
        score += scores.sentiment * self.weights.sentiment;
        score += scores.dominance * self.weights.dominance;

        let score = score * 100.0;
        if score.is_nan() {
            return 0.0;
        }
        score.clamp(0.0, 100.0)
    }
}
