pub mod polarity;
pub mod valence;

use serde::{Deserialize, Serialize};

use crate::config::SentimentConfig;
use crate::SearchResult;

pub use polarity::polarity_score;
pub use valence::valence_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn label(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    fn opposes(self, other: SentimentLabel) -> bool {
        matches!(
            (self, other),
            (SentimentLabel::Positive, SentimentLabel::Negative)
                | (SentimentLabel::Negative, SentimentLabel::Positive)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAssessment {
    pub label: SentimentLabel,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SentimentScorer {
    valence_threshold: f64,
    polarity_threshold: f64,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(&SentimentConfig::default())
    }
}

impl SentimentScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self {
            valence_threshold: config.valence_threshold.abs(),
            polarity_threshold: config.polarity_threshold.abs(),
        }
    }

    /// A polar label needs both scorers to agree; any disagreement is neutral.
    pub fn assess(&self, text: &str) -> SentimentAssessment {
        let valence = valence_score(text);
        let polarity = polarity_score(text);

        let valence_label = classify(valence, self.valence_threshold, true);
        let polarity_label = classify(polarity, self.polarity_threshold, false);

        let label = if valence_label == polarity_label {
            valence_label
        } else {
            SentimentLabel::Neutral
        };

        SentimentAssessment {
            label,
            score: (valence + polarity) / 2.0,
        }
    }

    pub fn label(&self, text: &str) -> SentimentLabel {
        self.assess(text).label
    }

    pub fn comments_label<S: AsRef<str>>(&self, comments: &[S]) -> SentimentLabel {
        let labels: Vec<SentimentLabel> = comments
            .iter()
            .map(|comment| self.label(comment.as_ref()))
            .collect();
        aggregate_labels(&labels)
    }

    /// Title and description decide; comments fill in a neutral text label
    /// and cancel a text label they clearly contradict.
    pub fn result_label(&self, result: &SearchResult) -> SentimentLabel {
        let text_label = self.label(&result.text());
        if result.comments.is_empty() {
            return text_label;
        }

        let comment_label = self.comments_label(&result.comments);
        if text_label == SentimentLabel::Neutral {
            comment_label
        } else if text_label.opposes(comment_label) {
            SentimentLabel::Neutral
        } else {
            text_label
        }
    }
}

/// Valence uses inclusive bounds, polarity strict ones.
fn classify(score: f64, threshold: f64, inclusive: bool) -> SentimentLabel {
    let positive = if inclusive {
        score >= threshold
    } else {
        score > threshold
    };
    let negative = if inclusive {
        score <= -threshold
    } else {
        score < -threshold
    };

    if score == 0.0 {
        SentimentLabel::Neutral
    } else if positive {
        SentimentLabel::Positive
    } else if negative {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Strict majority label; ties and empty input are neutral.
pub fn aggregate_labels(labels: &[SentimentLabel]) -> SentimentLabel {
    let mut positive = 0usize;
    let mut neutral = 0usize;
    let mut negative = 0usize;
    for label in labels {
        match label {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Neutral => neutral += 1,
            SentimentLabel::Negative => negative += 1,
        }
    }

    if positive > neutral && positive > negative {
        SentimentLabel::Positive
    } else if negative > neutral && negative > positive {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platform;

    fn result(title: &str, comments: &[&str]) -> SearchResult {
        SearchResult {
            keyword: "smart fan".to_string(),
            platform: Platform::YouTube,
            title: title.to_string(),
            description: String::new(),
            channel: "channel".to_string(),
            link: "https://example.com".to_string(),
            view_count: 100,
            like_count: 10,
            comment_count: comments.len() as u64,
            published_at: None,
            rank_position: 1,
            comments: comments.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn agreeing_scorers_produce_polar_labels() {
        let scorer = SentimentScorer::default();
        assert_eq!(scorer.label("great quiet fan"), SentimentLabel::Positive);
        assert_eq!(scorer.label("terrible noisy fan"), SentimentLabel::Negative);
        assert_eq!(scorer.label("fan installation guide"), SentimentLabel::Neutral);
    }

    #[test]
    fn disagreement_is_neutral() {
        let scorer = SentimentScorer::default();
        // "recommend" exists only in the valence lexicon.
        assert!(valence_score("recommend") > 0.05);
        assert_eq!(polarity_score("recommend"), 0.0);
        assert_eq!(scorer.label("recommend"), SentimentLabel::Neutral);
        // "smart" exists only in the polarity lexicon.
        assert_eq!(scorer.label("smart"), SentimentLabel::Neutral);
    }

    #[test]
    fn assessment_score_is_mean_of_both() {
        let scorer = SentimentScorer::default();
        let assessment = scorer.assess("great");
        let expected = (valence_score("great") + polarity_score("great")) / 2.0;
        assert!((assessment.score - expected).abs() < 1e-12);
    }

    #[test]
    fn aggregate_uses_strict_majority() {
        use SentimentLabel::*;
        assert_eq!(aggregate_labels(&[]), Neutral);
        assert_eq!(aggregate_labels(&[Positive, Positive, Negative]), Positive);
        assert_eq!(aggregate_labels(&[Positive, Negative]), Neutral);
        assert_eq!(aggregate_labels(&[Negative, Negative, Neutral]), Negative);
    }

    #[test]
    fn comments_fill_neutral_text_and_cancel_contradiction() {
        let scorer = SentimentScorer::default();
        let neutral_title = result("ceiling fan unboxing", &["great fan", "excellent build"]);
        assert_eq!(scorer.result_label(&neutral_title), SentimentLabel::Positive);

        let contradicted = result("great fan", &["terrible noise", "worst purchase"]);
        assert_eq!(scorer.result_label(&contradicted), SentimentLabel::Neutral);

        let no_comments = result("great fan", &[]);
        assert_eq!(scorer.result_label(&no_comments), SentimentLabel::Positive);
    }
}
