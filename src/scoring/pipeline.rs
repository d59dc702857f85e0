use crate::scoring::dominance::dominance_score;
use crate::scoring::engagement::{engagement_ratio, engagement_score};
use crate::scoring::presence::presence_score;
use crate::scoring::sentiment::sentiment_score;
use crate::scoring::weighted::SubScores;
use crate::scoring::{ResultSignal, WeightedScorer};
use crate::sentiment::{SentimentLabel, SentimentScorer};
use crate::{Platform, SearchResult, SoVRecord};

#[derive(Debug, Clone)]
pub struct SovCalculator {
    weighted_scorer: WeightedScorer,
    sentiment_scorer: SentimentScorer,
}

impl SovCalculator {
    pub fn new(weighted_scorer: WeightedScorer, sentiment_scorer: SentimentScorer) -> Self {
        Self {
            weighted_scorer,
            sentiment_scorer,
        }
    }

    pub fn sentiment_scorer(&self) -> &SentimentScorer {
        &self.sentiment_scorer
    }

    pub fn calculate(
        &self,
        keyword: &str,
        platform: Platform,
        results: &[SearchResult],
        brand: &str,
    ) -> SoVRecord {
        let labels = self.labels(results);
        self.score_brand(keyword, platform, results, &labels, brand)
    }

    /// One record per brand, in the order given; labels are computed once.
    pub fn calculate_all(
        &self,
        keyword: &str,
        platform: Platform,
        results: &[SearchResult],
        brands: &[String],
    ) -> Vec<SoVRecord> {
        let labels = self.labels(results);
        brands
            .iter()
            .map(|brand| self.score_brand(keyword, platform, results, &labels, brand))
            .collect()
    }

    fn labels(&self, results: &[SearchResult]) -> Vec<SentimentLabel> {
        results
            .iter()
            .map(|result| self.sentiment_scorer.result_label(result))
            .collect()
    }

    fn score_brand(
        &self,
        keyword: &str,
        platform: Platform,
        results: &[SearchResult],
        labels: &[SentimentLabel],
        brand: &str,
    ) -> SoVRecord {
        if results.is_empty() {
            return SoVRecord::empty(keyword, platform, brand);
        }

        let signals: Vec<ResultSignal> = results
            .iter()
            .zip(labels)
            .map(|(result, label)| ResultSignal {
                rank_position: result.rank_position,
                engagement_ratio: engagement_ratio(result),
                mentions_brand: result.mentions(brand),
                positive: *label == SentimentLabel::Positive,
            })
            .collect();

        let scores = SubScores {
            presence: presence_score(&signals),
            engagement: engagement_score(&signals),
            sentiment: sentiment_score(&signals),
            dominance: dominance_score(&signals),
        };

        SoVRecord {
            keyword: keyword.to_string(),
            platform,
            brand: brand.to_string(),
            presence_score: scores.presence,
            engagement_score: scores.engagement,
            sentiment_score: scores.sentiment,
            dominance_score: scores.dominance,
            weighted_sov: self.weighted_scorer.score(&scores),
            result_count: results.len(),
            mention_count: signals.iter().filter(|signal| signal.mentions_brand).count(),
        }
    }
}
