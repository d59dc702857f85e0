pub mod cross_keyword;
pub mod insights;

use serde::{Deserialize, Serialize};

use crate::{mean, BrandShare, DataMode, Platform, SoVRecord};

pub use cross_keyword::{analyze_keywords, CrossKeywordSummary};
pub use insights::{generate_insights, Insight};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSentiment {
    pub brand: String,
    pub mentions: usize,
    pub positive_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSov {
    pub platform: Platform,
    pub mode: DataMode,
    pub result_count: usize,
    pub weighted_sov: Vec<BrandShare>,
    pub sentiment: Vec<BrandSentiment>,
}

impl PlatformSov {
    pub fn share_of(&self, brand: &str) -> f64 {
        share_of(&self.weighted_sov, brand)
    }

    pub fn has_results(&self) -> bool {
        self.result_count > 0
    }
}

pub fn share_of(shares: &[BrandShare], brand: &str) -> f64 {
    shares
        .iter()
        .find(|share| share.brand.eq_ignore_ascii_case(brand))
        .map(|share| share.weighted_sov)
        .unwrap_or(0.0)
}

/// Per-brand mean over the keyword slices that returned results.
pub fn platform_sov(
    platform: Platform,
    mode: DataMode,
    records: &[SoVRecord],
    brands: &[String],
) -> PlatformSov {
    let slices: Vec<&SoVRecord> = records
        .iter()
        .filter(|record| record.platform == platform && record.result_count > 0)
        .collect();

    let result_count = slices
        .iter()
        .filter(|record| brands.first().is_some_and(|brand| record.brand == *brand))
        .map(|record| record.result_count)
        .sum();

    let mut weighted_sov = Vec::with_capacity(brands.len());
    let mut sentiment = Vec::with_capacity(brands.len());
    for brand in brands {
        let brand_slices: Vec<&&SoVRecord> = slices
            .iter()
            .filter(|record| record.brand == *brand)
            .collect();
        let values: Vec<f64> = brand_slices.iter().map(|record| record.weighted_sov).collect();
        weighted_sov.push(BrandShare {
            brand: brand.clone(),
            weighted_sov: mean(&values),
        });

        let mentions: usize = brand_slices.iter().map(|record| record.mention_count).sum();
        let positive: f64 = brand_slices
            .iter()
            .map(|record| record.sentiment_score * record.mention_count as f64)
            .sum();
        sentiment.push(BrandSentiment {
            brand: brand.clone(),
            mentions,
            positive_ratio: if mentions == 0 {
                0.0
            } else {
                positive / mentions as f64
            },
        });
    }

    PlatformSov {
        platform,
        mode,
        result_count,
        weighted_sov,
        sentiment,
    }
}

/// Mean across platforms that produced any results; all zero otherwise.
pub fn overall_sov(platforms: &[PlatformSov], brands: &[String]) -> Vec<BrandShare> {
    let active: Vec<&PlatformSov> = platforms.iter().filter(|platform| platform.has_results()).collect();
    brands
        .iter()
        .map(|brand| {
            let values: Vec<f64> = active.iter().map(|platform| platform.share_of(brand)).collect();
            BrandShare {
                brand: brand.clone(),
                weighted_sov: mean(&values),
            }
        })
        .collect()
}
