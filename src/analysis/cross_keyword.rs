use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::AnalysisConfig;
use crate::{mean, BrandShare, Priority, SoVRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordScore {
    pub keyword: String,
    pub sov: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordBrandSov {
    pub keyword: String,
    pub brands: Vec<BrandShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentGap {
    pub keyword: String,
    pub brand_sov: f64,
    pub top_competitor: String,
    pub competitor_sov: f64,
    pub gap: f64,
    pub opportunity: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordShare {
    pub keyword: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAssociation {
    pub brand: String,
    pub keywords: Vec<KeywordShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityArea {
    pub area: String,
    pub keywords: Vec<String>,
    pub average_gap: f64,
    pub recommendation: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossKeywordTotals {
    pub total_keywords_analyzed: usize,
    pub gaps_identified: usize,
    pub high_priority_opportunities: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossKeywordSummary {
    pub ranking: Vec<KeywordScore>,
    pub strongest_keywords: Vec<KeywordScore>,
    pub weakest_keywords: Vec<KeywordScore>,
    pub gap_candidates: Vec<KeywordScore>,
    pub keyword_sov: Vec<KeywordBrandSov>,
    pub content_gaps: Vec<ContentGap>,
    pub brand_keyword_associations: Vec<BrandAssociation>,
    pub opportunity_areas: Vec<OpportunityArea>,
    pub totals: CrossKeywordTotals,
}

impl CrossKeywordSummary {
    pub fn keyword_share(&self, keyword: &str, brand: &str) -> f64 {
        self.keyword_sov
            .iter()
            .find(|entry| entry.keyword == keyword)
            .map(|entry| super::share_of(&entry.brands, brand))
            .unwrap_or(0.0)
    }
}

/// `brands` lists the target brand first, then competitors.
pub fn analyze_keywords(
    records: &[SoVRecord],
    keywords: &[String],
    brands: &[String],
    config: &AnalysisConfig,
) -> CrossKeywordSummary {
    let Some(target) = brands.first() else {
        return CrossKeywordSummary::default();
    };
    if keywords.is_empty() {
        return CrossKeywordSummary::default();
    }

    let keyword_sov: Vec<KeywordBrandSov> = keywords
        .iter()
        .map(|keyword| KeywordBrandSov {
            keyword: keyword.clone(),
            brands: brands
                .iter()
                .map(|brand| BrandShare {
                    brand: brand.clone(),
                    weighted_sov: keyword_brand_sov(records, keyword, brand),
                })
                .collect(),
        })
        .collect();

    let scores: Vec<KeywordScore> = keyword_sov
        .iter()
        .map(|entry| KeywordScore {
            keyword: entry.keyword.clone(),
            sov: super::share_of(&entry.brands, target),
        })
        .collect();

    let ranking = rank_descending(&scores);
    let average = mean(&scores.iter().map(|score| score.sov).collect::<Vec<_>>());

    let strongest_keywords: Vec<KeywordScore> = ranking
        .iter()
        .filter(|score| score.sov >= average)
        .cloned()
        .collect();

    let ascending = rank_ascending(&scores);
    let weakest_keywords: Vec<KeywordScore> = ascending
        .iter()
        .filter(|score| score.sov < average)
        .cloned()
        .collect();
    let gap_candidates: Vec<KeywordScore> = ascending
        .iter()
        .take(config.gap_candidate_count)
        .cloned()
        .collect();

    let content_gaps = find_content_gaps(&keyword_sov, target, config);
    let brand_keyword_associations = keyword_associations(records, keywords, brands);
    let opportunity_areas = opportunity_areas(&content_gaps, config);

    let totals = CrossKeywordTotals {
        total_keywords_analyzed: keywords.len(),
        gaps_identified: content_gaps.len(),
        high_priority_opportunities: opportunity_areas
            .iter()
            .filter(|area| area.priority == Priority::High)
            .count(),
    };

    CrossKeywordSummary {
        ranking,
        strongest_keywords,
        weakest_keywords,
        gap_candidates,
        keyword_sov,
        content_gaps,
        brand_keyword_associations,
        opportunity_areas,
        totals,
    }
}

fn keyword_brand_sov(records: &[SoVRecord], keyword: &str, brand: &str) -> f64 {
    let values: Vec<f64> = records
        .iter()
        .filter(|record| record.keyword == keyword && record.brand == brand && record.result_count > 0)
        .map(|record| record.weighted_sov)
        .collect();
    mean(&values)
}

// `sort_by` is stable, so ties keep the configured keyword order.
fn rank_descending(scores: &[KeywordScore]) -> Vec<KeywordScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.sov.partial_cmp(&a.sov).unwrap_or(Ordering::Equal));
    ranked
}

fn rank_ascending(scores: &[KeywordScore]) -> Vec<KeywordScore> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| a.sov.partial_cmp(&b.sov).unwrap_or(Ordering::Equal));
    ranked
}

fn find_content_gaps(
    keyword_sov: &[KeywordBrandSov],
    target: &str,
    config: &AnalysisConfig,
) -> Vec<ContentGap> {
    let mut gaps = Vec::new();
    for entry in keyword_sov {
        let brand_sov = super::share_of(&entry.brands, target);
        let top = entry
            .brands
            .iter()
            .filter(|share| share.brand != target)
            .fold(None::<&BrandShare>, |best, share| match best {
                Some(current) if current.weighted_sov >= share.weighted_sov => Some(current),
                _ => Some(share),
            });
        let Some(top) = top else {
            continue;
        };

        let gap = top.weighted_sov - brand_sov;
        if gap > config.content_gap_threshold {
            gaps.push(ContentGap {
                keyword: entry.keyword.clone(),
                brand_sov,
                top_competitor: top.brand.clone(),
                competitor_sov: top.weighted_sov,
                gap,
                opportunity: if gap > config.high_gap_threshold {
                    Priority::High
                } else {
                    Priority::Medium
                },
            });
        }
    }

    gaps.sort_by(|a, b| b.gap.partial_cmp(&a.gap).unwrap_or(Ordering::Equal));
    gaps
}

/// Share of each brand's mentions that fall under each keyword, in percent.
fn keyword_associations(
    records: &[SoVRecord],
    keywords: &[String],
    brands: &[String],
) -> Vec<BrandAssociation> {
    let mut associations = Vec::new();
    for brand in brands {
        let counts: Vec<(String, usize)> = keywords
            .iter()
            .map(|keyword| {
                let count = records
                    .iter()
                    .filter(|record| record.brand == *brand && record.keyword == *keyword)
                    .map(|record| record.mention_count)
                    .sum();
                (keyword.clone(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        let total: usize = counts.iter().map(|(_, count)| count).sum();
        if total == 0 {
            continue;
        }

        associations.push(BrandAssociation {
            brand: brand.clone(),
            keywords: counts
                .into_iter()
                .map(|(keyword, count)| KeywordShare {
                    keyword,
                    percent: count as f64 / total as f64 * 100.0,
                })
                .collect(),
        });
    }
    associations
}

fn opportunity_areas(gaps: &[ContentGap], config: &AnalysisConfig) -> Vec<OpportunityArea> {
    config
        .keyword_groups
        .iter()
        .filter_map(|group| {
            let group_gaps: Vec<f64> = gaps
                .iter()
                .filter(|gap| {
                    group
                        .keywords
                        .iter()
                        .any(|keyword| keyword.eq_ignore_ascii_case(&gap.keyword))
                })
                .map(|gap| gap.gap)
                .collect();
            if group_gaps.is_empty() {
                return None;
            }
            let average_gap = mean(&group_gaps);
            Some(OpportunityArea {
                area: group.name.clone(),
                keywords: group.keywords.clone(),
                average_gap,
                recommendation: group.recommendation.clone(),
                priority: if average_gap > config.group_priority_threshold {
                    Priority::High
                } else {
                    Priority::Medium
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platform;

    fn record(keyword: &str, brand: &str, sov: f64, mentions: usize) -> SoVRecord {
        let mut record = SoVRecord::empty(keyword, Platform::YouTube, brand);
        record.weighted_sov = sov;
        record.result_count = 10;
        record.mention_count = mentions;
        record
    }

    fn brands() -> Vec<String> {
        vec!["Atomberg".to_string(), "Havells".to_string()]
    }

    #[test]
    fn strongest_and_weakest_split_on_mean() {
        let keywords: Vec<String> = ["a", "b", "c", "d"].iter().map(|k| k.to_string()).collect();
        let records = vec![
            record("a", "Atomberg", 10.0, 1),
            record("b", "Atomberg", 40.0, 4),
            record("c", "Atomberg", 30.0, 3),
            record("d", "Atomberg", 20.0, 2),
        ];
        let summary = analyze_keywords(&records, &keywords, &brands(), &AnalysisConfig::default());

        let names = |scores: &[KeywordScore]| -> Vec<String> {
            scores.iter().map(|score| score.keyword.clone()).collect()
        };
        assert_eq!(names(&summary.ranking), vec!["b", "c", "d", "a"]);
        assert_eq!(names(&summary.strongest_keywords), vec!["b", "c"]);
        assert_eq!(names(&summary.weakest_keywords), vec!["a", "d"]);
        assert_eq!(names(&summary.gap_candidates), vec!["a", "d", "c"]);
    }

    #[test]
    fn content_gap_requires_lead_above_threshold() {
        let keywords = vec!["x".to_string(), "y".to_string()];
        let records = vec![
            record("x", "Atomberg", 10.0, 1),
            record("x", "Havells", 35.0, 3),
            record("y", "Atomberg", 10.0, 1),
            record("y", "Havells", 20.0, 2),
        ];
        let summary = analyze_keywords(&records, &keywords, &brands(), &AnalysisConfig::default());
        assert_eq!(summary.content_gaps.len(), 1);
        let gap = &summary.content_gaps[0];
        assert_eq!(gap.keyword, "x");
        assert_eq!(gap.top_competitor, "Havells");
        assert_eq!(gap.opportunity, Priority::High);
        assert!((gap.gap - 25.0).abs() < 1e-9);
    }

    #[test]
    fn associations_normalize_to_percent() {
        let keywords = vec!["x".to_string(), "y".to_string()];
        let records = vec![record("x", "Atomberg", 10.0, 1), record("y", "Atomberg", 10.0, 3)];
        let summary = analyze_keywords(&records, &keywords, &brands(), &AnalysisConfig::default());
        let atomberg = &summary.brand_keyword_associations[0];
        assert_eq!(atomberg.brand, "Atomberg");
        assert!((atomberg.keywords[0].percent - 25.0).abs() < 1e-9);
        assert!((atomberg.keywords[1].percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn opportunity_area_averages_group_gaps() {
        let keywords = vec!["BLDC fan".to_string(), "energy efficient fan".to_string()];
        let records = vec![
            record("BLDC fan", "Atomberg", 0.0, 0),
            record("BLDC fan", "Havells", 30.0, 3),
            record("energy efficient fan", "Atomberg", 0.0, 0),
            record("energy efficient fan", "Havells", 12.0, 1),
        ];
        let summary = analyze_keywords(&records, &keywords, &brands(), &AnalysisConfig::default());
        assert_eq!(summary.opportunity_areas.len(), 1);
        let area = &summary.opportunity_areas[0];
        assert_eq!(area.area, "technical_keywords");
        assert!((area.average_gap - 21.0).abs() < 1e-9);
        assert_eq!(area.priority, Priority::High);
        assert_eq!(summary.totals.high_priority_opportunities, 1);
    }
}
