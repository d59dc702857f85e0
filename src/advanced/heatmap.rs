use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::advanced::{bump, empty_counts, lower_text, matching_groups, AnalysisInput, CategoryCount, Effort, TermGroups};
use crate::{Platform, Priority};

const TOPICS: TermGroups = &[
    ("technical", &["bldc", "motor", "energy efficiency", "wattage", "technology"]),
    ("features", &["smart", "wifi", "app", "remote", "voice control", "iot"]),
    ("comparison", &[" vs ", "compare", "better than", "difference", "review"]),
    ("installation", &["install", "setup", "mounting", "wiring", "diy"]),
    ("maintenance", &["cleaning", "repair", "maintenance", "service"]),
    ("buying_guide", &["best", "top", "recommend", "buy", "price", "cost"]),
];

const FORMATS: TermGroups = &[
    ("tutorial", &["how to", "tutorial", "guide", "step by step"]),
    ("review", &["review", "unboxing", "first impressions"]),
    ("comparison", &[" vs ", "comparison", "versus", "which is better"]),
    ("faq", &["faq", "questions", "answers", "common"]),
    ("testimonial", &["testimonial", "customer", "experience", "story"]),
];

const CLUSTERS: TermGroups = &[
    ("technical_specs", &["bldc", "motor", "wattage", "rpm", "cfm"]),
    ("smart_features", &["smart", "wifi", "app", "voice", "iot", "alexa", "google home"]),
    ("energy_efficiency", &["energy efficient", "power saving", "low power", "eco-friendly"]),
    ("installation", &["install", "mount", "ceiling", "wiring"]),
    ("price_range", &["budget", "affordable", "premium", "cost", "price"]),
];

const ANGLES: TermGroups = &[
    ("problem_solving", &["problem", "issue", "solve", "fix", "help"]),
    ("aspirational", &["luxury", "premium", "upgrade", "modern", "stylish"]),
    ("practical", &["easy", "simple", "quick", "convenient"]),
    ("emotional", &["comfort", "peace", "relax", "enjoy", "love"]),
    ("technical_authority", &["expert", "professional", "engineered", "advanced"]),
];

const MAX_PRIORITY_GAPS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coverage<G> {
    pub coverage: Vec<CategoryCount>,
    pub gaps: Vec<G>,
}

impl<G> Default for Coverage<G> {
    fn default() -> Self {
        Self {
            coverage: Vec::new(),
            gaps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicGap {
    pub topic: String,
    pub brand_coverage: usize,
    pub competitor_coverage: usize,
    pub gap_size: usize,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatGapKind {
    CompleteMissing,
    Significant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatGap {
    pub format: String,
    pub brand_count: usize,
    pub competitor_count: usize,
    pub gap: FormatGapKind,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOpportunity {
    pub platform: Platform,
    pub brand_presence: usize,
    pub competitor_presence: usize,
    pub brand_share: f64,
    pub competitor_share: f64,
    pub opportunity_score: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterGap {
    pub cluster: String,
    pub brand_coverage: usize,
    pub competitor_coverage: usize,
    pub gap: usize,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhiteSpace {
    pub angle: String,
    pub brand_usage: usize,
    pub competitor_usage: usize,
    pub opportunity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    Topic,
    Format,
    KeywordCluster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityGap {
    #[serde(rename = "type")]
    pub gap_type: GapType,
    pub name: String,
    pub impact_score: f64,
    pub effort_required: Effort,
    pub priority_score: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentGapHeatmap {
    pub topic_coverage: Coverage<TopicGap>,
    pub format_gaps: Coverage<FormatGap>,
    pub platform_opportunities: Vec<PlatformOpportunity>,
    pub keyword_cluster_gaps: Coverage<ClusterGap>,
    pub sentiment_white_spaces: Coverage<WhiteSpace>,
    pub priority_scored_gaps: Vec<PriorityGap>,
}

pub fn build_heatmap(input: &AnalysisInput<'_>) -> ContentGapHeatmap {
    if input.results.is_empty() {
        return ContentGapHeatmap::default();
    }

    let topic_coverage = topic_coverage(input);
    let format_gaps = format_gaps(input);
    let keyword_cluster_gaps = cluster_gaps(input);
    let priority_scored_gaps = score_gaps(&topic_coverage.gaps, &format_gaps.gaps, &keyword_cluster_gaps.gaps);

    ContentGapHeatmap {
        topic_coverage,
        format_gaps,
        platform_opportunities: platform_opportunities(input),
        keyword_cluster_gaps,
        sentiment_white_spaces: white_spaces(input),
        priority_scored_gaps,
    }
}

// Brand and competitor tallies are independent here: one result can count
// for both sides.
fn topic_coverage(input: &AnalysisInput<'_>) -> Coverage<TopicGap> {
    let mut coverage = empty_counts(TOPICS);
    for result in input.results {
        let text = lower_text(result);
        let brand = input.mentions_brand(result);
        let competitor = input.mentions_competitor(result);
        for topic in matching_groups(TOPICS, &text) {
            bump(&mut coverage, topic, brand, competitor);
        }
    }

    let mut gaps: Vec<TopicGap> = coverage
        .iter()
        .filter(|count| count.competitors as f64 > count.brand as f64 * 1.5)
        .map(|count| TopicGap {
            topic: count.name.clone(),
            brand_coverage: count.brand,
            competitor_coverage: count.competitors,
            gap_size: count.competitors - count.brand,
            priority: if count.competitors as f64 > count.brand as f64 * 2.0 {
                Priority::High
            } else {
                Priority::Medium
            },
        })
        .collect();
    gaps.sort_by(|a, b| b.gap_size.cmp(&a.gap_size));

    Coverage { coverage, gaps }
}

fn format_gaps(input: &AnalysisInput<'_>) -> Coverage<FormatGap> {
    let mut coverage = empty_counts(FORMATS);
    for result in input.results {
        let title = format!(" {} ", result.title.to_lowercase());
        let brand = input.mentions_brand(result);
        let competitor = !brand && input.mentions_competitor(result);
        for format in matching_groups(FORMATS, &title) {
            bump(&mut coverage, format, brand, competitor);
        }
    }

    let gaps = coverage
        .iter()
        .filter_map(|count| {
            if count.competitors > 0 && count.brand == 0 {
                Some(FormatGap {
                    format: count.name.clone(),
                    brand_count: 0,
                    competitor_count: count.competitors,
                    gap: FormatGapKind::CompleteMissing,
                    priority: Priority::High,
                })
            } else if count.competitors as f64 > count.brand as f64 * 1.5 {
                Some(FormatGap {
                    format: count.name.clone(),
                    brand_count: count.brand,
                    competitor_count: count.competitors,
                    gap: FormatGapKind::Significant,
                    priority: Priority::Medium,
                })
            } else {
                None
            }
        })
        .collect();

    Coverage { coverage, gaps }
}

fn platform_opportunities(input: &AnalysisInput<'_>) -> Vec<PlatformOpportunity> {
    Platform::ALL
        .iter()
        .filter_map(|platform| {
            let results: Vec<_> = input
                .results
                .iter()
                .filter(|result| result.platform == *platform)
                .collect();
            if results.is_empty() {
                return None;
            }
            let total = results.len() as f64;
            let brand_presence = results.iter().filter(|result| input.mentions_brand(result)).count();
            let competitor_presence = results
                .iter()
                .filter(|result| input.mentions_competitor(result))
                .count();
            let brand_share = brand_presence as f64 / total * 100.0;
            let competitor_share = competitor_presence as f64 / total * 100.0;
            let opportunity_score = competitor_share - brand_share;

            Some(PlatformOpportunity {
                platform: *platform,
                brand_presence,
                competitor_presence,
                brand_share,
                competitor_share,
                opportunity_score,
                recommendation: platform_recommendation(*platform, opportunity_score).to_string(),
            })
        })
        .collect()
}

fn platform_recommendation(platform: Platform, opportunity_score: f64) -> &'static str {
    match platform {
        Platform::YouTube if opportunity_score > 20.0 => {
            "Create more YouTube videos, focusing on tutorials and product demos"
        }
        Platform::YouTube if opportunity_score > 10.0 => {
            "Increase YouTube publishing frequency; consider a series format"
        }
        Platform::YouTube => "Maintain the current YouTube strategy",
        Platform::Google if opportunity_score > 15.0 => {
            "Improve SEO content with blog posts and buying guides"
        }
        Platform::Google => "Continue SEO optimization",
    }
}

fn cluster_gaps(input: &AnalysisInput<'_>) -> Coverage<ClusterGap> {
    let mut coverage = empty_counts(CLUSTERS);
    for result in input.results {
        let text = format!("{} {}", result.keyword.to_lowercase(), lower_text(result));
        let brand = input.mentions_brand(result);
        let competitor = !brand && input.mentions_competitor(result);
        for cluster in matching_groups(CLUSTERS, &text) {
            bump(&mut coverage, cluster, brand, competitor);
        }
    }

    let mut gaps: Vec<ClusterGap> = coverage
        .iter()
        .filter(|count| count.competitors as f64 > count.brand as f64 * 1.5)
        .map(|count| ClusterGap {
            cluster: count.name.clone(),
            brand_coverage: count.brand,
            competitor_coverage: count.competitors,
            gap: count.competitors - count.brand,
            priority: if count.brand == 0 {
                Priority::High
            } else {
                Priority::Medium
            },
        })
        .collect();
    gaps.sort_by(|a, b| b.gap.cmp(&a.gap));

    Coverage { coverage, gaps }
}

fn white_spaces(input: &AnalysisInput<'_>) -> Coverage<WhiteSpace> {
    let mut coverage = empty_counts(ANGLES);
    for result in input.results {
        let text = lower_text(result);
        let brand = input.mentions_brand(result);
        let competitor = !brand && input.mentions_competitor(result);
        for angle in matching_groups(ANGLES, &text) {
            bump(&mut coverage, angle, brand, competitor);
        }
    }

    let gaps = coverage
        .iter()
        .filter(|count| count.competitors > count.brand * 2)
        .map(|count| WhiteSpace {
            angle: count.name.clone(),
            brand_usage: count.brand,
            competitor_usage: count.competitors,
            opportunity: format!("Increase {} messaging in content", count.name.replace('_', " ")),
        })
        .collect();

    Coverage { coverage, gaps }
}

fn score_gaps(topics: &[TopicGap], formats: &[FormatGap], clusters: &[ClusterGap]) -> Vec<PriorityGap> {
    let mut scored = Vec::new();

    for gap in topics {
        let impact_score = gap.gap_size as f64 * 2.0;
        scored.push(PriorityGap {
            gap_type: GapType::Topic,
            name: gap.topic.clone(),
            impact_score,
            effort_required: Effort::Medium,
            priority_score: impact_score - 3.0,
            recommendation: format!("Create content covering the {} topic", gap.topic.replace('_', " ")),
        });
    }

    for gap in formats {
        let impact_score = gap.competitor_count as f64 * 1.5;
        let (effort_score, effort_required) = if gap.format == "tutorial" {
            (2.0, Effort::Low)
        } else {
            (4.0, Effort::Medium)
        };
        scored.push(PriorityGap {
            gap_type: GapType::Format,
            name: gap.format.clone(),
            impact_score,
            effort_required,
            priority_score: impact_score - effort_score,
            recommendation: format!("Create {} format content", gap.format),
        });
    }

    for gap in clusters {
        let impact_score = gap.gap as f64 * 2.5;
        scored.push(PriorityGap {
            gap_type: GapType::KeywordCluster,
            name: gap.cluster.clone(),
            impact_score,
            effort_required: Effort::High,
            priority_score: impact_score - 4.0,
            recommendation: format!("Target the {} keyword cluster", gap.cluster.replace('_', " ")),
        });
    }

    scored.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(MAX_PRIORITY_GAPS);
    scored
}
