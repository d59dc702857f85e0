use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::advanced::heatmap::{ContentGapHeatmap, GapType};
use crate::advanced::{AnalysisInput, Effort};
use crate::{mean, Platform, SearchResult};

const BASE_VIEWS: f64 = 5000.0;
const CONVERSION_RATE: f64 = 0.02;
const VALUE_PER_CONVERSION: f64 = 100.0;
const GOOGLE_CLICK_RATE: f64 = 0.03;
const FALLBACK_VIDEO_RATE: f64 = 0.05;
const MAX_PRIORITIZED: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiCategory {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Limited,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaRoi {
    pub idea: String,
    #[serde(rename = "type")]
    pub gap_type: GapType,
    pub name: String,
    pub impact: Impact,
    pub effort: Effort,
    pub estimated_views: f64,
    pub estimated_engagements: f64,
    pub estimated_conversions: f64,
    pub production_cost: u32,
    pub roi: f64,
    pub roi_category: RoiCategory,
    pub budget_tier: BudgetTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRoi {
    pub platform: Platform,
    pub engagement_rate: f64,
    pub cost_per_piece: u32,
    pub roi_score: f64,
    pub roi_category: RoiCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeToImpact {
    pub idea: String,
    pub weeks: u32,
    pub speed: Speed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedAction {
    pub rank: usize,
    pub idea: String,
    pub roi: f64,
    pub priority_score: f64,
    pub combined_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoiRecommendations {
    pub content_ideas: Vec<IdeaRoi>,
    pub platform_roi: Vec<PlatformRoi>,
    pub time_to_impact: Vec<TimeToImpact>,
    pub prioritized_actions: Vec<PrioritizedAction>,
}

struct Candidate {
    gap_type: GapType,
    name: String,
    gap: usize,
    impact_score: f64,
    effort: Effort,
}

impl GapType {
    fn engagement_rate(self) -> f64 {
        match self {
            GapType::Topic => 0.05,
            GapType::Format => 0.08,
            GapType::KeywordCluster => 0.04,
        }
    }

    fn weeks_to_impact(self) -> u32 {
        match self {
            GapType::Format => 2,
            GapType::Topic => 4,
            GapType::KeywordCluster => 8,
        }
    }
}

fn candidates(heatmap: &ContentGapHeatmap) -> Vec<Candidate> {
    let topics = heatmap.topic_coverage.gaps.iter().take(5).map(|gap| Candidate {
        gap_type: GapType::Topic,
        name: gap.topic.clone(),
        gap: gap.gap_size,
        impact_score: gap.gap_size as f64 * 2.0,
        effort: Effort::Medium,
    });
    let formats = heatmap.format_gaps.gaps.iter().take(3).map(|gap| Candidate {
        gap_type: GapType::Format,
        name: gap.format.clone(),
        gap: gap.competitor_count.saturating_sub(gap.brand_count),
        impact_score: gap.competitor_count as f64 * 1.5,
        effort: if gap.format == "tutorial" {
            Effort::Low
        } else {
            Effort::Medium
        },
    });
    let clusters = heatmap.keyword_cluster_gaps.gaps.iter().take(3).map(|gap| Candidate {
        gap_type: GapType::KeywordCluster,
        name: gap.cluster.clone(),
        gap: gap.gap,
        impact_score: gap.gap as f64 * 2.5,
        effort: Effort::High,
    });
    topics.chain(formats).chain(clusters).collect()
}

fn idea_label(gap_type: GapType, name: &str) -> String {
    let name = name.replace('_', " ");
    match gap_type {
        GapType::Topic => format!("Cover the {} topic", name),
        GapType::Format => format!("Produce {} content", name),
        GapType::KeywordCluster => format!("Target {} keywords", name),
    }
}

fn estimate(candidate: &Candidate) -> IdeaRoi {
    let impact = if candidate.impact_score >= 20.0 {
        Impact::VeryHigh
    } else if candidate.impact_score >= 10.0 {
        Impact::High
    } else {
        Impact::Moderate
    };

    let mut views = BASE_VIEWS;
    if candidate.gap > 10 {
        views *= 2.0;
    } else if candidate.gap > 5 {
        views *= 1.5;
    }
    views *= match impact {
        Impact::VeryHigh => 2.0,
        Impact::High => 1.5,
        Impact::Moderate => 1.0,
    };

    let engagements = views * candidate.gap_type.engagement_rate();
    let conversions = engagements * CONVERSION_RATE;
    let cost = candidate.effort.cost();
    let roi = conversions * VALUE_PER_CONVERSION / cost as f64;

    IdeaRoi {
        idea: idea_label(candidate.gap_type, &candidate.name),
        gap_type: candidate.gap_type,
        name: candidate.name.clone(),
        impact,
        effort: candidate.effort,
        estimated_views: views,
        estimated_engagements: engagements,
        estimated_conversions: conversions,
        production_cost: cost,
        roi,
        roi_category: if roi > 5.0 {
            RoiCategory::High
        } else if roi > 2.0 {
            RoiCategory::Medium
        } else {
            RoiCategory::Low
        },
        budget_tier: match candidate.effort {
            Effort::Low => BudgetTier::Limited,
            Effort::Medium => BudgetTier::Moderate,
            Effort::High => BudgetTier::High,
        },
    }
}

fn video_engagement_rate(results: &[SearchResult]) -> f64 {
    let rates: Vec<f64> = results
        .iter()
        .filter(|result| result.platform == Platform::YouTube && result.view_count > 0)
        .map(|result| (result.like_count + result.comment_count) as f64 / result.view_count as f64)
        .collect();
    if rates.is_empty() {
        FALLBACK_VIDEO_RATE
    } else {
        mean(&rates)
    }
}

fn platform_roi(input: &AnalysisInput<'_>, heatmap: &ContentGapHeatmap) -> Vec<PlatformRoi> {
    heatmap
        .platform_opportunities
        .iter()
        .map(|opportunity| {
            let (engagement_rate, cost_per_piece) = match opportunity.platform {
                Platform::YouTube => (video_engagement_rate(input.results), 2000),
                Platform::Google => (GOOGLE_CLICK_RATE, 800),
            };
            let roi_score = engagement_rate * 100.0 / cost_per_piece as f64 * 1000.0;
            PlatformRoi {
                platform: opportunity.platform,
                engagement_rate,
                cost_per_piece,
                roi_score,
                roi_category: if roi_score > 2.0 {
                    RoiCategory::High
                } else if roi_score > 1.0 {
                    RoiCategory::Medium
                } else {
                    RoiCategory::Low
                },
            }
        })
        .collect()
}

fn prioritize(ideas: &[IdeaRoi], heatmap: &ContentGapHeatmap) -> Vec<PrioritizedAction> {
    let mut actions: Vec<PrioritizedAction> = ideas
        .iter()
        .map(|idea| {
            let priority_score = heatmap
                .priority_scored_gaps
                .iter()
                .find(|gap| gap.gap_type == idea.gap_type && gap.name == idea.name)
                .map(|gap| gap.priority_score)
                .unwrap_or(0.0);
            PrioritizedAction {
                rank: 0,
                idea: idea.idea.clone(),
                roi: idea.roi,
                priority_score,
                combined_score: idea.roi * 0.6 + priority_score * 0.4,
            }
        })
        .collect();
    actions.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(Ordering::Equal)
    });
    actions.truncate(MAX_PRIORITIZED);
    for (index, action) in actions.iter_mut().enumerate() {
        action.rank = index + 1;
    }
    actions
}

pub fn recommend_roi(input: &AnalysisInput<'_>, heatmap: &ContentGapHeatmap) -> RoiRecommendations {
    let content_ideas: Vec<IdeaRoi> = candidates(heatmap).iter().map(estimate).collect();
    let time_to_impact = content_ideas
        .iter()
        .map(|idea| {
            let weeks = idea.gap_type.weeks_to_impact();
            TimeToImpact {
                idea: idea.idea.clone(),
                weeks,
                speed: match weeks {
                    0..=2 => Speed::Fast,
                    3..=4 => Speed::Medium,
                    _ => Speed::Slow,
                },
            }
        })
        .collect();

    RoiRecommendations {
        prioritized_actions: prioritize(&content_ideas, heatmap),
        platform_roi: platform_roi(input, heatmap),
        time_to_impact,
        content_ideas,
    }
}
