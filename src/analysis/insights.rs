use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::analysis::{share_of, CrossKeywordSummary, PlatformSov};
use crate::{BrandShare, Priority};

const STRONG_SENTIMENT: f64 = 0.7;
const WEAK_SENTIMENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Strength,
    Opportunity,
    Summary,
    ContentGap,
    OpportunityArea,
    Keyword,
    Sentiment,
    KeywordStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub platform: String,
    pub insight: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Insight {
    fn new(kind: InsightKind, platform: &str, insight: String, recommendation: String) -> Self {
        Self {
            kind,
            platform: platform.to_string(),
            insight,
            recommendation,
            priority: None,
        }
    }
}

pub fn generate_insights(
    brand: &str,
    competitors: &[String],
    keywords: &[String],
    platforms: &[PlatformSov],
    overall: &[BrandShare],
    summary: &CrossKeywordSummary,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    if !platforms.iter().any(PlatformSov::has_results) {
        return insights;
    }

    // Platforms that returned nothing have no standing to compare.
    for platform in platforms.iter().filter(|platform| platform.has_results()) {
        let brand_sov = platform.share_of(brand);
        let (leader, leader_sov) = top_competitor(&platform.weighted_sov, competitors);
        let name = platform.platform.label();
        if brand_sov > leader_sov {
            insights.push(Insight::new(
                InsightKind::Strength,
                name,
                format!(
                    "{} leads on {} with {:.1}% SoV against {:.1}% for {}",
                    brand, name, brand_sov, leader_sov, leader
                ),
                format!(
                    "Keep the current content strategy on {} and consider increasing investment",
                    name
                ),
            ));
        } else {
            insights.push(Insight::new(
                InsightKind::Opportunity,
                name,
                format!(
                    "{}'s SoV on {} ({:.1}%) trails {} ({:.1}%)",
                    brand, name, brand_sov, leader, leader_sov
                ),
                format!(
                    "Increase content volume and engagement on {}; focus on keyword optimization and creator partnerships",
                    name
                ),
            ));
        }
    }

    insights.push(Insight::new(
        InsightKind::Summary,
        "overall",
        format!(
            "{} holds {:.1}% weighted Share of Voice across all platforms",
            brand,
            share_of(overall, brand)
        ),
        "Prioritize the platforms with the highest engagement potential and test content formats"
            .to_string(),
    ));

    for gap in summary.content_gaps.iter().take(3) {
        insights.push(Insight::new(
            InsightKind::ContentGap,
            "all",
            format!(
                "Content gap on '{}': {} has {:.1}% SoV vs {}'s {:.1}%",
                gap.keyword, brand, gap.brand_sov, gap.top_competitor, gap.competitor_sov
            ),
            format!(
                "Publish targeted '{}' content to close the {:.1} point gap",
                gap.keyword, gap.gap
            ),
        ));
    }

    for area in &summary.opportunity_areas {
        let mut insight = Insight::new(
            InsightKind::OpportunityArea,
            "all",
            format!("{} shows a {:.1} point average SoV gap", area.area, area.average_gap),
            area.recommendation.clone(),
        );
        insight.priority = Some(area.priority);
        insights.push(insight);
    }

    insights.push(Insight::new(
        InsightKind::Keyword,
        "all",
        format!("Keywords analyzed: {}", keywords.join(", ")),
        match summary.weakest_keywords.first() {
            Some(weakest) => format!(
                "Expand into long-tail variants of '{}', the weakest keyword at {:.1}% SoV",
                weakest.keyword, weakest.sov
            ),
            None => "Expand targeting with long-tail variants of the strongest keywords".to_string(),
        },
    ));

    for platform in platforms {
        let Some(sentiment) = platform
            .sentiment
            .iter()
            .find(|entry| entry.brand.eq_ignore_ascii_case(brand) && entry.mentions > 0)
        else {
            continue;
        };
        let name = platform.platform.label();
        let ratio = sentiment.positive_ratio;
        if ratio > STRONG_SENTIMENT {
            insights.push(Insight::new(
                InsightKind::Sentiment,
                name,
                format!("Strong positive sentiment on {} ({:.1}% positive mentions)", name, ratio * 100.0),
                "Amplify testimonials and reviews; consider creator partnerships".to_string(),
            ));
        } else if ratio < WEAK_SENTIMENT {
            insights.push(Insight::new(
                InsightKind::Sentiment,
                name,
                format!("Sentiment needs work on {} ({:.1}% positive mentions)", name, ratio * 100.0),
                "Address recurring complaints in content and respond to negative feedback early"
                    .to_string(),
            ));
        }
    }

    if let Some(association) = summary
        .brand_keyword_associations
        .iter()
        .find(|association| association.brand.eq_ignore_ascii_case(brand))
    {
        let top = association.keywords.iter().max_by(|a, b| {
            a.percent.partial_cmp(&b.percent).unwrap_or(Ordering::Equal)
        });
        if let Some(top) = top {
            insights.push(Insight::new(
                InsightKind::KeywordStrategy,
                "all",
                format!(
                    "{} is most associated with '{}' ({:.1}% of mentions)",
                    brand, top.keyword, top.percent
                ),
                format!(
                    "Build a content series on '{}' while expanding into weaker keywords",
                    top.keyword
                ),
            ));
        }
    }

    insights
}

fn top_competitor(shares: &[BrandShare], competitors: &[String]) -> (String, f64) {
    competitors
        .iter()
        .map(|competitor| (competitor.clone(), share_of(shares, competitor)))
        .fold(("competitors".to_string(), 0.0), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BrandSentiment;
    use crate::{DataMode, Platform};

    fn platform(brand_sov: f64, rival_sov: f64, positive_ratio: f64) -> PlatformSov {
        PlatformSov {
            platform: Platform::YouTube,
            mode: DataMode::Demo,
            result_count: 10,
            weighted_sov: vec![
                BrandShare {
                    brand: "Atomberg".to_string(),
                    weighted_sov: brand_sov,
                },
                BrandShare {
                    brand: "Havells".to_string(),
                    weighted_sov: rival_sov,
                },
            ],
            sentiment: vec![BrandSentiment {
                brand: "Atomberg".to_string(),
                mentions: 4,
                positive_ratio,
            }],
        }
    }

    #[test]
    fn platform_lead_and_sentiment_cards() {
        let competitors = vec!["Havells".to_string()];
        let keywords = vec!["smart fan".to_string()];
        let platforms = vec![platform(40.0, 20.0, 0.8)];
        let insights = generate_insights(
            "Atomberg",
            &competitors,
            &keywords,
            &platforms,
            &[],
            &CrossKeywordSummary::default(),
        );

        assert_eq!(insights[0].kind, InsightKind::Strength);
        assert!(insights.iter().any(|insight| insight.kind == InsightKind::Summary));
        assert!(insights.iter().any(|insight| insight.kind == InsightKind::Sentiment
            && insight.insight.contains("Strong positive")));
    }

    #[test]
    fn trailing_platform_is_opportunity() {
        let competitors = vec!["Havells".to_string()];
        let platforms = vec![platform(10.0, 20.0, 0.6)];
        let insights = generate_insights(
            "Atomberg",
            &competitors,
            &[],
            &platforms,
            &[],
            &CrossKeywordSummary::default(),
        );
        assert_eq!(insights[0].kind, InsightKind::Opportunity);
        assert!(!insights.iter().any(|insight| insight.kind == InsightKind::Sentiment));
    }

    #[test]
    fn empty_platforms_get_no_cards() {
        let competitors = vec!["Havells".to_string()];
        let mut empty = platform(0.0, 0.0, 0.0);
        empty.platform = Platform::Google;
        empty.result_count = 0;
        let platforms = vec![platform(40.0, 20.0, 0.6), empty.clone()];
        let insights = generate_insights(
            "Atomberg",
            &competitors,
            &[],
            &platforms,
            &[],
            &CrossKeywordSummary::default(),
        );
        assert!(!insights.iter().any(|insight| insight.platform == "google"));

        let insights = generate_insights(
            "Atomberg",
            &competitors,
            &[],
            &[empty],
            &[],
            &CrossKeywordSummary::default(),
        );
        assert!(insights.is_empty());
    }
}
