use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::advanced::{words, AnalysisInput};
use crate::{Platform, Priority, SearchResult};

const LAUNCH_WORDS: &[&str] = &["new", "latest"];
const LAUNCH_PREFIXES: &[&str] = &["launch", "announc", "releas", "introduc"];
const INFLUENCER_WORDS: &[&str] = &["review", "unboxing", "sponsored", "collab", "partner"];
const STOPWORDS: &[&str] = &[
    "with", "from", "that", "this", "your", "best", "review", "which", "what", "about", "into",
    "have", "will", "more", "than", "guide", "video", "2024", "2025",
];
const TREND_MIN_RESULTS: usize = 5;
const MAX_TREND_TERMS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    CompetitorLaunch,
    SentimentCrisis,
    InfluencerMention,
    InfluencerOpportunity,
    TrendEmergence,
    WhiteSpaceOpportunity,
    PlatformOpportunity,
    SeoOpportunity,
}

impl AlertType {
    pub fn label(self) -> &'static str {
        match self {
            AlertType::CompetitorLaunch => "competitor_launch",
            AlertType::SentimentCrisis => "sentiment_crisis",
            AlertType::InfluencerMention => "influencer_mention",
            AlertType::InfluencerOpportunity => "influencer_opportunity",
            AlertType::TrendEmergence => "trend_emergence",
            AlertType::WhiteSpaceOpportunity => "white_space_opportunity",
            AlertType::PlatformOpportunity => "platform_opportunity",
            AlertType::SeoOpportunity => "seo_opportunity",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCard {
    pub alert_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub priority: Priority,
    pub priority_color: String,
    pub title: String,
    pub description: String,
    pub platform: Option<Platform>,
    pub suggested_action: String,
    pub urgency: String,
    pub priority_score: u32,
    pub action_items: Vec<String>,
    pub link: Option<String>,
}

struct Draft {
    alert_type: AlertType,
    score: u32,
    title: String,
    description: String,
    platform: Option<Platform>,
    suggested_action: String,
    action_items: Vec<String>,
    link: Option<String>,
}

impl Draft {
    fn new(alert_type: AlertType, score: u32, title: String, description: String) -> Self {
        Self {
            alert_type,
            score,
            title,
            description,
            platform: None,
            suggested_action: String::new(),
            action_items: Vec::new(),
            link: None,
        }
    }

    fn on(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    fn link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    fn action(mut self, suggested: &str, items: &[&str]) -> Self {
        self.suggested_action = suggested.to_string();
        self.action_items = items.iter().map(|item| item.to_string()).collect();
        self
    }
}

fn priority_for(score: u32) -> Priority {
    match score {
        75.. => Priority::High,
        60..=74 => Priority::Medium,
        _ => Priority::Low,
    }
}

pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#FF6B6B",
        Priority::Medium => "#FFA500",
        Priority::Low => "#4ECDC4",
    }
}

fn urgency(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "immediate",
        Priority::Medium => "this_week",
        Priority::Low => "monitor",
    }
}

fn is_launch(result: &SearchResult) -> bool {
    let text = result.text().to_lowercase();
    let found = words(&text).any(|word| {
        LAUNCH_WORDS.iter().any(|entry| *entry == word)
            || LAUNCH_PREFIXES.iter().any(|prefix| word.starts_with(prefix))
    });
    found
}

fn competitor_launches(input: &AnalysisInput<'_>, drafts: &mut Vec<Draft>) {
    let window = input.config.alerts.recent_launch_days;
    let mut seen = HashSet::new();
    for result in input.results.iter().filter(|result| is_launch(result)) {
        for competitor in input.competitors() {
            if !result.mentions(competitor) || !seen.insert((competitor.to_lowercase(), result.link.clone())) {
                continue;
            }
            let recent = result
                .age_days(input.generated_at)
                .is_some_and(|days| days <= window);
            drafts.push(
                Draft::new(
                    AlertType::CompetitorLaunch,
                    if recent { 90 } else { 70 },
                    format!("{} launch activity detected", competitor),
                    format!("'{}' on {}", result.title, result.platform.label()),
                )
                .on(result.platform)
                .link(&result.link)
                .action(
                    "Prepare a comparison piece against the new launch",
                    &["Review the launch content", "Publish a feature comparison", "Brief sales on positioning"],
                ),
            );
        }
    }
}

fn sentiment_crisis(input: &AnalysisInput<'_>, drafts: &mut Vec<Draft>) {
    let threshold = input.config.alerts.sentiment_crisis_ratio;
    for platform in input.platforms {
        let Some(sentiment) = platform
            .sentiment
            .iter()
            .find(|entry| entry.brand.eq_ignore_ascii_case(input.brand()))
        else {
            continue;
        };
        if sentiment.mentions == 0 || sentiment.positive_ratio >= threshold {
            continue;
        }
        drafts.push(
            Draft::new(
                AlertType::SentimentCrisis,
                85,
                format!("Low positive sentiment on {}", platform.platform.label()),
                format!(
                    "Only {:.1}% of {} mentions on {} are positive",
                    sentiment.positive_ratio * 100.0,
                    input.brand(),
                    platform.platform.label()
                ),
            )
            .on(platform.platform)
            .action(
                "Investigate negative mentions and respond publicly",
                &["Read the negative comments", "Reply to top complaints", "Publish a fix or FAQ video"],
            ),
        );
    }
}

fn influencers(input: &AnalysisInput<'_>, drafts: &mut Vec<Draft>) {
    let threshold = input.config.alerts.influencer_view_threshold;
    for result in input.results {
        if result.view_count <= threshold {
            continue;
        }
        let text = result.text().to_lowercase();
        if !crate::contains_any(&text, INFLUENCER_WORDS) {
            continue;
        }
        let draft = if input.mentions_brand(result) {
            Draft::new(
                AlertType::InfluencerMention,
                75,
                format!("{} featured by {}", input.brand(), result.channel),
                format!("'{}' reached {} views", result.title, crate::format_number(result.view_count as f64)),
            )
            .action(
                "Engage with the creator and amplify the content",
                &["Comment from the brand account", "Share on owned channels"],
            )
        } else if input.mentions_competitor(result) {
            Draft::new(
                AlertType::InfluencerOpportunity,
                65,
                format!("{} covers competitors, not {}", result.channel, input.brand()),
                format!("'{}' reached {} views", result.title, crate::format_number(result.view_count as f64)),
            )
            .action(
                "Pitch a product review to this creator",
                &["Contact the channel", "Offer a review unit"],
            )
        } else {
            continue;
        };
        drafts.push(draft.on(result.platform).link(&result.link));
    }
}

/// Title terms popular across results that never appear next to the brand.
fn trend_terms(input: &AnalysisInput<'_>) -> Vec<(String, usize)> {
    let mut excluded: HashSet<String> = STOPWORDS.iter().map(|word| word.to_string()).collect();
    for keyword in &input.config.search.keywords {
        excluded.extend(words(&keyword.to_lowercase()).map(str::to_string));
    }
    for brand in input.brands {
        excluded.extend(words(&brand.to_lowercase()).map(str::to_string));
    }

    let mut brand_terms = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for result in input.results {
        let title = result.title.to_lowercase();
        let terms: HashSet<String> = words(&title)
            .filter(|word| word.chars().count() > 3 && !excluded.contains(*word))
            .map(str::to_string)
            .collect();
        if input.mentions_brand(result) {
            brand_terms.extend(terms);
        } else {
            for term in terms {
                *counts.entry(term).or_default() += 1;
            }
        }
    }

    let mut trending: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(term, count)| *count > TREND_MIN_RESULTS && !brand_terms.contains(term))
        .collect();
    trending.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    trending.truncate(MAX_TREND_TERMS);
    trending
}

fn trend_emergence(input: &AnalysisInput<'_>, drafts: &mut Vec<Draft>) {
    for (term, count) in trend_terms(input) {
        drafts.push(
            Draft::new(
                AlertType::TrendEmergence,
                60,
                format!("Emerging topic: '{}'", term),
                format!("'{}' appears in {} results without {}", term, count, input.brand()),
            )
            .action(
                "Create content around the emerging topic",
                &["Validate search volume", "Draft a short video or post"],
            ),
        );
    }
}

fn white_space(input: &AnalysisInput<'_>, drafts: &mut Vec<Draft>) {
    for keyword in &input.config.search.keywords {
        let results: Vec<&SearchResult> = input
            .results
            .iter()
            .filter(|result| result.keyword.eq_ignore_ascii_case(keyword))
            .collect();
        if results.is_empty() {
            continue;
        }
        let claimed = results
            .iter()
            .any(|result| input.mentions_brand(result) || input.mentions_competitor(result));
        if claimed {
            continue;
        }
        drafts.push(
            Draft::new(
                AlertType::WhiteSpaceOpportunity,
                80,
                format!("Unclaimed keyword: '{}'", keyword),
                format!("No tracked brand appears in {} results for '{}'", results.len(), keyword),
            )
            .action(
                "Claim the keyword before competitors do",
                &["Publish a dedicated landing page", "Upload a video targeting the keyword"],
            ),
        );
    }
}

fn platform_triggers(input: &AnalysisInput<'_>, drafts: &mut Vec<Draft>) {
    let config = &input.config.alerts;
    for result in input.results {
        if input.mentions_brand(result) {
            continue;
        }
        match result.platform {
            Platform::YouTube if result.view_count > config.youtube_view_trigger => drafts.push(
                Draft::new(
                    AlertType::PlatformOpportunity,
                    55,
                    format!("High-traffic video without {}", input.brand()),
                    format!(
                        "'{}' has {} views for '{}'",
                        result.title,
                        crate::format_number(result.view_count as f64),
                        result.keyword
                    ),
                )
                .on(Platform::YouTube)
                .link(&result.link)
                .action("Publish a response video", &["Reference the video topic in new content"]),
            ),
            Platform::Google if result.rank_position <= config.google_rank_trigger => drafts.push(
                Draft::new(
                    AlertType::SeoOpportunity,
                    65,
                    format!("Top-{} ranking without {}", config.google_rank_trigger, input.brand()),
                    format!("'{}' ranks #{} for '{}'", result.title, result.rank_position, result.keyword),
                )
                .on(Platform::Google)
                .link(&result.link)
                .action("Target this query with optimized content", &["Audit the ranking page", "Write a better answer"]),
            ),
            _ => {}
        }
    }
}

pub fn detect_alerts(input: &AnalysisInput<'_>) -> Vec<AlertCard> {
    if input.results.is_empty() {
        return Vec::new();
    }

    let mut drafts = Vec::new();
    competitor_launches(input, &mut drafts);
    sentiment_crisis(input, &mut drafts);
    influencers(input, &mut drafts);
    trend_emergence(input, &mut drafts);
    white_space(input, &mut drafts);
    platform_triggers(input, &mut drafts);

    // Stable: equal scores keep detection order.
    drafts.sort_by(|a, b| b.score.cmp(&a.score));

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            let priority = priority_for(draft.score);
            AlertCard {
                alert_id: format!("{}_{}", draft.alert_type.label(), index + 1),
                timestamp: input.generated_at,
                alert_type: draft.alert_type,
                priority,
                priority_color: priority_color(priority).to_string(),
                title: draft.title,
                description: draft.description,
                platform: draft.platform,
                suggested_action: draft.suggested_action,
                urgency: urgency(priority).to_string(),
                priority_score: draft.score,
                action_items: draft.action_items,
                link: draft.link,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advanced::fixtures::{result, Owned};
    use crate::analysis::{BrandSentiment, PlatformSov};
    use crate::DataMode;
    use chrono::Duration;

    #[test]
    fn recent_competitor_launch_outranks_old_one() {
        let mut fresh = result(Platform::YouTube, "smart fan", 1, "Havells launches new smart fan", 1_000);
        let mut stale = result(Platform::YouTube, "smart fan", 2, "Crompton announces BLDC range", 1_000);
        let owned_time = Owned::new(Vec::new()).input().generated_at;
        fresh.published_at = Some(owned_time - Duration::days(2));
        stale.published_at = Some(owned_time - Duration::days(40));
        let owned = Owned::new(vec![stale, fresh]);

        let alerts = detect_alerts(&owned.input());
        let launches: Vec<&AlertCard> = alerts
            .iter()
            .filter(|alert| alert.alert_type == AlertType::CompetitorLaunch)
            .collect();
        assert_eq!(launches.len(), 2);
        assert_eq!(launches[0].priority_score, 90);
        assert!(launches[0].title.starts_with("Havells"));
        assert_eq!(launches[0].priority, Priority::High);
        assert_eq!(launches[1].priority_score, 70);
        assert_eq!(launches[1].priority_color, "#FFA500");
    }

    #[test]
    fn low_positive_ratio_raises_crisis() {
        let owned = Owned::new(Vec::new());
        let platforms = vec![PlatformSov {
            platform: Platform::YouTube,
            mode: DataMode::Demo,
            result_count: 10,
            weighted_sov: Vec::new(),
            sentiment: vec![BrandSentiment {
                brand: "Atomberg".to_string(),
                mentions: 5,
                positive_ratio: 0.2,
            }],
        }];
        let mut input = owned.input();
        input.platforms = &platforms;

        let alerts = detect_alerts(&input);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::SentimentCrisis);
        assert_eq!(alerts[0].alert_id, "sentiment_crisis_1");
    }

    #[test]
    fn influencer_cards_split_on_brand_mention() {
        let owned = Owned::new(vec![
            result(Platform::YouTube, "fan", 5, "Atomberg Renesa review", 80_000),
            result(Platform::YouTube, "fan", 6, "Havells unboxing", 80_000),
        ]);
        let alerts = detect_alerts(&owned.input());
        assert!(alerts.iter().any(|alert| alert.alert_type == AlertType::InfluencerMention));
        assert!(alerts.iter().any(|alert| alert.alert_type == AlertType::InfluencerOpportunity));
        let scores: Vec<u32> = alerts.iter().map(|alert| alert.priority_score).collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn unclaimed_keyword_and_seo_trigger() {
        let owned = Owned::new(vec![result(Platform::Google, "smart fan", 1, "Ceiling fan buying tips", 0)]);
        let alerts = detect_alerts(&owned.input());
        assert!(alerts
            .iter()
            .any(|alert| alert.alert_type == AlertType::WhiteSpaceOpportunity && alert.priority == Priority::High));
        assert!(alerts.iter().any(|alert| alert.alert_type == AlertType::SeoOpportunity));
    }

    #[test]
    fn trending_term_needs_more_than_five_results() {
        let mut results: Vec<SearchResult> = (1..=6)
            .map(|rank| result(Platform::Google, "ceiling fan", rank, "Havells inverter fan", 0))
            .collect();
        results.push(result(Platform::Google, "ceiling fan", 7, "Atomberg remote", 0));
        let owned = Owned::new(results);
        let terms = trend_terms(&owned.input());
        assert_eq!(terms, vec![("inverter".to_string(), 6)]);
    }
}
