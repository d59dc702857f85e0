use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::advanced::{has_any_word, word_text, AnalysisInput, TermGroups};
use crate::analysis::share_of;
use crate::{mean, Platform, SearchResult};

const HOOKS: TermGroups = &[
    ("curiosity", &["secret", "hidden", "nobody tells", "truth", "shocking"]),
    ("authority", &["expert", "engineer", "tested", "honest", "pro"]),
    ("comparison", &["vs", "versus", "compared", "better than"]),
    ("review", &["review", "reviews", "unboxing", "hands on"]),
];

const TRIGGERS: TermGroups = &[
    ("curiosity", &["why", "how", "secret", "revealed", "truth"]),
    ("surprise", &["shocking", "unexpected", "surprising", "unbelievable", "wow"]),
    ("satisfaction", &["best", "perfect", "love", "amazing", "excellent"]),
    ("urgency", &["now", "today", "limited", "before", "hurry"]),
    ("fear", &["mistake", "avoid", "regret", "warning", "don't buy"]),
];

const FORMATS: TermGroups = &[
    ("review", &["review", "reviews", "unboxing"]),
    ("comparison", &["vs", "comparison", "versus"]),
    ("tutorial", &["how to", "tutorial", "guide", "install", "installation"]),
    ("list", &["best", "top"]),
];

const QUESTION_STARTS: &[&str] = &["how", "why", "what", "when"];
const TOP_HOOKS: usize = 5;
const TOP_WORDS: usize = 10;
const TOP_BRAND_ITEMS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViralItem {
    pub title: String,
    pub channel: String,
    pub link: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub viral_score: f64,
    pub hook: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionalTriggers {
    pub triggers: Vec<NamedCount>,
    pub journey: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatDeconstruction {
    pub average_title_length: f64,
    pub common_words: Vec<NamedCount>,
    pub format_distribution: Vec<NamedCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudienceReaction {
    pub title: String,
    pub engagement_rate: f64,
    pub reaction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViralRecipe {
    pub name: String,
    pub hook: String,
    pub format: String,
    pub example_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredTitle {
    pub title: String,
    pub link: String,
    pub viral_potential: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandViralPotential {
    pub average_potential: f64,
    pub top_content: Vec<ScoredTitle>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViralContentAnalysis {
    pub viral_content: Vec<ViralItem>,
    pub hook_patterns: Vec<NamedCount>,
    pub emotional_triggers: EmotionalTriggers,
    pub format_deconstruction: FormatDeconstruction,
    pub audience_reactions: Vec<AudienceReaction>,
    pub recipes: Vec<ViralRecipe>,
    pub brand_viral_potential: BrandViralPotential,
}

pub fn viral_score(result: &SearchResult) -> f64 {
    result.view_count as f64 * 0.5 + result.like_count as f64 * 100.0 + result.comment_count as f64 * 50.0
}

/// First matching hook wins; titles opening with a question word are
/// always `question`.
pub fn classify_hook(title: &str) -> &'static str {
    let lower = title.to_lowercase();
    let first = lower.split_whitespace().next().unwrap_or_default();
    if QUESTION_STARTS.iter().any(|start| *start == first) {
        return "question";
    }
    let padded = word_text(&lower);
    for (name, terms) in HOOKS {
        if has_any_word(&padded, terms) {
            return *name;
        }
    }
    if title.chars().any(|ch| ch.is_ascii_digit()) {
        return "number";
    }
    "other"
}

/// Heuristic 0-100 score for how shareable one of the brand's own titles is.
pub fn viral_potential(result: &SearchResult) -> f64 {
    let padded = word_text(&result.title.to_lowercase());
    let mut score: f64 = 0.0;

    if has_any_word(&padded, &["how", "why", "what", "best", "top"]) {
        score += 20.0;
    }
    if has_any_word(&padded, &["vs", "comparison"]) {
        score += 10.0;
    }
    let length = result.title.chars().count();
    if (40..=60).contains(&length) {
        score += 20.0;
    } else if (30..=70).contains(&length) {
        score += 10.0;
    }
    score += match result.view_count {
        views if views > 100_000 => 30.0,
        views if views > 50_000 => 20.0,
        views if views > 10_000 => 10.0,
        _ => 0.0,
    };
    if has_any_word(&padded, &["review", "tutorial", "guide"]) {
        score += 20.0;
    }

    score.min(100.0)
}

fn sorted_counts(counts: HashMap<&str, usize>) -> Vec<NamedCount> {
    let mut entries: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries
}

fn candidates<'a>(input: &AnalysisInput<'a>) -> Vec<&'a SearchResult> {
    let config = &input.config.viral;
    let mut seen = HashSet::new();
    let mut items: Vec<&SearchResult> = input
        .results
        .iter()
        .filter(|result| result.platform == Platform::YouTube)
        .filter(|result| {
            viral_score(result) > config.engagement_threshold
                || result.view_count as f64 > config.engagement_threshold
        })
        .filter(|result| seen.insert(result.link.clone()))
        .collect();
    items.sort_by(|a, b| {
        viral_score(b)
            .partial_cmp(&viral_score(a))
            .unwrap_or(Ordering::Equal)
    });
    items.truncate(config.max_items);
    items
}

fn emotional_triggers(items: &[&SearchResult]) -> EmotionalTriggers {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let text = word_text(&item.text().to_lowercase());
        for (name, terms) in TRIGGERS {
            if has_any_word(&text, terms) {
                *counts.entry(*name).or_default() += 1;
            }
        }
    }
    let triggers = sorted_counts(counts);
    let journey = triggers
        .iter()
        .take(3)
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ");
    EmotionalTriggers { triggers, journey }
}

fn deconstruct_formats(items: &[&SearchResult]) -> FormatDeconstruction {
    if items.is_empty() {
        return FormatDeconstruction::default();
    }
    let lengths: Vec<f64> = items.iter().map(|item| item.title.chars().count() as f64).collect();

    let lowered: Vec<String> = items.iter().map(|item| item.title.to_lowercase()).collect();
    let mut words: HashMap<&str, usize> = HashMap::new();
    for title in &lowered {
        for word in title
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| word.chars().count() > 3)
        {
            *words.entry(word).or_default() += 1;
        }
    }
    let mut common_words = sorted_counts(words);
    common_words.truncate(TOP_WORDS);

    let mut formats: HashMap<&str, usize> = HashMap::new();
    for title in &lowered {
        let padded = word_text(title);
        for (name, terms) in FORMATS {
            if has_any_word(&padded, terms) {
                *formats.entry(*name).or_default() += 1;
            }
        }
    }

    FormatDeconstruction {
        average_title_length: mean(&lengths),
        common_words,
        format_distribution: sorted_counts(formats),
    }
}

fn audience_reactions(items: &[&SearchResult], threshold: f64) -> Vec<AudienceReaction> {
    items
        .iter()
        .filter(|item| item.view_count > 0)
        .filter_map(|item| {
            let engagement_rate = (item.like_count + item.comment_count) as f64 / item.view_count as f64;
            (engagement_rate > threshold).then(|| AudienceReaction {
                title: item.title.clone(),
                engagement_rate,
                reaction: if item.comment_count * 10 > item.like_count {
                    "discussion-heavy".to_string()
                } else {
                    "approval-heavy".to_string()
                },
            })
        })
        .collect()
}

fn recipes(brand: &str, rival: &str) -> Vec<ViralRecipe> {
    vec![
        ViralRecipe {
            name: "head_to_head".to_string(),
            hook: "comparison".to_string(),
            format: "comparison".to_string(),
            example_title: format!("{} vs {}: which fan actually saves more?", brand, rival),
        },
        ViralRecipe {
            name: "question_led_explainer".to_string(),
            hook: "question".to_string(),
            format: "tutorial".to_string(),
            example_title: format!("Why are BLDC fans like {} so efficient?", brand),
        },
        ViralRecipe {
            name: "long_term_review".to_string(),
            hook: "authority".to_string(),
            format: "review".to_string(),
            example_title: format!("{} after 6 months: honest review", brand),
        },
    ]
}

fn brand_potential(input: &AnalysisInput<'_>) -> BrandViralPotential {
    let mut scored: Vec<ScoredTitle> = input
        .brand_results()
        .filter(|result| result.platform == Platform::YouTube)
        .map(|result| ScoredTitle {
            title: result.title.clone(),
            link: result.link.clone(),
            viral_potential: viral_potential(result),
        })
        .collect();
    if scored.is_empty() {
        return BrandViralPotential::default();
    }

    let values: Vec<f64> = scored.iter().map(|entry| entry.viral_potential).collect();
    let average_potential = mean(&values);
    scored.sort_by(|a, b| {
        b.viral_potential
            .partial_cmp(&a.viral_potential)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(TOP_BRAND_ITEMS);

    let mut suggestions = Vec::new();
    if average_potential < 50.0 {
        suggestions.push("Open titles with a question or a clear benefit".to_string());
        suggestions.push("Keep titles between 40 and 60 characters".to_string());
    }
    if average_potential < 70.0 {
        suggestions.push("Add comparison and tutorial formats to the mix".to_string());
    }

    BrandViralPotential {
        average_potential,
        top_content: scored,
        suggestions,
    }
}

pub fn analyze_viral(input: &AnalysisInput<'_>) -> ViralContentAnalysis {
    if input.results.is_empty() {
        return ViralContentAnalysis::default();
    }
    let items = candidates(input);

    let mut hooks: HashMap<&str, usize> = HashMap::new();
    for item in &items {
        *hooks.entry(classify_hook(&item.title)).or_default() += 1;
    }
    let mut hook_patterns = sorted_counts(hooks);
    hook_patterns.truncate(TOP_HOOKS);

    let rival = input
        .competitors()
        .iter()
        .max_by(|a, b| {
            share_of(input.overall, a)
                .partial_cmp(&share_of(input.overall, b))
                .unwrap_or(Ordering::Equal)
        })
        .map(String::as_str)
        .unwrap_or("the competition");

    ViralContentAnalysis {
        viral_content: items
            .iter()
            .map(|item| ViralItem {
                title: item.title.clone(),
                channel: item.channel.clone(),
                link: item.link.clone(),
                views: item.view_count,
                likes: item.like_count,
                comments: item.comment_count,
                viral_score: viral_score(item),
                hook: classify_hook(&item.title).to_string(),
            })
            .collect(),
        hook_patterns,
        emotional_triggers: emotional_triggers(&items),
        format_deconstruction: deconstruct_formats(&items),
        audience_reactions: audience_reactions(&items, input.config.viral.reaction_engagement_rate),
        // Recipes remix observed winners; nothing to remix without them.
        recipes: if items.is_empty() {
            Vec::new()
        } else {
            recipes(input.brand(), rival)
        },
        brand_viral_potential: brand_potential(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advanced::fixtures::{result, Owned};

    #[test]
    fn hooks_follow_first_match_order() {
        assert_eq!(classify_hook("How to pick a BLDC fan"), "question");
        assert_eq!(classify_hook("The hidden cost of cheap fans"), "curiosity");
        assert_eq!(classify_hook("Havells vs Crompton"), "comparison");
        assert_eq!(classify_hook("Top 5 fans of 2024"), "number");
        assert_eq!(classify_hook("Ceiling fan"), "other");
    }

    #[test]
    fn potential_rewards_questions_length_and_views() {
        let mut item = result(Platform::YouTube, "fan", 1, "How to choose the best BLDC ceiling fan 2024", 120_000);
        // 44 characters: question word, ideal length, >100k views.
        assert_eq!(viral_potential(&item), 70.0);
        item.title = "Fan".to_string();
        item.view_count = 0;
        assert_eq!(viral_potential(&item), 0.0);
    }

    #[test]
    fn candidates_are_youtube_only_deduped_and_sorted() {
        let mut duplicate = result(Platform::YouTube, "fan", 2, "Havells review", 300_000);
        duplicate.link = "https://example.com/fan/9".to_string();
        let mut again = duplicate.clone();
        again.rank_position = 3;
        let owned = Owned::new(vec![
            result(Platform::YouTube, "fan", 1, "Atomberg unboxing", 150_000),
            duplicate,
            again,
            result(Platform::Google, "fan", 1, "Crompton blog", 900_000),
            result(Platform::YouTube, "fan", 4, "Tiny channel", 10),
        ]);
        let analysis = analyze_viral(&owned.input());

        assert_eq!(analysis.viral_content.len(), 2);
        assert_eq!(analysis.viral_content[0].title, "Havells review");
        assert!(analysis.viral_content[0].viral_score >= analysis.viral_content[1].viral_score);
        assert_eq!(analysis.recipes.len(), 3);
        assert_eq!(analysis.brand_viral_potential.top_content.len(), 1);
    }

    #[test]
    fn no_candidates_gives_empty_sections() {
        let owned = Owned::new(vec![result(Platform::YouTube, "fan", 1, "Atomberg fan", 500)]);
        let analysis = analyze_viral(&owned.input());
        assert!(analysis.viral_content.is_empty());
        assert!(analysis.emotional_triggers.journey.is_empty());
        assert_eq!(analysis.format_deconstruction.average_title_length, 0.0);
        assert!(analysis.recipes.is_empty());
        assert_eq!(analysis.brand_viral_potential.top_content.len(), 1);
    }

    #[test]
    fn no_results_gives_default_analysis() {
        let owned = Owned::new(Vec::new());
        let analysis = analyze_viral(&owned.input());
        assert!(analysis.recipes.is_empty());
        assert!(analysis.hook_patterns.is_empty());
        assert!(analysis.brand_viral_potential.suggestions.is_empty());
    }

    #[test]
    fn terms_match_whole_words_only() {
        // "show" hides "how", "know" hides "now", "stop" hides "top".
        assert_eq!(classify_hook("Fan show and tell"), "other");
        let item = result(Platform::YouTube, "fan", 1, "Stop the wobble", 0);
        assert_eq!(viral_potential(&item), 0.0);

        let owned = Owned::new(vec![result(
            Platform::YouTube,
            "fan",
            1,
            "Fan show: know the motor",
            200_000,
        )]);
        let analysis = analyze_viral(&owned.input());
        assert_eq!(analysis.viral_content.len(), 1);
        assert!(analysis.emotional_triggers.triggers.is_empty());

        let owned = Owned::new(vec![result(
            Platform::YouTube,
            "fan",
            1,
            "Why I don't buy cheap fans now",
            200_000,
        )]);
        let analysis = analyze_viral(&owned.input());
        let names: Vec<&str> = analysis
            .emotional_triggers
            .triggers
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert!(names.contains(&"curiosity"));
        assert!(names.contains(&"urgency"));
        assert!(names.contains(&"fear"));
    }
}
