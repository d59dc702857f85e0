//! Report sections derived from one run's results. Every builder is a pure
//! function of [`AnalysisInput`]; none keeps state between runs except the
//! forecaster, which reads the persisted SoV history passed in here.

pub mod alerts;
pub mod forecast;
pub mod heatmap;
pub mod perception;
pub mod roi;
pub mod viral;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{CrossKeywordSummary, PlatformSov};
use crate::config::SovConfig;
use crate::history::SovSnapshot;
use crate::sentiment::SentimentScorer;
use crate::{BrandShare, RunMode, SearchResult, SoVRecord};

pub struct AnalysisInput<'a> {
    pub config: &'a SovConfig,
    pub generated_at: DateTime<Utc>,
    pub mode: RunMode,
    /// Target brand first, then competitors.
    pub brands: &'a [String],
    pub results: &'a [SearchResult],
    pub records: &'a [SoVRecord],
    pub platforms: &'a [PlatformSov],
    pub overall: &'a [BrandShare],
    pub summary: &'a CrossKeywordSummary,
    /// Previous runs, newest first; excludes the current run.
    pub history: &'a [SovSnapshot],
    pub sentiment: &'a SentimentScorer,
}

impl<'a> AnalysisInput<'a> {
    pub fn brand(&self) -> &str {
        self.brands.first().map(String::as_str).unwrap_or_default()
    }

    pub fn competitors(&self) -> &[String] {
        self.brands.get(1..).unwrap_or_default()
    }

    pub fn mentions_brand(&self, result: &SearchResult) -> bool {
        result.mentions(self.brand())
    }

    pub fn mentions_competitor(&self, result: &SearchResult) -> bool {
        result.mentions_any(self.competitors())
    }

    /// Earlier snapshots taken in the same mode as this run, newest first.
    pub fn comparable_history(&self) -> impl Iterator<Item = &'a SovSnapshot> + '_ {
        self.history.iter().filter(move |snapshot| snapshot.mode == self.mode)
    }

    pub fn brand_results(&self) -> impl Iterator<Item = &'a SearchResult> + '_ {
        self.results.iter().filter(move |result| self.mentions_brand(result))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn cost(self) -> u32 {
        match self {
            Effort::Low => 500,
            Effort::Medium => 1500,
            Effort::High => 3000,
        }
    }
}

/// Keyword-bucket tally split between the target brand and its competitors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub brand: usize,
    pub competitors: usize,
}

pub(crate) type TermGroups = &'static [(&'static str, &'static [&'static str])];

pub(crate) fn lower_text(result: &SearchResult) -> String {
    result.text().to_lowercase()
}

/// Names of the groups whose terms occur in `text_lower`.
pub(crate) fn matching_groups(groups: TermGroups, text_lower: &str) -> Vec<&'static str> {
    groups
        .iter()
        .filter(|(_, terms)| crate::contains_any(text_lower, terms))
        .map(|(name, _)| *name)
        .collect()
}

/// Alphanumeric runs of `text_lower`; apostrophes and punctuation split.
pub(crate) fn words(text_lower: &str) -> impl Iterator<Item = &str> {
    text_lower
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Words joined by single spaces and padded, so [`has_any_word`] only
/// matches on word boundaries.
pub(crate) fn word_text(text_lower: &str) -> String {
    format!(" {} ", words(text_lower).collect::<Vec<_>>().join(" "))
}

/// Whole-word or whole-phrase match of any term against [`word_text`] output.
pub(crate) fn has_any_word(padded: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| {
        let phrase = words(term).collect::<Vec<_>>().join(" ");
        !phrase.is_empty() && padded.contains(&format!(" {} ", phrase))
    })
}

pub(crate) fn empty_counts(groups: TermGroups) -> Vec<CategoryCount> {
    groups
        .iter()
        .map(|(name, _)| CategoryCount {
            name: name.to_string(),
            brand: 0,
            competitors: 0,
        })
        .collect()
}

pub(crate) fn bump(counts: &mut [CategoryCount], name: &str, brand: bool, competitor: bool) {
    if let Some(count) = counts.iter_mut().find(|count| count.name == name) {
        if brand {
            count.brand += 1;
        }
        if competitor {
            count.competitors += 1;
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::{Platform, SearchResult};

    pub fn result(platform: Platform, keyword: &str, rank: usize, title: &str, views: u64) -> SearchResult {
        SearchResult {
            keyword: keyword.to_string(),
            platform,
            title: title.to_string(),
            description: String::new(),
            channel: "channel".to_string(),
            link: format!("https://example.com/{}/{}", keyword.replace(' ', "-"), rank),
            view_count: views,
            like_count: views / 50,
            comment_count: views / 500,
            published_at: None,
            rank_position: rank,
            comments: Vec::new(),
        }
    }

    pub fn brands() -> Vec<String> {
        vec!["Atomberg".to_string(), "Havells".to_string(), "Crompton".to_string()]
    }

    pub struct Owned {
        pub config: SovConfig,
        pub brands: Vec<String>,
        pub results: Vec<SearchResult>,
        pub summary: CrossKeywordSummary,
        pub sentiment: SentimentScorer,
    }

    impl Owned {
        pub fn new(results: Vec<SearchResult>) -> Self {
            Self {
                config: SovConfig::default(),
                brands: brands(),
                results,
                summary: CrossKeywordSummary::default(),
                sentiment: SentimentScorer::default(),
            }
        }

        pub fn input(&self) -> AnalysisInput<'_> {
            AnalysisInput {
                config: &self.config,
                generated_at: chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 5, 15, 12, 0, 0).unwrap(),
                mode: RunMode::Demo,
                brands: &self.brands,
                results: &self.results,
                records: &[],
                platforms: &[],
                overall: &[],
                summary: &self.summary,
                history: &[],
                sentiment: &self.sentiment,
            }
        }
    }
}
