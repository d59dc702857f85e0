pub mod advanced;
pub mod agent;
pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod history;
pub mod report;
pub mod scoring;
pub mod search;
pub mod sentiment;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use error::SovError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Google,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::YouTube, Platform::Google];

    pub fn label(self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Google => "google",
        }
    }
}

impl FromStr for Platform {
    type Err = SovError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "youtube" | "yt" => Ok(Platform::YouTube),
            "google" | "web" => Ok(Platform::Google),
            other => Err(SovError::Config(format!("unknown platform: {}", other))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Demo,
    Production,
}

impl DataMode {
    pub fn label(self) -> &'static str {
        match self {
            DataMode::Demo => "demo",
            DataMode::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Demo,
    Partial,
    Production,
}

impl RunMode {
    pub fn from_platform_modes<I>(modes: I) -> Self
    where
        I: IntoIterator<Item = DataMode>,
    {
        let mut live = 0usize;
        let mut total = 0usize;
        for mode in modes {
            total += 1;
            if mode == DataMode::Production {
                live += 1;
            }
        }
        if live == 0 {
            RunMode::Demo
        } else if live == total {
            RunMode::Production
        } else {
            RunMode::Partial
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RunMode::Demo => "demo",
            RunMode::Partial => "partial",
            RunMode::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub keyword: String,
    pub platform: Platform,
    pub title: String,
    pub description: String,
    pub channel: String,
    pub link: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub rank_position: usize,
    #[serde(default)]
    pub comments: Vec<String>,
}

impl SearchResult {
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    pub fn mentions(&self, brand: &str) -> bool {
        contains_ci(&self.text(), brand)
    }

    pub fn mentions_any(&self, brands: &[String]) -> bool {
        let text = self.text();
        brands.iter().any(|brand| contains_ci(&text, brand))
    }

    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.published_at
            .map(|published| (now - published).num_days().max(0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoVRecord {
    pub keyword: String,
    pub platform: Platform,
    pub brand: String,
    pub presence_score: f64,
    pub engagement_score: f64,
    pub sentiment_score: f64,
    pub dominance_score: f64,
    pub weighted_sov: f64,
    pub result_count: usize,
    pub mention_count: usize,
}

impl SoVRecord {
    pub fn empty(keyword: &str, platform: Platform, brand: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            platform,
            brand: brand.to_string(),
            presence_score: 0.0,
            engagement_score: 0.0,
            sentiment_score: 0.0,
            dominance_score: 0.0,
            weighted_sov: 0.0,
            result_count: 0,
            mention_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandShare {
    pub brand: String,
    pub weighted_sov: f64,
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn contains_any(text_lower: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|needle| text_lower.contains(&needle.to_lowercase()))
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(1.0)
}

pub fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_ci_ignores_case_and_blank_needles() {
        assert!(contains_ci("Best ATOMBERG fan", "atomberg"));
        assert!(!contains_ci("Best fan", "atomberg"));
        assert!(!contains_ci("anything", "  "));
    }

    #[test]
    fn run_mode_reflects_live_platform_mix() {
        assert_eq!(
            RunMode::from_platform_modes([DataMode::Demo, DataMode::Demo]),
            RunMode::Demo
        );
        assert_eq!(
            RunMode::from_platform_modes([DataMode::Production, DataMode::Demo]),
            RunMode::Partial
        );
        assert_eq!(
            RunMode::from_platform_modes([DataMode::Production]),
            RunMode::Production
        );
        assert_eq!(RunMode::from_platform_modes([]), RunMode::Demo);
    }

    #[test]
    fn platform_parses_names_and_aliases() {
        assert_eq!(" YouTube ".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!("web".parse::<Platform>().unwrap(), Platform::Google);
        assert!(matches!("tiktok".parse::<Platform>(), Err(SovError::Config(_))));
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1234567.4), "1,234,567");
        assert_eq!(format_number(12.0), "12");
    }

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_hash64("smart fan"), stable_hash64("smart fan"));
        assert_ne!(stable_hash64("smart fan"), stable_hash64("bldc fan"));
    }
}
