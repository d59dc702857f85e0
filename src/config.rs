use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::scoring::SovWeights;
use crate::SovError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    pub name: String,
    pub competitors: Vec<String>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "Atomberg".to_string(),
            competitors: ["Havells", "Crompton", "Orient", "Bajaj", "Usha", "Luminous"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub keywords: Vec<String>,
    pub top_n: usize,
    pub max_comments: usize,
    pub request_delay_ms: u64,
    pub youtube_enabled: bool,
    pub google_enabled: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "smart fan",
                "energy efficient fan",
                "BLDC fan",
                "smart ceiling fan",
                "WiFi fan",
            ]
            .iter()
            .map(|keyword| keyword.to_string())
            .collect(),
            top_n: 20,
            max_comments: 100,
            request_delay_ms: 1000,
            youtube_enabled: true,
            google_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub youtube_api_base: String,
    pub google_api_base: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            youtube_api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            google_api_base: "https://www.googleapis.com/customsearch/v1".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub valence_threshold: f64,
    pub polarity_threshold: f64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            valence_threshold: 0.05,
            polarity_threshold: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub gap_candidate_count: usize,
    pub content_gap_threshold: f64,
    pub high_gap_threshold: f64,
    pub group_priority_threshold: f64,
    pub keyword_groups: Vec<KeywordGroup>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gap_candidate_count: 3,
            content_gap_threshold: 10.0,
            high_gap_threshold: 20.0,
            group_priority_threshold: 15.0,
            keyword_groups: vec![
                KeywordGroup {
                    name: "technical_keywords".to_string(),
                    keywords: vec!["BLDC fan".to_string(), "energy efficient fan".to_string()],
                    recommendation: "Create technical content explaining BLDC technology and energy savings"
                        .to_string(),
                },
                KeywordGroup {
                    name: "commercial_keywords".to_string(),
                    keywords: vec![
                        "smart fan".to_string(),
                        "smart ceiling fan".to_string(),
                        "WiFi fan".to_string(),
                    ],
                    recommendation: "Increase product showcase and smart feature demonstration content"
                        .to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub months_ahead: usize,
    pub flat_confidence_band: f64,
    pub trend_slope_threshold: f64,
    pub seasonal_multipliers: Vec<f64>,
    pub history_limit: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            months_ahead: 3,
            flat_confidence_band: 5.0,
            trend_slope_threshold: 0.5,
            seasonal_multipliers: vec![
                0.8, 0.8, 0.9, 1.2, 1.3, 1.3, 1.1, 1.0, 0.9, 0.9, 0.8, 0.8,
            ],
            history_limit: 50,
        }
    }
}

impl ForecastConfig {
    /// Month is 1-based; a short or empty table falls back to 1.0.
    pub fn seasonal_multiplier(&self, month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|index| self.seasonal_multipliers.get(index as usize))
            .copied()
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub sentiment_crisis_ratio: f64,
    pub influencer_view_threshold: u64,
    pub youtube_view_trigger: u64,
    pub google_rank_trigger: usize,
    pub recent_launch_days: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sentiment_crisis_ratio: 0.4,
            influencer_view_threshold: 50_000,
            youtube_view_trigger: 100_000,
            google_rank_trigger: 3,
            recent_launch_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViralConfig {
    pub engagement_threshold: f64,
    pub max_items: usize,
    pub reaction_engagement_rate: f64,
}

impl Default for ViralConfig {
    fn default() -> Self {
        Self {
            engagement_threshold: 100_000.0,
            max_items: 20,
            reaction_engagement_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub results_file: String,
    pub visualizations_dir: String,
    pub chart_file: String,
    pub history_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            results_file: "sov_analysis_results.json".to_string(),
            visualizations_dir: "visualizations".to_string(),
            chart_file: "sov_comparison.png".to_string(),
            history_file: "sov_history.json".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn results_path(&self) -> PathBuf {
        self.dir.join(&self.results_file)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.dir.join(&self.visualizations_dir).join(&self.chart_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(&self.history_file)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SovConfig {
    pub brand: BrandConfig,
    pub search: SearchConfig,
    pub api: ApiConfig,
    pub weights: SovWeights,
    pub sentiment: SentimentConfig,
    pub analysis: AnalysisConfig,
    pub forecast: ForecastConfig,
    pub alerts: AlertConfig,
    pub viral: ViralConfig,
    pub output: OutputConfig,
}

impl SovConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), SovError> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)
                    .map_err(|err| SovError::Config(format!("failed to parse config: {}", err)))?
            } else {
                SovConfig::default()
            }
        } else {
            SovConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), SovError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| SovError::Config(format!("failed to serialize config: {}", err)))?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SovError> {
        if self.brand.name.trim().is_empty() {
            return Err(SovError::Config("brand name must not be empty".to_string()));
        }
        if self.search.keywords.is_empty() {
            return Err(SovError::Config("at least one keyword is required".to_string()));
        }
        self.weights.validate()?;
        Ok(())
    }

    /// Target brand first, then competitors in configured order.
    pub fn tracked_brands(&self) -> Vec<String> {
        let mut brands = Vec::with_capacity(self.brand.competitors.len() + 1);
        brands.push(self.brand.name.clone());
        for competitor in &self.brand.competitors {
            if !brands.iter().any(|brand| brand.eq_ignore_ascii_case(competitor)) {
                brands.push(competitor.clone());
            }
        }
        brands
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(brand) = env::var("SOV_BRAND") {
            if !brand.trim().is_empty() {
                self.brand.name = brand.trim().to_string();
            }
        }
        if let Ok(competitors) = env::var("SOV_COMPETITORS") {
            let list = split_list(&competitors);
            if !list.is_empty() {
                self.brand.competitors = list;
            }
        }
        if let Ok(keywords) = env::var("SOV_KEYWORDS") {
            let list = split_list(&keywords);
            if !list.is_empty() {
                self.search.keywords = list;
            }
        }
        if let Ok(dir) = env::var("SOV_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output.dir = PathBuf::from(dir);
            }
        }
        if let Ok(top_n) = env::var("SOV_TOP_N") {
            if let Ok(value) = top_n.parse::<usize>() {
                self.search.top_n = value;
            }
        }
        if let Ok(delay) = env::var("SOV_REQUEST_DELAY_MS") {
            if let Ok(value) = delay.parse::<u64>() {
                self.search.request_delay_ms = value;
            }
        }
        if let Ok(base) = env::var("YOUTUBE_API_BASE") {
            if !base.trim().is_empty() {
                self.api.youtube_api_base = base;
            }
        }
        if let Ok(base) = env::var("GOOGLE_API_BASE") {
            if !base.trim().is_empty() {
                self.api.google_api_base = base;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub youtube_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: non_empty_var("YOUTUBE_API_KEY"),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            google_cse_id: non_empty_var("GOOGLE_CSE_ID"),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn google(&self) -> Option<(&str, &str)> {
        match (self.google_api_key.as_deref(), self.google_cse_id.as_deref()) {
            (Some(key), Some(cx)) => Some((key, cx)),
            _ => None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

fn default_config_path() -> Option<PathBuf> {
    env::var("SOV_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/sov.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SovConfig = toml::from_str(
            r#"
[brand]
name = "Acme"

[search]
top_n = 5
"#,
        )
        .unwrap();
        assert_eq!(config.brand.name, "Acme");
        assert_eq!(config.brand.competitors.len(), 6);
        assert_eq!(config.search.top_n, 5);
        assert_eq!(config.search.max_comments, 100);
        assert!((config.weights.presence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn tracked_brands_lead_with_target_and_skip_duplicates() {
        let mut config = SovConfig::default();
        config.brand.competitors = vec!["Havells".to_string(), "atomberg".to_string()];
        assert_eq!(config.tracked_brands(), vec!["Atomberg", "Havells"]);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = SovConfig::default();
        config.weights.engagement = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn seasonal_multiplier_is_one_based() {
        let forecast = ForecastConfig::default();
        assert!((forecast.seasonal_multiplier(1) - 0.8).abs() < 1e-9);
        assert!((forecast.seasonal_multiplier(5) - 1.3).abs() < 1e-9);
        assert!((forecast.seasonal_multiplier(13) - 1.0).abs() < 1e-9);
        assert!((forecast.seasonal_multiplier(0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a", "b"]);
    }

    #[test]
    fn written_config_loads_back() {
        let dir = std::env::temp_dir().join(format!("sov-config-{}", std::process::id()));
        let path = dir.join("sov.toml");
        let mut config = SovConfig::default();
        config.brand.name = "Acme".to_string();
        config.write(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: SovConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.brand.name, "Acme");
        let _ = std::fs::remove_dir_all(dir);
    }
}
