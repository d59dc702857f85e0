use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::advanced::alerts::AlertCard;
use crate::advanced::forecast::SovForecast;
use crate::advanced::heatmap::ContentGapHeatmap;
use crate::advanced::perception::PerceptionGapAnalysis;
use crate::advanced::roi::RoiRecommendations;
use crate::advanced::viral::ViralContentAnalysis;
use crate::analysis::{CrossKeywordSummary, Insight, PlatformSov};
use crate::{BrandShare, DataMode, Platform, RunMode, SearchResult, SovError};

/// Results grouped by keyword, then platform.
pub type SearchResultIndex = BTreeMap<String, BTreeMap<Platform, Vec<SearchResult>>>;

/// The document written to `sov_analysis_results.json`. Demo and live runs
/// share this exact shape; only `mode`, `platform_modes` and values differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub brand: String,
    pub competitors: Vec<String>,
    pub keywords: Vec<String>,
    pub analysis_date: DateTime<Utc>,
    pub mode: RunMode,
    pub platform_modes: BTreeMap<Platform, DataMode>,
    pub search_results: SearchResultIndex,
    pub platform_sov: Vec<PlatformSov>,
    pub overall_sov: Vec<BrandShare>,
    pub cross_keyword_analysis: CrossKeywordSummary,
    pub insights: Vec<Insight>,
    pub content_gap_heatmap: ContentGapHeatmap,
    pub viral_content_analysis: ViralContentAnalysis,
    pub realtime_alerts: Vec<AlertCard>,
    pub roi_recommendations: RoiRecommendations,
    pub perception_gap_analysis: PerceptionGapAnalysis,
    pub sov_forecast: SovForecast,
}

impl AnalysisReport {
    pub fn result_count(&self) -> usize {
        self.search_results
            .values()
            .flat_map(|platforms| platforms.values())
            .map(Vec::len)
            .sum()
    }
}

pub async fn write_results(path: &Path, report: &AnalysisReport) -> Result<(), SovError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let payload = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, payload).await?;
    tracing::info!(path = %path.display(), "wrote analysis results");
    Ok(())
}
