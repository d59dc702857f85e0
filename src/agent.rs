use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::advanced::alerts::detect_alerts;
use crate::advanced::forecast::forecast_sov;
use crate::advanced::heatmap::build_heatmap;
use crate::advanced::perception::analyze_perception;
use crate::advanced::roi::recommend_roi;
use crate::advanced::viral::analyze_viral;
use crate::advanced::AnalysisInput;
use crate::analysis::{analyze_keywords, generate_insights, overall_sov, platform_sov};
use crate::chart::render_sov_chart;
use crate::config::{ApiKeys, SovConfig};
use crate::history::{HistoryStore, SovSnapshot};
use crate::report::{write_results, AnalysisReport, SearchResultIndex};
use crate::scoring::{SovCalculator, WeightedScorer};
use crate::search::google::GoogleClient;
use crate::search::mock::MockSearch;
use crate::search::youtube::YouTubeClient;
use crate::search::{PlatformSearcher, SearchSource};
use crate::sentiment::SentimentScorer;
use crate::{DataMode, Platform, RunMode, SearchResult, SovError};

/// Results for one (keyword, platform) slice.
#[derive(Debug, Clone)]
pub struct SearchBatch {
    pub keyword: String,
    pub platform: Platform,
    pub results: Vec<SearchResult>,
}

/// Where a finished run left its artifacts.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: AnalysisReport,
    pub results_path: PathBuf,
    pub chart_path: Option<PathBuf>,
}

pub struct SovAgent {
    config: SovConfig,
    keys: ApiKeys,
}

impl SovAgent {
    pub fn new(config: SovConfig, keys: ApiKeys) -> Self {
        Self { config, keys }
    }

    pub fn config(&self) -> &SovConfig {
        &self.config
    }

    /// One searcher per enabled platform; a platform without credentials
    /// runs on mock data.
    pub fn searchers(&self, reference_time: DateTime<Utc>) -> Result<Vec<PlatformSearcher>, SovError> {
        let brands = self.config.tracked_brands();
        let competitors = brands.get(1..).unwrap_or_default();
        let search = &self.config.search;
        let api = &self.config.api;
        let delay = Duration::from_millis(search.request_delay_ms);
        let mut searchers = Vec::new();

        for platform in Platform::ALL {
            let enabled = match platform {
                Platform::YouTube => search.youtube_enabled,
                Platform::Google => search.google_enabled,
            };
            if !enabled {
                tracing::info!(platform = %platform, "platform disabled in config");
                continue;
            }

            let source = match platform {
                Platform::YouTube => match self.keys.youtube_api_key.as_deref() {
                    Some(key) => SearchSource::YouTube(YouTubeClient::new(
                        &api.youtube_api_base,
                        key,
                        api.timeout_ms,
                        search.max_comments,
                    )?),
                    None => SearchSource::Mock,
                },
                Platform::Google => match self.keys.google() {
                    Some((key, cx)) => SearchSource::Google(GoogleClient::new(
                        &api.google_api_base,
                        key,
                        cx,
                        api.timeout_ms,
                    )?),
                    None => SearchSource::Mock,
                },
            };
            if matches!(source, SearchSource::Mock) {
                tracing::info!(platform = %platform, "no API credentials, using mock data");
            }

            searchers.push(PlatformSearcher::new(
                platform,
                source,
                MockSearch::new(&self.config.brand.name, competitors, reference_time),
                search.top_n,
                delay,
            ));
        }

        Ok(searchers)
    }

    /// Sequential collection: keyword by keyword, platform by platform.
    pub async fn collect(
        &self,
        searchers: &mut [PlatformSearcher],
    ) -> (Vec<SearchBatch>, BTreeMap<Platform, DataMode>) {
        let mut batches = Vec::new();
        for keyword in &self.config.search.keywords {
            for searcher in searchers.iter_mut() {
                let results = searcher.search(keyword).await;
                tracing::debug!(
                    platform = %searcher.platform(),
                    keyword = keyword.as_str(),
                    count = results.len(),
                    "collected results"
                );
                batches.push(SearchBatch {
                    keyword: keyword.clone(),
                    platform: searcher.platform(),
                    results,
                });
            }
        }

        // Read after collection: a rejected key flips its platform to demo.
        let modes = searchers
            .iter()
            .map(|searcher| (searcher.platform(), searcher.mode()))
            .collect();
        (batches, modes)
    }

    pub async fn run(&self) -> Result<RunOutcome, SovError> {
        let generated_at = Utc::now();
        let output = &self.config.output;

        let mut searchers = self.searchers(generated_at)?;
        let (batches, platform_modes) = self.collect(&mut searchers).await;

        let mut history =
            HistoryStore::load_or_empty(output.history_path(), self.config.forecast.history_limit).await;
        let report = analyze(
            &self.config,
            generated_at,
            batches,
            platform_modes,
            history.snapshots(),
        );

        // A run where every search came back empty says nothing about SoV.
        if report.result_count() == 0 {
            tracing::warn!("no search results collected, SoV history left unchanged");
        } else {
            let snapshot = SovSnapshot {
                recorded_at: generated_at,
                mode: report.mode,
                sov_percentage: report.overall_sov.clone(),
            };
            if let Err(err) = history.append(snapshot).await {
                tracing::warn!(error = %err, "failed to update SoV history");
            }
        }

        let results_path = output.results_path();
        write_results(&results_path, &report).await?;

        let chart_path = output.chart_path();
        let chart_path = match render_sov_chart(&chart_path, &self.config.brand.name, &report.overall_sov) {
            Ok(()) => Some(chart_path),
            Err(err) => {
                tracing::warn!(error = %err, "chart rendering failed");
                None
            }
        };

        Ok(RunOutcome {
            report,
            results_path,
            chart_path,
        })
    }
}

/// Scores, aggregates and analyzes collected results into the report
/// document. `history` is newest first and excludes this run.
pub fn analyze(
    config: &SovConfig,
    generated_at: DateTime<Utc>,
    batches: Vec<SearchBatch>,
    platform_modes: BTreeMap<Platform, DataMode>,
    history: &[SovSnapshot],
) -> AnalysisReport {
    let brands = config.tracked_brands();
    let brand = config.brand.name.clone();
    let competitors: Vec<String> = brands.get(1..).unwrap_or_default().to_vec();
    let keywords = config.search.keywords.clone();

    let sentiment = SentimentScorer::new(&config.sentiment);
    let calculator = SovCalculator::new(WeightedScorer::new(config.weights.clone()), sentiment.clone());

    let mut records = Vec::new();
    for batch in &batches {
        records.extend(calculator.calculate_all(&batch.keyword, batch.platform, &batch.results, &brands));
    }

    let platforms: Vec<_> = platform_modes
        .iter()
        .map(|(platform, mode)| platform_sov(*platform, *mode, &records, &brands))
        .collect();
    let overall = overall_sov(&platforms, &brands);
    let summary = analyze_keywords(&records, &keywords, &brands, &config.analysis);
    let insights = generate_insights(&brand, &competitors, &keywords, &platforms, &overall, &summary);

    let mut search_results = SearchResultIndex::new();
    let mut all_results = Vec::new();
    for batch in batches {
        all_results.extend(batch.results.iter().cloned());
        search_results
            .entry(batch.keyword)
            .or_default()
            .entry(batch.platform)
            .or_default()
            .extend(batch.results);
    }

    let mode = RunMode::from_platform_modes(platform_modes.values().copied());
    let input = AnalysisInput {
        config,
        generated_at,
        mode,
        brands: &brands,
        results: &all_results,
        records: &records,
        platforms: &platforms,
        overall: &overall,
        summary: &summary,
        history,
        sentiment: &sentiment,
    };
    let heatmap = build_heatmap(&input);
    let roi = recommend_roi(&input, &heatmap);
    let viral = analyze_viral(&input);
    let alerts = detect_alerts(&input);
    let perception = analyze_perception(&input);
    let forecast = forecast_sov(&input);

    AnalysisReport {
        brand,
        competitors,
        keywords,
        analysis_date: generated_at,
        mode,
        platform_modes,
        search_results,
        platform_sov: platforms,
        overall_sov: overall,
        cross_keyword_analysis: summary,
        insights,
        content_gap_heatmap: heatmap,
        viral_content_analysis: viral,
        realtime_alerts: alerts,
        roi_recommendations: roi,
        perception_gap_analysis: perception,
        sov_forecast: forecast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn demo_agent(dir: &std::path::Path) -> SovAgent {
        let mut config = SovConfig::default();
        config.search.request_delay_ms = 0;
        config.search.keywords = vec!["smart fan".to_string(), "BLDC fan".to_string()];
        config.output.dir = dir.to_path_buf();
        SovAgent::new(config, ApiKeys::none())
    }

    #[tokio::test]
    async fn missing_keys_collect_mock_batches() {
        let dir = std::env::temp_dir().join("sov-agent-collect-test");
        let agent = demo_agent(&dir);
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let mut searchers = agent.searchers(now).unwrap();
        assert_eq!(searchers.len(), 2);

        let (batches, modes) = agent.collect(&mut searchers).await;
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|batch| !batch.results.is_empty()));
        assert!(modes.values().all(|mode| *mode == DataMode::Demo));
    }

    #[tokio::test]
    async fn empty_run_leaves_history_untouched() {
        let dir = std::env::temp_dir().join(format!("sov-agent-empty-run-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let mut agent = demo_agent(&dir);
        agent.config.search.top_n = 0;

        let outcome = agent.run().await.unwrap();
        assert_eq!(outcome.report.result_count(), 0);
        assert!(outcome.results_path.exists());
        assert!(!agent.config().output.history_path().exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn analyze_is_deterministic_for_fixed_input() {
        let dir = std::env::temp_dir().join("sov-agent-analyze-test");
        let agent = demo_agent(&dir);
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let mock = MockSearch::new("Atomberg", &agent.config().tracked_brands()[1..], now);
        let batches: Vec<SearchBatch> = agent
            .config()
            .search
            .keywords
            .iter()
            .flat_map(|keyword| {
                Platform::ALL.into_iter().map(|platform| SearchBatch {
                    keyword: keyword.clone(),
                    platform,
                    results: mock.search(platform, keyword, 10),
                })
            })
            .collect();
        let modes: BTreeMap<Platform, DataMode> =
            Platform::ALL.into_iter().map(|platform| (platform, DataMode::Demo)).collect();

        let first = analyze(agent.config(), now, batches.clone(), modes.clone(), &[]);
        let second = analyze(agent.config(), now, batches, modes, &[]);
        assert_eq!(first.mode, RunMode::Demo);
        assert_eq!(first.overall_sov, second.overall_sov);
        assert_eq!(first.result_count(), 40);
        assert!(first
            .overall_sov
            .iter()
            .all(|share| (0.0..=100.0).contains(&share.weighted_sov)));
    }
}
