//! End-to-end runs on mock data, writing into a scratch output directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use sov_agent::agent::{analyze, SearchBatch, SovAgent};
use sov_agent::config::{ApiKeys, SovConfig};
use sov_agent::search::MockSearch;
use sov_agent::{DataMode, Platform, RunMode};

const REPORT_KEYS: [&str; 17] = [
    "brand",
    "competitors",
    "keywords",
    "analysis_date",
    "mode",
    "platform_modes",
    "search_results",
    "platform_sov",
    "overall_sov",
    "cross_keyword_analysis",
    "insights",
    "content_gap_heatmap",
    "viral_content_analysis",
    "realtime_alerts",
    "roi_recommendations",
    "perception_gap_analysis",
    "sov_forecast",
];

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sov-agent-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn demo_config(dir: &Path) -> SovConfig {
    let mut config = SovConfig::default();
    config.search.request_delay_ms = 0;
    config.output.dir = dir.to_path_buf();
    config
}

#[tokio::test]
async fn demo_run_writes_report_chart_and_history() {
    let dir = scratch_dir("demo-run");
    let agent = SovAgent::new(demo_config(&dir), ApiKeys::none());

    let outcome = agent.run().await.expect("demo run should succeed");
    assert_eq!(outcome.report.mode, RunMode::Demo);
    assert!(outcome.results_path.exists());
    assert!(outcome.chart_path.as_ref().is_some_and(|path| path.exists()));

    let raw = std::fs::read_to_string(&outcome.results_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = json.as_object().expect("report is a JSON object");
    for key in REPORT_KEYS {
        assert!(object.contains_key(key), "missing key {}", key);
    }
    assert_eq!(object.len(), REPORT_KEYS.len());
    assert_eq!(json["mode"], "demo");
    assert_eq!(json["platform_modes"]["youtube"], "demo");
    assert_eq!(json["brand"], "Atomberg");

    // Second run forecasts from the first run's snapshot.
    let second = agent.run().await.expect("second run should succeed");
    assert_eq!(second.report.sov_forecast.history_points, 2);
    let history = std::fs::read_to_string(dir.join("sov_history.json")).unwrap();
    let snapshots: serde_json::Value = serde_json::from_str(&history).unwrap();
    assert_eq!(snapshots.as_array().map(Vec::len), Some(2));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn demo_and_live_modes_share_one_schema() {
    let config = SovConfig::default();
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
    let brands = config.tracked_brands();
    let mock = MockSearch::new(&config.brand.name, &brands[1..], now);
    let batches: Vec<SearchBatch> = config
        .search
        .keywords
        .iter()
        .flat_map(|keyword| {
            Platform::ALL.into_iter().map(|platform| SearchBatch {
                keyword: keyword.clone(),
                platform,
                results: mock.search(platform, keyword, config.search.top_n),
            })
        })
        .collect();

    let modes = |mode: DataMode| -> BTreeMap<Platform, DataMode> {
        Platform::ALL.into_iter().map(|platform| (platform, mode)).collect()
    };
    let demo = analyze(&config, now, batches.clone(), modes(DataMode::Demo), &[]);
    let live = analyze(&config, now, batches, modes(DataMode::Production), &[]);

    assert_eq!(demo.mode, RunMode::Demo);
    assert_eq!(live.mode, RunMode::Production);

    let demo_json = serde_json::to_value(&demo).unwrap();
    let live_json = serde_json::to_value(&live).unwrap();
    let demo_keys: Vec<&String> = demo_json.as_object().unwrap().keys().collect();
    let live_keys: Vec<&String> = live_json.as_object().unwrap().keys().collect();
    assert_eq!(demo_keys, live_keys);
    assert_eq!(demo_json["overall_sov"], live_json["overall_sov"]);
}

#[test]
fn mixed_platform_modes_report_partial() {
    let config = SovConfig::default();
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
    let mut modes = BTreeMap::new();
    modes.insert(Platform::YouTube, DataMode::Production);
    modes.insert(Platform::Google, DataMode::Demo);

    let report = analyze(&config, now, Vec::new(), modes, &[]);
    assert_eq!(report.mode, RunMode::Partial);
    assert!(report
        .overall_sov
        .iter()
        .all(|share| share.weighted_sov == 0.0));
    assert!(report.insights.is_empty());

    let heatmap = &report.content_gap_heatmap;
    assert!(heatmap.platform_opportunities.is_empty());
    assert!(heatmap.priority_scored_gaps.is_empty());

    let viral = &report.viral_content_analysis;
    assert!(viral.viral_content.is_empty());
    assert!(viral.recipes.is_empty());
    assert!(viral.brand_viral_potential.top_content.is_empty());

    assert!(report.realtime_alerts.is_empty());

    let roi = &report.roi_recommendations;
    assert!(roi.content_ideas.is_empty());
    assert!(roi.platform_roi.is_empty());
    assert!(roi.prioritized_actions.is_empty());

    let perception = &report.perception_gap_analysis;
    assert!(perception.messaging_vs_reality.is_empty());
    assert!(perception.value_propositions.is_empty());
    assert!(perception.competitive_attributes.is_empty());
    assert!(perception.alignment_recommendations.is_empty());

    let forecast = &report.sov_forecast;
    assert!(forecast.method.is_none());
    assert!(forecast.brand_forecasts.is_empty());
    assert!(forecast.competitor_movements.is_empty());
    assert!(forecast.what_if_scenarios.is_empty());
}
