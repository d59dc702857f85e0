use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::advanced::AnalysisInput;
use crate::analysis::share_of;

const MIN_SPAN_DAYS: f64 = 7.0;
const DAYS_PER_MONTH: f64 = 30.0;
const MAX_UNCERTAINTY: f64 = 5.0;
const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    Flat,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandForecast {
    pub brand: String,
    pub current_sov: f64,
    pub predicted_sov: f64,
    pub trend: Trend,
    pub trend_strength: f64,
    pub change_expected: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence_level: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Gaining,
    Stable,
    Losing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorMovement {
    pub competitor: String,
    pub mentions: usize,
    pub movement: Movement,
    pub expected_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalLevel {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalImpact {
    pub current_month: String,
    pub multiplier: f64,
    pub impact: SeasonalLevel,
    pub peak_months: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub scenario: String,
    pub description: String,
    pub current_sov: f64,
    pub projected_sov: f64,
    pub sov_increase: f64,
    pub timeline_weeks: u32,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SovForecast {
    pub method: Option<ForecastMethod>,
    pub history_points: usize,
    pub months_ahead: usize,
    pub forecast_date: Option<DateTime<Utc>>,
    pub brand_forecasts: Vec<BrandForecast>,
    pub competitor_movements: Vec<CompetitorMovement>,
    pub seasonal_impact: Option<SeasonalImpact>,
    pub what_if_scenarios: Vec<WhatIfScenario>,
}

/// (months since first point, SoV) pairs, oldest first, ending with this run.
/// Only snapshots taken in the current run's mode count: mock-data runs and
/// live runs never share a trend line.
fn series_for(input: &AnalysisInput<'_>, brand: &str) -> Vec<(f64, f64)> {
    let mut timeline: Vec<(DateTime<Utc>, f64)> = input
        .comparable_history()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .filter_map(|snapshot| snapshot.share_of(brand).map(|sov| (snapshot.recorded_at, sov)))
        .collect();
    timeline.push((input.generated_at, share_of(input.overall, brand)));

    let Some(&(origin, _)) = timeline.first() else {
        return Vec::new();
    };
    timeline
        .into_iter()
        .map(|(at, sov)| ((at - origin).num_seconds() as f64 / 86_400.0 / DAYS_PER_MONTH, sov))
        .collect()
}

/// Least-squares slope and intercept; `None` when x has no spread.
fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in points {
        numerator += (x - mean_x) * (y - mean_y);
        denominator += (x - mean_x) * (x - mean_x);
    }
    if denominator <= f64::EPSILON {
        return None;
    }
    let slope = numerator / denominator;
    Some((slope, mean_y - slope * mean_x))
}

fn forecast_brand(input: &AnalysisInput<'_>, brand: &str) -> (BrandForecast, ForecastMethod) {
    let config = &input.config.forecast;
    let current_sov = share_of(input.overall, brand);
    let points = series_for(input, brand);
    let span_days = points.last().map(|(x, _)| x * DAYS_PER_MONTH).unwrap_or(0.0);

    let fit = if span_days >= MIN_SPAN_DAYS {
        linear_fit(&points)
    } else {
        None
    };

    match fit {
        Some((slope, intercept)) => {
            let last_x = points.last().map(|(x, _)| *x).unwrap_or(0.0);
            let target_x = last_x + config.months_ahead as f64;
            let predicted_sov = (slope * target_x + intercept).clamp(0.0, 100.0);
            let uncertainty = (slope.abs() * 2.0).min(MAX_UNCERTAINTY);
            let trend = if slope > config.trend_slope_threshold {
                Trend::Increasing
            } else if slope < -config.trend_slope_threshold {
                Trend::Decreasing
            } else {
                Trend::Stable
            };
            (
                BrandForecast {
                    brand: brand.to_string(),
                    current_sov,
                    predicted_sov,
                    trend,
                    trend_strength: slope.abs(),
                    change_expected: predicted_sov - current_sov,
                    lower_bound: (predicted_sov - uncertainty).max(0.0),
                    upper_bound: (predicted_sov + uncertainty).min(100.0),
                    confidence_level: if uncertainty < 3.0 {
                        Confidence::Medium
                    } else {
                        Confidence::Low
                    },
                },
                ForecastMethod::Linear,
            )
        }
        None => (
            BrandForecast {
                brand: brand.to_string(),
                current_sov,
                predicted_sov: current_sov,
                trend: Trend::Stable,
                trend_strength: 0.0,
                change_expected: 0.0,
                lower_bound: (current_sov - config.flat_confidence_band).max(0.0),
                upper_bound: (current_sov + config.flat_confidence_band).min(100.0),
                confidence_level: Confidence::Low,
            },
            ForecastMethod::Flat,
        ),
    }
}

fn competitor_movements(input: &AnalysisInput<'_>) -> Vec<CompetitorMovement> {
    input
        .competitors()
        .iter()
        .map(|competitor| {
            let mentions: usize = input
                .records
                .iter()
                .filter(|record| record.brand.eq_ignore_ascii_case(competitor))
                .map(|record| record.mention_count)
                .sum();
            let (movement, expected_change) = if mentions > 10 {
                (Movement::Gaining, (mentions as f64 * 0.3).min(5.0))
            } else if mentions < 3 {
                (Movement::Losing, -(5.0 - mentions as f64).max(2.0))
            } else {
                (Movement::Stable, 0.0)
            };
            CompetitorMovement {
                competitor: competitor.clone(),
                mentions,
                movement,
                expected_change,
            }
        })
        .collect()
}

fn seasonal_impact(input: &AnalysisInput<'_>) -> SeasonalImpact {
    let config = &input.config.forecast;
    let month = input.generated_at.month();
    let multiplier = config.seasonal_multiplier(month);
    let impact = if multiplier > 1.1 {
        SeasonalLevel::High
    } else if multiplier < 0.9 {
        SeasonalLevel::Low
    } else {
        SeasonalLevel::Moderate
    };
    let peak_months = (1..=12u32)
        .filter(|m| config.seasonal_multiplier(*m) > 1.1)
        .map(|m| MONTH_NAMES[(m - 1) as usize].to_string())
        .collect();
    let recommendation = match impact {
        SeasonalLevel::High => "Peak season: maximize content output and paid promotion now",
        SeasonalLevel::Moderate => "Steady season: keep a regular publishing cadence",
        SeasonalLevel::Low => "Off season: build evergreen content ahead of the next peak",
    };

    SeasonalImpact {
        current_month: MONTH_NAMES[(month - 1) as usize].to_string(),
        multiplier,
        impact,
        peak_months,
        recommendation: recommendation.to_string(),
    }
}

fn scenarios(input: &AnalysisInput<'_>) -> Vec<WhatIfScenario> {
    let current_sov = share_of(input.overall, input.brand());
    let gap_boost = input
        .summary
        .content_gaps
        .first()
        .map(|gap| gap.gap / 2.0)
        .unwrap_or(2.0);

    [
        (
            "close_top_content_gap",
            "Publish content on the keyword with the largest competitor lead",
            gap_boost,
            8,
            Confidence::Medium,
        ),
        (
            "increase_video_output",
            "Double YouTube publishing frequency for one quarter",
            5.0,
            6,
            Confidence::High,
        ),
        (
            "creator_partnerships",
            "Partner with three mid-tier review channels",
            3.0,
            4,
            Confidence::Medium,
        ),
    ]
    .into_iter()
    .map(|(scenario, description, boost, timeline_weeks, confidence)| {
        let projected_sov = (current_sov + boost).min(100.0);
        WhatIfScenario {
            scenario: scenario.to_string(),
            description: description.to_string(),
            current_sov,
            projected_sov,
            sov_increase: projected_sov - current_sov,
            timeline_weeks,
            confidence,
        }
    })
    .collect()
}

pub fn forecast_sov(input: &AnalysisInput<'_>) -> SovForecast {
    if input.results.is_empty() || input.overall.is_empty() {
        return SovForecast::default();
    }

    let months_ahead = input.config.forecast.months_ahead;
    let mut method = ForecastMethod::Flat;
    let brand_forecasts = input
        .brands
        .iter()
        .map(|brand| {
            let (forecast, brand_method) = forecast_brand(input, brand);
            if brand_method == ForecastMethod::Linear {
                method = ForecastMethod::Linear;
            }
            forecast
        })
        .collect();

    SovForecast {
        method: Some(method),
        history_points: input.comparable_history().count() + 1,
        months_ahead,
        forecast_date: Some(
            input.generated_at + Duration::days(DAYS_PER_MONTH as i64 * months_ahead as i64),
        ),
        brand_forecasts,
        competitor_movements: competitor_movements(input),
        seasonal_impact: Some(seasonal_impact(input)),
        what_if_scenarios: scenarios(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advanced::fixtures::{result, Owned};
    use crate::history::SovSnapshot;
    use crate::{BrandShare, Platform, RunMode};

    fn owned() -> Owned {
        Owned::new(vec![result(Platform::YouTube, "smart fan", 1, "Atomberg smart fan", 1_000)])
    }

    fn shares(atomberg: f64, havells: f64) -> Vec<BrandShare> {
        vec![
            BrandShare {
                brand: "Atomberg".to_string(),
                weighted_sov: atomberg,
            },
            BrandShare {
                brand: "Havells".to_string(),
                weighted_sov: havells,
            },
        ]
    }

    fn snapshot(days_before: i64, input_time: DateTime<Utc>, atomberg: f64) -> SovSnapshot {
        snapshot_in(RunMode::Demo, days_before, input_time, atomberg)
    }

    fn snapshot_in(mode: RunMode, days_before: i64, input_time: DateTime<Utc>, atomberg: f64) -> SovSnapshot {
        SovSnapshot {
            recorded_at: input_time - Duration::days(days_before),
            mode,
            sov_percentage: shares(atomberg, 20.0),
        }
    }

    #[test]
    fn single_run_falls_back_to_flat_band() {
        let owned = owned();
        let overall = shares(30.0, 20.0);
        let mut input = owned.input();
        input.overall = &overall;

        let forecast = forecast_sov(&input);
        assert_eq!(forecast.method, Some(ForecastMethod::Flat));
        let atomberg = &forecast.brand_forecasts[0];
        assert_eq!(atomberg.predicted_sov, 30.0);
        assert_eq!(atomberg.lower_bound, 25.0);
        assert_eq!(atomberg.upper_bound, 35.0);
        assert_eq!(atomberg.confidence_level, Confidence::Low);
    }

    #[test]
    fn rising_history_projects_increase() {
        let owned = owned();
        let overall = shares(30.0, 20.0);
        let mut input = owned.input();
        let now = input.generated_at;
        // Newest first: +2 points per 30 days.
        let history = vec![snapshot(30, now, 28.0), snapshot(60, now, 26.0), snapshot(90, now, 24.0)];
        input.overall = &overall;
        input.history = &history;

        let forecast = forecast_sov(&input);
        assert_eq!(forecast.method, Some(ForecastMethod::Linear));
        let atomberg = &forecast.brand_forecasts[0];
        assert_eq!(atomberg.trend, Trend::Increasing);
        assert!((atomberg.predicted_sov - 36.0).abs() < 1e-6);
        assert!(atomberg.lower_bound <= atomberg.predicted_sov);
        assert!(atomberg.upper_bound <= 100.0);
        assert_eq!(forecast.history_points, 4);
    }

    #[test]
    fn seasonal_and_scenarios_present() {
        let owned = owned();
        let overall = shares(98.0, 2.0);
        let mut input = owned.input();
        input.overall = &overall;

        let forecast = forecast_sov(&input);
        let seasonal = forecast.seasonal_impact.expect("seasonal impact");
        assert_eq!(seasonal.current_month, "May");
        assert_eq!(seasonal.impact, SeasonalLevel::High);
        assert!(forecast
            .what_if_scenarios
            .iter()
            .all(|scenario| scenario.projected_sov <= 100.0));
    }

    #[test]
    fn empty_overall_gives_empty_forecast() {
        let forecast = forecast_sov(&owned().input());
        assert!(forecast.method.is_none());
        assert!(forecast.brand_forecasts.is_empty());
    }

    #[test]
    fn no_results_gives_empty_forecast() {
        let owned = Owned::new(Vec::new());
        let overall = shares(0.0, 0.0);
        let mut input = owned.input();
        input.overall = &overall;

        let forecast = forecast_sov(&input);
        assert!(forecast.method.is_none());
        assert!(forecast.competitor_movements.is_empty());
        assert!(forecast.what_if_scenarios.is_empty());
        assert!(forecast.seasonal_impact.is_none());
    }

    #[test]
    fn history_from_another_mode_is_ignored() {
        let owned = owned();
        let overall = shares(30.0, 20.0);
        let mut input = owned.input();
        let now = input.generated_at;
        let history = vec![snapshot_in(RunMode::Demo, 30, now, 40.0)];
        input.mode = RunMode::Production;
        input.overall = &overall;
        input.history = &history;

        let forecast = forecast_sov(&input);
        assert_eq!(forecast.method, Some(ForecastMethod::Flat));
        assert_eq!(forecast.history_points, 1);
        let atomberg = &forecast.brand_forecasts[0];
        assert_eq!(atomberg.trend, Trend::Stable);
        assert_eq!(atomberg.predicted_sov, 30.0);
    }
}
