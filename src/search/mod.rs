pub mod google;
pub mod mock;
pub mod youtube;

use serde::Deserialize;
use std::time::Duration;

use crate::{DataMode, Platform, SearchResult, SovError};

pub use google::GoogleClient;
pub use mock::MockSearch;
pub use youtube::YouTubeClient;

const QUOTA_REASONS: &[&str] = &[
    "quotaexceeded",
    "dailylimitexceeded",
    "ratelimitexceeded",
    "userratelimitexceeded",
    "rate_limit_exceeded",
    "resource_exhausted",
];

const AUTH_REASONS: &[&str] = &[
    "keyinvalid",
    "api_key_invalid",
    "keyexpired",
    "accessnotconfigured",
    "forbidden",
    "unauthorized",
    "ipreferblocked",
    "service_disabled",
];

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: Option<GoogleErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<GoogleErrorItem>,
    #[serde(default)]
    details: Vec<GoogleErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorItem {
    reason: Option<String>,
}

/// Maps a failed Google API response onto the credential / quota / other
/// split the searcher reacts to.
pub fn classify_api_error(platform: Platform, status: u16, body: &str) -> SovError {
    let parsed = serde_json::from_str::<GoogleErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);

    let (message, reasons) = match parsed {
        Some(error) => {
            let reasons: Vec<String> = error
                .errors
                .iter()
                .chain(error.details.iter())
                .filter_map(|item| item.reason.as_ref())
                .map(|reason| reason.to_lowercase())
                .collect();
            (error.message.unwrap_or_default(), reasons)
        }
        None => (body.trim().to_string(), Vec::new()),
    };

    let detail = if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        message.clone()
    };
    let has_reason = |known: &[&str]| {
        reasons
            .iter()
            .any(|reason| known.iter().any(|entry| *entry == reason.as_str()))
    };

    if status == 429 || has_reason(QUOTA_REASONS) {
        return SovError::Quota { platform, detail };
    }
    let key_rejected = message.to_lowercase().contains("api key not valid");
    if status == 401 || has_reason(AUTH_REASONS) || (status == 400 && key_rejected) {
        return SovError::Auth { platform, detail };
    }
    SovError::Api {
        platform,
        status,
        detail,
    }
}

pub(crate) async fn ensure_success(
    platform: Platform,
    response: reqwest::Response,
) -> Result<reqwest::Response, SovError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|_| String::new());
    Err(classify_api_error(platform, status.as_u16(), &body))
}

pub(crate) fn http_client(timeout_ms: u64) -> Result<reqwest::Client, SovError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms.max(1)))
        .build()?;
    Ok(client)
}

pub enum SearchSource {
    YouTube(YouTubeClient),
    Google(GoogleClient),
    Mock,
}

/// Fetches one platform's results keyword by keyword. A rejected credential
/// drops the platform to mock data for the rest of the run; any other
/// failure only costs the keyword in flight.
pub struct PlatformSearcher {
    platform: Platform,
    source: SearchSource,
    mock: MockSearch,
    top_n: usize,
    request_delay: Duration,
}

impl PlatformSearcher {
    pub fn new(
        platform: Platform,
        source: SearchSource,
        mock: MockSearch,
        top_n: usize,
        request_delay: Duration,
    ) -> Self {
        Self {
            platform,
            source,
            mock,
            top_n,
            request_delay,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn mode(&self) -> DataMode {
        match self.source {
            SearchSource::Mock => DataMode::Demo,
            _ => DataMode::Production,
        }
    }

    pub async fn search(&mut self, keyword: &str) -> Vec<SearchResult> {
        let outcome = match &self.source {
            SearchSource::Mock => return self.mock.search(self.platform, keyword, self.top_n),
            SearchSource::YouTube(client) => client.search(keyword, self.top_n).await,
            SearchSource::Google(client) => client.search(keyword, self.top_n).await,
        };

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        match outcome {
            Ok(results) => {
                tracing::info!(
                    platform = %self.platform,
                    keyword,
                    count = results.len(),
                    "fetched live results"
                );
                results
            }
            Err(err) if err.is_auth() => {
                tracing::warn!(
                    platform = %self.platform,
                    error = %err,
                    "credentials rejected, switching platform to mock data"
                );
                self.source = SearchSource::Mock;
                self.mock.search(self.platform, keyword, self.top_n)
            }
            Err(err) => {
                tracing::warn!(
                    platform = %self.platform,
                    keyword,
                    error = %err,
                    "search failed, keyword contributes no results"
                );
                Vec::new()
            }
        }
    }
}
