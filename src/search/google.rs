use serde::Deserialize;

use crate::search::{ensure_success, http_client};
use crate::{Platform, SearchResult, SovError};

const PAGE_SIZE: usize = 10;
// Custom Search refuses `start + num` beyond 100.
const MAX_RESULTS: usize = 100;

#[derive(Clone)]
pub struct GoogleClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    cse_id: String,
}

impl GoogleClient {
    pub fn new(api_base: &str, api_key: &str, cse_id: &str, timeout_ms: u64) -> Result<Self, SovError> {
        Ok(Self {
            client: http_client(timeout_ms)?,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            cse_id: cse_id.to_string(),
        })
    }

    pub async fn search(&self, keyword: &str, top_n: usize) -> Result<Vec<SearchResult>, SovError> {
        let wanted = top_n.min(MAX_RESULTS);
        let mut results: Vec<SearchResult> = Vec::with_capacity(wanted);

        while results.len() < wanted {
            let start = results.len() + 1;
            let num = (wanted - results.len()).min(PAGE_SIZE);
            let items = self.fetch_page(keyword, start, num).await?;
            let received = items.len();

            for item in items {
                let rank_position = results.len() + 1;
                results.push(SearchResult {
                    keyword: keyword.to_string(),
                    platform: Platform::Google,
                    title: item.title,
                    description: item.snippet,
                    channel: item.display_link,
                    link: item.link,
                    view_count: 0,
                    like_count: 0,
                    comment_count: 0,
                    published_at: None,
                    rank_position,
                    comments: Vec::new(),
                });
            }

            if received < num {
                break;
            }
        }

        results.truncate(wanted);
        Ok(results)
    }

    async fn fetch_page(&self, keyword: &str, start: usize, num: usize) -> Result<Vec<CseItem>, SovError> {
        let start = start.to_string();
        let num = num.to_string();
        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", keyword),
                ("num", num.as_str()),
                ("start", start.as_str()),
            ])
            .send()
            .await?;
        let body: CseResponse = ensure_success(Platform::Google, response).await?.json().await?;
        Ok(body.items)
    }
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(rename = "displayLink", default)]
    display_link: String,
}
