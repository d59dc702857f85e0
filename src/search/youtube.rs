use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::search::{ensure_success, http_client};
use crate::{Platform, SearchResult, SovError};

const MAX_SEARCH_PAGE: usize = 50;
const MAX_COMMENT_PAGE: usize = 100;

#[derive(Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    max_comments: usize,
}

impl YouTubeClient {
    pub fn new(
        api_base: &str,
        api_key: &str,
        timeout_ms: u64,
        max_comments: usize,
    ) -> Result<Self, SovError> {
        Ok(Self {
            client: http_client(timeout_ms)?,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_comments,
        })
    }

    pub async fn search(&self, keyword: &str, top_n: usize) -> Result<Vec<SearchResult>, SovError> {
        let max_results = top_n.clamp(1, MAX_SEARCH_PAGE).to_string();
        let response = self
            .client
            .get(format!("{}/search", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", keyword),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let body: SearchListResponse = ensure_success(Platform::YouTube, response).await?.json().await?;

        let videos: Vec<(String, SearchSnippet)> = body
            .items
            .into_iter()
            .filter_map(|item| match (item.id.video_id, item.snippet) {
                (Some(id), Some(snippet)) => Some((id, snippet)),
                _ => None,
            })
            .take(top_n)
            .collect();
        if videos.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = videos.iter().map(|(id, _)| id.as_str()).collect();
        let statistics = self.fetch_statistics(&ids).await?;

        let mut results = Vec::with_capacity(videos.len());
        for (index, (video_id, snippet)) in videos.into_iter().enumerate() {
            let stats = statistics
                .iter()
                .find(|(id, _)| *id == video_id)
                .map(|(_, stats)| stats.clone())
                .unwrap_or_default();

            let comments = if stats.comment_count > 0 && self.max_comments > 0 {
                match self.fetch_comments(&video_id).await {
                    Ok(comments) => comments,
                    Err(err) => {
                        tracing::warn!(
                            video_id = %video_id,
                            error = %err,
                            "comment fetch failed, keeping video without comments"
                        );
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };

            results.push(SearchResult {
                keyword: keyword.to_string(),
                platform: Platform::YouTube,
                title: snippet.title,
                description: snippet.description,
                channel: snippet.channel_title,
                link: format!("https://www.youtube.com/watch?v={}", video_id),
                view_count: stats.view_count,
                like_count: stats.like_count,
                comment_count: stats.comment_count,
                published_at: snippet.published_at,
                rank_position: index + 1,
                comments,
            });
        }

        Ok(results)
    }

    async fn fetch_statistics(&self, ids: &[&str]) -> Result<Vec<(String, VideoStats)>, SovError> {
        let joined = ids.join(",");
        let response = self
            .client
            .get(format!("{}/videos", self.api_base))
            .query(&[
                ("part", "statistics"),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let body: VideoListResponse = ensure_success(Platform::YouTube, response).await?.json().await?;

        Ok(body
            .items
            .into_iter()
            .map(|item| (item.id, VideoStats::from(item.statistics.unwrap_or_default())))
            .collect())
    }

    pub async fn fetch_comments(&self, video_id: &str) -> Result<Vec<String>, SovError> {
        let max_results = self.max_comments.clamp(1, MAX_COMMENT_PAGE).to_string();
        let response = self
            .client
            .get(format!("{}/commentThreads", self.api_base))
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", max_results.as_str()),
                ("order", "relevance"),
                ("textFormat", "plainText"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let body: CommentThreadResponse =
            ensure_success(Platform::YouTube, response).await?.json().await?;

        Ok(body
            .items
            .into_iter()
            .filter_map(|thread| thread.snippet)
            .filter_map(|snippet| snippet.top_level_comment)
            .filter_map(|comment| comment.snippet)
            .map(|snippet| snippet.text_display)
            .filter(|text| !text.trim().is_empty())
            .take(self.max_comments)
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
struct VideoStats {
    view_count: u64,
    like_count: u64,
    comment_count: u64,
}

impl From<RawStatistics> for VideoStats {
    fn from(raw: RawStatistics) -> Self {
        Self {
            view_count: parse_count(raw.view_count.as_deref()),
            like_count: parse_count(raw.like_count.as_deref()),
            comment_count: parse_count(raw.comment_count.as_deref()),
        }
    }
}

// The Data API serializes counters as strings and omits hidden ones.
fn parse_count(value: Option<&str>) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    statistics: Option<RawStatistics>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: Option<Comment>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textDisplay", default)]
    text_display: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_parse_from_strings() {
        assert_eq!(parse_count(Some("12345")), 12345);
        assert_eq!(parse_count(Some("n/a")), 0);
        assert_eq!(parse_count(None), 0);
    }
}
