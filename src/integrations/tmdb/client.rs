// src/integrations/tmdb/client.rs
//
// TMDb API integration (search and enrichment provider)
//
// ARCHITECTURE:
// - REST client for the TMDb v3 JSON API
// - Maps wire data → SearchCandidate / TrailerRef (NO domain mutation)
// - Candidate ids are TMDb ids; detail lookups go through the imdb id
//   resolved from /external_ids

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::integrations::{DiscoveryProvider, RateLimiter, SearchCandidate, TrailerRef};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Thumbnail-sized poster base; candidates carry a relative path
const POSTER_THUMB_BASE: &str = "https://image.tmdb.org/t/p/w185";

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
    title: String,
    poster_path: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIdsResponse {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    results: Vec<VideoResult>,
}

#[derive(Debug, Deserialize)]
struct VideoResult {
    site: String,
    key: String,
    #[serde(default)]
    official: bool,
    #[serde(rename = "type")]
    video_type: String,
}

/// TMDb API client
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
}

impl TmdbClient {
    /// Create a new TMDb client
    pub fn new(api_key: String) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(Duration::from_millis(250))),
        })
    }

    /// Point the client at a different endpoint (tests, proxies)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    // ========================================================================
    // INTERNAL: REQUEST EXECUTION
    // ========================================================================

    async fn execute_get<T>(&self, path: &str, query: &[(&str, &str)]) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let delay = self.rate_limiter.next_delay();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }

        let mut params: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        params.extend_from_slice(query);

        let url = format!("{}{}", self.base_url, path);
        let response = self.http_client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "TMDb returned status {} for {}",
                response.status(),
                path
            )));
        }

        Ok(response.json::<T>().await?)
    }

    /// Pick the best trailer: official YouTube first, then any YouTube,
    /// then whatever trailer is left.
    fn select_trailer(mut videos: Vec<VideoResult>) -> Option<TrailerRef> {
        videos.retain(|v| v.video_type == "Trailer");

        videos
            .iter()
            .position(|v| v.official && v.site == "YouTube")
            .or_else(|| videos.iter().position(|v| v.site == "YouTube"))
            .or(if videos.is_empty() { None } else { Some(0) })
            .map(|idx| {
                let video = &videos[idx];
                TrailerRef {
                    site: video.site.clone(),
                    key: video.key.clone(),
                    official: video.official,
                }
            })
    }
}

#[async_trait]
impl DiscoveryProvider for TmdbClient {
    async fn search(&self, query: &str) -> AppResult<Vec<SearchCandidate>> {
        let response: SearchResponse = self
            .execute_get("/search/movie", &[("query", query)])
            .await?;

        let candidates = response
            .results
            .into_iter()
            .map(|result| SearchCandidate {
                id: result.id,
                title: result.title,
                poster_thumb_url: result
                    .poster_path
                    .map(|path| format!("{}{}", POSTER_THUMB_BASE, path)),
                release_date: result.release_date.filter(|d| !d.is_empty()),
            })
            .collect();

        Ok(candidates)
    }

    async fn resolve_imdb_id(&self, candidate_id: i64) -> AppResult<Option<String>> {
        let response: ExternalIdsResponse = self
            .execute_get(&format!("/movie/{}/external_ids", candidate_id), &[])
            .await?;

        Ok(response.imdb_id.filter(|id| !id.is_empty()))
    }

    async fn find_trailer(&self, candidate_id: i64) -> AppResult<Option<TrailerRef>> {
        let response: VideosResponse = self
            .execute_get(&format!("/movie/{}/videos", candidate_id), &[])
            .await?;

        Ok(Self::select_trailer(response.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(site: &str, key: &str, official: bool, video_type: &str) -> VideoResult {
        VideoResult {
            site: site.to_string(),
            key: key.to_string(),
            official,
            video_type: video_type.to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = TmdbClient::new("test_key".to_string()).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_select_trailer_prefers_official_youtube() {
        let videos = vec![
            video("YouTube", "fan-cut", false, "Trailer"),
            video("Vimeo", "vimeo-official", true, "Trailer"),
            video("YouTube", "official-cut", true, "Trailer"),
        ];

        let trailer = TmdbClient::select_trailer(videos).unwrap();
        assert_eq!(trailer.key, "official-cut");
        assert!(trailer.official);
    }

    #[test]
    fn test_select_trailer_ignores_non_trailers() {
        let videos = vec![
            video("YouTube", "behind-the-scenes", true, "Featurette"),
            video("YouTube", "clip", true, "Clip"),
        ];

        assert!(TmdbClient::select_trailer(videos).is_none());
    }

    #[test]
    fn test_select_trailer_falls_back_to_any_site() {
        let videos = vec![video("Vimeo", "only-one", false, "Trailer")];

        let trailer = TmdbClient::select_trailer(videos).unwrap();
        assert_eq!(trailer.site, "Vimeo");
    }

    #[test]
    fn test_search_response_deserializes() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 603, "title": "The Matrix", "poster_path": "/abc.jpg", "release_date": "1999-03-30"},
                {"id": 604, "title": "The Matrix Reloaded", "poster_path": null, "release_date": ""}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].id, 603);
        assert!(response.results[1].poster_path.is_none());
    }
}
