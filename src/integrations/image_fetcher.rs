// src/integrations/image_fetcher.rs
//
// HTTP poster download

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::integrations::{FetchedImage, ImageFetcher};

/// Fallback when the server omits or mangles the content type;
/// provider posters are JPEGs in practice.
const DEFAULT_MIME: &str = "image/jpeg";

/// Downloads images over HTTP, reporting the declared content type.
pub struct HttpImageFetcher {
    http_client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> AppResult<FetchedImage> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "image fetch returned status {} for {}",
                response.status(),
                url
            )));
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_MIME)
            .to_string();

        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedImage { bytes, mime })
    }
}
