// src/services/poster_service.rs
//
// Poster pipeline: fetch, compress, persist
//
// Posters are fetched once per movie, re-encoded as reduced-quality
// JPEG, and stored keyed by imdb id. A decode or fetch failure rejects
// that poster only; the caller treats it as a per-item error.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::sync::Arc;

use crate::domain::movie::Movie;
use crate::domain::poster::Poster;
use crate::error::AppResult;
use crate::integrations::ImageFetcher;
use crate::repositories::PosterRepository;

/// Fixed re-encode quality for stored posters
const JPEG_QUALITY: u8 = 60;

pub struct PosterService {
    poster_repo: Arc<dyn PosterRepository>,
    image_fetcher: Arc<dyn ImageFetcher>,
}

impl PosterService {
    pub fn new(
        poster_repo: Arc<dyn PosterRepository>,
        image_fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            poster_repo,
            image_fetcher,
        }
    }

    /// Fetch, compress and store the poster for a movie, unless one is
    /// already stored or the movie carries no poster reference.
    ///
    /// Returns true when a new poster was stored.
    pub async fn ensure_poster(&self, movie: &Movie) -> AppResult<bool> {
        if !movie.has_poster_ref() {
            return Ok(false);
        }

        if self.poster_repo.exists(&movie.imdb_id)? {
            return Ok(false);
        }

        let fetched = self.image_fetcher.fetch(&movie.poster_url).await?;
        let (image_bytes, mime) = compress_image(&fetched.bytes)?;

        log::debug!(
            "poster for {}: {} bytes fetched, {} stored",
            movie.imdb_id,
            fetched.bytes.len(),
            image_bytes.len()
        );

        let poster = Poster::new(
            movie.imdb_id.clone(),
            movie.title.clone(),
            movie.poster_url.clone(),
            mime,
            image_bytes,
        );
        self.poster_repo.save(&poster)?;

        Ok(true)
    }
}

/// Decode raw image bytes and re-encode as reduced-quality JPEG.
///
/// Alpha is dropped in the conversion; JPEG has no transparency.
pub fn compress_image(bytes: &[u8]) -> AppResult<(Vec<u8>, String)> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder.encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;

    Ok((out, "image/jpeg".to_string()))
}
