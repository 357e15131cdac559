use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compressed poster image for a movie, at most one per imdb id.
///
/// Bytes are stored re-encoded at reduced quality; the original provider
/// URL is kept for reference only and is never re-fetched once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poster {
    /// Movie this poster belongs to
    pub imdb_id: String,

    /// Movie title at time of fetch (denormalized for display)
    pub title: String,

    /// URL the image was fetched from
    pub source_url: String,

    /// Content type of the stored bytes
    pub mime: String,

    /// Re-encoded image bytes; base64 across the serialization boundary
    #[serde(with = "base64_bytes")]
    pub image_bytes: Vec<u8>,

    /// Creation timestamp in our database
    pub created_at: DateTime<Utc>,
}

impl Poster {
    /// Create a new Poster
    pub fn new(
        imdb_id: String,
        title: String,
        source_url: String,
        mime: String,
        image_bytes: Vec<u8>,
    ) -> Self {
        Self {
            imdb_id,
            title,
            source_url,
            mime,
            image_bytes,
            created_at: Utc::now(),
        }
    }

    /// Data URL for direct display in a UI image element
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.image_bytes))
    }
}

mod base64_bytes {
    use super::{Engine, STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_serde_round_trip() {
        let poster = Poster::new(
            "tt0133093".to_string(),
            "The Matrix".to_string(),
            "http://img.example/poster.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![0xFF, 0xD8, 0xFF, 0xE0],
        );

        let json = serde_json::to_string(&poster).unwrap();
        let back: Poster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, poster);
    }

    #[test]
    fn test_data_url_carries_mime() {
        let poster = Poster::new(
            "tt0133093".to_string(),
            "The Matrix".to_string(),
            "http://img.example/poster.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![1, 2, 3],
        );
        assert!(poster.data_url().starts_with("data:image/jpeg;base64,"));
    }
}
