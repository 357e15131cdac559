use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-movie user flags, created lazily on the first toggle.
///
/// A movie with no UserStatus row is treated as not-favorite and
/// not-watched everywhere; absence and all-false are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    /// Movie these flags belong to
    pub imdb_id: String,

    pub is_favorite: bool,

    pub is_watched: bool,

    /// Last toggle timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserStatus {
    /// Create a fresh status with both flags unset
    pub fn new(imdb_id: String) -> Self {
        Self {
            imdb_id,
            is_favorite: false,
            is_watched: false,
            updated_at: Utc::now(),
        }
    }

    pub fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
        self.updated_at = Utc::now();
    }

    pub fn toggle_watched(&mut self) {
        self.is_watched = !self.is_watched;
        self.updated_at = Utc::now();
    }
}
