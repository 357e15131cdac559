use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined tag for movies.
///
/// Categories are purely organizational and never affect movie records.
/// Names are unique case-insensitively. The two system categories are
/// created at startup and protected from rename and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Category name (case-insensitively unique)
    pub name: String,

    /// System categories survive the delete-categories option of a
    /// library clear and cannot be renamed or deleted
    pub is_system: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user category
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_system: false,
            created_at: Utc::now(),
        }
    }

    /// Create a protected system category
    pub fn system(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_system: true,
            created_at: Utc::now(),
        }
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
