// src/events/types.rs
//
// Library-level domain events.
// Each event represents an immutable fact that has already occurred.
//
// RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// LIBRARY EVENTS
// ============================================================================

/// Emitted when a movie and its dependent records are deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub imdb_id: String,
}

impl MovieDeleted {
    pub fn new(imdb_id: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            imdb_id,
        }
    }
}

impl DomainEvent for MovieDeleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MovieDeleted"
    }
}

/// Emitted after a full library clear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,

    /// Whether user categories were removed along with the movies
    pub categories_removed: bool,
}

impl LibraryCleared {
    pub fn new(categories_removed: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            categories_removed,
        }
    }
}

impl DomainEvent for LibraryCleared {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "LibraryCleared"
    }
}

/// Emitted when a favorite or watched flag changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusToggled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub imdb_id: String,

    /// "favorite" or "watched"
    pub flag: String,
    pub value: bool,
}

impl StatusToggled {
    pub fn new(imdb_id: String, flag: &str, value: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            imdb_id,
            flag: flag.to_string(),
            value,
        }
    }
}

impl DomainEvent for StatusToggled {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "StatusToggled"
    }
}

// ============================================================================
// CATEGORY EVENTS
// ============================================================================

/// Emitted when a category is created (system bootstrap included)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub name: String,
    pub is_system: bool,
}

impl CategoryCreated {
    pub fn new(category_id: Uuid, name: String, is_system: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            category_id,
            name,
            is_system,
        }
    }
}

impl DomainEvent for CategoryCreated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CategoryCreated"
    }
}

/// Emitted when a user category is deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Uuid,
}

impl CategoryDeleted {
    pub fn new(category_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            category_id,
        }
    }
}

impl DomainEvent for CategoryDeleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CategoryDeleted"
    }
}

/// Emitted when a movie is tagged into a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieTagged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub imdb_id: String,
    pub category_id: Uuid,
}

impl MovieTagged {
    pub fn new(imdb_id: String, category_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            imdb_id,
            category_id,
        }
    }
}

impl DomainEvent for MovieTagged {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MovieTagged"
    }
}
