// src/events/mod.rs
//
// Event system: synchronous typed pub/sub

pub mod bus;
pub mod resolution_events;
pub mod types;

pub use bus::EventBus;

pub use types::{
    CategoryCreated, CategoryDeleted, DomainEvent, LibraryCleared, MovieDeleted, MovieTagged,
    StatusToggled,
};

pub use resolution_events::{MovieResolved, ResolutionBatchCompleted, ResolutionFailed};

use std::sync::Arc;

/// Create a shared event bus
pub fn create_event_bus() -> Arc<EventBus> {
    Arc::new(EventBus::new())
}
