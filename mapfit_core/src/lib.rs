#![forbid(unsafe_code)]

//! Core domain model and orchestration for the Mapfit workout tracker.
//!
//! This crate provides:
//! - Domain types (workouts, coordinates, derived metrics)
//! - The ordered workout store and its persistence round-trip
//! - Capability surfaces for the map, geolocation, list and blob store
//! - The form state machine and the application orchestrator

pub mod types;
pub mod error;
pub mod blob;
pub mod store;
pub mod map;
pub mod form;
pub mod app;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use store::{WorkoutStore, STORAGE_KEY};
pub use map::{GeolocationProvider, MapController, MapSurface, DEFAULT_ZOOM};
pub use form::{FormState, WorkoutFormController, WorkoutRequest};
pub use app::{AppController, WorkoutListView};
pub use config::Config;
