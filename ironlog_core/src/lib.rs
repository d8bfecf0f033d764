#![forbid(unsafe_code)]

//! Core domain model and business logic for the Ironlog strength tracker.
//!
//! This crate provides:
//! - Domain types (exercises, plans, sessions, sets)
//! - The three domain services (catalog, plan composer, session tracker)
//! - Tonnage computation
//! - Persistence (arena-backed JSON store with atomic commits)
//! - Session history export

pub mod types;
pub mod error;
pub mod store;
pub mod config;
pub mod logging;
pub mod tonnage;
pub mod exercises;
pub mod plans;
pub mod sessions;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use store::{Store, StoreData};
pub use config::Config;
pub use tonnage::{effective_weight, session_tonnage};
pub use plans::{PlanDetail, PlanExerciseDetail};
pub use sessions::SessionDetail;
pub use export::write_history_csv;
