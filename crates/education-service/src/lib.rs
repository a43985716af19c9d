//! Education Service
//!
//! Composition layer over the education engines. Owns one instance of every
//! engine, wraps results in the success envelope, and forwards a projection
//! of each result to a [`ResultStore`].

pub mod config;
pub mod requests;
pub mod service;
pub mod store;

pub use config::EducationConfig;
pub use requests::*;
pub use service::{EducationService, EducationSummary, ProgressLookup, StreakOutcome};
pub use store::{NoopStore, ResultStore, SqliteResultStore, Table};
