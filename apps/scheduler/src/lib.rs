//! Mixtape: scheduled playlist curation
//!
//! Periodically regenerates user-defined playlists by combining tracks from
//! source playlists according to a weighted recipe, filtering out banned
//! content, shuffling, and writing the result back through the catalog API.

pub mod config;
pub mod curation;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod store;

pub use config::Config;
pub use error::{JobError, JobResult};
pub use scheduler::{JobOutcome, Scheduler, TickOutcome, TickReport};
