//! The curation engine: filtering, genre resolution, and the
//! fetch → dedupe → filter → shuffle → pin pipeline with its write-back.

pub mod engine;
pub mod filter;
pub mod genres;

pub use engine::{curate, sync_playlist, SyncReport};
pub use filter::FilterEngine;
pub use genres::{resolve_genres, GenreMap};
