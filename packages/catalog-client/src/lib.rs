//! Catalog/playlist API client for Mixtape
//!
//! This crate provides the narrow collaborator interface the curation core
//! uses to talk to the external catalog, plus the production HTTP
//! implementation:
//! - Source playlist track fetches (paginated)
//! - Batched artist genre lookups
//! - Target playlist clear / batched add / description update
//!
//! # Example
//!
//! ```rust,no_run
//! use mixtape_catalog_client::{Catalog, CatalogClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new("https://api.example.com/v1")?;
//!
//! let tracks = client.playlist_tracks("token", "playlist_id", 25).await?;
//! for track in tracks {
//!     println!("{}", track.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! All operations take the owning user's bearer token, so one client serves
//! every scheduled job.

mod api;
mod client;
mod error;
mod models;

pub use api::{Catalog, MAX_ADD_IDS, MAX_ARTIST_IDS};
pub use client::CatalogClient;
pub use error::{CatalogError, CatalogResult};
pub use models::{AudioFeatures, Track};
