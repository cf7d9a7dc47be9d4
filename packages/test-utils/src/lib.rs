//! Shared test utilities for the Mixtape workspace
//!
//! This crate provides a mock catalog API server for testing without
//! network dependencies, usable across the client and scheduler test suites.
//!
//! # Example
//!
//! ```rust,ignore
//! use mixtape_test_utils::{MockCatalogServer, TrackFixture};
//!
//! #[tokio::test]
//! async fn test_with_mock_catalog() {
//!     let catalog = MockCatalogServer::start().await;
//!     catalog
//!         .mock_playlist_tracks("source", vec![TrackFixture::new("t1", "Song")])
//!         .await;
//!
//!     // Use catalog.url() to configure your client
//! }
//! ```

mod catalog;

pub use catalog::{MockCatalogServer, TrackFixture};
