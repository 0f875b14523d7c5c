//! Flat-file persistence for the signage server.
//!
//! File metadata and the display configuration live in JSON documents
//! behind the [`DocumentStore`] seam; uploaded assets, previews, the logo
//! and widget images live in directories described by [`StorageLayout`].

pub mod assets;
pub mod config;
pub mod document;
pub mod error;
pub mod files;
pub mod layout;

pub use assets::AssetStore;
pub use config::ConfigStore;
pub use document::{DocumentStore, JsonFileDocument, MemoryDocument};
pub use error::StoreError;
pub use files::FileStore;
pub use layout::{remove_file_if_exists, StorageLayout};
