use std::sync::Arc;

use signage_core::pdf::PageRasterizer;
use signage_store::{AssetStore, ConfigStore, FileStore, JsonFileDocument, StorageLayout};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Directory layout for uploads, previews and static assets.
    pub layout: Arc<StorageLayout>,
    /// Uploaded-file metadata (slideshow order).
    pub files: Arc<FileStore>,
    /// Display configuration document.
    pub display_config: Arc<ConfigStore>,
    /// Logo and widget images.
    pub assets: Arc<AssetStore>,
    /// First-page PDF renderer.
    pub rasterizer: Arc<dyn PageRasterizer>,
}

impl AppState {
    /// Wire the stores onto the JSON documents described by `layout`.
    pub fn new(
        config: ServerConfig,
        layout: StorageLayout,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Self {
        let files = FileStore::new(Arc::new(JsonFileDocument::new(&layout.metadata_file)));
        let display_config =
            ConfigStore::new(Arc::new(JsonFileDocument::new(&layout.config_file)));
        let assets = AssetStore::new(&layout);

        Self {
            config: Arc::new(config),
            layout: Arc::new(layout),
            files: Arc::new(files),
            display_config: Arc::new(display_config),
            assets: Arc::new(assets),
            rasterizer,
        }
    }
}
