//! Display configuration store.
//!
//! Every read is merged onto the defaults, so the returned document always
//! carries every default key. Reads never fail: a missing document is
//! initialised with the defaults and an unreadable one falls back to them.

use std::sync::Arc;

use serde_json::{Map, Value};
use signage_core::display_config::{default_document, merge_onto_defaults, shallow_merge};
use tokio::sync::Mutex;

use crate::document::DocumentStore;
use crate::error::StoreError;

pub struct ConfigStore {
    doc: Arc<dyn DocumentStore>,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(doc: Arc<dyn DocumentStore>) -> Self {
        Self {
            doc,
            write_lock: Mutex::new(()),
        }
    }

    /// Current configuration merged onto the defaults.
    pub async fn get(&self) -> Map<String, Value> {
        match self.doc.load().await {
            Ok(Some(Value::Object(map))) => merge_onto_defaults(map),
            Ok(Some(_)) => {
                tracing::error!("Configuration document is not a JSON object, using defaults");
                default_document()
            }
            Ok(None) => {
                let defaults = default_document();
                match self.doc.save(&Value::Object(defaults.clone())).await {
                    Ok(()) => tracing::info!("Configuration initialised with defaults"),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to write default configuration")
                    }
                }
                defaults
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration, using defaults");
                default_document()
            }
        }
    }

    /// Shallow-merge `partial` over the current configuration and persist.
    ///
    /// Values are stored as given. Returns the merged document.
    pub async fn set(&self, partial: Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let current = self.get().await;
        let merged = merge_onto_defaults(shallow_merge(current, partial));
        self.doc.save(&Value::Object(merged.clone())).await?;
        tracing::info!(keys = merged.len(), "Configuration updated");
        Ok(merged)
    }
}
