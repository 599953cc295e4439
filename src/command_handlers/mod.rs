pub mod dispatch;
pub mod generate;
pub mod install;
pub mod resolve;

use crate::metadata::ReleaseMetadataStore;
use anyhow::Result;
use std::path::Path;

/// The built-in release metadata, or a document written by `generate-meta`.
fn metadata_store(path: Option<&str>) -> Result<&'static ReleaseMetadataStore> {
    match path {
        None => Ok(ReleaseMetadataStore::embedded()?),
        Some(p) => {
            let store = ReleaseMetadataStore::load(Path::new(p))?;
            tracing::debug!(path = p, platforms = store.platforms().count(), "loaded release metadata");
            // one store per process
            Ok(Box::leak(Box::new(store)))
        }
    }
}
