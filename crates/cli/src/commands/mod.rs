pub mod chat;
pub mod config_cmd;
pub mod schemes;

use sahayak_config::AppConfig;
use sahayak_tools::SchemeCatalog;
use std::path::Path;

/// The configured catalog, or the built-in one when no path is set.
pub fn load_catalog(config: &AppConfig) -> Result<SchemeCatalog, Box<dyn std::error::Error>> {
    match &config.tools.catalog_path {
        Some(path) => {
            let catalog = SchemeCatalog::from_json_file(Path::new(path))?;
            tracing::info!(path = %path, schemes = catalog.len(), "Loaded scheme catalog");
            Ok(catalog)
        }
        None => Ok(SchemeCatalog::builtin()),
    }
}
