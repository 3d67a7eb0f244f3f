//! Command implementations for the Sprout CLI

pub mod completions;
pub mod eject;
pub mod generate;
pub mod inject;
pub mod install;
pub mod status;
pub mod version;

use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::paths;

/// Open the catalog from the CLI override or the default location.
pub fn open_catalog(catalog: Option<PathBuf>) -> Result<Catalog> {
    let dir = catalog.unwrap_or_else(paths::default_catalog_dir);
    Catalog::open(dir)
}

/// Build a shell manager with every catalog component registered.
pub fn shell_manager(
    catalog: &Catalog,
    platform: &crate::platform::Platform,
    dry_run: bool,
) -> Result<crate::shell::Manager> {
    let config = crate::shell::ShellConfig::new(&platform.os, dry_run);
    let mut manager = crate::shell::Manager::new(config);

    if let Some(scaffold) = catalog.scaffold()? {
        manager.set_scaffold(scaffold);
    }

    for name in catalog.component_names() {
        let spec = catalog.load(&name)?;
        manager.register_component(crate::shell::Component::from(&spec));
        manager.register_component_files(&name, spec.files);
    }

    Ok(manager)
}
