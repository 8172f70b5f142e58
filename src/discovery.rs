//! Directory discovery.
//!
//! Finds template files below a base directory and builds one module per
//! directory that contains any.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::component::{parse_dir, Component, ModuleOptions};
use crate::error::CompileError;

/// The compiled templates of one directory.
#[derive(Debug, Clone)]
pub struct Module {
    /// Directory name.
    pub name: String,
    pub dir: PathBuf,
    /// Components in dependency order.
    pub components: Vec<Component>,
}

/// Template basenames grouped by parent directory, both sorted.
pub fn discover(
    base: &Path,
    options: &ModuleOptions,
) -> Result<BTreeMap<PathBuf, Vec<String>>, CompileError> {
    let mut found: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for entry in WalkDir::new(base).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(options.extension.as_str()) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping template with a non UTF-8 name");
            continue;
        };
        let dir = path.parent().unwrap_or(base).to_path_buf();
        found.entry(dir).or_default().push(file_name.to_string());
    }

    for names in found.values_mut() {
        names.sort();
    }
    debug!(base = %base.display(), dirs = found.len(), "discovered templates");
    Ok(found)
}

/// Discover and build every module below `base`, in directory order.
pub fn parse_tree(base: &Path, options: &ModuleOptions) -> Result<Vec<Module>, CompileError> {
    let mut modules = Vec::new();
    for (dir, names) in discover(base, options)? {
        let components = parse_dir(&dir, &names, options)?;
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        modules.push(Module {
            name,
            dir,
            components,
        });
    }
    Ok(modules)
}
