//! Environment prober: manifest, entry point and dependency tree.
//!
//! Read-only. Nothing is written and no process is spawned here, so a
//! missing or broken manifest fails the run before any side effect.

use super::EntryPoint;
use crate::metadata::{self, ProjectManifest};
use crate::sea::{Error, PipelineConfig, Platform, Result};
use std::path::Path;

/// Conventional entry files, probed in order when `main` is not declared.
pub const CONVENTIONAL_ENTRIES: [&str; 2] = ["app.js", "index.js"];

/// Dependency tree directory whose presence triggers bundling.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// What the prober found.
#[derive(Debug)]
pub struct ProbeReport {
    /// Target platform
    pub platform: Platform,
    /// Parsed manifest
    pub manifest: ProjectManifest,
    /// Resolved entry point
    pub entry: EntryPoint,
    /// `node_modules/` exists at the project root
    pub has_dependency_tree: bool,
}

/// Probes the project described by `config`.
///
/// # Errors
///
/// [`Error::ManifestMissing`], [`Error::ManifestParse`] or
/// [`Error::EntryPointMissing`].
pub fn probe(config: &PipelineConfig) -> Result<ProbeReport> {
    let root = config.project_root();
    let manifest = metadata::load_manifest(root)?;
    let entry = resolve_entry_point(root, &manifest)?;
    let has_dependency_tree = has_dependency_tree(root);

    log::info!(
        "Probed {}: platform {}, entry {}, dependency tree {}",
        root.display(),
        config.platform(),
        entry,
        if has_dependency_tree { "present" } else { "absent" }
    );

    Ok(ProbeReport {
        platform: config.platform(),
        manifest,
        entry,
        has_dependency_tree,
    })
}

/// Whether the project has a dependency tree to bundle.
pub fn has_dependency_tree(root: &Path) -> bool {
    root.join(DEPENDENCY_DIR).is_dir()
}

/// Resolves the entry point: declared `main` first, then conventional names.
///
/// A declared `main` must exist (node's implicit `.js` extension is
/// honoured); it never falls back to the conventional names.
pub fn resolve_entry_point(root: &Path, manifest: &ProjectManifest) -> Result<EntryPoint> {
    if let Some(main) = &manifest.main {
        let declared = EntryPoint::new(root, Path::new(main))?;
        if declared.verify().is_ok() {
            return Ok(declared);
        }

        if Path::new(main).extension().is_none() {
            let with_ext = EntryPoint::new(root, Path::new(&format!("{main}.js")))?;
            if with_ext.verify().is_ok() {
                return Ok(with_ext);
            }
        }

        return Err(Error::EntryPointMissing {
            reason: format!(
                "package.json declares \"main\": \"{}\" but {} does not exist",
                main,
                declared.path().display()
            ),
        });
    }

    CONVENTIONAL_ENTRIES
        .iter()
        .filter_map(|name| EntryPoint::new(root, Path::new(name)).ok())
        .find(|entry| entry.verify().is_ok())
        .ok_or_else(|| Error::EntryPointMissing {
            reason: format!(
                "no \"main\" in package.json and none of {} found in {}",
                CONVENTIONAL_ENTRIES.join(", "),
                root.display()
            ),
        })
}
