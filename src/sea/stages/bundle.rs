//! Bundler invoker: folds the entry point and node_modules into one file.

use super::{EntryPoint, StageContext};
use crate::sea::builder::tool_detection::{ESBUILD, ensure_tool};
use crate::sea::runner::ToolRunner;
use crate::sea::{Error, ErrorExt, Result};
use std::path::PathBuf;

/// Result of the bundling stage.
#[derive(Debug)]
pub struct BundleOutcome {
    /// Entry point for the blob stage (the bundle when one was produced)
    pub entry: EntryPoint,
    /// Bundle file written by this run, if any
    pub bundle_file: Option<PathBuf>,
}

impl BundleOutcome {
    fn unchanged(entry: EntryPoint) -> Self {
        Self {
            entry,
            bundle_file: None,
        }
    }
}

/// Bundles `entry` with esbuild unless skipped or there is nothing to bundle.
///
/// The bundle keeps the entry's stem (`app.js` -> `.node2exe/build/app.cjs`)
/// so the output executable is named the same either way.
///
/// # Errors
///
/// [`Error::ToolInstall`] if esbuild cannot be installed, [`Error::Bundle`]
/// if it fails.
pub async fn bundle_dependencies<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    entry: EntryPoint,
    has_dependency_tree: bool,
) -> Result<BundleOutcome> {
    if ctx.config.skip_bundling(ctx.manifest) {
        log::info!("Bundling disabled, using {} as is", entry);
        return Ok(BundleOutcome::unchanged(entry));
    }

    if !has_dependency_tree {
        log::info!("No node_modules directory, nothing to bundle");
        return Ok(BundleOutcome::unchanged(entry));
    }

    let esbuild = ensure_tool(ctx, &ESBUILD).await?;

    let build_dir = ctx.config.build_dir();
    tokio::fs::create_dir_all(&build_dir)
        .await
        .fs_context("creating build directory", &build_dir)?;

    let outfile = build_dir.join(format!("{}.cjs", entry.stem()));
    let bundled = EntryPoint::new(ctx.root(), &outfile)?;

    let command = ctx.command(esbuild).args([
        entry.descriptor_value(),
        "--bundle".to_string(),
        "--platform=node".to_string(),
        "--format=cjs".to_string(),
        "--log-level=warning".to_string(),
        format!("--outfile={}", bundled.descriptor_value()),
    ]);
    let output = ctx.runner.run(&command).await?;

    if !output.success() {
        return Err(Error::Bundle {
            detail: output.diagnostic(),
        });
    }

    bundled.verify().map_err(|_| Error::Bundle {
        detail: format!("esbuild reported success but {} was not written", outfile.display()),
    })?;

    log::info!("Bundled {} into {}", entry, bundled);
    Ok(BundleOutcome {
        entry: bundled,
        bundle_file: Some(outfile),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProjectManifest;
    use crate::sea::testing::FakeRunner;
    use crate::sea::{PipelineConfig, PipelineConfigBuilder, Platform};
    use std::path::Path;

    fn setup(skip: bool) -> (tempfile::TempDir, PipelineConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "require('left-pad')").unwrap();
        let config = PipelineConfigBuilder::new()
            .project_root(dir.path())
            .platform(Platform::Linux)
            .skip_bundling(skip)
            .build()
            .unwrap();
        (dir, config)
    }

    #[tokio::test]
    async fn no_dependency_tree_means_no_processes() {
        let (dir, config) = setup(false);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::Linux);
        let ctx = StageContext::new(&config, &manifest, &runner);
        let entry = EntryPoint::new(dir.path(), Path::new("app.js")).unwrap();

        let outcome = bundle_dependencies(&ctx, entry.clone(), false).await.unwrap();

        assert_eq!(outcome.entry, entry);
        assert!(outcome.bundle_file.is_none());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn skip_flag_bypasses_tool_check_even_with_dependencies() {
        let (dir, config) = setup(true);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::Linux);
        let ctx = StageContext::new(&config, &manifest, &runner);
        let entry = EntryPoint::new(dir.path(), Path::new("app.js")).unwrap();

        let outcome = bundle_dependencies(&ctx, entry.clone(), true).await.unwrap();

        assert_eq!(outcome.entry, entry);
        assert!(runner.calls().is_empty());
        assert!(!config.tool_dir().exists());
    }

    #[tokio::test]
    async fn bundles_into_build_dir_keeping_stem() {
        let (dir, config) = setup(false);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::Linux);
        let ctx = StageContext::new(&config, &manifest, &runner);
        let entry = EntryPoint::new(dir.path(), Path::new("app.js")).unwrap();

        let outcome = bundle_dependencies(&ctx, entry, true).await.unwrap();

        assert_eq!(outcome.entry.descriptor_value(), ".node2exe/build/app.cjs");
        assert_eq!(outcome.entry.stem(), "app");
        assert_eq!(
            outcome.bundle_file.as_deref(),
            Some(dir.path().join(".node2exe/build/app.cjs").as_path())
        );

        let esbuild = runner.calls_to("esbuild");
        assert_eq!(esbuild.len(), 1);
        assert_eq!(esbuild[0].args[0], "app.js");
        assert!(esbuild[0].args.contains(&"--platform=node".to_string()));
        assert_eq!(runner.calls_to("npm").len(), 1);
    }

    #[tokio::test]
    async fn esbuild_failure_is_bundle_error() {
        let (dir, config) = setup(false);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::Linux).fail(
            "esbuild",
            1,
            "Could not resolve \"left-pad\"",
        );
        let ctx = StageContext::new(&config, &manifest, &runner);
        let entry = EntryPoint::new(dir.path(), Path::new("app.js")).unwrap();

        let err = bundle_dependencies(&ctx, entry, true).await.unwrap_err();
        assert!(matches!(err, Error::Bundle { ref detail } if detail.contains("left-pad")));
    }
}
