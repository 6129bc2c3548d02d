//! Binary composer: names the output, copies the runtime, injects the blob.
//!
//! On macOS the caller strips the signature between [`copy_runtime`] and
//! [`inject_blob`], and re-signs afterwards.

use super::{EntryPoint, StageContext};
use crate::sea::builder::report::PipelineWarning;
use crate::sea::builder::tool_detection::{NodeRuntime, POSTJECT, ensure_tool};
use crate::sea::runner::ToolRunner;
use crate::sea::utils::fs;
use crate::sea::{Error, Platform, Result};
use std::path::{Path, PathBuf};

/// Resource name the runtime looks up at startup.
pub const SEA_RESOURCE_NAME: &str = "NODE_SEA_BLOB";

/// Fuse the injector flips so the runtime knows a blob is present.
pub const SEA_SENTINEL_FUSE: &str = "NODE_SEA_FUSE_fce680ab2cc467b6e072b8b5df1996b2";

/// The executable being produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputArtifact {
    /// File name
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
}

/// `{base}-{version}{suffix}` with a version, `{base}{suffix}` without.
///
/// The version goes before the extension: `app-2.1.0.exe`.
pub fn output_artifact_name(base: &str, platform: Platform, version: Option<&str>) -> String {
    let suffix = platform.capabilities().exec_suffix;
    match version {
        Some(version) => format!("{base}-{version}{suffix}"),
        None => format!("{base}{suffix}"),
    }
}

/// Derives the output artifact for `entry`, recording naming warnings.
pub fn derive_output_artifact<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    entry: &EntryPoint,
    warnings: &mut Vec<PipelineWarning>,
) -> OutputArtifact {
    let version = if ctx.config.include_version_in_name() {
        match ctx.manifest.version.as_deref() {
            Some(version) => {
                if semver::Version::parse(version).is_err() {
                    log::warn!("Version \"{}\" is not valid semver, using it as is", version);
                    warnings.push(PipelineWarning::NonSemverVersion {
                        version: version.to_string(),
                    });
                }
                Some(version)
            }
            None => {
                log::warn!("--version requested but package.json declares no version");
                warnings.push(PipelineWarning::VersionUnavailable);
                None
            }
        }
    } else {
        None
    };

    let name = output_artifact_name(&entry.stem(), ctx.platform(), version);
    OutputArtifact {
        path: ctx.root().join(&name),
        name,
    }
}

/// Fails if the output would land on one of the project's `inputs`.
///
/// [`copy_runtime`] replaces whatever is at the output path. On Linux and
/// macOS an extensionless entry at the root (`"main": "server"`) would
/// otherwise be overwritten.
///
/// # Errors
///
/// [`Error::OutputConflict`] naming the input that would be overwritten.
pub fn check_output_path(artifact: &OutputArtifact, inputs: &[(&'static str, &Path)]) -> Result<()> {
    for &(input, path) in inputs {
        if path == artifact.path {
            return Err(Error::OutputConflict {
                path: artifact.path.clone(),
                input,
            });
        }
    }
    Ok(())
}

/// Copies the runtime binary to the output path.
///
/// # Errors
///
/// [`Error::BinaryCopy`]; not retried.
pub async fn copy_runtime(runtime: &NodeRuntime, artifact: &OutputArtifact) -> Result<u64> {
    let bytes = fs::copy_file(&runtime.exec_path, &artifact.path)
        .await
        .map_err(|source| Error::BinaryCopy {
            from: runtime.exec_path.clone(),
            to: artifact.path.clone(),
            source,
        })?;
    log::info!(
        "Copied {} ({} bytes) to {}",
        runtime.exec_path.display(),
        bytes,
        artifact.path.display()
    );
    Ok(bytes)
}

/// Embeds the blob into the output with postject.
///
/// # Errors
///
/// [`Error::ToolInstall`] if postject cannot be installed,
/// [`Error::BlobInjection`] if it fails. The partially written output is
/// left on disk.
pub async fn inject_blob<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    artifact: &OutputArtifact,
    blob_file: &Path,
) -> Result<()> {
    let postject = ensure_tool(ctx, &POSTJECT).await?;

    let blob_arg = blob_file
        .strip_prefix(ctx.root())
        .unwrap_or(blob_file)
        .display()
        .to_string();

    let command = ctx
        .command(postject)
        .args([
            artifact.name.clone(),
            SEA_RESOURCE_NAME.to_string(),
            blob_arg,
            "--sentinel-fuse".to_string(),
            SEA_SENTINEL_FUSE.to_string(),
        ])
        .args(ctx.platform().capabilities().injector_extra_args.iter().copied());
    let output = ctx.runner.run(&command).await?;

    if !output.success() {
        return Err(Error::BlobInjection {
            detail: output.diagnostic(),
        });
    }

    log::info!("Injected {} into {}", blob_file.display(), artifact.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProjectManifest;
    use crate::sea::testing::FakeRunner;
    use crate::sea::{PipelineConfig, PipelineConfigBuilder};

    fn config(root: &Path, platform: Platform, versioned: bool) -> PipelineConfig {
        PipelineConfigBuilder::new()
            .project_root(root)
            .platform(platform)
            .include_version_in_name(versioned)
            .build()
            .unwrap()
    }

    #[test]
    fn names_follow_base_version_suffix() {
        assert_eq!(output_artifact_name("app", Platform::Windows, Some("2.1.0")), "app-2.1.0.exe");
        assert_eq!(output_artifact_name("app", Platform::Windows, None), "app.exe");
        assert_eq!(output_artifact_name("app", Platform::Linux, Some("2.1.0")), "app-2.1.0");
        assert_eq!(output_artifact_name("index", Platform::MacOs, None), "index");
    }

    #[test]
    fn version_flag_without_manifest_version_warns() {
        let root = Path::new("/work/app");
        let config = config(root, Platform::Windows, true);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::Windows);
        let ctx = StageContext::new(&config, &manifest, &runner);
        let mut warnings = Vec::new();

        let artifact =
            derive_output_artifact(&ctx, &EntryPoint::new(root, Path::new("app.js")).unwrap(), &mut warnings);

        assert_eq!(artifact.name, "app.exe");
        assert_eq!(warnings, [PipelineWarning::VersionUnavailable]);
    }

    #[test]
    fn version_is_ignored_without_flag() {
        let root = Path::new("/work/app");
        let config = config(root, Platform::Linux, false);
        let manifest = ProjectManifest {
            version: Some("2.1.0".into()),
            ..Default::default()
        };
        let runner = FakeRunner::new(Path::new("node"), Platform::Linux);
        let ctx = StageContext::new(&config, &manifest, &runner);
        let mut warnings = Vec::new();

        let artifact =
            derive_output_artifact(&ctx, &EntryPoint::new(root, Path::new("app.js")).unwrap(), &mut warnings);

        assert_eq!(artifact.name, "app");
        assert_eq!(artifact.path, root.join("app"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn output_on_an_input_is_rejected() {
        let root = Path::new("/work/app");
        let artifact = OutputArtifact {
            name: "server".into(),
            path: root.join("server"),
        };
        let entry = root.join("server");
        let manifest = root.join("package.json");

        let err = check_output_path(
            &artifact,
            &[("manifest", manifest.as_path()), ("entry point", entry.as_path())],
        )
        .unwrap_err();
        assert!(matches!(err, Error::OutputConflict { input: "entry point", .. }));

        assert!(check_output_path(&artifact, &[("manifest", manifest.as_path())]).is_ok());
    }

    #[tokio::test]
    async fn macos_injection_adds_segment_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Platform::MacOs, false);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::MacOs);
        let ctx = StageContext::new(&config, &manifest, &runner);
        let artifact = OutputArtifact {
            name: "app".into(),
            path: dir.path().join("app"),
        };

        inject_blob(&ctx, &artifact, &dir.path().join("sea-prep.blob"))
            .await
            .unwrap();

        let postject = runner.calls_to("postject");
        assert_eq!(postject.len(), 1);
        assert_eq!(
            postject[0].args,
            [
                "app",
                SEA_RESOURCE_NAME,
                "sea-prep.blob",
                "--sentinel-fuse",
                SEA_SENTINEL_FUSE,
                "--macho-segment-name",
                "NODE_SEA",
            ]
        );
    }

    #[tokio::test]
    async fn injector_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), Platform::Linux, false);
        let manifest = ProjectManifest::default();
        let runner = FakeRunner::new(Path::new("node"), Platform::Linux).fail(
            "postject",
            1,
            "Error: Can't find string offset for section name",
        );
        let ctx = StageContext::new(&config, &manifest, &runner);
        let artifact = OutputArtifact {
            name: "app".into(),
            path: dir.path().join("app"),
        };

        let err = inject_blob(&ctx, &artifact, &dir.path().join("sea-prep.blob"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BlobInjection { .. }));
    }

    #[tokio::test]
    async fn unreadable_runtime_is_binary_copy_error() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = NodeRuntime {
            exec_path: dir.path().join("missing-node"),
            version: semver::Version::new(22, 0, 0),
        };
        let artifact = OutputArtifact {
            name: "app".into(),
            path: dir.path().join("app"),
        };

        let err = copy_runtime(&runtime, &artifact).await.unwrap_err();
        assert!(matches!(err, Error::BinaryCopy { .. }));
        assert!(!artifact.path.exists());
    }
}
