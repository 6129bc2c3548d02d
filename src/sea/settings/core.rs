//! Core PipelineConfig struct and implementations.

use super::Platform;
use crate::metadata::ProjectManifest;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the project root holding pipeline-owned state.
pub const WORK_DIR: &str = ".node2exe";

/// Default bounded wait for a single external tool invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(600);

/// Ad-hoc code signing identity.
pub const AD_HOC_IDENTITY: &str = "-";

/// Immutable configuration of one pipeline run.
///
/// Constructed via [`PipelineConfigBuilder`](super::PipelineConfigBuilder).
/// Values left unset here fall back to the `"node2exe"` section of
/// `package.json`, then to built-in defaults; the accessors taking a
/// [`ProjectManifest`] apply that precedence.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Absolute project root.
    project_root: PathBuf,

    /// Platform the executable is produced for.
    platform: Platform,

    /// Append the manifest version to the output name.
    include_version_in_name: bool,

    /// `--no-bundle` was given.
    skip_bundling: bool,

    /// Explicit Node.js binary, otherwise `node` on PATH.
    node: Option<PathBuf>,

    /// Where on-demand tools are installed.
    tool_dir: Option<PathBuf>,

    /// Per-invocation tool timeout override.
    tool_timeout: Option<Duration>,

    /// macOS signing identity override.
    signing_identity: Option<String>,
}

impl PipelineConfig {
    /// Returns the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the target platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether the output name carries the manifest version.
    pub fn include_version_in_name(&self) -> bool {
        self.include_version_in_name
    }

    /// Whether the bundling stage is skipped.
    ///
    /// `--no-bundle` always wins; otherwise `"node2exe": { "bundle": false }`
    /// in the manifest disables bundling.
    pub fn skip_bundling(&self, manifest: &ProjectManifest) -> bool {
        self.skip_bundling || manifest.packaging.bundle == Some(false)
    }

    /// Explicit Node.js binary, if one was configured.
    pub fn node(&self) -> Option<&Path> {
        self.node.as_deref()
    }

    /// Local tool installation directory.
    pub fn tool_dir(&self) -> PathBuf {
        self.tool_dir
            .clone()
            .unwrap_or_else(|| self.project_root.join(WORK_DIR).join("tools"))
    }

    /// Directory receiving the bundle artifact.
    pub fn build_dir(&self) -> PathBuf {
        self.project_root.join(WORK_DIR).join("build")
    }

    /// Effective tool timeout.
    pub fn tool_timeout(&self, manifest: &ProjectManifest) -> Duration {
        self.tool_timeout
            .or_else(|| manifest.packaging.tool_timeout_secs.map(Duration::from_secs))
            .unwrap_or(DEFAULT_TOOL_TIMEOUT)
    }

    /// Effective macOS signing identity.
    pub fn signing_identity<'a>(&'a self, manifest: &'a ProjectManifest) -> &'a str {
        self.signing_identity
            .as_deref()
            .or(manifest.packaging.signing_identity.as_deref())
            .unwrap_or(AD_HOC_IDENTITY)
    }

    /// Creates a new PipelineConfig (used by PipelineConfigBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        project_root: PathBuf,
        platform: Platform,
        include_version_in_name: bool,
        skip_bundling: bool,
        node: Option<PathBuf>,
        tool_dir: Option<PathBuf>,
        tool_timeout: Option<Duration>,
        signing_identity: Option<String>,
    ) -> Self {
        Self {
            project_root,
            platform,
            include_version_in_name,
            skip_bundling,
            node,
            tool_dir,
            tool_timeout,
            signing_identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PackagingSettings;
    use crate::sea::PipelineConfigBuilder;

    fn manifest(packaging: PackagingSettings) -> ProjectManifest {
        ProjectManifest {
            main: None,
            version: None,
            packaging,
        }
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = PipelineConfigBuilder::new()
            .project_root("/work/app")
            .platform(Platform::Linux)
            .build()
            .unwrap();
        let m = manifest(PackagingSettings::default());

        assert!(!config.skip_bundling(&m));
        assert_eq!(config.tool_timeout(&m), DEFAULT_TOOL_TIMEOUT);
        assert_eq!(config.signing_identity(&m), AD_HOC_IDENTITY);
        assert_eq!(config.tool_dir(), Path::new("/work/app/.node2exe/tools"));
    }

    #[test]
    fn manifest_settings_fill_unset_values() {
        let config = PipelineConfigBuilder::new()
            .project_root("/work/app")
            .platform(Platform::MacOs)
            .build()
            .unwrap();
        let m = manifest(PackagingSettings {
            bundle: Some(false),
            signing_identity: Some("Developer ID Application: Acme".into()),
            tool_timeout_secs: Some(30),
        });

        assert!(config.skip_bundling(&m));
        assert_eq!(config.tool_timeout(&m), Duration::from_secs(30));
        assert_eq!(config.signing_identity(&m), "Developer ID Application: Acme");
    }

    #[test]
    fn cli_values_win_over_manifest() {
        let config = PipelineConfigBuilder::new()
            .project_root("/work/app")
            .platform(Platform::MacOs)
            .skip_bundling(true)
            .tool_timeout(Duration::from_secs(5))
            .signing_identity("-")
            .build()
            .unwrap();
        let m = manifest(PackagingSettings {
            bundle: Some(true),
            signing_identity: Some("Developer ID Application: Acme".into()),
            tool_timeout_secs: Some(30),
        });

        assert!(config.skip_bundling(&m));
        assert_eq!(config.tool_timeout(&m), Duration::from_secs(5));
        assert_eq!(config.signing_identity(&m), "-");
    }
}
