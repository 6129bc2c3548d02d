//! Builder for constructing PipelineConfig.

use super::{Platform, PipelineConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for constructing [`PipelineConfig`].
///
/// # Examples
///
/// ```no_run
/// use node2exe::sea::{PipelineConfigBuilder, Platform};
///
/// # fn example() -> node2exe::sea::Result<()> {
/// let config = PipelineConfigBuilder::new()
///     .project_root("/home/me/my-app")
///     .platform(Platform::host()?)
///     .include_version_in_name(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PipelineConfigBuilder {
    project_root: Option<PathBuf>,
    platform: Option<Platform>,
    include_version_in_name: bool,
    skip_bundling: bool,
    node: Option<PathBuf>,
    tool_dir: Option<PathBuf>,
    tool_timeout: Option<Duration>,
    signing_identity: Option<String>,
}

impl PipelineConfigBuilder {
    /// Creates a new config builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root. Required.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the target platform.
    ///
    /// Default: host platform
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Embed the manifest version in the output file name.
    pub fn include_version_in_name(mut self, enabled: bool) -> Self {
        self.include_version_in_name = enabled;
        self
    }

    /// Skip the dependency bundling stage.
    pub fn skip_bundling(mut self, skip: bool) -> Self {
        self.skip_bundling = skip;
        self
    }

    /// Use this Node.js binary instead of `node` on PATH.
    pub fn node<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.node = Some(path.as_ref().to_path_buf());
        self
    }

    /// Install on-demand tools into this directory.
    ///
    /// Default: `<project_root>/.node2exe/tools`
    pub fn tool_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.tool_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Bounded wait for each external tool.
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// macOS code signing identity.
    pub fn signing_identity(mut self, identity: impl Into<String>) -> Self {
        self.signing_identity = Some(identity.into());
        self
    }

    /// Builds the config.
    ///
    /// # Errors
    ///
    /// Fails if `project_root` is missing, or if no platform was given and
    /// the host is unsupported.
    pub fn build(self) -> crate::sea::Result<PipelineConfig> {
        let Some(project_root) = self.project_root else {
            crate::bail!("project_root is required");
        };
        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::host()?,
        };

        Ok(PipelineConfig::new(
            project_root,
            platform,
            self.include_version_in_name,
            self.skip_bundling,
            self.node,
            self.tool_dir,
            self.tool_timeout,
            self.signing_identity,
        ))
    }
}
