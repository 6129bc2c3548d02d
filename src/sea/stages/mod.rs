//! Pipeline stages.
//!
//! Each stage is a function of the state it receives to the state it hands
//! on, or a fatal [`Error`](crate::sea::Error). All process execution goes
//! through the [`StageContext`]'s runner.

pub mod blob;
pub mod bundle;
pub mod compose;
pub mod probe;

use crate::metadata::ProjectManifest;
use crate::sea::runner::{ToolCommand, ToolRunner};
use crate::sea::{Error, PipelineConfig, Platform, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Everything a stage needs besides its own input.
pub struct StageContext<'a, R: ToolRunner> {
    /// Run configuration
    pub config: &'a PipelineConfig,
    /// Parsed package.json
    pub manifest: &'a ProjectManifest,
    /// Tool runner
    pub runner: &'a R,
}

impl<'a, R: ToolRunner> StageContext<'a, R> {
    /// Creates a stage context.
    pub fn new(config: &'a PipelineConfig, manifest: &'a ProjectManifest, runner: &'a R) -> Self {
        Self {
            config,
            manifest,
            runner,
        }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.config.project_root()
    }

    /// Target platform.
    pub fn platform(&self) -> Platform {
        self.config.platform()
    }

    /// A command running in the project root under the configured timeout.
    pub fn command(&self, program: impl Into<PathBuf>) -> ToolCommand {
        ToolCommand::new(program, self.root(), self.config.tool_timeout(self.manifest))
    }
}

/// The application's start file.
///
/// Resolved once by the prober and replaced at most once, by the bundler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPoint {
    root: PathBuf,
    relative: PathBuf,
}

impl EntryPoint {
    /// Creates an entry point for `path` (relative to `root`, or absolute).
    /// `.` and `..` components are folded lexically.
    pub fn new(root: &Path, path: &Path) -> Result<Self> {
        let absolute = path
            .absolutize_from(root)
            .map_err(|e| Error::EntryPointMissing {
                reason: format!("cannot resolve {}: {}", path.display(), e),
            })?;
        let relative = absolute
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| absolute.to_path_buf());
        Ok(Self {
            root: root.to_path_buf(),
            relative,
        })
    }

    /// Absolute path.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    /// Path relative to the project root (absolute if outside it).
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Relative path with `/` separators, as written to sea-config.json.
    pub fn descriptor_value(&self) -> String {
        let text = self.relative.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '\\' {
            text.replace('\\', "/")
        } else {
            text.into_owned()
        }
    }

    /// File name without extension; the base of the output name.
    pub fn stem(&self) -> String {
        self.relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string())
    }

    /// Fails unless the entry point is an existing regular file.
    pub fn verify(&self) -> Result<()> {
        let path = self.path();
        if path.is_file() {
            Ok(())
        } else {
            Err(Error::EntryPointMissing {
                reason: format!("{} is not an existing file", path.display()),
            })
        }
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.descriptor_value())
    }
}
