//! Error taxonomy for the packaging pipeline.
//!
//! Every variant here is fatal: the pipeline aborts on the first one, with no
//! retry and no rollback of side effects already committed. Non-fatal
//! conditions are [`PipelineWarning`](crate::sea::PipelineWarning) values
//! instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Host OS is not Windows, macOS or Linux
    #[error("unsupported platform '{os}' (supported: Windows, macOS, Linux)")]
    UnsupportedPlatform {
        /// OS identifier as reported by the host
        os: String,
    },

    /// No package.json at the project root
    #[error("manifest not found: {}", path.display())]
    ManifestMissing {
        /// Expected manifest location
        path: PathBuf,
    },

    /// package.json is not valid JSON
    #[error("failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        /// Manifest location
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Entry point could not be resolved to an existing file
    #[error("entry point missing: {reason}")]
    EntryPointMissing {
        /// What was looked for
        reason: String,
    },

    /// A required program is not installed on this machine
    #[error("required program '{tool}' was not found on PATH")]
    ToolNotFound {
        /// Program name
        tool: String,
    },

    /// Node.js is too old to build single executable applications
    #[error("Node.js {version} does not support single executable applications (need >= {minimum})")]
    RuntimeUnsupported {
        /// Version reported by the runtime
        version: String,
        /// Minimum supported version
        minimum: String,
    },

    /// On-demand installation of an npm tool failed
    #[error("failed to install {tool}: {detail}")]
    ToolInstall {
        /// npm package name
        tool: String,
        /// Tool diagnostics
        detail: String,
    },

    /// The dependency bundler reported failure
    #[error("bundling failed: {detail}")]
    Bundle {
        /// Tool diagnostics
        detail: String,
    },

    /// sea-config.json exists but cannot be merged
    #[error("invalid blob descriptor {}: {reason}", path.display())]
    Descriptor {
        /// Descriptor location
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// The runtime's blob generator reported failure
    #[error("blob generation failed: {detail}")]
    BlobGeneration {
        /// Tool diagnostics
        detail: String,
    },

    /// Copying the runtime binary to the output path failed
    #[error("failed to copy runtime binary {} to {}: {source}", from.display(), to.display())]
    BinaryCopy {
        /// Runtime binary
        from: PathBuf,
        /// Output artifact
        to: PathBuf,
        /// Underlying io error
        source: std::io::Error,
    },

    /// The injector reported failure; the output binary is not distributable
    #[error("blob injection failed: {detail}")]
    BlobInjection {
        /// Tool diagnostics
        detail: String,
    },

    /// The output name coincides with a project input
    #[error("output {} would overwrite the project's {input}", path.display())]
    OutputConflict {
        /// Output path
        path: PathBuf,
        /// Which input lives there
        input: &'static str,
    },

    /// The Node.js binary ran but could not report its path and version
    #[error("`{program}` did not report its version: {detail}")]
    RuntimeProbe {
        /// Configured node binary
        program: String,
        /// Tool diagnostics
        detail: String,
    },

    /// An external tool exceeded its bounded wait
    #[error("`{command}` timed out after {seconds}s")]
    Timeout {
        /// Command line that timed out
        command: String,
        /// Configured limit
        seconds: u64,
    },

    /// An external command could not be started
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line
        command: String,
        /// Spawn error
        error: std::io::Error,
    },

    /// Filesystem operation failed
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// Operation being performed
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying io error
        error: std::io::Error,
    },

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Operator-facing recovery hint for this error.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::UnsupportedPlatform { .. } => {
                Some("Run the build on Windows, macOS or Linux.")
            }
            Error::ManifestMissing { .. } => {
                Some("Run from the project root, or create one with `npm init -y`.")
            }
            Error::ManifestParse { .. } => Some("Fix the JSON syntax of package.json."),
            Error::EntryPointMissing { .. } => Some(
                "Set \"main\" in package.json to an existing file, or add app.js / index.js.",
            ),
            Error::ToolNotFound { .. } => {
                Some("Install Node.js (which provides node and npm) or pass --node <PATH>.")
            }
            Error::RuntimeUnsupported { .. } => Some("Upgrade Node.js to a release with SEA support."),
            Error::RuntimeProbe { .. } => {
                Some("Check that `node -v` works, or pass a working binary with --node <PATH>.")
            }
            Error::OutputConflict { .. } => Some(
                "Give the entry point a file extension (e.g. server.js) so the executable name differs.",
            ),
            Error::ToolInstall { .. } => {
                Some("Check network access to the npm registry, then rerun.")
            }
            Error::Bundle { .. } => {
                Some("Fix the errors reported by esbuild, or rerun with --no-bundle.")
            }
            Error::Descriptor { .. } => {
                Some("sea-config.json must contain a JSON object; fix or delete it.")
            }
            Error::BlobGeneration { .. } => {
                Some("Check that the entry point runs with plain `node` (CommonJS, no syntax errors).")
            }
            Error::BinaryCopy { .. } => {
                Some("Check write permissions and free disk space in the project directory.")
            }
            Error::BlobInjection { .. } => Some(
                "The output binary was left on disk for inspection; it is not distributable.",
            ),
            Error::Timeout { .. } => Some("Raise the limit with --tool-timeout <SECS>."),
            _ => None,
        }
    }
}

/// Extension trait attaching path context to io results.
pub trait ErrorExt<T> {
    /// Converts an io error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::sea::Error::GenericError(format!($($arg)*)))
    };
}
