//! Build results and non-fatal warnings.

use crate::sea::Platform;
use std::path::PathBuf;

/// Non-fatal condition raised during a run. Never changes the exit code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineWarning {
    /// `codesign --remove-signature` failed; injection continues
    SignatureStrip {
        /// Tool diagnostics
        detail: String,
    },
    /// Re-signing after injection failed; the binary stays unsigned
    Signing {
        /// Tool diagnostics
        detail: String,
    },
    /// A transient artifact could not be deleted
    Cleanup {
        /// Artifact left behind
        path: PathBuf,
        /// Reason
        detail: String,
    },
    /// `--version` was requested but package.json has no version
    VersionUnavailable,
    /// The manifest version is used verbatim although it is not semver
    NonSemverVersion {
        /// Version string as declared
        version: String,
    },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::SignatureStrip { detail } => {
                write!(f, "could not remove the existing code signature: {detail}")
            }
            PipelineWarning::Signing { detail } => {
                write!(f, "signing failed, binary left unsigned: {detail}")
            }
            PipelineWarning::Cleanup { path, detail } => {
                write!(f, "partial cleanup, {} remains: {detail}", path.display())
            }
            PipelineWarning::VersionUnavailable => {
                f.write_str("package.json has no \"version\"; output name left unversioned")
            }
            PipelineWarning::NonSemverVersion { version } => {
                write!(f, "version \"{version}\" is not valid semver; used as is")
            }
        }
    }
}

/// Successful pipeline result. The output is eligible for distribution.
#[derive(Clone, Debug)]
pub struct BuildReport {
    /// Platform the executable targets
    pub platform: Platform,
    /// Final executable
    pub output: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256 of the executable
    pub sha256: String,
    /// Whether the bundling stage produced the embedded code
    pub bundled: bool,
    /// Warnings collected along the way
    pub warnings: Vec<PipelineWarning>,
}
