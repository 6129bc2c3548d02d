//! Platform finisher.
//!
//! Two branches keyed on the capability table: signature handling (macOS)
//! or transient artifact cleanup (Windows, Linux). Nothing here is fatal.

mod cleanup;
mod macos;

use crate::sea::builder::report::PipelineWarning;
use crate::sea::runner::ToolRunner;
use crate::sea::stages::StageContext;
use crate::sea::stages::compose::OutputArtifact;
use std::path::{Path, PathBuf};

/// Files created mid-run that are not part of the deliverable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransientArtifacts {
    /// Generated blob
    pub blob_file: PathBuf,
    /// Bundle written by this run (never a file the run did not create)
    pub bundle_file: Option<PathBuf>,
}

impl TransientArtifacts {
    /// All tracked paths.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.blob_file.as_path()).chain(self.bundle_file.as_deref())
    }
}

/// Branch the finisher took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishBranch {
    /// Signature stripped before injection and reapplied after
    Signing,
    /// Transient artifacts removed
    Cleanup,
}

/// Work needed before injection: strips the signature where one exists.
pub async fn prepare_binary<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    artifact: &OutputArtifact,
) -> Vec<PipelineWarning> {
    if ctx.platform().capabilities().needs_signature_handling {
        macos::remove_signature(ctx, artifact).await.into_iter().collect()
    } else {
        Vec::new()
    }
}

/// Work after a successful injection.
pub async fn finish_binary<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    artifact: &OutputArtifact,
    transients: &TransientArtifacts,
) -> (FinishBranch, Vec<PipelineWarning>) {
    if ctx.platform().capabilities().needs_signature_handling {
        let warnings = macos::sign(ctx, artifact).await.into_iter().collect();
        (FinishBranch::Signing, warnings)
    } else {
        let warnings = cleanup::remove_transient_artifacts(transients).await;
        (FinishBranch::Cleanup, warnings)
    }
}
