//! Transient artifact removal for Windows and Linux.

use super::TransientArtifacts;
use crate::sea::builder::report::PipelineWarning;
use crate::sea::utils::fs;

/// Deletes the artifacts this run created. Failures become warnings.
pub async fn remove_transient_artifacts(transients: &TransientArtifacts) -> Vec<PipelineWarning> {
    let mut warnings = Vec::new();

    for path in transients.paths() {
        match fs::remove_file(path).await {
            Ok(true) => log::debug!("Removed {}", path.display()),
            Ok(false) => {}
            Err(e) => {
                log::warn!("Could not remove {}: {}", path.display(), e);
                warnings.push(PipelineWarning::Cleanup {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                });
            }
        }
    }

    if let Some(dir) = transients.bundle_file.as_deref().and_then(|p| p.parent()) {
        fs::remove_dir_if_empty(dir).await;
    }

    warnings
}
