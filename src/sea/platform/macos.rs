//! macOS code signature handling with `codesign`.
//!
//! Both steps are non-fatal; failures become warnings.

use crate::sea::builder::report::PipelineWarning;
use crate::sea::runner::ToolRunner;
use crate::sea::stages::StageContext;
use crate::sea::stages::compose::OutputArtifact;

/// Runs `codesign` with `args` followed by the artifact name; any failure
/// (including a missing codesign) is returned as its diagnostic text.
async fn codesign<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    artifact: &OutputArtifact,
    args: &[&str],
) -> Result<(), String> {
    let command = ctx
        .command("codesign")
        .args(args.iter().copied())
        .arg(artifact.name.clone());
    match ctx.runner.run(&command).await {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => Err(output.diagnostic()),
        Err(e) => Err(e.to_string()),
    }
}

/// Strips the runtime's signature before injection.
pub async fn remove_signature<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    artifact: &OutputArtifact,
) -> Option<PipelineWarning> {
    match codesign(ctx, artifact, &["--remove-signature"]).await {
        Ok(()) => {
            log::info!("Removed code signature from {}", artifact.name);
            None
        }
        Err(detail) => {
            log::warn!("Could not remove signature from {}: {}", artifact.name, detail);
            Some(PipelineWarning::SignatureStrip { detail })
        }
    }
}

/// Re-signs the injected binary with the configured identity (ad-hoc by default).
pub async fn sign<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    artifact: &OutputArtifact,
) -> Option<PipelineWarning> {
    let identity = ctx.config.signing_identity(ctx.manifest);
    match codesign(ctx, artifact, &["--sign", identity]).await {
        Ok(()) => {
            log::info!("Signed {} (identity: {})", artifact.name, identity);
            None
        }
        Err(detail) => {
            log::warn!("Signing {} failed: {}", artifact.name, detail);
            Some(PipelineWarning::Signing { detail })
        }
    }
}
