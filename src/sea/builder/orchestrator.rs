//! Main pipeline orchestration.
//!
//! Runs the five stages strictly in order and stops at the first fatal
//! error. Side effects already committed (descriptor, copied binary) are
//! left in place for inspection; a rerun converges instead of duplicating
//! state.

use super::checksum::calculate_sha256;
use super::report::{BuildReport, PipelineWarning};
use super::tool_detection::resolve_runtime;
use crate::cli::OutputManager;
use crate::metadata::MANIFEST_FILE;
use crate::sea::descriptor::DescriptorWrite;
use crate::sea::platform::{self, TransientArtifacts};
use crate::sea::runner::ToolRunner;
use crate::sea::stages::{StageContext, blob, bundle, compose, probe};
use crate::sea::{PipelineConfig, Result};

const STEPS: usize = 5;

/// Single-executable build pipeline.
///
/// # Examples
///
/// ```no_run
/// use node2exe::cli::OutputManager;
/// use node2exe::sea::{Pipeline, PipelineConfigBuilder, ProcessRunner};
///
/// # async fn example() -> node2exe::sea::Result<()> {
/// let config = PipelineConfigBuilder::new()
///     .project_root("/home/me/my-app")
///     .build()?;
/// let report = Pipeline::new(config, ProcessRunner::new())
///     .run(&OutputManager::new(false, false))
///     .await?;
/// println!("{} ({} bytes)", report.output.display(), report.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pipeline<R: ToolRunner> {
    config: PipelineConfig,
    runner: R,
}

impl<R: ToolRunner> Pipeline<R> {
    /// Creates a pipeline.
    pub fn new(config: PipelineConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the tool runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Executes all stages.
    ///
    /// # Errors
    ///
    /// The first fatal [`Error`](crate::sea::Error) of any stage. The
    /// output is only reported (and eligible for distribution) once the
    /// composer and finisher have both completed.
    pub async fn run(&self, out: &OutputManager) -> Result<BuildReport> {
        let mut warnings: Vec<PipelineWarning> = Vec::new();

        // 1. Environment
        let _ = out.progress(&format!("[1/{STEPS}] Probing project..."));
        let probe = probe::probe(&self.config)?;
        let _ = out.success(&format!("Platform: {}", probe.platform));
        let _ = out.success(&format!("Entry point: {}", probe.entry));

        let ctx = StageContext::new(&self.config, &probe.manifest, &self.runner);

        // 2. Bundling
        let _ = out.progress(&format!("[2/{STEPS}] Bundling dependencies..."));
        probe.entry.verify()?;
        let bundled = bundle::bundle_dependencies(&ctx, probe.entry.clone(), probe.has_dependency_tree)
            .await?;
        match &bundled.bundle_file {
            Some(_) => {
                let _ = out.success(&format!("Bundled into {}", bundled.entry));
            }
            None => {
                let _ = out.indent("Skipped");
            }
        }
        let entry = bundled.entry;

        // 3. Blob generation
        let _ = out.progress(&format!("[3/{STEPS}] Generating SEA blob..."));
        entry.verify()?;
        let runtime = resolve_runtime(&ctx).await?;
        let _ = out.verbose(&format!(
            "   Node.js {} at {}",
            runtime.version,
            runtime.exec_path.display()
        ));
        let blob = blob::generate_blob(&ctx, &entry, &runtime).await?;
        let descriptor_state = match blob.descriptor_write {
            DescriptorWrite::Created => "created",
            DescriptorWrite::Updated => "updated",
            DescriptorWrite::Unchanged => "unchanged",
        };
        let _ = out.verbose(&format!(
            "   {} {}",
            blob.descriptor.path().display(),
            descriptor_state
        ));
        let _ = out.success(&format!("Blob generated: {}", blob.descriptor.blob_file()));

        // 4. Binary composition
        let _ = out.progress(&format!("[4/{STEPS}] Composing executable..."));
        let artifact = compose::derive_output_artifact(&ctx, &entry, &mut warnings);
        let manifest_path = ctx.root().join(MANIFEST_FILE);
        let source_entry = probe.entry.path();
        let blob_entry = entry.path();
        compose::check_output_path(
            &artifact,
            &[
                ("entry point", source_entry.as_path()),
                ("bundled entry point", blob_entry.as_path()),
                ("manifest", manifest_path.as_path()),
                ("blob descriptor", blob.descriptor.path()),
                ("blob", blob.blob_file.as_path()),
            ],
        )?;
        compose::copy_runtime(&runtime, &artifact).await?;
        let _ = out.success(&format!("{} created", artifact.name));

        for warning in platform::prepare_binary(&ctx, &artifact).await {
            let _ = out.warn(&warning.to_string());
            warnings.push(warning);
        }

        compose::inject_blob(&ctx, &artifact, &blob.blob_file).await?;
        let _ = out.success("Blob injected");

        // 5. Platform finishing
        let _ = out.progress(&format!("[5/{STEPS}] Finishing for {}...", probe.platform));
        let transients = TransientArtifacts {
            blob_file: blob.blob_file.clone(),
            bundle_file: bundled.bundle_file.clone(),
        };
        let (branch, finish_warnings) = platform::finish_binary(&ctx, &artifact, &transients).await;
        for warning in finish_warnings {
            let _ = out.warn(&warning.to_string());
            warnings.push(warning);
        }
        log::debug!("Finisher took the {:?} branch", branch);

        let (sha256, size) = calculate_sha256(&artifact.path).await?;

        Ok(BuildReport {
            platform: probe.platform,
            output: artifact.path,
            size,
            sha256,
            bundled: bundled.bundle_file.is_some(),
            warnings,
        })
    }
}
