//! Command line interface for node2exe.
//!
//! Parses arguments, runs the pipeline against the real process runner and
//! reports the outcome. Every failure maps to exit code 1.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::error::{CliError, PackagerError, Result};
use crate::sea::{BuildReport, Pipeline, PipelineConfig, PipelineConfigBuilder, Platform, ProcessRunner};
use anyhow::Context;
use path_absolutize::Absolutize;
use std::time::Duration;

/// Main CLI entry point
pub async fn run() -> i32 {
    let args = Args::parse_args();
    init_logging(args.verbose);
    let output = OutputManager::new(args.verbose, args.quiet);

    match execute(&args, &output).await {
        Ok(report) => {
            print_summary(&report, &output);
            0
        }
        Err(e) => {
            log::debug!("Pipeline failed: {:?}", e);
            let _ = output.error(&e.to_string());
            if let Some(hint) = e.hint() {
                let _ = output.error(&format!("hint: {hint}"));
            }
            1
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose { "node2exe=debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

async fn execute(args: &Args, output: &OutputManager) -> Result<BuildReport> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let platform = Platform::host()?;
    let config = create_pipeline_config(args, platform)?;

    let pipeline = Pipeline::new(config, ProcessRunner::new());
    let _ = output.section(&format!(
        "Packaging {}",
        pipeline.config().project_root().display()
    ));
    let report = pipeline.run(output).await?;
    Ok(report)
}

/// Builds the pipeline configuration from parsed arguments.
pub fn create_pipeline_config(args: &Args, platform: Platform) -> Result<PipelineConfig> {
    let project_root = args
        .project
        .absolutize()
        .context("resolving project directory")?
        .into_owned();

    if !project_root.is_dir() {
        return Err(PackagerError::Cli(CliError::ProjectNotFound {
            path: args.project.display().to_string(),
        }));
    }

    let mut builder = PipelineConfigBuilder::new()
        .project_root(&project_root)
        .platform(platform)
        .include_version_in_name(args.include_version)
        .skip_bundling(args.no_bundle);

    if let Some(node) = &args.node {
        // Bare names stay bare for the PATH lookup; paths are taken relative
        // to the invocation directory, not the project root.
        if node.components().count() > 1 {
            builder = builder.node(node.absolutize()?);
        } else {
            builder = builder.node(node);
        }
    }
    if let Some(tool_dir) = &args.tool_dir {
        builder = builder.tool_dir(tool_dir.absolutize_from(&project_root)?);
    }
    if let Some(secs) = args.tool_timeout {
        builder = builder.tool_timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}

fn print_summary(report: &BuildReport, output: &OutputManager) {
    let file_name = report
        .output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let _ = output.section("Build complete");
    let _ = output.success(&format!("{}", report.output.display()));
    let _ = output.indent(&format!("Size:   {} bytes", report.size));
    let _ = output.indent(&format!("SHA256: {}", report.sha256));
    if !report.warnings.is_empty() {
        let _ = output.indent(&format!("Completed with {} warning(s)", report.warnings.len()));
    }
    let _ = output.println("");
    let run_hint = match report.platform {
        Platform::Windows => format!(".\\{file_name}"),
        Platform::MacOs | Platform::Linux => format!("./{file_name}"),
    };
    let _ = output.println(&format!("Run it with: {run_hint}"));
}
