//! Blob generator invoker.

use super::{EntryPoint, StageContext};
use crate::sea::builder::tool_detection::NodeRuntime;
use crate::sea::descriptor::{BlobDescriptor, DESCRIPTOR_FILE, DescriptorWrite, write_descriptor};
use crate::sea::runner::ToolRunner;
use crate::sea::{Error, Result};
use std::path::PathBuf;

/// Result of the blob stage.
#[derive(Debug)]
pub struct BlobOutcome {
    /// Descriptor as written
    pub descriptor: BlobDescriptor,
    /// What happened to the descriptor file
    pub descriptor_write: DescriptorWrite,
    /// Generated blob
    pub blob_file: PathBuf,
}

/// Rewrites sea-config.json for `entry`, then runs
/// `node --experimental-sea-config sea-config.json`.
///
/// No retry: a failure here points at the entry point or the descriptor.
///
/// # Errors
///
/// [`Error::Descriptor`] for an unmergeable descriptor,
/// [`Error::BlobGeneration`] when node fails or writes no blob.
pub async fn generate_blob<R: ToolRunner>(
    ctx: &StageContext<'_, R>,
    entry: &EntryPoint,
    runtime: &NodeRuntime,
) -> Result<BlobOutcome> {
    let (descriptor, descriptor_write) = write_descriptor(ctx.root(), entry).await?;
    let blob_file = ctx.root().join(descriptor.blob_file());

    let command = ctx
        .command(runtime.exec_path.clone())
        .args(["--experimental-sea-config", DESCRIPTOR_FILE]);
    let output = ctx.runner.run(&command).await?;

    if !output.success() {
        return Err(Error::BlobGeneration {
            detail: output.diagnostic(),
        });
    }

    if !blob_file.is_file() {
        return Err(Error::BlobGeneration {
            detail: format!(
                "node reported success but {} was not written",
                blob_file.display()
            ),
        });
    }

    log::info!("Generated {}", blob_file.display());
    Ok(BlobOutcome {
        descriptor,
        descriptor_write,
        blob_file,
    })
}
