//! Single executable application builder.
//!
//! Packages a Node.js project into one native executable: the project's
//! code is serialized into a blob with `node --experimental-sea-config`,
//! and the blob is injected into a copy of the Node.js runtime with
//! postject.
//!
//! External programs are reached through the [`ToolRunner`] seam;
//! [`ProcessRunner`] spawns real processes.

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod stages;
pub mod utils;

#[cfg(test)]
mod testing;

pub use builder::{BuildReport, Pipeline, PipelineWarning};
pub use error::{Error, ErrorExt, Result};
pub use runner::{ProcessRunner, ToolCommand, ToolOutput, ToolRunner};
pub use settings::{PipelineConfig, PipelineConfigBuilder, Platform, PlatformCapabilities};
