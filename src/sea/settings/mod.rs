//! Configuration structures for a pipeline run.
//!
//! [`PipelineConfig`] is computed once before the first stage and never
//! mutated; [`Platform`] carries the capability table consulted by the
//! composer and finisher stages.

mod builder;
mod core;
mod platform;

pub use builder::PipelineConfigBuilder;
pub use core::{AD_HOC_IDENTITY, DEFAULT_TOOL_TIMEOUT, PipelineConfig, WORK_DIR};
pub use platform::{Platform, PlatformCapabilities};
