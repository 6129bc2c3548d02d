//! Pipeline orchestration and coordination.
//!
//! This module provides the [`Pipeline`] orchestrator that runs the five
//! stages in order and turns a Node.js project into a single executable.
//!
//! # Overview
//!
//! The pipeline:
//! 1. Probes the platform, manifest and entry point
//! 2. Bundles dependencies into one file when `node_modules` exists
//! 3. Writes `sea-config.json` and generates the blob
//! 4. Copies the Node.js runtime and injects the blob
//! 5. Re-signs (macOS) or removes transient artifacts (Windows, Linux)
//!
//! Then it hashes the executable and returns a [`BuildReport`].
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum of the output
//! - [`orchestrator`] - Main [`Pipeline`] struct
//! - [`report`] - Build report and non-fatal warnings
//! - [`tool_detection`] - Node.js runtime resolution and on-demand npm tools

pub mod checksum;
pub mod orchestrator;
pub mod report;
pub mod tool_detection;

pub use orchestrator::Pipeline;
pub use report::{BuildReport, PipelineWarning};
