//! Single executable packager for Node.js applications.
//!
//! This library turns a Node.js project into one native executable by
//! embedding its code into a copy of the Node.js runtime:
//! - bundles `node_modules` with esbuild when present
//! - generates the SEA blob with `node --experimental-sea-config`
//! - injects the blob with postject and re-signs on macOS
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod metadata;
pub mod sea;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
