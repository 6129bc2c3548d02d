//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Package a Node.js application as a single executable
#[derive(Parser, Debug)]
#[command(
    name = "node2exe",
    disable_version_flag = true,
    about = "Package a Node.js application as a single executable",
    long_about = "Packages a Node.js project into one native executable using Node.js single executable applications.

Reads package.json from the project directory, bundles node_modules with esbuild when present,
generates the SEA blob, and injects it into a copy of the Node.js runtime.

Usage:
  node2exe
  node2exe -V
  node2exe --project ./my-app --no-bundle

Exit code 0 = executable guaranteed to exist in the project directory."
)]
pub struct Args {
    /// Embed the package.json version in the executable name (app-1.2.3.exe)
    #[arg(short = 'V', long = "version")]
    pub include_version: bool,

    /// Embed the project code without bundling node_modules
    #[arg(long)]
    pub no_bundle: bool,

    /// Project directory containing package.json
    #[arg(short = 'p', long, value_name = "DIR", default_value = ".")]
    pub project: PathBuf,

    /// Node.js binary used for blob generation and as the runtime copy
    #[arg(long, value_name = "PATH", env = "NODE2EXE_NODE")]
    pub node: Option<PathBuf>,

    /// Directory where esbuild and postject are installed on demand
    #[arg(long, value_name = "DIR")]
    pub tool_dir: Option<PathBuf>,

    /// Seconds before an external tool invocation is abandoned
    #[arg(long, value_name = "SECS", env = "NODE2EXE_TOOL_TIMEOUT")]
    pub tool_timeout: Option<u64>,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print resolved tools and debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.tool_timeout == Some(0) {
            return Err("--tool-timeout must be at least 1 second".to_string());
        }

        if self.node.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err("--node cannot be empty".to_string());
        }

        Ok(())
    }
}
