//! node2exe - package a Node.js application as a single executable.
//!
//! Exit code 0 guarantees the executable exists in the project directory;
//! any failure exits with 1.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = node2exe::cli::run().await;
    process::exit(exit_code);
}
