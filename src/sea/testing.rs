//! Scripted [`ToolRunner`] for unit tests.
//!
//! Simulates the side effects of the real tools (npm drops a shim, esbuild
//! writes its outfile, node writes the blob named in the descriptor) and
//! records every command it receives.

use crate::sea::runner::{ToolCommand, ToolOutput, ToolRunner};
use crate::sea::{Platform, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct Failure {
    program: String,
    arg: Option<String>,
    code: i32,
    stderr: String,
}

pub(crate) struct FakeRunner {
    node_exec_path: PathBuf,
    node_version: String,
    shim_suffix: &'static str,
    failures: Vec<Failure>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl FakeRunner {
    pub(crate) fn new(node_exec_path: &Path, platform: Platform) -> Self {
        Self {
            node_exec_path: node_exec_path.to_path_buf(),
            node_version: "v22.11.0".to_string(),
            shim_suffix: platform.capabilities().tool_shim_suffix,
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn node_version(mut self, version: &str) -> Self {
        self.node_version = version.to_string();
        self
    }

    /// Every invocation of `program` exits with `code`.
    pub(crate) fn fail(self, program: &str, code: i32, stderr: &str) -> Self {
        self.push_failure(program, None, code, stderr)
    }

    /// Invocations of `program` carrying `arg` exit with `code`.
    pub(crate) fn fail_with_arg(self, program: &str, arg: &str, code: i32, stderr: &str) -> Self {
        self.push_failure(program, Some(arg), code, stderr)
    }

    fn push_failure(mut self, program: &str, arg: Option<&str>, code: i32, stderr: &str) -> Self {
        self.failures.push(Failure {
            program: program.to_string(),
            arg: arg.map(String::from),
            code,
            stderr: stderr.to_string(),
        });
        self
    }

    pub(crate) fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, program: &str) -> Vec<ToolCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.program_name() == program)
            .collect()
    }

    fn scripted_failure(&self, command: &ToolCommand) -> Option<ToolOutput> {
        let name = command.program_name();
        self.failures
            .iter()
            .find(|f| {
                f.program == name
                    && f.arg
                        .as_ref()
                        .is_none_or(|arg| command.args.iter().any(|a| a == arg))
            })
            .map(|f| ToolOutput {
                code: Some(f.code),
                stdout: String::new(),
                stderr: f.stderr.clone(),
            })
    }

    fn simulate(&self, command: &ToolCommand) -> ToolOutput {
        let mut output = ToolOutput {
            code: Some(0),
            ..Default::default()
        };

        match command.program_name().as_str() {
            "node" if command.args.first().map(String::as_str) == Some("-e") => {
                output.stdout = format!(
                    "{}\n{}\n",
                    self.node_exec_path.display(),
                    self.node_version
                );
            }
            "node" => {
                let config = command.cwd.join(&command.args[1]);
                let text = std::fs::read_to_string(config).unwrap();
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                let blob = value["output"].as_str().unwrap();
                std::fs::write(command.cwd.join(blob), b"SEA-BLOB").unwrap();
            }
            "npm" => {
                let prefix = arg_after(command, "--prefix").unwrap();
                let package = command.args.last().unwrap();
                let bin = Path::new(&prefix).join("node_modules").join(".bin");
                std::fs::create_dir_all(&bin).unwrap();
                std::fs::write(bin.join(format!("{package}{}", self.shim_suffix)), b"").unwrap();
            }
            "esbuild" => {
                let outfile = command
                    .args
                    .iter()
                    .find_map(|a| a.strip_prefix("--outfile="))
                    .unwrap();
                let outfile = command.cwd.join(outfile);
                std::fs::create_dir_all(outfile.parent().unwrap()).unwrap();
                std::fs::write(outfile, b"// bundled").unwrap();
            }
            _ => {}
        }

        output
    }
}

fn arg_after(command: &ToolCommand, flag: &str) -> Option<String> {
    let pos = command.args.iter().position(|a| a == flag)?;
    command.args.get(pos + 1).cloned()
}

impl ToolRunner for FakeRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(self
            .scripted_failure(command)
            .unwrap_or_else(|| self.simulate(command)))
    }
}
