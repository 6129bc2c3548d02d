//! External tool detection, on-demand installation and runtime resolution.
//!
//! npm tools (esbuild, postject) are looked up in the project's own
//! `node_modules/.bin` first, then in the pipeline's tool directory, and are
//! installed into the tool directory when missing. The tool directory keeps
//! `package.json` and the project's `node_modules/` untouched, so installing
//! a tool never changes whether the next run bundles.

use crate::sea::runner::ToolRunner;
use crate::sea::stages::StageContext;
use crate::sea::{Error, Result};
use std::path::{Path, PathBuf};

/// An npm package that provides a command-line tool.
#[derive(Debug)]
pub struct NpmTool {
    /// Package name passed to `npm install`
    pub package: &'static str,
    /// Name of the `node_modules/.bin` shim
    pub bin: &'static str,
}

/// Dependency bundler.
pub const ESBUILD: NpmTool = NpmTool {
    package: "esbuild",
    bin: "esbuild",
};

/// Binary segment injector.
pub const POSTJECT: NpmTool = NpmTool {
    package: "postject",
    bin: "postject",
};

/// First Node.js release with `--experimental-sea-config`.
pub const MIN_SEA_VERSION: semver::Version = semver::Version::new(18, 16, 0);

fn shim_path(modules_root: &Path, tool: &NpmTool, shim_suffix: &str) -> PathBuf {
    modules_root
        .join("node_modules")
        .join(".bin")
        .join(format!("{}{}", tool.bin, shim_suffix))
}

/// Finds an already-installed tool without running anything.
pub fn locate_tool<R: ToolRunner>(ctx: &StageContext<'_, R>, tool: &NpmTool) -> Option<PathBuf> {
    let suffix = ctx.platform().capabilities().tool_shim_suffix;
    [ctx.root().to_path_buf(), ctx.config.tool_dir()]
        .iter()
        .map(|root| shim_path(root, tool, suffix))
        .find(|path| path.is_file())
}

/// Returns the tool's shim path, installing the package first if needed.
///
/// # Errors
///
/// [`Error::ToolInstall`] when npm exits non-zero or the shim is still
/// missing afterwards; [`Error::ToolNotFound`] when npm itself is missing.
pub async fn ensure_tool<R: ToolRunner>(ctx: &StageContext<'_, R>, tool: &NpmTool) -> Result<PathBuf> {
    if let Some(path) = locate_tool(ctx, tool) {
        log::debug!("Found {} at: {}", tool.package, path.display());
        return Ok(path);
    }

    let tool_dir = ctx.config.tool_dir();
    log::info!("Installing {} into {}", tool.package, tool_dir.display());
    tokio::fs::create_dir_all(&tool_dir)
        .await
        .map_err(|e| Error::ToolInstall {
            tool: tool.package.to_string(),
            detail: format!("cannot create {}: {}", tool_dir.display(), e),
        })?;

    let command = ctx.command("npm").args([
        "install".to_string(),
        "--no-save".to_string(),
        "--no-audit".to_string(),
        "--no-fund".to_string(),
        "--prefix".to_string(),
        tool_dir.display().to_string(),
        tool.package.to_string(),
    ]);
    let output = ctx.runner.run(&command).await?;

    if !output.success() {
        return Err(Error::ToolInstall {
            tool: tool.package.to_string(),
            detail: output.diagnostic(),
        });
    }

    locate_tool(ctx, tool).ok_or_else(|| Error::ToolInstall {
        tool: tool.package.to_string(),
        detail: format!(
            "npm reported success but no '{}' executable appeared under {}",
            tool.bin,
            tool_dir.display()
        ),
    })
}

/// The Node.js binary that generates the blob and is copied into the output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRuntime {
    /// Real executable path (`process.execPath`), shims resolved
    pub exec_path: PathBuf,
    /// Runtime version
    pub version: semver::Version,
}

/// Asks the configured `node` for its real executable path and version.
///
/// # Errors
///
/// [`Error::ToolNotFound`] when node is missing, [`Error::RuntimeProbe`]
/// when it runs but cannot report itself,
/// [`Error::RuntimeUnsupported`] below [`MIN_SEA_VERSION`].
pub async fn resolve_runtime<R: ToolRunner>(ctx: &StageContext<'_, R>) -> Result<NodeRuntime> {
    let program = ctx
        .config
        .node()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("node"));

    let command = ctx
        .command(program.clone())
        .args(["-e", "console.log(process.execPath); console.log(process.version)"]);
    let output = ctx.runner.run(&command).await?;

    if !output.success() {
        return Err(Error::RuntimeProbe {
            program: program.display().to_string(),
            detail: output.diagnostic(),
        });
    }

    let runtime = parse_runtime_report(&output.stdout).ok_or_else(|| Error::RuntimeProbe {
        program: program.display().to_string(),
        detail: format!("unexpected output {:?}", output.stdout.trim()),
    })?;

    if runtime.version < MIN_SEA_VERSION {
        return Err(Error::RuntimeUnsupported {
            version: runtime.version.to_string(),
            minimum: MIN_SEA_VERSION.to_string(),
        });
    }

    log::info!(
        "Using Node.js {} at {}",
        runtime.version,
        runtime.exec_path.display()
    );
    Ok(runtime)
}

fn parse_runtime_report(stdout: &str) -> Option<NodeRuntime> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
    let exec_path = PathBuf::from(lines.next()?);
    let version = lines.next()?.trim_start_matches('v');
    let version = semver::Version::parse(version).ok()?;
    Some(NodeRuntime { exec_path, version })
}
