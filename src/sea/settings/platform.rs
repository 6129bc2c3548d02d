//! Target platforms and the per-platform capability table.

use crate::sea::{Error, Result};

/// Platform the executable is produced for.
///
/// The runtime binary is copied from the host, so the target is always the
/// host platform in practice; it is still passed explicitly so every stage
/// can be exercised for every platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// Windows (PE executables)
    Windows,
    /// macOS (Mach-O executables, code-signed)
    MacOs,
    /// Linux (ELF executables)
    Linux,
}

/// What a platform requires from the composer and finisher stages.
#[derive(Debug)]
pub struct PlatformCapabilities {
    /// The code signature must be stripped before injection and reapplied after
    pub needs_signature_handling: bool,
    /// Extension appended to the output executable name
    pub exec_suffix: &'static str,
    /// Extra arguments the injector needs on this platform
    pub injector_extra_args: &'static [&'static str],
    /// Extension of npm's `node_modules/.bin` shims
    pub tool_shim_suffix: &'static str,
}

static WINDOWS: PlatformCapabilities = PlatformCapabilities {
    needs_signature_handling: false,
    exec_suffix: ".exe",
    injector_extra_args: &[],
    tool_shim_suffix: ".cmd",
};

static MACOS: PlatformCapabilities = PlatformCapabilities {
    needs_signature_handling: true,
    exec_suffix: "",
    injector_extra_args: &["--macho-segment-name", "NODE_SEA"],
    tool_shim_suffix: "",
};

static LINUX: PlatformCapabilities = PlatformCapabilities {
    needs_signature_handling: false,
    exec_suffix: "",
    injector_extra_args: &[],
    tool_shim_suffix: "",
};

impl Platform {
    /// Detects the host platform.
    pub fn host() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps an OS identifier (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::UnsupportedPlatform {
                os: other.to_string(),
            }),
        }
    }

    /// Capability table entry for this platform.
    pub fn capabilities(self) -> &'static PlatformCapabilities {
        match self {
            Platform::Windows => &WINDOWS,
            Platform::MacOs => &MACOS,
            Platform::Linux => &LINUX,
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
