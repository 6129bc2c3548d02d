//! Project metadata from a single package.json

use crate::sea::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::path::Path;

/// Manifest file name looked up at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Optional `"node2exe"` section of package.json.
///
/// ```json
/// {
///   "node2exe": {
///     "bundle": false,
///     "signingIdentity": "Developer ID Application: Acme (TEAMID)",
///     "toolTimeoutSecs": 900
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackagingSettings {
    /// `false` disables dependency bundling
    #[serde(default)]
    pub bundle: Option<bool>,

    /// macOS signing identity used after injection
    #[serde(default)]
    pub signing_identity: Option<String>,

    /// Bounded wait for each external tool
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
}

/// The package.json fields the pipeline reads. Never written back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectManifest {
    /// Declared entry point (`main`)
    pub main: Option<String>,

    /// Declared version (`version`)
    pub version: Option<String>,

    /// Packaging settings (`node2exe`)
    pub packaging: PackagingSettings,
}

impl ProjectManifest {
    /// Parses manifest text. `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|source| Error::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let object = value.as_object().ok_or_else(|| Error::ManifestParse {
            path: path.to_path_buf(),
            source: serde::de::Error::custom("top-level value is not an object"),
        })?;

        let main = match object.get("main") {
            Some(serde_json::Value::String(main)) if !main.trim().is_empty() => {
                Some(main.clone())
            }
            Some(serde_json::Value::String(_)) | None => None,
            Some(other) => {
                log::warn!("Ignoring non-string \"main\" in {}: {}", path.display(), other);
                None
            }
        };

        let version = object
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        let packaging = match object.get("node2exe") {
            Some(section) => PackagingSettings::deserialize(section).map_err(|source| {
                Error::ManifestParse {
                    path: path.to_path_buf(),
                    source,
                }
            })?,
            None => PackagingSettings::default(),
        };

        Ok(Self {
            main,
            version,
            packaging,
        })
    }
}

/// Load the manifest from the project root (single read + parse).
pub fn load_manifest(project_root: &Path) -> Result<ProjectManifest> {
    let path = project_root.join(MANIFEST_FILE);

    if !path.is_file() {
        return Err(Error::ManifestMissing { path });
    }

    let text = std::fs::read_to_string(&path).fs_context("reading manifest", &path)?;
    let manifest = ProjectManifest::parse(&text, &path)?;

    log::debug!(
        "Loaded {} (main: {:?}, version: {:?})",
        path.display(),
        manifest.main,
        manifest.version
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ProjectManifest> {
        ProjectManifest::parse(text, Path::new("package.json"))
    }

    #[test]
    fn reads_main_and_version() {
        let manifest = parse(r#"{ "name": "demo", "main": "app.js", "version": "2.1.0" }"#).unwrap();
        assert_eq!(manifest.main.as_deref(), Some("app.js"));
        assert_eq!(manifest.version.as_deref(), Some("2.1.0"));
        assert_eq!(manifest.packaging, PackagingSettings::default());
    }

    #[test]
    fn blank_fields_count_as_absent() {
        let manifest = parse(r#"{ "main": "  ", "version": "" }"#).unwrap();
        assert_eq!(manifest.main, None);
        assert_eq!(manifest.version, None);
    }

    #[test]
    fn reads_packaging_section() {
        let manifest = parse(
            r#"{ "node2exe": { "bundle": false, "signingIdentity": "-", "toolTimeoutSecs": 42 } }"#,
        )
        .unwrap();
        assert_eq!(
            manifest.packaging,
            PackagingSettings {
                bundle: Some(false),
                signing_identity: Some("-".into()),
                tool_timeout_secs: Some(42),
            }
        );
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(parse("{ \"main\": "), Err(Error::ManifestParse { .. })));
        assert!(matches!(parse("[1, 2]"), Err(Error::ManifestParse { .. })));
    }

    #[test]
    fn missing_file_is_reported_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestMissing { ref path } if path.ends_with(MANIFEST_FILE)));
    }
}
