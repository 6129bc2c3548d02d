//! sea-config.json, the blob descriptor.
//!
//! Treated as a small key-value store with one merge rule: `main` is always
//! rewritten to the current entry point, the other known keys are filled in
//! only when absent, and unknown keys keep their values and order. Reruns on
//! an unchanged project therefore produce byte-identical content, and the
//! file is not touched at all when nothing changed.

use crate::sea::stages::EntryPoint;
use crate::sea::{Error, ErrorExt, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Descriptor file name at the project root.
pub const DESCRIPTOR_FILE: &str = "sea-config.json";

/// Blob file name used when the descriptor does not name one.
pub const DEFAULT_BLOB_FILE: &str = "sea-prep.blob";

const MAIN_KEY: &str = "main";
const OUTPUT_KEY: &str = "output";
const WARNING_KEY: &str = "disableExperimentalSEAWarning";

/// What happened to the descriptor file on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorWrite {
    /// File did not exist and was created
    Created,
    /// File existed and was rewritten
    Updated,
    /// File already had the merged content
    Unchanged,
}

/// In-memory descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobDescriptor {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl BlobDescriptor {
    /// Fresh descriptor with default fields for `entry`.
    pub fn new(path: PathBuf, entry: &EntryPoint) -> Self {
        let mut fields = Map::new();
        fields.insert(MAIN_KEY.into(), Value::String(entry.descriptor_value()));
        fields.insert(OUTPUT_KEY.into(), Value::String(DEFAULT_BLOB_FILE.into()));
        fields.insert(WARNING_KEY.into(), Value::Bool(true));
        Self { path, fields }
    }

    /// Parses existing descriptor text.
    pub fn parse(path: PathBuf, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::Descriptor {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        match value {
            Value::Object(fields) => Ok(Self { path, fields }),
            _ => Err(Error::Descriptor {
                path,
                reason: "top-level value is not an object".into(),
            }),
        }
    }

    /// Applies the merge rule for `entry`.
    pub fn merge_entry(&mut self, entry: &EntryPoint) -> Result<()> {
        self.fields
            .insert(MAIN_KEY.into(), Value::String(entry.descriptor_value()));
        self.fields
            .entry(OUTPUT_KEY)
            .or_insert_with(|| Value::String(DEFAULT_BLOB_FILE.into()));
        self.fields.entry(WARNING_KEY).or_insert(Value::Bool(true));

        match self.fields.get(OUTPUT_KEY) {
            Some(Value::String(output)) if !output.trim().is_empty() => Ok(()),
            other => Err(Error::Descriptor {
                path: self.path.clone(),
                reason: format!("\"output\" must be a non-empty string, found {:?}", other),
            }),
        }
    }

    /// Descriptor location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry path recorded in the descriptor.
    pub fn main(&self) -> Option<&str> {
        self.fields.get(MAIN_KEY).and_then(Value::as_str)
    }

    /// Blob file name recorded in the descriptor.
    pub fn blob_file(&self) -> &str {
        self.fields
            .get(OUTPUT_KEY)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_BLOB_FILE)
    }

    /// Serialized file content.
    pub fn render(&self) -> String {
        let mut text = serde_json::to_string_pretty(&self.fields).unwrap_or_else(|_| "{}".into());
        text.push('\n');
        text
    }
}

/// Read-merge-write of `<root>/sea-config.json` for `entry`.
pub async fn write_descriptor(
    root: &Path,
    entry: &EntryPoint,
) -> Result<(BlobDescriptor, DescriptorWrite)> {
    let path = root.join(DESCRIPTOR_FILE);

    let existing = match tokio::fs::read_to_string(&path).await {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).fs_context("reading blob descriptor", &path),
    };

    let (descriptor, previous) = match existing {
        Some(text) => {
            let mut descriptor = BlobDescriptor::parse(path.clone(), &text)?;
            descriptor.merge_entry(entry)?;
            (descriptor, Some(text))
        }
        None => (BlobDescriptor::new(path.clone(), entry), None),
    };

    let rendered = descriptor.render();
    let write = match previous {
        Some(ref text) if *text == rendered => DescriptorWrite::Unchanged,
        Some(_) => DescriptorWrite::Updated,
        None => DescriptorWrite::Created,
    };

    if write != DescriptorWrite::Unchanged {
        tokio::fs::write(&path, rendered)
            .await
            .fs_context("writing blob descriptor", &path)?;
    }

    log::debug!("{} {:?} (main: {:?})", path.display(), write, descriptor.main());
    Ok((descriptor, write))
}
