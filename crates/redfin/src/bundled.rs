//! Standard message registries shipped with the client

use redfin_core::{Result, TransportError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An enumerable, readable listing of registry documents
pub trait BundledRegistries {
    /// Names of the available documents, sorted
    fn names(&self) -> Result<Vec<String>>;

    fn read(&self, name: &str) -> Result<Value>;
}

const EMBEDDED: &[(&str, &str)] = &[
    (
        "Base.1.4.0.json",
        include_str!("../standard_registries/Base.1.4.0.json"),
    ),
    (
        "ResourceEvent.1.0.3.json",
        include_str!("../standard_registries/ResourceEvent.1.0.3.json"),
    ),
    (
        "TaskEvent.1.0.1.json",
        include_str!("../standard_registries/TaskEvent.1.0.1.json"),
    ),
];

fn decode(name: &str, content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| {
        TransportError::Decode {
            url: name.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// The DMTF registries compiled into the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedRegistries;

impl BundledRegistries for EmbeddedRegistries {
    fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = EMBEDDED.iter().map(|(name, _)| name.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Value> {
        let (_, content) = EMBEDDED
            .iter()
            .find(|(embedded, _)| *embedded == name)
            .ok_or_else(|| {
                TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no embedded registry named {name}"),
                ))
            })?;
        decode(name, content)
    }
}

/// Every `*.json` file of a directory
#[derive(Debug, Clone)]
pub struct DirectoryRegistries {
    dir: PathBuf,
}

impl DirectoryRegistries {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BundledRegistries for DirectoryRegistries {
    fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(TransportError::Io)? {
            let path = entry.map_err(TransportError::Io)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        debug!(dir = %self.dir.display(), count = names.len(), "Listed bundled registries");
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Value> {
        let content = std::fs::read_to_string(self.dir.join(name)).map_err(TransportError::Io)?;
        decode(name, &content)
    }
}
