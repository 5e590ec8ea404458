//! Server certificate verification settings

use redfin_core::TransportError;
use reqwest::blocking::ClientBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How the server certificate is verified.
///
/// Deserializes from either a boolean or a path to CA material (a PEM
/// bundle, or a directory of PEM files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Verify {
    Enabled(bool),
    CaBundle(PathBuf),
}

impl Default for Verify {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl Verify {
    /// Apply this setting to a client under construction
    pub fn apply(&self, builder: ClientBuilder) -> Result<ClientBuilder, TransportError> {
        match self {
            Self::Enabled(true) => Ok(builder),
            Self::Enabled(false) => {
                warn!("Server certificate verification is disabled");
                Ok(builder.danger_accept_invalid_certs(true))
            }
            Self::CaBundle(path) => {
                let mut builder = builder;
                for certificate in load_certificates(path)? {
                    builder = builder.add_root_certificate(certificate);
                }
                Ok(builder)
            }
        }
    }
}

fn load_certificates(path: &Path) -> Result<Vec<reqwest::Certificate>, TransportError> {
    let files = if path.is_dir() {
        let mut files = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect::<Vec<_>>();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut certificates = Vec::new();
    for file in files {
        let pem = std::fs::read(&file)?;
        let parsed = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| TransportError::Decode {
            url: file.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(path = %file.display(), count = parsed.len(), "Loaded CA certificates");
        certificates.extend(parsed);
    }
    Ok(certificates)
}
