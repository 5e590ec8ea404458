//! Error taxonomy shared by every Redfin crate

use thiserror::Error;

/// Failures raised by a connector while retrieving or decoding a document.
///
/// These pass through the resource layer unchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP {method} {url} returned status {status}: {body}")]
    Http {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },
    #[error("Connection to {url} failed: {message}")]
    Connection { url: String, message: String },
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// HTTP status code, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("The attribute {attribute} is missing from the resource {resource}")]
    MissingAttribute { attribute: String, resource: String },
    #[error("The attribute {attribute} of the resource {resource} is malformed: expected {expected}")]
    MalformedAttribute {
        attribute: String,
        resource: String,
        expected: &'static str,
    },
    #[error("Failed to determine the default {entity}: {error}")]
    UnknownDefault { entity: String, error: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    pub fn missing_attribute(attribute: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::MissingAttribute {
            attribute: attribute.into(),
            resource: resource.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
