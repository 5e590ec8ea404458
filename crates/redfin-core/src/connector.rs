//! Transport contract consumed by the resource layer
//!
//! The core never speaks HTTP itself. Everything it needs from the wire is
//! expressed by the [`Connector`] trait (the authenticated management
//! channel) and the [`PublicConnector`] trait (registry content that may be
//! hosted outside of the management channel).

use serde_json::Value;
use std::collections::HashMap;

use crate::error::TransportError;

/// Credentials the auth context attaches to a connector
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    SessionToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::SessionToken(_) => f.write_str("SessionToken(<redacted>)"),
        }
    }
}

/// Response to a POST, with header names lowercased
#[derive(Debug, Clone, Default)]
pub struct PostResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl PostResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }
}

/// The authenticated channel to the management service
pub trait Connector {
    /// Retrieve and decode the document at `path`
    fn get(&self, path: &str) -> Result<Value, TransportError>;

    fn post(&self, path: &str, body: &Value) -> Result<PostResponse, TransportError>;

    fn delete(&self, path: &str) -> Result<(), TransportError>;

    /// Attach (or with `None`, detach) credentials sent with every request
    fn set_credentials(&self, credentials: Option<Credentials>);

    /// Release the underlying transport
    fn close(&self) {}
}

/// Transport used only for registry content
pub trait PublicConnector {
    fn get(&self, url: &str) -> Result<Value, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut response = PostResponse::default();
        response
            .headers
            .insert("x-auth-token".to_string(), "abc".to_string());

        assert_eq!(response.header("X-Auth-Token"), Some("abc"));
        assert_eq!(response.header("Location"), None);
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let basic = Credentials::Basic {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{basic:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));

        let token = Credentials::SessionToken("secret".to_string());
        assert!(!format!("{token:?}").contains("secret"));
    }
}
