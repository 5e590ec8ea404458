//! Unauthenticated connector for published registry content

use redfin_core::{PublicConnector, TransportError};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Fetches absolute URLs without credentials
pub struct PublicHttpConnector {
    client: Client,
}

impl PublicHttpConnector {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Connection {
                url: String::new(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl PublicConnector for PublicHttpConnector {
    fn get(&self, url: &str) -> Result<Value, TransportError> {
        debug!(url = %url, "Fetching public document");

        let response = self.client.get(url).send().map_err(|e| TransportError::Connection {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                method: "GET",
                url: url.to_string(),
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        response.json().map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
