//! Blocking connector for the authenticated management channel

use redfin_core::{Connector, Credentials, PostResponse, TransportError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde_json::Value;
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, trace};

use crate::verify::Verify;

/// Header carrying a Redfish session token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// HTTP connector bound to one service base URL
pub struct HttpConnector {
    client: Client,
    base_url: String,
    credentials: RefCell<Option<Credentials>>,
}

impl HttpConnector {
    /// Create a connector for `base_url`, e.g. `https://bmc.example.com`
    pub fn new(base_url: &str, verify: &Verify, timeout: Duration) -> Result<Self, TransportError> {
        let builder = Client::builder().timeout(timeout);
        let client = verify
            .apply(builder)?
            .build()
            .map_err(|e| TransportError::Connection {
                url: base_url.to_string(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: RefCell::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`; absolute URLs pass through unchanged
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("OData-Version", "4.0");

        match &*self.credentials.borrow() {
            Some(Credentials::Basic { username, password }) => request.basic_auth(username, Some(password)),
            Some(Credentials::SessionToken(token)) => request.header(AUTH_TOKEN_HEADER, token),
            None => request,
        }
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, TransportError> {
        let url = self.url(path);
        let method_name = method_name(&method);
        trace!(method = method_name, url = %url, "Sending request");

        let mut request = self.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| TransportError::Connection {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!(method = method_name, url = %url, status = status.as_u16(), "Received response");

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Http {
                method: method_name,
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn method_name(method: &Method) -> &'static str {
    [Method::GET, Method::POST, Method::DELETE, Method::PATCH, Method::PUT]
        .iter()
        .zip(["GET", "POST", "DELETE", "PATCH", "PUT"])
        .find(|(known, _)| *known == method)
        .map(|(_, name)| name)
        .unwrap_or("OTHER")
}

/// Decode a JSON body, treating an empty body as `null`
fn decode(url: &str, response: Response) -> Result<Value, TransportError> {
    let bytes = response.bytes().map_err(|e| TransportError::Connection {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

impl Connector for HttpConnector {
    fn get(&self, path: &str) -> Result<Value, TransportError> {
        let response = self.send(Method::GET, path, None)?;
        decode(&self.url(path), response)
    }

    fn post(&self, path: &str, body: &Value) -> Result<PostResponse, TransportError> {
        let response = self.send(Method::POST, path, Some(body))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = decode(&self.url(path), response)?;

        Ok(PostResponse {
            status,
            headers,
            body: (!body.is_null()).then_some(body),
        })
    }

    fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.send(Method::DELETE, path, None)?;
        Ok(())
    }

    fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.credentials.borrow_mut() = credentials;
    }

    fn close(&self) {
        debug!(base_url = %self.base_url, "Closing connector");
        *self.credentials.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> HttpConnector {
        HttpConnector::new(
            "https://bmc.example.com/",
            &Verify::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let conn = connector();
        assert_eq!(conn.base_url(), "https://bmc.example.com");
        assert_eq!(
            conn.url("/redfish/v1/Systems"),
            "https://bmc.example.com/redfish/v1/Systems"
        );
        assert_eq!(conn.url("redfish/v1/"), "https://bmc.example.com/redfish/v1/");
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let conn = connector();
        assert_eq!(
            conn.url("https://other.example.com/redfish/v1/SessionService/Sessions/1"),
            "https://other.example.com/redfish/v1/SessionService/Sessions/1"
        );
    }

    #[test]
    fn test_credentials_are_cleared_on_close() {
        let conn = connector();
        conn.set_credentials(Some(Credentials::SessionToken("token".to_string())));
        assert!(conn.credentials.borrow().is_some());

        conn.close();
        assert!(conn.credentials.borrow().is_none());
    }
}
