//! Stateless JSON-over-HTTP transport
//!
//! Every operation is a single request. There is no session identifier;
//! "connecting" is a reachability probe.

use biogate_types::DeviceEndpoint;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::*;

/// Device information endpoint, also used as the reachability probe
pub const DEVICE_INFO_PATH: &str = "/api/device/info";

/// Reply body of mutating and matching endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiReply {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

/// HTTP session with a JSON-API device
///
/// Holds a pooled [`reqwest::Client`]; every request is bounded by the
/// endpoint timeout.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    base_url: String,
}

impl HttpSession {
    /// Create a session for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: &DeviceEndpoint) -> Result<Self> {
        let client = Client::builder()
            .timeout(endpoint.timeout())
            .connect_timeout(endpoint.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(endpoint.host(), endpoint.port()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check the device answers its info endpoint with `200`
    pub async fn probe(&self) -> Result<()> {
        let url = self.url(DEVICE_INFO_PATH);
        debug!("Probing {}", url);

        let response = self.client.get(&url).send().await?;
        ensure_ok(response.status(), &url)
    }

    /// GET a JSON object
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] for a non-200 status or a body that is not a JSON
    /// object.
    pub async fn get_json(&self, path: &str) -> Result<Map<String, Value>> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        ensure_ok(response.status(), &url)?;

        let body = response.bytes().await?;
        trace!("GET {} -> {} bytes", url, body.len());

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::Protocol(format!(
                "{} returned JSON {} instead of an object",
                url,
                json_kind(&other)
            ))),
            Err(e) => Err(Error::Protocol(format!("{} returned malformed JSON: {}", url, e))),
        }
    }

    /// POST a JSON body and decode the `{success, message?}` reply
    ///
    /// `success: false` is a normal reply, not an error.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiReply> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        ensure_ok(response.status(), &url)?;

        let bytes = response.bytes().await?;

        let reply: ApiReply = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Protocol(format!("{} returned malformed JSON: {}", url, e))
        })?;

        if !reply.success {
            debug!(
                "POST {} declined: {}",
                url,
                reply.message.as_deref().unwrap_or("<no message>")
            );
        }

        Ok(reply)
    }
}

/// `http://host:port`, bracketing IPv6 literals
fn base_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

fn ensure_ok(status: StatusCode, url: &str) -> Result<()> {
    if status != StatusCode::OK {
        warn!("{} answered {}", url, status);
        return Err(Error::Protocol(format!("{} answered {}", url, status)));
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use crate::testing::serve_once;
    use std::time::Duration;

    #[tokio::test]
    async fn test_probe_ok() {
        let (endpoint, server) = serve_once("200 OK", "{}").await;
        let session = HttpSession::new(&endpoint).unwrap();

        session.probe().await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/device/info HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_get_json_object() {
        let (endpoint, _server) =
            serve_once("200 OK", r#"{"serial_number":"BS2-77","model":"BioStation 2"}"#).await;
        let session = HttpSession::new(&endpoint).unwrap();

        let map = session.get_json(DEVICE_INFO_PATH).await.unwrap();
        assert_eq!(map.get("model"), Some(&json!("BioStation 2")));
    }

    #[tokio::test]
    async fn test_get_json_rejects_non_object() {
        let (endpoint, _server) = serve_once("200 OK", "[1,2,3]").await;
        let session = HttpSession::new(&endpoint).unwrap();

        let result = session.get_json(DEVICE_INFO_PATH).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn test_post_json_success_false_is_a_reply() {
        let (endpoint, server) =
            serve_once("200 OK", r#"{"success":false,"message":"finger not found"}"#).await;
        let session = HttpSession::new(&endpoint).unwrap();

        let reply = session
            .post_json("/api/fingerprint/verify", &json!({"user_id": 123, "finger_index": 0}))
            .await
            .unwrap();

        assert_eq!(
            reply,
            ApiReply {
                success: false,
                message: Some("finger not found".to_string()),
            }
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/fingerprint/verify HTTP/1.1"));
        assert!(request.contains(r#""user_id":123"#));
    }

    #[tokio::test]
    async fn test_post_json_non_200() {
        let (endpoint, _server) = serve_once("500 Internal Server Error", r#"{"success":true}"#).await;
        let session = HttpSession::new(&endpoint).unwrap();

        let result = session.post_json("/api/fingerprint/enroll", &json!({})).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn test_post_json_malformed_body() {
        let (endpoint, _server) = serve_once("200 OK", "not json").await;
        let session = HttpSession::new(&endpoint).unwrap();

        let result = session.post_json("/api/fingerprint/enroll", &json!({})).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[test]
    fn test_url_building() {
        let endpoint = DeviceEndpoint::new("10.0.0.5", 8080, Duration::from_secs(1)).unwrap();
        let session = HttpSession::new(&endpoint).unwrap();

        assert_eq!(session.base_url(), "http://10.0.0.5:8080");
        assert_eq!(session.url("/api/device/info"), "http://10.0.0.5:8080/api/device/info");
    }

    #[test]
    fn test_url_building_ipv6() {
        let endpoint = DeviceEndpoint::new("::1", 8080, Duration::from_secs(1)).unwrap();
        let session = HttpSession::new(&endpoint).unwrap();
        assert_eq!(session.base_url(), "http://[::1]:8080");

        let endpoint = DeviceEndpoint::new("[fe80::1]", 80, Duration::from_secs(1)).unwrap();
        let session = HttpSession::new(&endpoint).unwrap();
        assert_eq!(session.url("/api/device/info"), "http://[fe80::1]:80/api/device/info");
    }
}
