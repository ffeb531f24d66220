//! Request construction.
//!
//! [`Session::create_api_message`] turns an [`ApiCall`] plus [`CallOptions`]
//! into a [`PreparedRequest`] without touching the network.

use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::types::{Body, Query, ReturnType};
use crate::validators::{verify_host, verify_port};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::fmt::Write as _;
use std::net::Ipv6Addr;
use std::time::Duration;

/// Seconds added to the API timeout to get the transport timeout, so the
/// server gets a chance to report its own timeout first.
pub const TRANSPORT_GRACE_SECS: u64 = 5;

/// Every one of these carries the API key; different API generations read
/// different ones.
const AUTH_HEADERS: [&str; 3] = ["x-access-key", "x-token", "x-auth-token"];

/// Per-call replacements for the session's connection settings.
///
/// Applying an override never changes the [`Session`] it is used with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOverride {
    pub host: Option<String>,
    pub port: Option<u32>,
    pub key: Option<String>,
    pub secure: Option<bool>,
}

/// Options that shape a single API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    /// Connection settings to use instead of the session's.
    pub overrides: RequestOverride,
    /// API timeout in seconds. `None` uses the session default.
    pub timeout: Option<u64>,
    /// How to decode the response body.
    pub return_type: ReturnType,
    /// Extra request headers.
    pub additional_headers: Vec<(String, String)>,
    /// Put the port in the URL. Some gateways reject explicit ports.
    pub include_port: bool,
    /// Return the response headers instead of the body.
    pub return_header: bool,
    /// Treat a `response.status` in the async range as success.
    /// See [`ASYNC_STATUS_RANGE`](crate::envelope::ASYNC_STATUS_RANGE).
    pub apply_async_status_override: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            overrides: RequestOverride::default(),
            timeout: None,
            return_type: ReturnType::default(),
            additional_headers: Vec::new(),
            include_port: true,
            return_header: false,
            apply_async_status_override: false,
        }
    }
}

impl CallOptions {
    /// Same as [`CallOptions::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `overrides` in place of the session's connection settings.
    #[must_use]
    pub fn with_overrides(mut self, overrides: RequestOverride) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the API timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Chooses how the response body is decoded.
    #[must_use]
    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Adds an extra request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers.push((name.into(), value.into()));
        self
    }

    /// Leaves the port out of the URL when `false`.
    #[must_use]
    pub fn with_include_port(mut self, include_port: bool) -> Self {
        self.include_port = include_port;
        self
    }

    /// Returns the response headers instead of the body.
    #[must_use]
    pub fn with_return_header(mut self, return_header: bool) -> Self {
        self.return_header = return_header;
        self
    }

    /// Accepts async status codes as success.
    #[must_use]
    pub fn with_async_status_override(mut self, apply: bool) -> Self {
        self.apply_async_status_override = apply;
        self
    }
}

/// One API call before connection settings are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Body>,
    pub query: Query,
}

impl ApiCall {
    /// A call to `path` with no body or query parameters.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// A `GET` call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A `PUT` call.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A `DELETE` call.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// A `HEAD` call.
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path)
    }

    /// Sets the JSON body. `timeout` is added when the request is built.
    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the query string parameters.
    #[must_use]
    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }
}

/// A fully resolved request, ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    /// Scheme, host, optional port and path. Query parameters are kept
    /// separately in `query`.
    pub url: String,
    pub headers: HeaderMap,
    pub query: Query,
    /// JSON body, always including the `timeout` field.
    pub body: String,
    /// Transport timeout: the API timeout plus [`TRANSPORT_GRACE_SECS`].
    pub timeout: Duration,
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

impl PreparedRequest {
    /// `HTTP` or `HTTPS`, as used in connection error messages.
    pub fn protocol(&self) -> &'static str {
        if self.secure { "HTTPS" } else { "HTTP" }
    }

    /// Renders an equivalent `curl` command line with credentials redacted.
    pub fn to_curl(&self) -> String {
        let url = reqwest::Url::parse_with_params(&self.url, &self.query)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.url.clone());

        let mut curl = format!("curl -X {} '{}'", self.method, url);
        for (name, value) in &self.headers {
            let value = if AUTH_HEADERS.contains(&name.as_str()) {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            let _ = write!(curl, " -H '{name}: {value}'");
        }
        let _ = write!(curl, " -d '{}'", self.body);
        curl
    }
}

impl Session {
    /// Builds the request for `call` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for a zero timeout, an out-of-range
    /// port or an invalid host, and [`ClientError::Validation`] for header
    /// names or values that cannot be sent.
    pub fn create_api_message(&self, call: &ApiCall, options: &CallOptions) -> Result<PreparedRequest> {
        let timeout = match options.timeout {
            Some(0) => {
                return Err(ClientError::Config(
                    "timeout must be greater than 0".to_string(),
                ));
            }
            Some(timeout) => timeout,
            None => self.default_timeout(),
        };

        let overrides = &options.overrides;
        let host = overrides.host.as_deref().unwrap_or(self.host());
        let host = verify_host(host)?.to_string();
        let key = overrides.key.as_deref().unwrap_or(self.key());
        let secure = overrides.secure.unwrap_or(self.secure());

        let (default_port, scheme) = if secure { (443, "https") } else { (80, "http") };
        let port = match overrides.port.or(self.port()) {
            Some(port) => verify_port(port)?,
            None => default_port,
        };

        let path = if call.path.starts_with('/') {
            call.path.clone()
        } else {
            format!("/{}", call.path)
        };

        let url_host = if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.clone()
        };
        let url = if options.include_port {
            format!("{scheme}://{url_host}:{port}{path}")
        } else {
            format!("{scheme}://{url_host}{path}")
        };

        let headers = build_headers(key, options)?;

        let mut body = call.body.clone().unwrap_or_default();
        body.insert("timeout".to_string(), Value::from(timeout));
        let body = serde_json::to_string(&body)?;

        Ok(PreparedRequest {
            method: call.method.clone(),
            url,
            headers,
            query: call.query.clone(),
            body,
            timeout: Duration::from_secs(timeout + TRANSPORT_GRACE_SECS),
            host,
            port,
            secure,
        })
    }
}

fn build_headers(key: &str, options: &CallOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let key = HeaderValue::from_str(key)
        .map_err(|_| ClientError::Config("API key contains invalid characters".to_string()))?;
    for name in AUTH_HEADERS {
        headers.insert(HeaderName::from_static(name), key.clone());
    }

    if options.return_type != ReturnType::Raw {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    for (name, value) in &options.additional_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::invalid(format!("{name} is not a valid header name")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::invalid(format!("{value} is not a valid header value")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn session(secure: bool, port: Option<u32>) -> Session {
        let mut builder = Session::builder()
            .host("example.com")
            .key("k")
            .secure(secure)
            .no_config_file()
            .env_lookup(|_| None);
        if let Some(port) = port {
            builder = builder.port(port);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_https_default_port() {
        let request = session(true, None)
            .create_api_message(&ApiCall::get("/drives.json"), &CallOptions::default())
            .unwrap();
        assert_eq!(request.url, "https://example.com:443/drives.json");
    }

    #[test]
    fn test_http_explicit_port_and_missing_slash() {
        let request = session(false, Some(8080))
            .create_api_message(&ApiCall::get("drives.json"), &CallOptions::default())
            .unwrap();
        assert_eq!(request.url, "http://example.com:8080/drives.json");
    }

    #[test]
    fn test_include_port_false() {
        let options = CallOptions::default().with_include_port(false);
        let request = session(true, None)
            .create_api_message(&ApiCall::get("/api/pools.json"), &options)
            .unwrap();
        assert_eq!(request.url, "https://example.com/api/pools.json");
    }

    #[test]
    fn test_override_does_not_mutate_session() {
        let session = session(true, None);
        let options = CallOptions::default().with_overrides(RequestOverride {
            host: Some("other.example.com".into()),
            port: Some(8443),
            ..Default::default()
        });

        let request = session
            .create_api_message(&ApiCall::get("/x"), &options)
            .unwrap();
        assert_eq!(request.url, "https://other.example.com:8443/x");
        assert_eq!(session.host(), "example.com");
        assert_eq!(session.port(), None);
    }

    #[test]
    fn test_out_of_range_port() {
        let err = session(true, Some(70000))
            .create_api_message(&ApiCall::get("/x"), &CallOptions::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_timeout_zero_rejected() {
        let err = session(true, None)
            .create_api_message(&ApiCall::get("/x"), &CallOptions::default().with_timeout(0))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_transport_timeout_and_body() {
        let request = session(true, None)
            .create_api_message(&ApiCall::get("/x"), &CallOptions::default())
            .unwrap();
        assert_eq!(request.timeout, Duration::from_secs(20));
        assert_eq!(request.body, r#"{"timeout":15}"#);
    }

    #[test]
    fn test_headers() {
        let request = session(true, None)
            .create_api_message(
                &ApiCall::get("/x"),
                &CallOptions::default().with_header("X-Extra", "1"),
            )
            .unwrap();
        for name in ["x-access-key", "x-token", "x-auth-token"] {
            assert_eq!(request.headers[name], "k");
        }
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.headers["x-extra"], "1");

        let raw = session(true, None)
            .create_api_message(
                &ApiCall::get("/x"),
                &CallOptions::default().with_return_type(ReturnType::Raw),
            )
            .unwrap();
        assert!(raw.headers.get("content-type").is_none());
    }

    #[test]
    fn test_curl_redacts_key() {
        let request = session(true, None)
            .create_api_message(
                &ApiCall::get("/api/drives.json").query(vec![("limit".into(), "10".into())]),
                &CallOptions::default(),
            )
            .unwrap();
        let curl = request.to_curl();
        assert!(curl.starts_with("curl -X GET 'https://example.com/api/drives.json?limit=10'"));
        assert!(curl.contains("x-access-key: <redacted>"));
        assert!(!curl.contains(": k'"));
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let session = Session::builder()
            .host("::1")
            .key("k")
            .no_config_file()
            .env_lookup(|_| None)
            .build()
            .unwrap();
        let request = session
            .create_api_message(&ApiCall::get("/x"), &CallOptions::default())
            .unwrap();
        assert_eq!(request.url, "https://[::1]:443/x");
    }
}
