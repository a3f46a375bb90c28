use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// HTTP verbs supported by the wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" | "OPTION" => Ok(Method::Options),
            other => Err(format!("unsupported method '{}'", other)),
        }
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Sent verbatim
    Text(String),
    /// Serialized as JSON before sending
    Json(Value),
}

impl Body {
    /// Wire representation of the body
    pub fn to_wire(&self) -> String {
        match self {
            Body::Text(text) => text.clone(),
            Body::Json(value) => value.to_string(),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

/// Per-request options for [`ApiClient`](super::ApiClient) calls
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Optional request body
    pub body: Option<Body>,

    /// Sent as `Authorization: Bearer <token>`
    pub bearer: Option<String>,

    /// Caller expects a non-2xx response or a transport error
    pub should_fail: bool,

    /// Opaque caller bookkeeping, copied into the outcome
    pub extract: Option<String>,

    /// Extra headers merged over the defaults (caller wins)
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn should_fail(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    pub fn extract(mut self, hint: impl Into<String>) -> Self {
        self.extract = Some(hint.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully prepared request, as handed to a [`Transport`](super::Transport)
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl Request {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Response as reported by the transport
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// No usable response was received
#[derive(Debug)]
pub enum TransportError {
    /// Request could not be built (bad header name or value, bad URL)
    InvalidRequest(String),
    /// Timed out waiting for the server
    Timeout(String),
    /// Connection, DNS or TLS failure
    Connection(String),
    /// Response body could not be read
    Body(String),
    /// Client could not be constructed
    Setup(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            TransportError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            TransportError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Body(msg) => write!(f, "Failed to read body: {}", msg),
            TransportError::Setup(msg) => write!(f, "Client setup failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Connection(e.to_string())
        }
    }
}

/// Insert or replace a header, matching names case-insensitively.
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(entry) => *entry = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>(), Ok(Method::Get));
        assert_eq!("OPTION".parse::<Method>(), Ok(Method::Options));
        assert!("TRACE".parse::<Method>().is_err());
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_body_wire_format() {
        assert_eq!(Body::from("raw=1").to_wire(), "raw=1");
        assert_eq!(
            Body::from(json!({"title": "帖子"})).to_wire(),
            r#"{"title":"帖子"}"#
        );
        assert_eq!(Body::from(json!([1, 2])).to_wire(), "[1,2]");
    }

    #[test]
    fn test_options_builder() {
        let opts = RequestOptions::new()
            .body("x")
            .bearer("tok")
            .should_fail(true)
            .extract("id")
            .header("X-Source", "demo");

        assert_eq!(opts.body, Some(Body::Text("x".into())));
        assert_eq!(opts.bearer.as_deref(), Some("tok"));
        assert!(opts.should_fail);
        assert_eq!(opts.extract.as_deref(), Some("id"));
        assert_eq!(opts.headers, vec![("X-Source".to_string(), "demo".to_string())]);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        set_header(&mut headers, "content-type", "text/plain");
        set_header(&mut headers, "X-Trace", "1");
        assert_eq!(
            headers,
            vec![
                ("content-type".to_string(), "text/plain".to_string()),
                ("X-Trace".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_response_header_lookup() {
        let resp = RawResponse::new(204, "").with_header("Allow", "GET, POST");
        assert_eq!(resp.header("allow"), Some("GET, POST"));
        assert_eq!(resp.header("Access-Control-Max-Age"), None);
    }
}
