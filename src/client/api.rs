//! Verb wrappers that turn every request into an [`Outcome`].
//!
//! Nothing here returns an error. Non-2xx statuses, transport failures and
//! unparseable bodies all end up in the outcome's marker and content, so
//! calling code can fire requests unconditionally and hand the result to a
//! [`Recorder`](crate::recorder::Recorder).

use serde_json::{Value, json};
use std::time::Duration;

use super::transport::{ReqwestTransport, Transport};
use super::types::{Method, RawResponse, Request, RequestOptions, TransportResult, set_header};
use crate::config;
use crate::outcome::{Marker, Outcome, is_success_status};

/// Content of a GET outcome whose 2xx body is not JSON
pub const INVALID_JSON_MESSAGE: &str = "response is not valid JSON";

/// Synchronous API client over a [`Transport`]
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    transport: T,
    timeout: Duration,
}

impl ApiClient<ReqwestTransport> {
    /// Client over `reqwest` using the configured timeout
    pub fn new() -> TransportResult<Self> {
        let timeout = config::request_timeout();
        Ok(Self {
            transport: ReqwestTransport::with_timeout(timeout)?,
            timeout,
        })
    }
}

impl<T: Transport> ApiClient<T> {
    /// Client over a custom transport with the configured timeout
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            timeout: config::request_timeout(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, url: &str, options: RequestOptions) -> Outcome {
        self.execute(Method::Get, url, options)
    }

    pub fn post(&self, url: &str, options: RequestOptions) -> Outcome {
        self.execute(Method::Post, url, options)
    }

    pub fn put(&self, url: &str, options: RequestOptions) -> Outcome {
        self.execute(Method::Put, url, options)
    }

    pub fn patch(&self, url: &str, options: RequestOptions) -> Outcome {
        self.execute(Method::Patch, url, options)
    }

    pub fn delete(&self, url: &str, options: RequestOptions) -> Outcome {
        self.execute(Method::Delete, url, options)
    }

    pub fn options(&self, url: &str, options: RequestOptions) -> Outcome {
        self.execute(Method::Options, url, options)
    }

    /// Issue one request and classify the result.
    pub fn execute(&self, method: Method, url: &str, options: RequestOptions) -> Outcome {
        let request = self.prepare(method, url, &options);
        let should_fail = options.should_fail;
        let extract = options.extract;

        match self.transport.send(&request) {
            Ok(response) => classify_response(method, &response, should_fail, extract),
            Err(e) => Outcome::transport_failure(
                Marker::classify(false, should_fail),
                json!({"error": "request exception", "details": e.to_string()}),
                extract,
            ),
        }
    }

    fn prepare(&self, method: Method, url: &str, options: &RequestOptions) -> Request {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }
        if let Some(token) = &options.bearer {
            set_header(&mut headers, "Authorization", &format!("Bearer {}", token));
        }

        Request {
            method,
            url: url.to_string(),
            headers,
            body: options.body.as_ref().map(|b| b.to_wire()),
            timeout: self.timeout,
        }
    }
}

/// Classify a received response.
pub fn classify_response(
    method: Method,
    response: &RawResponse,
    should_fail: bool,
    extract: Option<String>,
) -> Outcome {
    let status = response.status;

    if !is_success_status(status) {
        let details = parse_or_text(&response.body);
        return Outcome::new(
            Marker::classify(false, should_fail),
            json!({"error": format!("unexpected status: {}", status), "details": details}),
            status,
            extract,
        );
    }

    let parsed = serde_json::from_str::<Value>(&response.body).ok();
    let content = match (method, parsed) {
        (_, Some(value)) => value,
        // An API test cannot assert anything useful against a non-JSON GET
        (Method::Get, None) => {
            return Outcome::new(
                Marker::Failure,
                Value::String(INVALID_JSON_MESSAGE.to_string()),
                status,
                extract,
            );
        }
        (Method::Options, None) => allow_headers(response),
        (_, None) => json!({"response": response.body}),
    };

    if should_fail {
        Outcome::new(
            Marker::Failure,
            json!({"error": format!("unexpected success: {}", status), "details": content}),
            status,
            extract,
        )
    } else {
        Outcome::new(Marker::Success, content, status, extract)
    }
}

fn parse_or_text(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// OPTIONS responses rarely carry a body; report the CORS headers instead.
fn allow_headers(response: &RawResponse) -> Value {
    let field = |name: &str| {
        response
            .header(name)
            .map_or(Value::Null, |v| Value::String(v.to_string()))
    };

    json!({
        "allow": field("Allow"),
        "access_control_allow_methods": field("Access-Control-Allow-Methods"),
        "access_control_allow_headers": field("Access-Control-Allow-Headers"),
        "access_control_max_age": field("Access-Control-Max-Age"),
    })
}
