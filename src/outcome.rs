//! Normalized result of a single HTTP operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Status code recorded when no HTTP response was received at all.
///
/// A server may really answer with 999; check
/// [`Outcome::is_transport_failure`] rather than comparing statuses.
pub const TRANSPORT_FAILURE_STATUS: u16 = 999;

/// Whether `status` is in the 2xx range. The transport sentinel never is.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Binary classification of an operation after the expectation flag is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Success,
    Failure,
}

impl Marker {
    /// Derive the marker from the raw result.
    ///
    /// `succeeded` is true when a 2xx response was received. With
    /// `should_fail` set the caller expects a non-2xx response or a
    /// transport error, so the classification flips.
    pub fn classify(succeeded: bool, should_fail: bool) -> Self {
        if succeeded != should_fail {
            Marker::Success
        } else {
            Marker::Failure
        }
    }

    /// Marker for a received status code.
    pub fn for_status(status: u16, should_fail: bool) -> Self {
        Self::classify(is_success_status(status), should_fail)
    }

    pub fn is_success(self) -> bool {
        self == Marker::Success
    }

    /// Glyph used in panel titles
    pub fn glyph(self) -> &'static str {
        match self {
            Marker::Success => "✅",
            Marker::Failure => "❌",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Success => write!(f, "SUCCESS"),
            Marker::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Outcome of one request, as handed to the recorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    marker: Marker,

    /// Parsed body, wrapped raw text, or an error description
    content: Value,

    /// HTTP status, or [`TRANSPORT_FAILURE_STATUS`]
    status: u16,

    /// Caller bookkeeping carried through untouched
    extract: Option<String>,

    /// Set when no response was received
    #[serde(default)]
    transport_failed: bool,
}

impl Outcome {
    pub fn new(marker: Marker, content: Value, status: u16, extract: Option<String>) -> Self {
        Self {
            marker,
            content,
            status,
            extract,
            transport_failed: false,
        }
    }

    /// Outcome for a request that never got a response
    pub fn transport_failure(marker: Marker, content: Value, extract: Option<String>) -> Self {
        Self {
            transport_failed: true,
            ..Self::new(marker, content, TRANSPORT_FAILURE_STATUS, extract)
        }
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn extract(&self) -> Option<&str> {
        self.extract.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.marker.is_success()
    }

    /// True when the request never produced a response.
    pub fn is_transport_failure(&self) -> bool {
        self.transport_failed
    }

    pub fn into_content(self) -> Value {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_marker_without_expectation_follows_2xx() {
        for status in [100u16, 199, 200, 201, 204, 299, 300, 301, 404, 500, 999] {
            let expected = (200..300).contains(&status);
            assert_eq!(
                Marker::for_status(status, false).is_success(),
                expected,
                "status {status}"
            );
        }
    }

    #[test]
    fn test_marker_with_expectation_inverts() {
        for status in [100u16, 199, 200, 201, 204, 299, 300, 301, 404, 500, 999] {
            let expected = !(200..300).contains(&status);
            assert_eq!(
                Marker::for_status(status, true).is_success(),
                expected,
                "status {status}"
            );
        }
    }

    #[test]
    fn test_sentinel_is_never_2xx() {
        assert!(!is_success_status(TRANSPORT_FAILURE_STATUS));
        assert_eq!(Marker::for_status(TRANSPORT_FAILURE_STATUS, true), Marker::Success);
        assert_eq!(Marker::for_status(TRANSPORT_FAILURE_STATUS, false), Marker::Failure);
    }

    #[test]
    fn test_marker_display_and_glyph() {
        assert_eq!(Marker::Success.to_string(), "SUCCESS");
        assert_eq!(Marker::Failure.to_string(), "FAILURE");
        assert_eq!(Marker::Success.glyph(), "✅");
        assert_eq!(Marker::Failure.glyph(), "❌");
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = Outcome::new(Marker::Success, json!({"id": 1}), 200, Some("id".into()));
        assert!(outcome.is_success());
        assert!(!outcome.is_transport_failure());
        assert_eq!(outcome.status(), 200);
        assert_eq!(outcome.extract(), Some("id"));
        assert_eq!(outcome.content()["id"], 1);
        assert_eq!(outcome.into_content(), json!({"id": 1}));
    }

    #[test]
    fn test_real_999_response_is_not_a_transport_failure() {
        let received = Outcome::new(Marker::Failure, json!({}), TRANSPORT_FAILURE_STATUS, None);
        assert!(!received.is_transport_failure());

        let lost = Outcome::transport_failure(Marker::Failure, json!({}), None);
        assert!(lost.is_transport_failure());
        assert_eq!(lost.status(), TRANSPORT_FAILURE_STATUS);
    }

    #[test]
    fn test_marker_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Marker::Failure).unwrap(), "\"failure\"");
    }
}
