use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportError {
    ConnectionRefused,
    TimedOut,
    Other,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportError::ConnectionRefused => "Connection refused",
            TransportError::TimedOut => "Request timed out",
            TransportError::Other => "Request failed",
        };
        write!(f, "{}", s)
    }
}

/// Everything the dispatcher captured for one probe. Transport failures are
/// represented in-band with status 0 rather than bubbling up as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseCapture {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub size: usize,
    pub duration_ms: u64,
    pub error: Option<TransportError>,
    pub error_detail: Option<String>,
}

impl ResponseCapture {
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: String, duration_ms: u64) -> Self {
        let size = body.len();
        Self {
            status,
            headers,
            body,
            size,
            duration_ms,
            error: None,
            error_detail: None,
        }
    }

    pub fn transport_failure(kind: TransportError, detail: String, duration_ms: u64) -> Self {
        Self {
            status: 0,
            headers: BTreeMap::new(),
            body: String::new(),
            size: 0,
            duration_ms,
            error: Some(kind),
            error_detail: Some(detail),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header lookup, case-insensitive like the wire.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or("")
    }

    /// First 200 chars of the body, with a marker when cut short.
    pub fn preview(&self) -> String {
        const LIMIT: usize = 200;
        if self.body.chars().count() <= LIMIT {
            self.body.clone()
        } else {
            let head: String = self.body.chars().take(LIMIT).collect();
            format!("{}...", head)
        }
    }
}

/// Reference point captured from the unmodified endpoint before any payload
/// goes out. Collected once per endpoint, never recomputed mid-scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Baseline {
    pub status: u16,
    pub duration_ms: u64,
    pub content_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_has_status_zero() {
        let capture = ResponseCapture::transport_failure(
            TransportError::ConnectionRefused,
            "connect error".to_string(),
            12,
        );
        assert_eq!(capture.status, 0);
        assert!(capture.is_error());
        assert!(!capture.is_success());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "text/html".to_string());
        let capture = ResponseCapture::new(200, headers, String::new(), 5);

        assert_eq!(capture.header("content-type"), Some("text/html"));
        assert_eq!(capture.content_type(), "text/html");
        assert_eq!(capture.header("x-missing"), None);
    }

    #[test]
    fn test_preview_truncates_at_200() {
        let body = "x".repeat(500);
        let capture = ResponseCapture::new(200, BTreeMap::new(), body, 5);
        let preview = capture.preview();
        assert_eq!(preview.len(), 203);
        assert!(preview.ends_with("..."));

        let short = ResponseCapture::new(200, BTreeMap::new(), "short".to_string(), 5);
        assert_eq!(short.preview(), "short");
    }
}
