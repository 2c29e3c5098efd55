use crate::http::HttpClient;
use crate::models::{Baseline, EndpointDescriptor};

/// One dispatcher call against the unmodified endpoint before any payload
/// goes out. Best-effort: a transport failure means no baseline, and the
/// analyzers skip their baseline-dependent checks.
pub struct BaselineCollector;

impl BaselineCollector {
    pub async fn collect(client: &HttpClient, endpoint: &EndpointDescriptor) -> Option<Baseline> {
        let capture = client.send(endpoint).await;
        if capture.is_error() {
            return None;
        }

        let content_length = capture
            .header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(capture.size);

        Some(Baseline {
            status: capture.status,
            duration_ms: capture.duration_ms,
            content_length,
        })
    }
}
