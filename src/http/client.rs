use anyhow::Result;
use reqwest::{Client, Method, redirect::Policy};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::models::{EndpointDescriptor, HttpMethod, ResponseCapture, TransportError};

const REQUEST_TIMEOUT_SECS: u64 = 15;
const MAX_REDIRECTS: usize = 5;
const DEFAULT_USER_AGENT: &str = concat!("vulnprobe/", env!("CARGO_PKG_VERSION"));

/// Dispatches one request per descriptor. Never fails toward the caller:
/// transport problems come back as a status-0 capture with a classified
/// error, and every HTTP status (4xx/5xx included) is a valid outcome for
/// the analyzers to interpret.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(false)
            .build()?;

        Ok(Self { client })
    }

    pub async fn send(&self, endpoint: &EndpointDescriptor) -> ResponseCapture {
        let start = Instant::now();

        let url = Self::full_url(endpoint);
        let method = Self::to_reqwest_method(endpoint.method);
        let mut request = self.client.request(method, &url);

        let mut has_user_agent = false;
        let mut has_accept = false;
        let mut has_content_type = false;
        for (key, value) in &endpoint.headers {
            if key.eq_ignore_ascii_case("user-agent") {
                has_user_agent = true;
            }
            if key.eq_ignore_ascii_case("accept") {
                has_accept = true;
            }
            if key.eq_ignore_ascii_case("content-type") {
                has_content_type = true;
            }
            request = request.header(key, value);
        }

        if !has_user_agent {
            request = request.header("User-Agent", DEFAULT_USER_AGENT);
        }
        if !has_accept {
            request = request.header("Accept", "application/json, text/plain, */*");
        }

        if endpoint.method.carries_body() {
            if let Some(body) = &endpoint.body {
                request = match body {
                    serde_json::Value::String(raw) => {
                        let mut req = request;
                        if !has_content_type {
                            req = req
                                .header("Content-Type", "application/x-www-form-urlencoded");
                        }
                        req.body(raw.clone())
                    }
                    structured => {
                        let mut req = request;
                        if !has_content_type {
                            req = req.header("Content-Type", "application/json");
                        }
                        req.body(structured.to_string())
                    }
                };
            }
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let headers: BTreeMap<String, String> = response
                    .headers()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                    .collect();
                let body = response.text().await.unwrap_or_default();
                let duration_ms = start.elapsed().as_millis() as u64;

                ResponseCapture::new(status, headers, body, duration_ms)
            }
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                let kind = Self::classify_error(&e);
                ResponseCapture::transport_failure(kind, e.to_string(), duration_ms)
            }
        }
    }

    /// Absolute URL with the descriptor's query params appended.
    pub fn full_url(endpoint: &EndpointDescriptor) -> String {
        let base = endpoint.absolute_url();
        if endpoint.query_params.is_empty() {
            return base;
        }

        let pairs: Vec<String> = endpoint
            .query_params
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    urlencoding::encode(k).into_owned()
                } else {
                    format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))
                }
            })
            .collect();

        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, pairs.join("&"))
    }

    fn classify_error(e: &reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::TimedOut
        } else if e.is_connect() {
            TransportError::ConnectionRefused
        } else {
            TransportError::Other
        }
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }
}
