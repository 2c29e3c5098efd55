use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        };
        write!(f, "{}", s)
    }
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// One HTTP endpoint as handed over by the collection parsers. Headers and
/// query params use BTreeMap so injection variants and test records come out
/// in a reproducible order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,
}

impl EndpointDescriptor {
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            query_params: BTreeMap::new(),
        }
    }

    /// Absolute URL for dispatch. Scheme-less URLs default to https.
    pub fn absolute_url(&self) -> String {
        if self.url.contains("://") {
            self.url.clone()
        } else {
            format!("https://{}", self.url.trim_start_matches('/'))
        }
    }

    /// Spawns an independent copy for mutation. Every injection variant goes
    /// through here so no variant shares state with its source or siblings.
    pub fn spawn_variant(&self) -> Self {
        self.clone()
    }

    pub fn has_structured_body(&self) -> bool {
        matches!(self.body, Some(serde_json::Value::Object(_)))
    }

    pub fn display_label(&self) -> String {
        format!("{:6} {}", self.method, self.name)
    }
}

/// A mutated endpoint plus the label of where the payload landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionVariant {
    pub endpoint: EndpointDescriptor,
    pub injection_point: String,
}

impl InjectionVariant {
    pub fn new(endpoint: EndpointDescriptor, injection_point: impl Into<String>) -> Self {
        Self {
            endpoint,
            injection_point: injection_point.into(),
        }
    }
}
