use std::collections::BTreeMap;
use std::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{EndpointDescriptor, HttpMethod};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read endpoints file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("endpoints file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("endpoint #{index} ({name}): invalid HTTP method \"{method}\"")]
    InvalidMethod {
        index: usize,
        name: String,
        method: String,
    },
    #[error("endpoint #{index} ({name}): url must not be empty")]
    EmptyUrl { index: usize, name: String },
    #[error("no endpoints found in input")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    #[serde(default)]
    name: String,
    #[serde(default)]
    method: Option<String>,
    url: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Option<serde_json::Value>,
    #[serde(default, alias = "queryParams")]
    query_params: BTreeMap<String, String>,
}

/// Parses a JSON endpoints file (array of descriptor objects) into scan
/// input. Rejects malformed entries up front so the orchestrator never sees
/// a bad descriptor.
pub struct EndpointFileParser;

impl EndpointFileParser {
    pub fn parse_file(path: &str) -> Result<Vec<EndpointDescriptor>, ParseError> {
        let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse_content(&content)
    }

    pub fn parse_content(content: &str) -> Result<Vec<EndpointDescriptor>, ParseError> {
        let raw: Vec<RawEndpoint> = serde_json::from_str(content)?;

        let mut endpoints = Vec::with_capacity(raw.len());
        for (index, entry) in raw.into_iter().enumerate() {
            if entry.url.trim().is_empty() {
                return Err(ParseError::EmptyUrl {
                    index,
                    name: entry.name,
                });
            }

            // Method defaults to GET when absent.
            let method = match &entry.method {
                None => HttpMethod::Get,
                Some(m) => HttpMethod::parse(m).ok_or_else(|| ParseError::InvalidMethod {
                    index,
                    name: entry.name.clone(),
                    method: m.clone(),
                })?,
            };

            let name = if entry.name.is_empty() {
                entry.url.clone()
            } else {
                entry.name
            };

            endpoints.push(EndpointDescriptor {
                name,
                method,
                url: entry.url,
                headers: entry.headers,
                body: entry.body,
                query_params: entry.query_params,
            });
        }

        if endpoints.is_empty() {
            return Err(ParseError::Empty);
        }

        Ok(endpoints)
    }
}
