//! Dataset management and event ingestion.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::http::Transport;

/// Payload encodings accepted by the ingest endpoint. The response
/// validator also matches failure bodies against this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    NdJson,
    Csv,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::NdJson => "application/x-ndjson",
            ContentType::Csv => "text/csv",
        }
    }

    /// Parses a `content-type` header value, ignoring any `;`-delimited
    /// parameters such as a charset suffix.
    pub fn from_header(value: &str) -> Option<Self> {
        match value.split(';').next().unwrap_or("").trim() {
            "application/json" => Some(ContentType::Json),
            "application/x-ndjson" => Some(ContentType::NdJson),
            "text/csv" => Some(ContentType::Csv),
            _ => None,
        }
    }
}

/// A named store of events.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub who: String,
    #[serde(default)]
    pub created: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetCreateRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetUpdateRequest {
    pub description: String,
}

/// Outcome of an ingest call. `failures` carries one entry per
/// rejected event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStatus {
    pub ingested: u64,
    pub failed: u64,
    #[serde(default)]
    pub failures: Vec<IngestFailure>,
    #[serde(default)]
    pub processed_bytes: u64,
    #[serde(default)]
    pub blocks_created: u64,
    #[serde(default)]
    pub wal_length: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestFailure {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub error: String,
}

/// Optional ingest parameters, sent as query parameters.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Event field to read the timestamp from instead of `_time`.
    pub timestamp_field: Option<String>,
    /// Format of that field, in Go reference-time notation.
    pub timestamp_format: Option<String>,
    /// Field delimiter for CSV payloads.
    pub csv_delimiter: Option<String>,
}

impl IngestOptions {
    fn query(&self) -> Vec<(&'static str, &str)> {
        let mut query = Vec::new();
        if let Some(field) = &self.timestamp_field {
            query.push(("timestamp-field", field.as_str()));
        }
        if let Some(format) = &self.timestamp_format {
            query.push(("timestamp-format", format.as_str()));
        }
        if let Some(delimiter) = &self.csv_delimiter {
            query.push(("csv-delimiter", delimiter.as_str()));
        }
        query
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimResult {
    #[serde(default)]
    pub num_deleted: u64,
}

/// Client for the dataset endpoints.
#[derive(Debug, Clone)]
pub struct DatasetsClient {
    transport: Transport,
}

impl DatasetsClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn list(&self) -> Result<Vec<Dataset>> {
        self.transport.get("datasets")
    }

    pub fn get(&self, name: &str) -> Result<Dataset> {
        self.transport.get(&format!("datasets/{}", name))
    }

    pub fn create(&self, request: &DatasetCreateRequest) -> Result<Dataset> {
        self.transport.post("datasets", request)
    }

    pub fn update(&self, name: &str, request: &DatasetUpdateRequest) -> Result<Dataset> {
        self.transport.put(&format!("datasets/{}", name), request)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.transport.delete(&format!("datasets/{}", name))
    }

    /// Removes all data older than `max_duration` from the dataset.
    pub fn trim(&self, name: &str, max_duration: Duration) -> Result<TrimResult> {
        let body = serde_json::json!({
            "maxDuration": format!("{}s", max_duration.as_secs()),
        });
        self.transport.post(&format!("datasets/{}/trim", name), &body)
    }

    /// Encodes `events` as NDJSON and ingests them.
    pub fn ingest_events(&self, name: &str, events: &[Value]) -> Result<IngestStatus> {
        let mut payload = Vec::new();
        for event in events {
            serde_json::to_writer(&mut payload, event)?;
            payload.push(b'\n');
        }
        self.ingest_raw(name, payload, ContentType::NdJson, &IngestOptions::default())
    }

    /// Ingests a caller-encoded payload (JSON array, NDJSON, or CSV).
    pub fn ingest_raw(
        &self,
        name: &str,
        payload: Vec<u8>,
        content_type: ContentType,
        options: &IngestOptions,
    ) -> Result<IngestStatus> {
        self.transport.post_bytes(
            &format!("datasets/{}/ingest", name),
            payload,
            content_type,
            &options.query(),
        )
    }
}
