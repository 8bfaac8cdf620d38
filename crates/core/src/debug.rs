//! Advisory debug records
//!
//! When debug mode is on, every handled frame (and every dropped one)
//! produces a [`DebugRecord`]. Sinks only observe: nothing a sink does can
//! change what gets dispatched or published.

use serde::Serialize;

use crate::tracking::TrackingState;

/// Structured diagnostic for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DebugRecord {
    /// Handler or failure label, e.g. `"Hardware"` or `"Dropped"`
    pub label: &'static str,
    pub command: u8,
    pub msg_id: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_matches: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DebugRecord {
    pub fn new(label: &'static str, command: u8, msg_id: u16) -> Self {
        Self {
            label,
            command,
            msg_id,
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: &[String]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    pub fn with_device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_owned());
        self
    }
}

/// Receiver for debug records
pub trait DebugSink: Send + Sync {
    fn record(&self, record: &DebugRecord);
}

/// Emits records as JSON on the `devwire::debug` tracing target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDebugSink;

impl DebugSink for TracingDebugSink {
    fn record(&self, record: &DebugRecord) {
        match serde_json::to_string(record) {
            Ok(json) => tracing::debug!(target: "devwire::debug", "{} {}", record.label, json),
            Err(e) => tracing::warn!(target: "devwire::debug", "Failed to render debug record: {}", e),
        }
    }
}
