//! Normalized events handed to the state container

use serde::{Deserialize, Serialize};

/// Event produced by a command handler
///
/// One variant per event kind; consumers match on the variant instead of
/// probing payload shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedEvent {
    /// Correlates with a pending request by `id`
    ///
    /// Hardware and app-sync echoes carry the decoded fields in `body` and
    /// no `response_code`.
    Response {
        id: u16,
        command: u8,
        response_code: Option<u32>,
        body: Vec<String>,
    },

    /// Pin reading; `value` is kept as text because devices may send
    /// non-numeric encodings
    Telemetry {
        device_id: Option<i64>,
        pin: Option<i64>,
        value: Option<String>,
    },

    /// Device log event, fields passed through as text
    Log {
        device_id: String,
        event_code: Option<String>,
    },

    /// Device came online
    Connect { device_id: String },

    /// Device went offline
    Disconnect { device_id: String },

    /// Raw report of an unrecognized command (opt-in)
    Unknown { command: u8, id: u16 },
}

impl NormalizedEvent {
    /// Create response event for a request/response frame
    pub fn response(id: u16, command: u8, response_code: Option<u32>) -> Self {
        Self::Response {
            id,
            command,
            response_code,
            body: Vec::new(),
        }
    }

    /// Create response echo carrying the frame fields
    pub fn echo(id: u16, command: u8, body: Vec<String>) -> Self {
        Self::Response {
            id,
            command,
            response_code: None,
            body,
        }
    }

    /// Create telemetry event
    pub fn telemetry(device_id: Option<i64>, pin: Option<i64>, value: Option<String>) -> Self {
        Self::Telemetry {
            device_id,
            pin,
            value,
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Response { .. } => "response",
            Self::Telemetry { .. } => "telemetry",
            Self::Log { .. } => "log",
            Self::Connect { .. } => "connect",
            Self::Disconnect { .. } => "disconnect",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Correlation id, for events that carry one
    pub fn message_id(&self) -> Option<u16> {
        match self {
            Self::Response { id, .. } | Self::Unknown { id, .. } => Some(*id),
            _ => None,
        }
    }
}
