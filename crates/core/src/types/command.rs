//! Command codes and their semantic classes

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Semantic class of an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Reply to an earlier request, carries a status code
    Response,
    /// Live pin/value reading from a device
    Hardware,
    /// Device-originated log event
    LogEvent,
    /// Device came online
    DeviceConnect,
    /// Device went offline
    DeviceDisconnect,
    /// Authoritative state replay after reconnect
    AppSync,
    /// Code outside the command table
    Unknown(u8),
}

impl Command {
    /// Short name used in logs and debug records
    pub fn label(&self) -> &'static str {
        match self {
            Command::Response => "Response",
            Command::Hardware => "Hardware",
            Command::LogEvent => "LogEvent",
            Command::DeviceConnect => "DeviceConnect",
            Command::DeviceDisconnect => "DeviceDisconnect",
            Command::AppSync => "AppSync",
            Command::Unknown(_) => "Unknown",
        }
    }

    /// Whether the device tracking filter applies to this command
    #[inline]
    pub fn is_tracked(&self) -> bool {
        matches!(self, Command::Hardware)
    }
}

/// Command code table
///
/// Defaults follow the relay server's numbering. Deployments talking to a
/// differently numbered server override individual codes in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandCodes {
    pub response: u8,
    pub hardware: u8,
    pub log_event: u8,
    pub device_connect: u8,
    pub device_disconnect: u8,
    pub app_sync: u8,
}

impl Default for CommandCodes {
    fn default() -> Self {
        Self {
            response: 0,
            device_connect: 4,
            hardware: 20,
            app_sync: 25,
            log_event: 64,
            device_disconnect: 71,
        }
    }
}

impl CommandCodes {
    fn entries(&self) -> [(u8, &'static str); 6] {
        [
            (self.response, "response"),
            (self.hardware, "hardware"),
            (self.log_event, "log_event"),
            (self.device_connect, "device_connect"),
            (self.device_disconnect, "device_disconnect"),
            (self.app_sync, "app_sync"),
        ]
    }

    /// Map a raw code to its command class
    pub fn resolve(&self, code: u8) -> Command {
        match code {
            c if c == self.response => Command::Response,
            c if c == self.hardware => Command::Hardware,
            c if c == self.log_event => Command::LogEvent,
            c if c == self.device_connect => Command::DeviceConnect,
            c if c == self.device_disconnect => Command::DeviceDisconnect,
            c if c == self.app_sync => Command::AppSync,
            other => Command::Unknown(other),
        }
    }

    /// Reject tables that assign one code to two commands
    pub fn validate(&self) -> Result<()> {
        let entries = self.entries();
        for (i, &(code, first)) in entries.iter().enumerate() {
            if let Some(&(_, second)) = entries[i + 1..].iter().find(|(c, _)| *c == code) {
                return Err(CoreError::DuplicateCommandCode {
                    code,
                    first,
                    second,
                });
            }
        }
        Ok(())
    }
}
