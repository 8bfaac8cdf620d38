//! Decoder configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::CommandCodes;
use crate::DEFAULT_MAX_BODY_LEN;

/// Decoder settings, loadable from JSON
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Emit a debug record per handled frame
    pub debug: bool,
    /// Command code table
    pub command_codes: CommandCodes,
    /// Frames with a larger body are dropped as malformed
    pub max_body_len: usize,
    /// Also emit `NormalizedEvent::Unknown` for unrecognized commands
    pub report_unknown: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            debug: false,
            command_codes: CommandCodes::default(),
            max_body_len: DEFAULT_MAX_BODY_LEN,
            report_unknown: false,
        }
    }
}

impl DecoderConfig {
    /// Parse from a JSON string and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(serde_json::Error::io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            )))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.command_codes.validate()
    }

    /// Enable debug records
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
