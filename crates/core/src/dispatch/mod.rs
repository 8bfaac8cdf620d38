//! Command dispatch
//!
//! Maps a frame's command code to its handler through the fixed
//! [`CommandCodes`] table. Dispatch is a pure function of the header, the
//! body and the tracking snapshot passed in; it publishes nothing itself.

mod handlers;

use std::sync::Arc;

use crate::config::DecoderConfig;
use crate::debug::{DebugSink, TracingDebugSink};
use crate::error::Result;
use crate::protocol::{decode_fields, FrameHeader};
use crate::tracking::TrackingState;
use crate::types::{Command, CommandCodes, NormalizedEvent};

use handlers::HandlerContext;

/// Result of dispatching one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub command: Command,
    /// Events in publish order
    pub events: Vec<NormalizedEvent>,
    /// Hardware frame dropped by the tracking filter
    pub suppressed: bool,
}

impl Dispatched {
    fn new(command: Command, events: Vec<NormalizedEvent>) -> Self {
        Self {
            command,
            events,
            suppressed: false,
        }
    }
}

/// Routes frames to per-command handlers
#[derive(Clone)]
pub struct Dispatcher {
    codes: CommandCodes,
    report_unknown: bool,
    debug: Option<Arc<dyn DebugSink>>,
}

impl Dispatcher {
    /// Dispatcher over `codes` with debug records disabled
    pub fn new(codes: CommandCodes) -> Self {
        Self {
            codes,
            report_unknown: false,
            debug: None,
        }
    }

    /// Build from config, validating the command table
    ///
    /// `config.debug` attaches a [`TracingDebugSink`].
    pub fn from_config(config: &DecoderConfig) -> Result<Self> {
        config.command_codes.validate()?;
        let mut dispatcher = Self::new(config.command_codes);
        dispatcher.report_unknown = config.report_unknown;
        if config.debug {
            dispatcher.debug = Some(Arc::new(TracingDebugSink));
        }
        Ok(dispatcher)
    }

    /// Replace the debug sink
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.debug = Some(sink);
        self
    }

    pub fn codes(&self) -> &CommandCodes {
        &self.codes
    }

    pub fn debug_sink(&self) -> Option<&dyn DebugSink> {
        self.debug.as_deref()
    }

    /// Dispatch one frame
    ///
    /// Fails only with `InvalidEncoding`, for commands whose body is text.
    /// Unknown commands always succeed.
    pub fn dispatch(
        &self,
        header: FrameHeader,
        body: &[u8],
        tracking: &TrackingState,
    ) -> Result<Dispatched> {
        let command = self.codes.resolve(header.command);
        let ctx = HandlerContext {
            header,
            tracking,
            debug: self.debug_sink(),
        };

        tracing::debug!(
            "Dispatching {} (code {}, msg {}, {} body bytes)",
            command.label(),
            header.command,
            header.message_id,
            body.len()
        );

        let dispatched = match command {
            Command::Response => Dispatched::new(command, handlers::response(&ctx, body)),
            Command::Unknown(_) => {
                Dispatched::new(command, handlers::unknown(&ctx, self.report_unknown))
            }
            Command::Hardware => {
                let fields = decode_fields(body)?;
                match handlers::hardware(&ctx, &fields) {
                    Some(events) => Dispatched::new(command, events),
                    None => Dispatched {
                        command,
                        events: Vec::new(),
                        suppressed: true,
                    },
                }
            }
            Command::LogEvent => {
                Dispatched::new(command, handlers::log_event(&ctx, &decode_fields(body)?))
            }
            Command::DeviceConnect => {
                Dispatched::new(command, handlers::device_connect(&ctx, &decode_fields(body)?))
            }
            Command::DeviceDisconnect => Dispatched::new(
                command,
                handlers::device_disconnect(&ctx, &decode_fields(body)?),
            ),
            Command::AppSync => {
                Dispatched::new(command, handlers::app_sync(&ctx, &decode_fields(body)?))
            }
        };

        Ok(dispatched)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(CommandCodes::default())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("codes", &self.codes)
            .field("report_unknown", &self.report_unknown)
            .field("debug", &self.debug.is_some())
            .finish()
    }
}
