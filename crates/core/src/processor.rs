//! Frame-at-a-time processing loop body
//!
//! [`FrameProcessor`] glues the pieces together for one inbound frame:
//!
//! 1. parse the envelope (drop on `MalformedFrame`)
//! 2. read the *current* tracking state from the injected source
//! 3. dispatch (drop on `InvalidEncoding`)
//! 4. publish every event, in order, before returning
//!
//! The transport calls [`FrameProcessor::ingest`] for each received buffer,
//! strictly in delivery order.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use crate::config::DecoderConfig;
use crate::debug::{DebugRecord, DebugSink};
use crate::dispatch::Dispatcher;
use crate::error::{CoreError, Result};
use crate::protocol::Frame;
use crate::publish::Publisher;
use crate::tracking::TrackingSource;

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    /// Frames dispatched successfully
    pub frames: u64,
    /// Frames dropped as malformed (short, oversized)
    pub malformed: u64,
    /// Frames dropped for invalid UTF-8
    pub invalid_encoding: u64,
    /// Frames with a command outside the table
    pub unknown_commands: u64,
    /// Hardware frames withheld by the tracking filter
    pub suppressed: u64,
    /// Events handed to the publisher
    pub events: u64,
}

impl ProcessorStats {
    /// Frames dropped for any reason
    pub fn dropped(&self) -> u64 {
        self.malformed + self.invalid_encoding
    }
}

/// Decodes frames and publishes the resulting events
pub struct FrameProcessor<P, T> {
    dispatcher: Dispatcher,
    publisher: P,
    tracking: T,
    max_body_len: usize,
    stats: ProcessorStats,
}

impl<P: Publisher, T: TrackingSource> FrameProcessor<P, T> {
    /// Create a processor with the given publisher and tracking source
    ///
    /// Fails if the config's command table is invalid.
    pub fn new(config: &DecoderConfig, publisher: P, tracking: T) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::from_config(config)?,
            publisher,
            tracking,
            max_body_len: config.max_body_len,
            stats: ProcessorStats::default(),
        })
    }

    /// Replace the debug sink (also enables debug records)
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.dispatcher = self.dispatcher.with_debug_sink(sink);
        self
    }

    /// Decode, dispatch and publish one frame
    ///
    /// Returns the number of events published. On error nothing has been
    /// published and the stream can continue with the next frame.
    pub fn process(&mut self, raw: Bytes) -> Result<usize> {
        let frame = match Frame::parse(raw) {
            Ok(frame) => frame,
            Err(e) => return Err(self.reject(None, e)),
        };

        if frame.body.len() > self.max_body_len {
            let err = CoreError::MalformedFrame(format!(
                "body of {} bytes exceeds limit of {}",
                frame.body.len(),
                self.max_body_len
            ));
            return Err(self.reject(Some(&frame), err));
        }

        // Read at dispatch time, never cached: the UI may retarget between frames
        let tracking = self.tracking.tracking();

        let dispatched = match self.dispatcher.dispatch(frame.header, frame.body(), &tracking) {
            Ok(dispatched) => dispatched,
            Err(e) => return Err(self.reject(Some(&frame), e)),
        };

        self.stats.frames += 1;
        if matches!(dispatched.command, crate::Command::Unknown(_)) {
            self.stats.unknown_commands += 1;
        }
        if dispatched.suppressed {
            self.stats.suppressed += 1;
            tracing::trace!(
                "Suppressed hardware frame {} (tracking {:?})",
                frame.message_id(),
                tracking.tracked_device_id
            );
        }

        let count = dispatched.events.len();
        for event in dispatched.events {
            tracing::trace!("Publishing {} event", event.kind());
            self.publisher.publish(event);
        }
        self.stats.events += count as u64;

        Ok(count)
    }

    /// Best-effort variant of [`process`](Self::process)
    ///
    /// Bad frames are logged and dropped; always returns the number of
    /// events published (zero for a dropped frame).
    pub fn ingest(&mut self, raw: Bytes) -> usize {
        match self.process(raw) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Dropping frame: {}", e);
                0
            }
        }
    }

    /// Count the failure and tell the debug sink
    fn reject(&mut self, frame: Option<&Frame>, err: CoreError) -> CoreError {
        match err {
            CoreError::InvalidEncoding(_) => self.stats.invalid_encoding += 1,
            _ => self.stats.malformed += 1,
        }
        if let Some(sink) = self.dispatcher.debug_sink() {
            let (command, msg_id) = frame
                .map(|f| (f.command(), f.message_id()))
                .unwrap_or_default();
            let mut record = DebugRecord::new("Dropped", command, msg_id);
            record.error = Some(err.to_string());
            sink.record(&record);
        }
        err
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Consume the processor, returning the publisher
    pub fn into_publisher(self) -> P {
        self.publisher
    }
}
