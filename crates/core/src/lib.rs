//! Devwire Core - receive-side decoding for device telemetry frames
//!
//! This crate provides:
//! - Frame header parsing and `\0`-delimited body decoding
//! - Command dispatch to per-command normalization handlers
//! - Device tracking filter for live hardware telemetry
//! - Event publishing (callback, Vec, bounded channel)
//! - Advisory debug records and error types
//!
//! Frames are processed one at a time: every event produced by frame N is
//! published before frame N+1 is parsed.

/// Size of the frame envelope preceding the body
pub const HEADER_SIZE: usize = 3;
/// Default upper bound for a single frame body (64KB)
pub const DEFAULT_MAX_BODY_LEN: usize = 64 * 1024;

pub mod config;
pub mod debug;
pub mod dispatch;
pub mod error;
pub mod processor;
pub mod protocol;
pub mod publish;
pub mod tracking;
pub mod types;

// Re-export common types
pub use config::DecoderConfig;
pub use debug::{DebugRecord, DebugSink, TracingDebugSink};
pub use dispatch::{Dispatched, Dispatcher};
pub use error::{CoreError, Result};
pub use processor::{FrameProcessor, ProcessorStats};
pub use protocol::{decode_fields, strip_device_prefix, FieldList, Frame, FrameHeader};
pub use publish::{publish_fn, EventStream, Publisher};
pub use tracking::{should_forward, SharedTracking, TrackingSource, TrackingState};
pub use types::{Command, CommandCodes, NormalizedEvent};
