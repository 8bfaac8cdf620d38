//! Per-command normalization handlers
//!
//! Field positions (0-indexed):
//!
//! | command           | fields                                 |
//! |-------------------|----------------------------------------|
//! | hardware/app sync | 0 = device id, 2 = pin, 3 = value      |
//! | log event         | 0 = device id, 1 = event code          |
//! | connect/discon.   | 0 = device id                          |
//!
//! Missing positions become `None`; a short frame is never an error.

use crate::debug::{DebugRecord, DebugSink};
use crate::protocol::{parse_numeric, FieldList, FrameHeader};
use crate::tracking::{should_forward, TrackingState};
use crate::types::NormalizedEvent;

const DEVICE_ID: usize = 0;
const EVENT_CODE: usize = 1;
const PIN: usize = 2;
const VALUE: usize = 3;

/// Inputs shared by every handler for one frame
pub(crate) struct HandlerContext<'a> {
    pub header: FrameHeader,
    pub tracking: &'a TrackingState,
    pub debug: Option<&'a dyn DebugSink>,
}

impl HandlerContext<'_> {
    #[inline]
    fn id(&self) -> u16 {
        self.header.message_id
    }

    #[inline]
    fn command(&self) -> u8 {
        self.header.command
    }

    /// Build and emit a debug record, only when a sink is attached
    fn debug(&self, label: &'static str, build: impl FnOnce(DebugRecord) -> DebugRecord) {
        if let Some(sink) = self.debug {
            sink.record(&build(DebugRecord::new(label, self.command(), self.id())));
        }
    }
}

/// Response code from the first four body bytes (big-endian)
fn response_code(body: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = body.get(..4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

fn telemetry(fields: &FieldList) -> NormalizedEvent {
    NormalizedEvent::telemetry(
        fields.device_id(DEVICE_ID).and_then(parse_numeric),
        fields.numeric(PIN),
        fields.get(VALUE).map(str::to_owned),
    )
}

pub(crate) fn response(ctx: &HandlerContext<'_>, body: &[u8]) -> Vec<NormalizedEvent> {
    let code = response_code(body);
    ctx.debug("Response", |mut r| {
        r.response_code = code;
        r
    });
    vec![NormalizedEvent::response(ctx.id(), ctx.command(), code)]
}

/// Live telemetry, subject to the tracking filter
///
/// Returns `None` when the frame is suppressed; neither the echo nor the
/// telemetry event is published in that case.
pub(crate) fn hardware(
    ctx: &HandlerContext<'_>,
    fields: &FieldList,
) -> Option<Vec<NormalizedEvent>> {
    let device_id = fields.device_id(DEVICE_ID).unwrap_or_default();
    let forward = should_forward(device_id, ctx.tracking);

    ctx.debug("Hardware", |mut r| {
        r.tracking = Some(*ctx.tracking);
        r.device_matches = Some(ctx.tracking.matches(device_id));
        r.with_fields(fields.as_slice()).with_device(device_id)
    });

    if !forward {
        return None;
    }

    Some(vec![
        NormalizedEvent::echo(ctx.id(), ctx.command(), fields.as_slice().to_vec()),
        telemetry(fields),
    ])
}

pub(crate) fn log_event(ctx: &HandlerContext<'_>, fields: &FieldList) -> Vec<NormalizedEvent> {
    let device_id = fields.get(DEVICE_ID).unwrap_or_default().to_owned();
    let event_code = fields.get(EVENT_CODE).map(str::to_owned);

    ctx.debug("LogEvent", |r| r.with_fields(fields.as_slice()).with_device(&device_id));

    vec![NormalizedEvent::Log {
        device_id,
        event_code,
    }]
}

pub(crate) fn device_connect(ctx: &HandlerContext<'_>, fields: &FieldList) -> Vec<NormalizedEvent> {
    let device_id = fields.device_id(DEVICE_ID).unwrap_or_default().to_owned();
    ctx.debug("DeviceConnect", |r| r.with_fields(fields.as_slice()).with_device(&device_id));
    vec![NormalizedEvent::Connect { device_id }]
}

pub(crate) fn device_disconnect(
    ctx: &HandlerContext<'_>,
    fields: &FieldList,
) -> Vec<NormalizedEvent> {
    let device_id = fields.device_id(DEVICE_ID).unwrap_or_default().to_owned();
    ctx.debug("DeviceDisconnect", |r| r.with_fields(fields.as_slice()).with_device(&device_id));
    vec![NormalizedEvent::Disconnect { device_id }]
}

/// State replay: always forwarded, tracking does not apply
pub(crate) fn app_sync(ctx: &HandlerContext<'_>, fields: &FieldList) -> Vec<NormalizedEvent> {
    ctx.debug("AppSync", |r| r.with_fields(fields.as_slice()));
    vec![
        NormalizedEvent::echo(ctx.id(), ctx.command(), fields.as_slice().to_vec()),
        telemetry(fields),
    ]
}

/// Still answers with a response so a pending request on this id resolves
pub(crate) fn unknown(ctx: &HandlerContext<'_>, report: bool) -> Vec<NormalizedEvent> {
    ctx.debug("Unknown", |r| r);
    let mut events = vec![NormalizedEvent::response(ctx.id(), ctx.command(), None)];
    if report {
        events.push(NormalizedEvent::Unknown {
            command: ctx.command(),
            id: ctx.id(),
        });
    }
    events
}
