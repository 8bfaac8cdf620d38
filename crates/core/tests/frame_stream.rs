//! End-to-end: a mixed frame stream through the processor into a channel

use bytes::Bytes;
use devwire_core::{
    DecoderConfig, EventStream, FrameProcessor, NormalizedEvent, SharedTracking, TrackingState,
};

fn frame(command: u8, id: u16, body: &[u8]) -> Bytes {
    let mut raw = vec![command];
    raw.extend_from_slice(&id.to_be_bytes());
    raw.extend_from_slice(body);
    Bytes::from(raw)
}

#[tokio::test]
async fn test_mixed_stream_in_delivery_order() {
    let tracking = SharedTracking::new(TrackingState::strict(42));
    let (stream, mut rx) = EventStream::new(64);
    let mut processor =
        FrameProcessor::new(&DecoderConfig::default(), stream, tracking.subscribe()).unwrap();

    let frames = vec![
        frame(0, 1, &[0, 0, 0, 200]),
        frame(20, 2, b"0-42\x00vw\x002\x00517"),
        frame(20, 3, b"0-7\x00vw\x002\x00999"),
        Bytes::from_static(&[20, 0]),
        frame(64, 4, b"99\x003\x00"),
        frame(4, 5, b"0-42"),
        frame(25, 6, b"7\x00vw\x001\x00on"),
        frame(71, 7, b"0-15\x00"),
        frame(200, 8, b"whatever"),
    ];

    let published: usize = frames.into_iter().map(|f| processor.ingest(f)).sum();
    assert_eq!(published, 9);

    let stats = processor.stats();
    assert_eq!(stats.frames, 8);
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.suppressed, 1);
    assert_eq!(stats.unknown_commands, 1);
    assert_eq!(stats.events, 9);

    drop(processor);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            NormalizedEvent::response(1, 0, Some(200)),
            NormalizedEvent::echo(2, 20, vec!["0-42".into(), "vw".into(), "2".into(), "517".into()]),
            NormalizedEvent::telemetry(Some(42), Some(2), Some("517".into())),
            NormalizedEvent::Log {
                device_id: "99".into(),
                event_code: Some("3".into()),
            },
            NormalizedEvent::Connect {
                device_id: "42".into(),
            },
            NormalizedEvent::echo(6, 25, vec!["7".into(), "vw".into(), "1".into(), "on".into()]),
            NormalizedEvent::telemetry(Some(7), Some(1), Some("on".into())),
            NormalizedEvent::Disconnect {
                device_id: "15".into(),
            },
            NormalizedEvent::response(8, 200, None),
        ]
    );
}

#[test]
fn test_callback_publisher_sees_events_synchronously() {
    let mut seen = Vec::new();
    {
        let publisher = devwire_core::publish_fn(|e: NormalizedEvent| seen.push(e));
        let mut processor =
            FrameProcessor::new(&DecoderConfig::default(), publisher, TrackingState::loose())
                .unwrap();
        assert_eq!(processor.ingest(frame(20, 9, b"0-8\x00vw\x003\x001")), 2);
    }
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].message_id(), Some(9));
    assert_eq!(
        seen[1],
        NormalizedEvent::telemetry(Some(8), Some(3), Some("1".into()))
    );
}
