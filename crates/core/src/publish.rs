//! Event publishing
//!
//! A [`Publisher`] is the state container's ingestion entry point. It is
//! called once per event, in order, inside the dispatch of the frame that
//! produced it. Publishing is fire-and-forget: there is no acknowledgement
//! and nothing is retried.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::types::NormalizedEvent;

/// Sink for normalized events
pub trait Publisher {
    fn publish(&mut self, event: NormalizedEvent);
}

/// Collects events in memory
impl Publisher for Vec<NormalizedEvent> {
    fn publish(&mut self, event: NormalizedEvent) {
        self.push(event);
    }
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, event: NormalizedEvent) {
        (**self).publish(event);
    }
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn publish(&mut self, event: NormalizedEvent) {
        (**self).publish(event);
    }
}

/// Publisher backed by a closure
pub struct FnPublisher<F>(F);

impl<F: FnMut(NormalizedEvent)> Publisher for FnPublisher<F> {
    fn publish(&mut self, event: NormalizedEvent) {
        (self.0)(event)
    }
}

/// Wrap a callback as a [`Publisher`]
pub fn publish_fn<F: FnMut(NormalizedEvent)>(f: F) -> FnPublisher<F> {
    FnPublisher(f)
}

/// Bounded channel publisher
///
/// Decoding never waits on the consumer: `try_send` either enqueues or the
/// event is dropped with a warning.
pub struct EventStream {
    tx: mpsc::Sender<NormalizedEvent>,
    dropped: u64,
}

impl EventStream {
    /// Create new stream with specified buffer capacity
    ///
    /// # Returns
    /// * `(EventStream, mpsc::Receiver<NormalizedEvent>)` - Sender and receiver halves
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<NormalizedEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx, dropped: 0 }, rx)
    }

    /// Remaining slots in the channel buffer
    #[inline]
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }

    /// Events lost to a full or closed channel
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Check if the receiving side is gone
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Publisher for EventStream {
    fn publish(&mut self, event: NormalizedEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.dropped += 1;
                tracing::warn!("Event channel full, dropping {} event", event.kind());
            }
            Err(TrySendError::Closed(event)) => {
                self.dropped += 1;
                tracing::warn!("Event channel closed, dropping {} event", event.kind());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(id: &str) -> NormalizedEvent {
        NormalizedEvent::Connect {
            device_id: id.to_string(),
        }
    }

    #[test]
    fn test_vec_publisher_keeps_order() {
        let mut events: Vec<NormalizedEvent> = Vec::new();
        events.publish(connect("1"));
        events.publish(connect("2"));
        assert_eq!(events, vec![connect("1"), connect("2")]);
    }

    #[test]
    fn test_fn_publisher() {
        let mut seen = Vec::new();
        {
            let mut publisher = publish_fn(|e: NormalizedEvent| seen.push(e.kind()));
            publisher.publish(connect("1"));
            publisher.publish(NormalizedEvent::response(1, 0, None));
        }
        assert_eq!(seen, vec!["connect", "response"]);
    }

    #[tokio::test]
    async fn test_stream_delivers_in_order() {
        let (mut stream, mut rx) = EventStream::new(10);

        stream.publish(connect("1"));
        stream.publish(connect("2"));

        assert_eq!(rx.recv().await.unwrap(), connect("1"));
        assert_eq!(rx.recv().await.unwrap(), connect("2"));
        assert_eq!(stream.dropped(), 0);
    }

    #[tokio::test]
    async fn test_full_channel_drops_without_blocking() {
        let (mut stream, mut rx) = EventStream::new(2);

        stream.publish(connect("1"));
        stream.publish(connect("2"));
        stream.publish(connect("3"));

        assert_eq!(stream.dropped(), 1);
        assert_eq!(stream.capacity(), 0);
        assert_eq!(rx.recv().await.unwrap(), connect("1"));
        assert_eq!(rx.recv().await.unwrap(), connect("2"));
    }

    #[tokio::test]
    async fn test_closed_channel_detection() {
        let (mut stream, rx) = EventStream::new(4);

        assert!(!stream.is_closed());
        drop(rx);
        assert!(stream.is_closed());

        stream.publish(connect("1"));
        assert_eq!(stream.dropped(), 1);
    }
}
