//! Device tracking filter
//!
//! The UI picks one device to monitor. In strict mode only that device's
//! live hardware telemetry gets through; everything else is noise. The
//! state is owned outside the decoder and may change between any two
//! frames, so it is read through a [`TrackingSource`] on every dispatch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::protocol::parse_numeric;

/// Snapshot of the UI's device selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingState {
    pub tracked_device_id: Option<i64>,
    pub track_only_by_device_id: bool,
}

impl TrackingState {
    /// Forward everything
    pub fn loose() -> Self {
        Self::default()
    }

    /// Forward telemetry for `device_id` only
    pub fn strict(device_id: i64) -> Self {
        Self {
            tracked_device_id: Some(device_id),
            track_only_by_device_id: true,
        }
    }

    /// Whether `device_id` (as received, prefix already stripped) is the
    /// tracked device. Comparison is numeric, so `"007"` matches `7`.
    pub fn matches(&self, device_id: &str) -> bool {
        match (self.tracked_device_id, parse_numeric(device_id)) {
            (Some(tracked), Some(id)) => tracked == id,
            _ => false,
        }
    }
}

/// Decide whether a hardware event for `device_id` is forwarded
pub fn should_forward(device_id: &str, state: &TrackingState) -> bool {
    !state.track_only_by_device_id || state.matches(device_id)
}

/// Synchronous read access to the current tracking state
pub trait TrackingSource {
    fn tracking(&self) -> TrackingState;
}

impl TrackingSource for TrackingState {
    fn tracking(&self) -> TrackingState {
        *self
    }
}

impl TrackingSource for watch::Receiver<TrackingState> {
    fn tracking(&self) -> TrackingState {
        *self.borrow()
    }
}

impl<T: TrackingSource + ?Sized> TrackingSource for &T {
    fn tracking(&self) -> TrackingState {
        (**self).tracking()
    }
}

impl<T: TrackingSource + ?Sized> TrackingSource for Arc<T> {
    fn tracking(&self) -> TrackingState {
        (**self).tracking()
    }
}

/// Writable tracking state shared with any number of readers
///
/// Backed by a `watch` channel: writers replace the value, readers always
/// see the latest one without awaiting.
#[derive(Debug, Clone)]
pub struct SharedTracking {
    tx: Arc<watch::Sender<TrackingState>>,
}

impl SharedTracking {
    pub fn new(initial: TrackingState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// New reader handle
    pub fn subscribe(&self) -> watch::Receiver<TrackingState> {
        self.tx.subscribe()
    }

    /// Select the device to monitor (`None` clears the selection)
    pub fn track_device(&self, device_id: Option<i64>) {
        self.tx.send_modify(|state| state.tracked_device_id = device_id);
    }

    /// Switch between strict and loose tracking
    pub fn set_track_only(&self, enabled: bool) {
        self.tx.send_modify(|state| state.track_only_by_device_id = enabled);
    }

    pub fn replace(&self, state: TrackingState) {
        self.tx.send_replace(state);
    }
}

impl Default for SharedTracking {
    fn default() -> Self {
        Self::new(TrackingState::default())
    }
}

impl TrackingSource for SharedTracking {
    fn tracking(&self) -> TrackingState {
        *self.tx.borrow()
    }
}
