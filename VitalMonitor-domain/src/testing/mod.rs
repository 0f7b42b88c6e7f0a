// Testing utilities and test doubles for the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::{Mutex, MutexGuard};

use crate::entities::vitals::{AlertEvent, VitalKind};
use crate::services::alert::AlertSignaler;

/// Signaler that records every alert instead of blinking
#[derive(Debug, Default)]
pub struct RecordingSignaler {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingSignaler {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, Vec<AlertEvent>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<AlertEvent> {
        self.locked().clone()
    }

    /// Vitals alerted so far, oldest first
    pub fn alerted(&self) -> Vec<VitalKind> {
        self.events().into_iter().map(|event| event.vital).collect()
    }

    pub fn clear(&self) {
        self.locked().clear();
    }
}

impl AlertSignaler for RecordingSignaler {
    fn raise_alert(&self, event: &AlertEvent) {
        self.locked().push(event.clone());
    }
}
