use std::time::{Duration, Instant};

/// Cancelable one-shot deadline for the long-press gesture.
///
/// Keyed by the pointer sequence that armed it so a stale deadline can never
/// fire into a later sequence. Nothing runs in the background: the owner
/// polls it from the event thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongPressTimer {
    pending: Option<(u64, Instant)>,
}

impl LongPressTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, sequence: u64, start: Instant, timeout: Duration) {
        self.pending = Some((sequence, start + timeout));
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Fires at most once: returns the arming sequence when the deadline has
    /// passed and disarms.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some((sequence, deadline)) if now >= deadline => {
                self.pending = None;
                Some(sequence)
            }
            _ => None,
        }
    }
}
