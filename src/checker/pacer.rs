// src/checker/pacer.rs
// =============================================================================
// Enforces a minimum delay between successive request dispatches.
//
// Every caller of wait() reserves the next free dispatch slot and sleeps until
// it arrives. Slots are `interval` apart, so no matter how many tasks are in
// flight, dispatches start at most once per interval. The first slot is
// available immediately.
// =============================================================================

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    // Earliest instant the next dispatch may start
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Pacer {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until this caller may dispatch a request
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let slot = {
            // A poisoned lock still holds a valid Instant
            let mut next = self
                .next_slot
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        sleep_until(slot).await;
    }
}
