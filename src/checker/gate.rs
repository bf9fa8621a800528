// src/checker/gate.rs
// =============================================================================
// Bounds how many checks run at the same time.
//
// A check task holds a GatePermit for its whole lifetime. The permit returns
// its slot when dropped, which covers every exit path of the task: normal
// completion, transport errors, the fallback GET, and panics.
// =============================================================================

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    limit: usize,
    semaphore: Arc<Semaphore>,
}

/// Proof that the holder occupies one gate slot
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Creates a gate with `limit` slots (at least one)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        ConcurrencyGate {
            limit,
            semaphore: Arc::new(Semaphore::new(limit)),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Waits for a free slot
    ///
    /// Only fails if the gate was closed, which this crate never does.
    pub async fn acquire(&self) -> Result<GatePermit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(GatePermit { _permit: permit })
    }

    #[cfg(test)]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
