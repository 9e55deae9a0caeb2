//! Concurrency limiting for fan-out fetches
//!
//! By default every app gets its own task and all of them may be in flight
//! at once. With `max-concurrent-fetches` set, a semaphore caps how many
//! tasks are past the cache check and talking to the network.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Optional cap on in-flight fetches, shared by all fan-out tasks
#[derive(Debug, Clone, Default)]
pub struct FetchLimiter {
    semaphore: Option<Arc<Semaphore>>,
    limit: Option<usize>,
}

impl FetchLimiter {
    /// Creates a limiter; `None` means unbounded
    pub fn new(max_concurrent: Option<u32>) -> Self {
        let limit = max_concurrent.map(|n| n.max(1) as usize);
        Self {
            semaphore: limit.map(|n| Arc::new(Semaphore::new(n))),
            limit,
        }
    }

    /// Limiter that never blocks
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The configured cap, if any
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Waits for a slot; the slot is released when the returned permit drops
    ///
    /// Returns `None` when unbounded. The semaphore is never closed, so a
    /// bounded limiter always yields a permit.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.semaphore {
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        }
    }
}
