//! Per-address build serialization.
//!
//! Two builds from the same address could select the same UTXOs and produce
//! conflicting transactions. The gate holds one async lock per address for
//! the whole select-sign-publish sequence; builds for different addresses
//! proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;
use tracing::trace;

/// Held while a build for one address is in flight.
pub type BuildPermit = OwnedMutexGuard<()>;

#[derive(Default)]
pub struct BuildGate {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl BuildGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for any in-flight build of `address` to finish, then claim it.
    pub async fn acquire(&self, address: &str) -> BuildPermit {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(address.to_string()).or_default())
        };
        trace!(address, "waiting for build permit");
        lock.lock_owned().await
    }

    /// Claim `address` only if no build is running for it.
    pub fn try_acquire(&self, address: &str) -> Option<BuildPermit> {
        let lock = Arc::clone(self.locks.lock().entry(address.to_string()).or_default());
        lock.try_lock_owned().ok()
    }

    /// Drop locks nobody holds or waits on.
    pub fn prune(&self) {
        self.locks
            .lock()
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
