//! Run status and run exclusivity
//!
//! The presentation layer polls run state while a crawl or batch mutates
//! it. [`StatusHandle`] keeps every field behind one mutex and only hands
//! out cloned snapshots, so a reader can never observe a half-applied
//! multi-field update. [`RunLock`] is the atomically-checked exclusive
//! guard that makes "no-op if already running" an actual guarantee
//! rather than a best-effort flag check.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Snapshot of the current (or most recent) run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatus {
    pub running: bool,
    pub last_run: Option<String>,
    pub products_scraped: usize,
    pub total_urls: usize,
    pub current_index: usize,
    pub failed_count: usize,
    pub current_product: Option<String>,
    pub error: Option<String>,
}

/// Shared, snapshot-on-read run status
#[derive(Clone, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<RunStatus>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        StatusHandle::default()
    }

    /// Copy-on-read snapshot for the presentation layer
    pub fn snapshot(&self) -> RunStatus {
        self.inner.lock().expect("status mutex poisoned").clone()
    }

    /// Applies a mutation under the lock
    pub fn update(&self, f: impl FnOnce(&mut RunStatus)) {
        let mut status = self.inner.lock().expect("status mutex poisoned");
        f(&mut status);
    }

    /// Marks a run as started, clearing any previous error
    pub fn begin_run(&self) {
        self.update(|s| {
            s.running = true;
            s.error = None;
        });
    }

    /// Marks a run as finished, recording the outcome
    ///
    /// Always clears `running` and `current_product`, matching the
    /// run-loop's finally semantics.
    pub fn finish_run(&self, error: Option<String>) {
        self.update(|s| {
            s.running = false;
            s.current_product = None;
            if error.is_some() {
                s.error = error;
            }
        });
    }
}

/// Exclusive run lock: at most one crawl or batch at a time
#[derive(Clone, Default)]
pub struct RunLock {
    flag: Arc<AtomicBool>,
}

impl RunLock {
    pub fn new() -> Self {
        RunLock::default()
    }

    /// Attempts to acquire the lock; `None` means a run is already active
    pub fn acquire(&self) -> Option<RunGuard> {
        if self
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(RunGuard {
                flag: Arc::clone(&self.flag),
            })
        } else {
            None
        }
    }

    /// Whether a run currently holds the lock
    pub fn is_held(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Releases the run lock on drop, including on early error returns
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
