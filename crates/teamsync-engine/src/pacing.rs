//! Global inter-call delay.
//!
//! One [`Pacer`] per run. Every upstream call asks it for permission first;
//! if any call has already been issued, it sleeps the full configured delay.
//! It does not adapt to server feedback; rate-limit responses are handled by
//! the client's retry policy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    issued: AtomicU64,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            issued: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next call may be issued, and count it.
    pub async fn ready(&self) {
        let previous = self.issued.fetch_add(1, Ordering::SeqCst);
        if previous > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Number of calls issued through this pacer.
    pub fn calls(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}
