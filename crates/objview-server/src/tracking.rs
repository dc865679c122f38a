//! Manifest request tracking
//!
//! Lets a user confirm that the viewer actually fetched the manifest.
//! Counters live for the lifetime of the process.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts manifest fetches and remembers the most recent one
#[derive(Debug, Default)]
pub struct RequestTracker {
    count: AtomicU64,
    last: Mutex<LastRequest>,
}

#[derive(Debug, Default)]
struct LastRequest {
    time: Option<DateTime<Utc>>,
    addr: Option<IpAddr>,
}

/// Point-in-time view of the tracker, served as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingSnapshot {
    pub count: u64,
    pub last_request_time: Option<String>,
    pub last_request_ip: Option<String>,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one manifest fetch from `addr` (if known)
    pub fn record(&self, addr: Option<IpAddr>) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut last = self.last.lock();
        last.time = Some(Utc::now());
        last.addr = addr;
    }

    #[must_use]
    pub fn snapshot(&self) -> TrackingSnapshot {
        let last = self.last.lock();
        TrackingSnapshot {
            count: self.count.load(Ordering::Relaxed),
            last_request_time: last
                .time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true)),
            last_request_ip: last.addr.map(|addr| addr.to_string()),
        }
    }
}
