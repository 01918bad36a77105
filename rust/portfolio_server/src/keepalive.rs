// src/keepalive.rs
//
// Process-wide heartbeat that keeps hosting platforms from idling the site.
// At most one ticker runs per process; nothing waits on it.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

static STARTED: AtomicBool = AtomicBool::new(false);
static LAST_TICK: AtomicI64 = AtomicI64::new(0);

/// Spawns the heartbeat on the current actix runtime.
///
/// Returns `false` if a heartbeat was already started in this process.
pub fn start(interval: Duration) -> bool {
    if STARTED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return false;
    }

    let interval = interval.max(Duration::from_secs(1));
    info!(?interval, "starting keep-alive heartbeat");

    actix_rt::spawn(async move {
        let mut ticker = actix_rt::time::interval(interval);
        loop {
            ticker.tick().await;
            touch();
        }
    });

    true
}

pub fn is_started() -> bool {
    STARTED.load(Ordering::SeqCst)
}

/// Records a heartbeat. Idempotent apart from the timestamp.
pub fn touch() {
    let now = Utc::now().timestamp();
    LAST_TICK.store(now, Ordering::Relaxed);
    debug!(timestamp = now, "keep-alive tick");
}

pub fn last_heartbeat() -> Option<DateTime<Utc>> {
    match LAST_TICK.load(Ordering::Relaxed) {
        0 => None,
        secs => DateTime::from_timestamp(secs, 0),
    }
}
