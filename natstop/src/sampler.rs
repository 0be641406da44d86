//! Background sampler: sleeps for the configured delay, fetches vitals and
//! connections, derives per-second rates and hands the snapshot downstream.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::SharedOptions;
use crate::sort::SortKey;
use crate::source::MetricsSource;
use crate::types::{ConnectionList, Counters, Rates, ServerVitals, Snapshot};

/// Turns successive counter readings into per-second rates.
///
/// The baseline is the last *successful* reading: a failed poll leaves it in
/// place, so the next success averages over the whole gap instead of
/// reporting zero.
#[derive(Debug, Default)]
pub struct RateTracker {
    last: Option<(Counters, Instant)>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_baseline(&self) -> bool {
        self.last.is_some()
    }

    /// Record `now`'s counters. The first reading yields zero rates.
    pub fn observe(&mut self, cur: Counters, now: Instant) -> Rates {
        let rates = match self.last {
            None => Rates::default(),
            Some((prev, at)) => {
                let dt = now.saturating_duration_since(at).as_secs_f64().max(1e-6);
                Rates {
                    in_msgs: per_sec(prev.in_msgs, cur.in_msgs, dt),
                    out_msgs: per_sec(prev.out_msgs, cur.out_msgs, dt),
                    in_bytes: per_sec(prev.in_bytes, cur.in_bytes, dt),
                    out_bytes: per_sec(prev.out_bytes, cur.out_bytes, dt),
                }
            }
        };
        self.last = Some((cur, now));
        rates
    }
}

// A counter that went backwards means the server restarted; report 0 for
// that cycle and continue from the new value.
fn per_sec(prev: u64, cur: u64, dt: f64) -> f64 {
    cur.saturating_sub(prev) as f64 / dt
}

/// Run one poll: both fetches, then rates if the vitals came back.
pub async fn sample_once<S: MetricsSource>(
    source: &S,
    tracker: &mut RateTracker,
    limit: u32,
    sort: SortKey,
) -> Snapshot {
    let (vitals, connz) = tokio::join!(
        source.fetch_vitals(),
        source.fetch_connections(limit, sort)
    );
    let mut errors: Vec<String> = Vec::new();

    let (vitals, rates) = match vitals {
        Ok(v) => {
            let rates = tracker.observe(v.counters(), Instant::now());
            (v, rates)
        }
        Err(e) => {
            warn!(error = %e, "vitals fetch failed");
            errors.push(e.to_string());
            (ServerVitals::default(), Rates::default())
        }
    };
    let connz = match connz {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "connections fetch failed");
            errors.push(e.to_string());
            ConnectionList::default()
        }
    };

    Snapshot {
        vitals,
        connz,
        rates,
        taken_at: Local::now(),
        fetch_error: if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        },
    }
}

/// The sampling loop. Options are re-read right before every poll so limit
/// and sort changes apply from the next one. Returns once the receiver is gone.
pub async fn run_sampler<S: MetricsSource>(
    source: Arc<S>,
    options: SharedOptions,
    tx: mpsc::Sender<Snapshot>,
) {
    let mut tracker = RateTracker::new();
    let delay = options.snapshot().await.delay;
    loop {
        sleep(delay).await;

        let opts = options.snapshot().await;
        let snapshot = sample_once(source.as_ref(), &mut tracker, opts.conns, opts.sort).await;
        debug!(
            conns = snapshot.connz.num_connections,
            in_msgs_rate = snapshot.rates.in_msgs,
            out_msgs_rate = snapshot.rates.out_msgs,
            failed = snapshot.fetch_error.is_some(),
            "sample"
        );

        // Blocks until the consumer has taken the previous snapshot
        if tx.send(snapshot).await.is_err() {
            debug!("snapshot receiver closed; sampler exiting");
            return;
        }
    }
}

pub fn spawn_sampler<S: MetricsSource>(
    source: Arc<S>,
    options: SharedOptions,
    tx: mpsc::Sender<Snapshot>,
) -> JoinHandle<()> {
    tokio::spawn(run_sampler(source, options, tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn counters(in_msgs: u64, out_msgs: u64, in_bytes: u64, out_bytes: u64) -> Counters {
        Counters {
            in_msgs,
            out_msgs,
            in_bytes,
            out_bytes,
        }
    }

    #[test]
    fn first_observation_is_zero() {
        let mut t = RateTracker::new();
        let r = t.observe(counters(100, 200, 300, 400), Instant::now());
        assert_eq!(r, Rates::default());
        assert!(t.has_baseline());
    }

    #[test]
    fn rate_uses_measured_interval() {
        let mut t = RateTracker::new();
        let t0 = Instant::now();
        t.observe(counters(1_000, 0, 10_000, 0), t0);
        let r = t.observe(
            counters(1_500, 0, 12_048, 0),
            t0 + Duration::from_millis(1020),
        );
        assert!((r.in_msgs - 500.0 / 1.02).abs() < 1e-9);
        assert!((r.in_msgs - 490.196).abs() < 1e-3);
        assert!((r.in_bytes - 2048.0 / 1.02).abs() < 1e-9);
        assert_eq!(r.out_msgs, 0.0);
    }

    #[test]
    fn counter_reset_reports_zero_then_resumes() {
        let mut t = RateTracker::new();
        let t0 = Instant::now();
        t.observe(counters(5_000, 0, 0, 0), t0);
        let r = t.observe(counters(10, 0, 0, 0), t0 + Duration::from_secs(1));
        assert_eq!(r.in_msgs, 0.0);
        let r = t.observe(counters(110, 0, 0, 0), t0 + Duration::from_secs(2));
        assert!((r.in_msgs - 100.0).abs() < 1e-9);
    }
}
