//! Types that mirror the NATS monitoring JSON schema, plus the per-tick snapshot.

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Server-wide vitals as reported by `/varz`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ServerVitals {
    pub version: String,
    pub uptime: String,
    pub cpu: f64,
    pub mem: u64,
    pub max_connections: u64,
    pub slow_consumers: u64,
    // cumulative totals; the sampler diffs them to compute rates
    pub in_msgs: u64,
    pub out_msgs: u64,
    pub in_bytes: u64,
    pub out_bytes: u64,
}

impl ServerVitals {
    pub fn counters(&self) -> Counters {
        Counters {
            in_msgs: self.in_msgs,
            out_msgs: self.out_msgs,
            in_bytes: self.in_bytes,
            out_bytes: self.out_bytes,
        }
    }
}

/// One client connection from `/connz`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionInfo {
    pub cid: u64,
    pub ip: String,
    pub port: u16,
    pub subscriptions: u32,
    pub pending_bytes: u64,
    pub in_msgs: u64,
    pub out_msgs: u64,
    pub in_bytes: u64,
    pub out_bytes: u64,
    pub lang: String,
    pub version: String,
}

impl ConnectionInfo {
    pub fn remote(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// The `/connz` page: total connection count plus at most `limit` records.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConnectionList {
    pub num_connections: u64,
    pub connections: Vec<ConnectionInfo>,
}

/// Raw cumulative counters the rates are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub in_msgs: u64,
    pub out_msgs: u64,
    pub in_bytes: u64,
    pub out_bytes: u64,
}

/// Per-second rates derived from two consecutive successful samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rates {
    pub in_msgs: f64,
    pub out_msgs: f64,
    pub in_bytes: f64,
    pub out_bytes: f64,
}

/// Everything captured on one poll tick. Built once by the sampler, then
/// handed over to the render side and never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub vitals: ServerVitals,
    pub connz: ConnectionList,
    pub rates: Rates,
    pub taken_at: DateTime<Local>,
    /// Set when either fetch failed; the affected half is left zeroed.
    pub fetch_error: Option<String>,
}

impl Snapshot {
    /// The placeholder shown before the first sample arrives.
    pub fn empty() -> Self {
        Self {
            vitals: ServerVitals::default(),
            connz: ConnectionList::default(),
            rates: Rates::default(),
            taken_at: Local::now(),
            fetch_error: None,
        }
    }
}
