//! Small utilities to manage bounded history buffers for charts.

use std::collections::VecDeque;

use crate::types::{Rates, Snapshot};

/// Samples kept per chart.
pub const HISTORY_CAP: usize = 150;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// Moving window of samples: append at the back, evict the oldest from the front.
#[derive(Debug, Clone)]
pub struct HistorySeries<T> {
    samples: VecDeque<T>,
    cap: usize,
}

impl<T: Copy> HistorySeries<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, v: T) {
        push_capped(&mut self.samples, v, self.cap);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<T> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.samples.iter()
    }

    // Last `n` samples, oldest first; used to fit a chart's width
    pub fn tail(&self, n: usize) -> Vec<T> {
        let start = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(start).copied().collect()
    }
}

// Line charts take f64 points, sparklines take u64 bars
pub struct DashboardHistory {
    pub conns: HistorySeries<f64>,
    pub mem_mib: HistorySeries<f64>,
    pub in_msgs: HistorySeries<u64>,
    pub in_bytes: HistorySeries<u64>,
    pub out_msgs: HistorySeries<u64>,
    pub out_bytes: HistorySeries<u64>,
}

impl DashboardHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            conns: HistorySeries::new(cap),
            mem_mib: HistorySeries::new(cap),
            in_msgs: HistorySeries::new(cap),
            in_bytes: HistorySeries::new(cap),
            out_msgs: HistorySeries::new(cap),
            out_bytes: HistorySeries::new(cap),
        }
    }

    pub fn record(&mut self, s: &Snapshot) {
        self.conns.push(s.connz.num_connections as f64);
        self.mem_mib.push((s.vitals.mem / 1024 / 1024) as f64);
        let Rates {
            in_msgs,
            out_msgs,
            in_bytes,
            out_bytes,
        } = s.rates;
        self.in_msgs.push(bar(in_msgs));
        self.in_bytes.push(bar(in_bytes));
        self.out_msgs.push(bar(out_msgs));
        self.out_bytes.push(bar(out_bytes));
    }
}

impl Default for DashboardHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAP)
    }
}

fn bar(rate: f64) -> u64 {
    if rate.is_finite() && rate > 0.0 {
        rate.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_capped_evicts_front() {
        let mut dq = VecDeque::new();
        for v in 0..5 {
            push_capped(&mut dq, v, 3);
        }
        assert_eq!(dq, VecDeque::from(vec![2, 3, 4]));
    }

    #[test]
    fn tail_returns_newest_in_order() {
        let mut s = HistorySeries::new(10);
        for v in 1..=6u64 {
            s.push(v);
        }
        assert_eq!(s.tail(3), vec![4, 5, 6]);
        assert_eq!(s.tail(100).len(), 6);
        assert_eq!(s.latest(), Some(6));
    }

    #[test]
    fn negative_or_nan_rates_chart_as_zero() {
        assert_eq!(bar(-3.0), 0);
        assert_eq!(bar(f64::NAN), 0);
        assert_eq!(bar(489.6), 490);
    }
}
