//! Connection ordering for the top view table.
//!
//! Every volume metric sorts busiest first; `cid` is the only ascending key.
//! Ties always fall back to `cid` ascending so the order is total.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::ConnectionInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SortKey {
    #[default]
    Cid,
    Subs,
    OutMsgs,
    InMsgs,
    OutBytes,
    InBytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a valid option to sort by: {0}")]
pub struct UnknownSortKey(pub String);

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Cid,
        SortKey::Subs,
        SortKey::OutMsgs,
        SortKey::InMsgs,
        SortKey::OutBytes,
        SortKey::InBytes,
    ];

    /// Name as typed at the prompt and sent to the server's `/connz?sort=`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Cid => "cid",
            SortKey::Subs => "subs",
            SortKey::OutMsgs => "msgs_to",
            SortKey::InMsgs => "msgs_from",
            SortKey::OutBytes => "bytes_to",
            SortKey::InBytes => "bytes_from",
        }
    }

    pub fn compare(self, a: &ConnectionInfo, b: &ConnectionInfo) -> Ordering {
        let primary = match self {
            SortKey::Cid => Ordering::Equal,
            SortKey::Subs => b.subscriptions.cmp(&a.subscriptions),
            SortKey::OutMsgs => b.out_msgs.cmp(&a.out_msgs),
            SortKey::InMsgs => b.in_msgs.cmp(&a.in_msgs),
            SortKey::OutBytes => b.out_bytes.cmp(&a.out_bytes),
            SortKey::InBytes => b.in_bytes.cmp(&a.in_bytes),
        };
        primary.then_with(|| a.cid.cmp(&b.cid))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Returns a new ordering of `conns`; the input is left untouched.
pub fn sorted(key: SortKey, conns: &[ConnectionInfo]) -> Vec<ConnectionInfo> {
    let mut out = conns.to_vec();
    out.sort_by(|a, b| key.compare(a, b));
    out
}
