//! Small UI helpers: human-readable sizes, truncation.

/// Compact 1024-based size: `999`, `1.5K`, `12.0M`, `3.2G`, `1.0T`.
pub fn psize(b: u64) -> String {
    const K: f64 = 1024.0;
    let b = b as f64;
    if b < K { return format!("{b:.0}"); }
    let kb = b / K;
    if kb < K { return format!("{kb:.1}K"); }
    let mb = kb / K;
    if mb < K { return format!("{mb:.1}M"); }
    let gb = mb / K;
    if gb < K { return format!("{gb:.1}G"); }
    let tb = gb / K;
    format!("{tb:.1}T")
}

/// `psize` for a per-second rate; negative or non-finite values show as 0.
pub fn psize_rate(rate: f64) -> String {
    if rate.is_finite() && rate > 0.0 {
        psize(rate as u64)
    } else {
        psize(0)
    }
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    if max <= 3 { return "...".into(); }
    let chars: Vec<char> = s.chars().collect();
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{head}...{tail}")
}
