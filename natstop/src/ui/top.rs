//! Top-like text view: server summary followed by the connection table.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::sort::{sorted, SortKey};
use crate::types::Snapshot;
use crate::ui::util::{psize, psize_rate, truncate_middle};

/// Row index of the connection table header within the report.
pub const TABLE_HEADER_ROW: usize = 7;

const HOST_WIDTH: usize = 20;

fn conn_row(cols: [&str; 10]) -> String {
    format!(
        "  {:<20} {:<8} {:<6}  {:<10}  {:<10}  {:<10}  {:<10}  {:<10}  {:<7}  {:<7}",
        cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7], cols[8], cols[9]
    )
}

/// Build the report text, one entry per screen row. Row 5 is left blank for
/// the prompt line.
pub fn report_lines(s: &Snapshot, sort: SortKey) -> Vec<String> {
    let v = &s.vitals;
    let r = &s.rates;

    let mut title = format!(
        "NATS server version {} (uptime: {})  updated {}",
        v.version,
        v.uptime,
        s.taken_at.format("%H:%M:%S")
    );
    if let Some(err) = &s.fetch_error {
        title.push_str(&format!("  (last poll failed: {err})"));
    }

    let mut lines = vec![
        title,
        "Server:".to_string(),
        format!(
            "  Load: CPU:  {:.1}%  Memory: {}  Slow Consumers: {}",
            v.cpu,
            psize(v.mem),
            v.slow_consumers
        ),
        format!(
            "  In:   Msgs: {}  Bytes: {}  Msgs/Sec: {:.1}  Bytes/Sec: {}",
            psize(v.in_msgs),
            psize(v.in_bytes),
            r.in_msgs,
            psize_rate(r.in_bytes)
        ),
        format!(
            "  Out:  Msgs: {}  Bytes: {}  Msgs/Sec: {:.1}  Bytes/Sec: {}",
            psize(v.out_msgs),
            psize(v.out_bytes),
            r.out_msgs,
            psize_rate(r.out_bytes)
        ),
        String::new(),
        format!("Connections: {}", s.connz.num_connections),
        conn_row([
            "HOST",
            "CID",
            "SUBS",
            "PENDING",
            "MSGS_TO",
            "MSGS_FROM",
            "BYTES_TO",
            "BYTES_FROM",
            "LANG",
            "VERSION",
        ]),
    ];

    for c in sorted(sort, &s.connz.connections) {
        let host = truncate_middle(&c.remote(), HOST_WIDTH);
        lines.push(conn_row([
            &host,
            &c.cid.to_string(),
            &c.subscriptions.to_string(),
            &c.pending_bytes.to_string(),
            &psize(c.out_msgs),
            &psize(c.in_msgs),
            &psize(c.out_bytes),
            &psize(c.in_bytes),
            &c.lang,
            &c.version,
        ]));
    }
    lines
}

pub fn draw_top(f: &mut ratatui::Frame<'_>, area: Rect, report: &[String], sort: SortKey) {
    let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = report
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if i == 0 || i == TABLE_HEADER_ROW {
                Line::from(Span::styled(l.clone(), header_style))
            } else {
                Line::from(l.clone())
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);

    // Sort indicator on the connections line
    let conns_row = TABLE_HEADER_ROW - 1;
    if area.height as usize > conns_row {
        let label = format!("sort: {sort} ");
        let width = label.len() as u16;
        if area.width > width {
            let rect = Rect {
                x: area.x + area.width - width,
                y: area.y + conns_row as u16,
                width,
                height: 1,
            };
            f.render_widget(
                Paragraph::new(Span::styled(label, Style::default().fg(Color::DarkGray))),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConnectionInfo, ConnectionList, Rates, ServerVitals};

    fn conn(cid: u64, subs: u32, out_msgs: u64) -> ConnectionInfo {
        ConnectionInfo {
            cid,
            ip: "127.0.0.1".into(),
            port: 50_000 + cid as u16,
            subscriptions: subs,
            out_msgs,
            lang: "go".into(),
            version: "1.31.0".into(),
            ..Default::default()
        }
    }

    fn snapshot() -> Snapshot {
        let mut s = Snapshot::empty();
        s.vitals = ServerVitals {
            version: "2.10.4".into(),
            uptime: "1h2m3s".into(),
            cpu: 37.2,
            mem: 12 * 1024 * 1024,
            slow_consumers: 2,
            in_msgs: 1500,
            ..Default::default()
        };
        s.rates = Rates {
            in_msgs: 490.2,
            in_bytes: 2048.0,
            ..Default::default()
        };
        s.connz = ConnectionList {
            num_connections: 3,
            connections: vec![conn(3, 9, 10), conn(1, 5, 900), conn(2, 5, 40)],
        };
        s
    }

    #[test]
    fn summary_lines_carry_vitals_and_rates() {
        let lines = report_lines(&snapshot(), SortKey::Cid);
        assert!(lines[0].starts_with("NATS server version 2.10.4 (uptime: 1h2m3s)"));
        assert_eq!(lines[1], "Server:");
        assert!(lines[2].contains("CPU:  37.2%"), "{}", lines[2]);
        assert!(lines[2].contains("Memory: 12.0M"));
        assert!(lines[2].contains("Slow Consumers: 2"));
        assert!(lines[3].contains("Msgs: 1.5K"));
        assert!(lines[3].contains("Msgs/Sec: 490.2"));
        assert!(lines[3].contains("Bytes/Sec: 2.0K"));
        assert!(lines[5].is_empty());
        assert_eq!(lines[6], "Connections: 3");
        assert!(lines[TABLE_HEADER_ROW].contains("BYTES_FROM"));
    }

    #[test]
    fn rows_follow_sort_key() {
        let cids = |key| {
            report_lines(&snapshot(), key)[TABLE_HEADER_ROW + 1..]
                .iter()
                .map(|l| l.split_whitespace().nth(1).unwrap().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(cids(SortKey::Cid), ["1", "2", "3"]);
        assert_eq!(cids(SortKey::Subs), ["3", "1", "2"]);
        assert_eq!(cids(SortKey::OutMsgs), ["1", "2", "3"]);
        assert_eq!(cids(SortKey::InMsgs), ["1", "2", "3"]);
    }

    #[test]
    fn fetch_error_is_shown_in_title() {
        let mut s = snapshot();
        s.fetch_error = Some("could not get /varz: HTTP 503".into());
        let lines = report_lines(&s, SortKey::Cid);
        assert!(lines[0].ends_with("(last poll failed: could not get /varz: HTTP 503)"));
    }
}
