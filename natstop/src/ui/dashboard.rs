//! Multi-panel dashboard: CPU gauge, connections and memory charts, and the
//! four rate sparklines.
//!
//! ```text
//! ....cpu.........  ...mem.........
//! ....conns.......  .             .
//! ..in msgs/sec...  ..in bytes/sec.
//! ..out msgs/sec..  .out bytes/sec.
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Sparkline},
};

use crate::history::{HistorySeries, HISTORY_CAP};
use crate::widgets::Widgets;

pub fn draw_dashboard(f: &mut ratatui::Frame<'_>, area: Rect, w: &Widgets) {
    let h = w.heights;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(h.top),
            Constraint::Length(h.row),
            Constraint::Length(h.row),
            Constraint::Min(0),
        ])
        .split(area);

    let halves = |r: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(r)
    };

    // Row 1: gauge over connections (left), memory (right)
    let top = halves(rows[0]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(h.cpu), Constraint::Length(h.conns)])
        .split(top[0]);
    draw_cpu_gauge(f, left[0], &w.labels.cpu, w.cpu_percent);
    draw_line_chart(f, left[1], &w.labels.conns, &w.history.conns);
    draw_line_chart(f, top[1], &w.labels.mem, &w.history.mem_mib);

    let ins = halves(rows[1]);
    draw_rate_spark(f, ins[0], &w.labels.in_msgs, &w.history.in_msgs, h.line, Color::Cyan);
    draw_rate_spark(f, ins[1], &w.labels.in_bytes, &w.history.in_bytes, h.line, Color::Cyan);

    let outs = halves(rows[2]);
    draw_rate_spark(f, outs[0], &w.labels.out_msgs, &w.history.out_msgs, h.line, Color::Green);
    draw_rate_spark(f, outs[1], &w.labels.out_bytes, &w.history.out_bytes, h.line, Color::Green);
}

fn draw_cpu_gauge(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, pct: u16) {
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(pct.min(100))
        .label(Span::styled(format!("{pct}%"), Style::default().fg(Color::Blue)));
    f.render_widget(g, area);
}

fn draw_line_chart(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, hist: &HistorySeries<f64>) {
    let max_points = area.width.saturating_sub(2).max(1) as usize;
    let points: Vec<(f64, f64)> = hist
        .tail(max_points.min(HISTORY_CAP))
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v))
        .collect();
    let y_max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max).max(1.0) * 1.1;
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .marker(Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .data(&points);
    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .x_axis(Axis::default().style(Style::default().fg(Color::White)).bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::White))
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
        );
    f.render_widget(chart, area);
}

fn draw_rate_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: &HistorySeries<u64>,
    line_height: u16,
    color: Color,
) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // Sparkline sits on the bottom `line_height` rows of the panel
    let height = line_height.clamp(1, inner.height);
    let spark_area = Rect {
        x: inner.x,
        y: inner.y + inner.height - height,
        width: inner.width,
        height,
    };
    let data = hist.tail(inner.width as usize);
    let spark = Sparkline::default()
        .data(&data)
        .style(Style::default().fg(color));
    f.render_widget(spark, spark_area);
}
