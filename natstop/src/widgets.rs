//! Widget state fed by the sampler: report text, chart histories, panel
//! labels and dashboard panel heights. Painting happens elsewhere; this
//! module only prepares what the next paint shows and asks for it.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::SharedOptions;
use crate::history::DashboardHistory;
use crate::input::ViewMode;
use crate::sort::SortKey;
use crate::types::Snapshot;
use crate::ui::top::report_lines;
use crate::ui::util::{psize, psize_rate};

/// Dashboard panel heights as fixed fractions of the terminal height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelHeights {
    /// CPU gauge, 1/7.
    pub cpu: u16,
    /// Connections chart under the gauge, 1/5.
    pub conns: u16,
    /// Each of the three stacked rows, 1/3.
    pub row: u16,
    /// Sparkline inside a rate panel.
    pub line: u16,
    /// First row: gauge + connections on the left, memory on the right.
    pub top: u16,
}

impl PanelHeights {
    pub fn for_height(h: u16) -> Self {
        let cpu = h / 7;
        let conns = h / 5;
        let row = h / 3;
        let line = row - row / 7;
        // gauge + chart may run past a third; never let the rows overflow
        let top = (cpu + conns).max(row).min(h.saturating_sub(2 * row));
        Self {
            cpu,
            conns,
            row,
            line,
            top,
        }
    }

    pub fn total(&self) -> u16 {
        self.top + 2 * self.row
    }
}

/// Sender side of the repaint channel.
#[derive(Debug, Clone)]
pub struct RedrawSignal(mpsc::Sender<()>);

pub fn redraw_channel() -> (RedrawSignal, mpsc::Receiver<()>) {
    let (tx, rx) = mpsc::channel(1);
    (RedrawSignal(tx), rx)
}

impl RedrawSignal {
    /// Ask for a repaint without waiting. If one is already pending it covers
    /// this request too.
    pub fn request(&self) {
        let _ = self.0.try_send(());
    }

    /// Ask for a repaint and wait until the paint loop has room for it.
    /// Returns false once the paint loop is gone.
    pub async fn notify(&self) -> bool {
        self.0.send(()).await.is_ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    pub cpu: String,
    pub conns: String,
    pub mem: String,
    pub in_msgs: String,
    pub in_bytes: String,
    pub out_msgs: String,
    pub out_bytes: String,
}

impl Labels {
    fn from_snapshot(s: &Snapshot) -> Self {
        Self {
            cpu: format!("CPU: {:.1}% ", s.vitals.cpu),
            conns: format!(
                "Connections: {}/{} ",
                s.connz.num_connections, s.vitals.max_connections
            ),
            mem: format!("Memory: {} ", psize(s.vitals.mem)),
            in_msgs: format!("In: Msgs/Sec: {:.1} ", s.rates.in_msgs),
            in_bytes: format!("In: Bytes/Sec: {} ", psize_rate(s.rates.in_bytes)),
            out_msgs: format!("Out: Msgs/Sec: {:.1} ", s.rates.out_msgs),
            out_bytes: format!("Out: Bytes/Sec: {} ", psize_rate(s.rates.out_bytes)),
        }
    }
}

pub struct Widgets {
    pub latest: Snapshot,
    pub report: Vec<String>,
    pub labels: Labels,
    pub cpu_percent: u16,
    pub history: DashboardHistory,
    pub heights: PanelHeights,
}

impl Widgets {
    pub fn new(sort: SortKey, term_height: u16) -> Self {
        let latest = Snapshot::empty();
        Self {
            report: report_lines(&latest, sort),
            labels: Labels::from_snapshot(&latest),
            cpu_percent: 0,
            history: DashboardHistory::default(),
            heights: PanelHeights::for_height(term_height),
            latest,
        }
    }

    /// Fold one sample into every widget. The report is rebuilt regardless of
    /// the active view so switching back to it shows current data.
    pub fn apply_snapshot(&mut self, s: Snapshot, sort: SortKey) {
        self.report = report_lines(&s, sort);
        self.history.record(&s);
        self.labels = Labels::from_snapshot(&s);
        self.cpu_percent = s.vitals.cpu.clamp(0.0, 100.0) as u16;
        self.latest = s;
    }

    /// Re-order the table after a sort change without waiting for a sample.
    pub fn refresh_report(&mut self, sort: SortKey) {
        self.report = report_lines(&self.latest, sort);
    }

    /// Recompute panel heights for the dashboard.
    pub fn relayout(&mut self, term_height: u16) {
        self.heights = PanelHeights::for_height(term_height);
    }

    /// Terminal size changed. Heights only matter for the dashboard; the top
    /// view fills whatever the next frame gives it. Always asks for a repaint.
    pub fn on_resize(&mut self, view: ViewMode, term_height: u16, redraw: &RedrawSignal) {
        if view == ViewMode::Dashboard {
            self.relayout(term_height);
        }
        redraw.request();
    }
}

/// Consume snapshots from the sampler, update the widgets and ask for a
/// repaint. Each repaint request is awaited, which paces the sampler too.
pub fn spawn_updater(
    widgets: Arc<Mutex<Widgets>>,
    options: SharedOptions,
    mut rx: mpsc::Receiver<Snapshot>,
    redraw: RedrawSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(s) = rx.recv().await {
            let sort = options.sort().await;
            widgets.lock().await.apply_snapshot(s, sort);
            if !redraw.notify().await {
                break;
            }
        }
    })
}
