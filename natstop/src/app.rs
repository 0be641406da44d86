//! App state and main loop: terminal setup, the sampler and updater tasks,
//! and the single foreground loop that handles keys and does every paint.

use std::{
    io::{self, Stdout},
    sync::Arc,
};

use anyhow::Context;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use futures_util::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::{
    sync::{mpsc, Mutex},
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::config::{DisplayOptions, SharedOptions};
use crate::input::{InputState, Outcome, ViewMode};
use crate::sampler::spawn_sampler;
use crate::source::MetricsSource;
use crate::types::Snapshot;
use crate::ui;
use crate::widgets::{redraw_channel, spawn_updater, RedrawSignal, Widgets};

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("could not enter the alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Run `setup`; if it fails, undo whatever raw-mode state it left behind.
fn restore_on_error<T>(
    setup: impl FnOnce() -> anyhow::Result<T>,
    restore: impl FnOnce(),
) -> anyhow::Result<T> {
    setup().inspect_err(|_| restore())
}

pub struct App<S: MetricsSource> {
    source: Arc<S>,
    options: SharedOptions,
    input: InputState,
    widgets: Arc<Mutex<Widgets>>,
}

impl<S: MetricsSource> App<S> {
    pub fn new(source: S, opts: DisplayOptions) -> Self {
        let widgets = Widgets::new(opts.sort, 0);
        Self {
            source: Arc::new(source),
            options: SharedOptions::new(opts),
            input: InputState::new(),
            widgets: Arc::new(Mutex::new(widgets)),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode().context("could not initialize the terminal")?;
        let mut terminal = restore_on_error(setup_terminal, || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;

        // Sampler -> updater -> paint loop
        let (snap_tx, snap_rx) = mpsc::channel::<Snapshot>(1);
        let (redraw, redraw_rx) = redraw_channel();
        let sampler = spawn_sampler(self.source.clone(), self.options.clone(), snap_tx);
        let updater = spawn_updater(
            self.widgets.clone(),
            self.options.clone(),
            snap_rx,
            redraw.clone(),
        );

        // Main loop
        let res = self.event_loop(&mut terminal, &redraw, redraw_rx).await;

        sampler.abort();
        updater.abort();

        // Teardown
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            Clear(ClearType::All),
            LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        redraw: &RedrawSignal,
        mut redraw_rx: mpsc::Receiver<()>,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let height = terminal.size()?.height;
        self.widgets.lock().await.relayout(height);
        self.paint(terminal).await?;

        loop {
            let notice = self.input.notice_deadline();
            tokio::select! {
                ev = events.next() => match ev {
                    Some(Ok(ev)) => {
                        let height = terminal.size()?.height;
                        if self.on_event(ev, height, redraw).await {
                            info!("quit requested");
                            return Ok(());
                        }
                    }
                    Some(Err(e)) => return Err(e).context("terminal input failed"),
                    None => return Ok(()),
                },
                Some(()) = redraw_rx.recv() => {
                    self.paint(terminal).await?;
                }
                _ = sleep_until(notice.unwrap_or_else(Instant::now)), if notice.is_some() => {
                    if self.input.expire_notice(Instant::now()) {
                        redraw.request();
                    }
                }
            }
        }
    }

    /// Apply one terminal event. Returns true when the user asked to quit.
    async fn on_event(&mut self, ev: Event, term_height: u16, redraw: &RedrawSignal) -> bool {
        match ev {
            Event::Key(key) => {
                let outcome = {
                    let mut opts = self.options.write().await;
                    self.input.handle_key(key, &mut opts, Instant::now())
                };
                match outcome {
                    Outcome::Quit => return true,
                    Outcome::Ignored => {}
                    Outcome::Redraw | Outcome::LimitChanged(_) => redraw.request(),
                    Outcome::SortChanged(sort) => {
                        self.widgets.lock().await.refresh_report(sort);
                        redraw.request();
                    }
                    Outcome::ViewChanged(view) => {
                        debug!(?view, "view toggled");
                        if view == ViewMode::Dashboard {
                            self.widgets.lock().await.relayout(term_height);
                        }
                        redraw.request();
                    }
                }
            }
            Event::Resize(_, h) => {
                self.widgets
                    .lock()
                    .await
                    .on_resize(self.input.view(), h, redraw);
            }
            _ => {}
        }
        false
    }

    async fn paint<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let opts = self.options.snapshot().await;
        let prompt = self.input.prompt(&opts);
        let view = self.input.view();
        let widgets = self.widgets.lock().await;
        terminal.draw(|f| ui::draw(f, &widgets, view, opts.sort, &prompt))?;
        Ok(())
    }
}
