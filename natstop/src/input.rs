//! Keyboard handling: view toggle, quit, and the two line-edit prompts
//! (sort key and connection limit).
//!
//! The machine never touches the terminal. It mutates `DisplayOptions` on a
//! confirmed entry and exposes what the prompt line should show through
//! [`InputState::prompt`]; the UI layer paints that.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::time::Instant;
use tracing::info;

use crate::config::DisplayOptions;
use crate::sort::SortKey;

/// How long "invalid order" stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Top,
    Dashboard,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Top => ViewMode::Dashboard,
            ViewMode::Dashboard => ViewMode::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    EnteringSort,
    EnteringLimit,
}

/// What the prompt line should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptView {
    Hidden,
    Sort { current: SortKey, buffer: String },
    Limit { current: u32, buffer: String },
    Invalid { buffer: String },
}

/// Result of feeding one key to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    /// Prompt text changed; repaint.
    Redraw,
    /// The view flipped; re-layout then repaint.
    ViewChanged(ViewMode),
    /// A new sort key was committed; the table needs re-ordering.
    SortChanged(SortKey),
    /// A new connection limit was committed; applies from the next poll.
    LimitChanged(u32),
    Quit,
}

#[derive(Debug, Clone)]
struct Notice {
    buffer: String,
    until: Instant,
}

#[derive(Debug, Default)]
pub struct InputState {
    mode: InputMode,
    view: ViewMode,
    buffer: String,
    notice: Option<Notice>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        opts: &mut DisplayOptions,
        now: Instant,
    ) -> Outcome {
        if key.kind == KeyEventKind::Release {
            return Outcome::Ignored;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Outcome::Quit;
        }
        match self.mode {
            InputMode::Normal => self.normal_key(key),
            InputMode::EnteringSort => self.sort_key(key, opts, now),
            InputMode::EnteringLimit => self.limit_key(key, opts),
        }
    }

    fn normal_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Char('q') => Outcome::Quit,
            KeyCode::Char('o') => {
                self.begin(InputMode::EnteringSort);
                Outcome::Redraw
            }
            KeyCode::Char('n') => {
                self.begin(InputMode::EnteringLimit);
                Outcome::Redraw
            }
            KeyCode::Char(' ') => {
                self.view = self.view.toggled();
                self.notice = None;
                Outcome::ViewChanged(self.view)
            }
            _ => Outcome::Ignored,
        }
    }

    fn sort_key(&mut self, key: KeyEvent, opts: &mut DisplayOptions, now: Instant) -> Outcome {
        match key.code {
            KeyCode::Enter => {
                let typed = std::mem::take(&mut self.buffer);
                self.mode = InputMode::Normal;
                match typed.parse::<SortKey>() {
                    Ok(k) => {
                        opts.sort = k;
                        info!(sort = %k, "sort order changed");
                        Outcome::SortChanged(k)
                    }
                    Err(e) => {
                        info!("{e}");
                        self.notice = Some(Notice {
                            buffer: typed,
                            until: now + NOTICE_TTL,
                        });
                        Outcome::Redraw
                    }
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.buffer.push(c);
                Outcome::Redraw
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Esc => self.cancel(),
            _ => Outcome::Ignored,
        }
    }

    fn limit_key(&mut self, key: KeyEvent, opts: &mut DisplayOptions) -> Outcome {
        match key.code {
            KeyCode::Enter => {
                let typed = std::mem::take(&mut self.buffer);
                self.mode = InputMode::Normal;
                match typed.parse::<u32>() {
                    Ok(n) if n > 0 => {
                        opts.conns = n;
                        info!(limit = n, "connection limit changed");
                        Outcome::LimitChanged(n)
                    }
                    // Unparsable input is dropped; the old limit stays.
                    _ => Outcome::Redraw,
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                Outcome::Redraw
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Esc => self.cancel(),
            _ => Outcome::Ignored,
        }
    }

    fn begin(&mut self, mode: InputMode) {
        self.mode = mode;
        self.buffer.clear();
        self.notice = None;
    }

    fn backspace(&mut self) -> Outcome {
        if self.buffer.pop().is_some() {
            Outcome::Redraw
        } else {
            Outcome::Ignored
        }
    }

    fn cancel(&mut self) -> Outcome {
        self.mode = InputMode::Normal;
        self.buffer.clear();
        Outcome::Redraw
    }

    /// Deadline at which the "invalid order" notice must disappear.
    pub fn notice_deadline(&self) -> Option<Instant> {
        self.notice.as_ref().map(|n| n.until)
    }

    /// Drop the notice once its time is up. Returns true if the screen changed.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        match &self.notice {
            Some(n) if now >= n.until => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn prompt(&self, opts: &DisplayOptions) -> PromptView {
        match self.mode {
            InputMode::EnteringSort => PromptView::Sort {
                current: opts.sort,
                buffer: self.buffer.clone(),
            },
            InputMode::EnteringLimit => PromptView::Limit {
                current: opts.conns,
                buffer: self.buffer.clone(),
            },
            InputMode::Normal => match &self.notice {
                Some(n) => PromptView::Invalid {
                    buffer: n.buffer.clone(),
                },
                None => PromptView::Hidden,
            },
        }
    }
}
