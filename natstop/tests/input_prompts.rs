//! Key handling: quit, view toggle and the sort/limit prompts.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use natstop::config::DisplayOptions;
use natstop::input::{InputMode, InputState, Outcome, PromptView, ViewMode, NOTICE_TTL};
use natstop::sort::SortKey;
use tokio::time::Instant;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ch(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn type_str(st: &mut InputState, opts: &mut DisplayOptions, s: &str, now: Instant) {
    for c in s.chars() {
        st.handle_key(ch(c), opts, now);
    }
}

#[test]
fn q_and_ctrl_c_quit() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();
    assert_eq!(st.handle_key(ch('q'), &mut opts, now), Outcome::Quit);

    // Ctrl-C works from inside a prompt too; plain q there is just text
    st.handle_key(ch('o'), &mut opts, now);
    assert_eq!(st.handle_key(ch('q'), &mut opts, now), Outcome::Redraw);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(st.handle_key(ctrl_c, &mut opts, now), Outcome::Quit);
}

#[test]
fn valid_sort_entry_commits() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();

    assert_eq!(st.handle_key(ch('o'), &mut opts, now), Outcome::Redraw);
    assert_eq!(st.mode(), InputMode::EnteringSort);
    type_str(&mut st, &mut opts, "bytes_to", now);
    assert_eq!(
        st.prompt(&opts),
        PromptView::Sort {
            current: SortKey::Cid,
            buffer: "bytes_to".into()
        }
    );

    assert_eq!(
        st.handle_key(key(KeyCode::Enter), &mut opts, now),
        Outcome::SortChanged(SortKey::OutBytes)
    );
    assert_eq!(opts.sort, SortKey::OutBytes);
    assert_eq!(st.mode(), InputMode::Normal);
    assert_eq!(st.prompt(&opts), PromptView::Hidden);
}

#[test]
fn invalid_sort_shows_notice_for_one_second() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();

    st.handle_key(ch('o'), &mut opts, now);
    type_str(&mut st, &mut opts, "bogus", now);
    assert_eq!(st.handle_key(key(KeyCode::Enter), &mut opts, now), Outcome::Redraw);

    assert_eq!(opts.sort, SortKey::Cid);
    assert_eq!(st.mode(), InputMode::Normal);
    assert_eq!(
        st.prompt(&opts),
        PromptView::Invalid {
            buffer: "bogus".into()
        }
    );
    assert_eq!(st.notice_deadline(), Some(now + NOTICE_TTL));

    assert!(!st.expire_notice(now + Duration::from_millis(999)));
    assert!(st.expire_notice(now + NOTICE_TTL));
    assert_eq!(st.prompt(&opts), PromptView::Hidden);
    assert_eq!(st.notice_deadline(), None);
}

#[test]
fn opening_a_prompt_clears_the_notice() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();
    st.handle_key(ch('o'), &mut opts, now);
    type_str(&mut st, &mut opts, "x", now);
    st.handle_key(key(KeyCode::Enter), &mut opts, now);
    assert!(st.notice_deadline().is_some());

    st.handle_key(ch('n'), &mut opts, now);
    assert_eq!(st.notice_deadline(), None);
    assert_eq!(
        st.prompt(&opts),
        PromptView::Limit {
            current: 1024,
            buffer: String::new()
        }
    );
}

#[test]
fn limit_entry_commits_digits() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();

    st.handle_key(ch('n'), &mut opts, now);
    assert_eq!(st.mode(), InputMode::EnteringLimit);
    type_str(&mut st, &mut opts, "250", now);
    assert_eq!(st.buffer(), "250");
    assert_eq!(
        st.handle_key(key(KeyCode::Enter), &mut opts, now),
        Outcome::LimitChanged(250)
    );
    assert_eq!(opts.conns, 250);
}

#[test]
fn limit_rejects_non_digits_and_zero() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();

    st.handle_key(ch('n'), &mut opts, now);
    type_str(&mut st, &mut opts, "abc", now);
    assert_eq!(st.buffer(), "");
    assert_eq!(st.handle_key(key(KeyCode::Enter), &mut opts, now), Outcome::Redraw);
    assert_eq!(opts.conns, 1024);

    st.handle_key(ch('n'), &mut opts, now);
    type_str(&mut st, &mut opts, "0", now);
    st.handle_key(key(KeyCode::Enter), &mut opts, now);
    assert_eq!(opts.conns, 1024);
    assert_eq!(st.mode(), InputMode::Normal);
}

#[test]
fn backspace_and_escape_edit_the_buffer() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();

    st.handle_key(ch('o'), &mut opts, now);
    type_str(&mut st, &mut opts, "subx", now);
    assert_eq!(st.handle_key(key(KeyCode::Backspace), &mut opts, now), Outcome::Redraw);
    assert_eq!(st.buffer(), "sub");
    type_str(&mut st, &mut opts, "s", now);
    assert_eq!(st.handle_key(key(KeyCode::Esc), &mut opts, now), Outcome::Redraw);
    assert_eq!(st.mode(), InputMode::Normal);
    assert_eq!(st.buffer(), "");
    assert_eq!(opts.sort, SortKey::Cid);

    st.handle_key(ch('n'), &mut opts, now);
    assert_eq!(st.handle_key(key(KeyCode::Backspace), &mut opts, now), Outcome::Ignored);
}

#[test]
fn prompts_are_mutually_exclusive() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();

    st.handle_key(ch('o'), &mut opts, now);
    // 'n' is text inside the sort prompt, not a mode switch
    st.handle_key(ch('n'), &mut opts, now);
    assert_eq!(st.mode(), InputMode::EnteringSort);
    assert_eq!(st.buffer(), "n");
}

#[test]
fn space_toggles_view_only_in_normal_mode() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();
    assert_eq!(st.view(), ViewMode::Top);

    assert_eq!(
        st.handle_key(ch(' '), &mut opts, now),
        Outcome::ViewChanged(ViewMode::Dashboard)
    );
    assert_eq!(
        st.handle_key(ch(' '), &mut opts, now),
        Outcome::ViewChanged(ViewMode::Top)
    );

    st.handle_key(ch('o'), &mut opts, now);
    st.handle_key(ch(' '), &mut opts, now);
    assert_eq!(st.view(), ViewMode::Top);
    assert_eq!(st.buffer(), " ");
}

#[test]
fn key_release_is_ignored() {
    let now = Instant::now();
    let mut opts = DisplayOptions::default();
    let mut st = InputState::new();
    let mut release = ch('q');
    release.kind = KeyEventKind::Release;
    assert_eq!(st.handle_key(release, &mut opts, now), Outcome::Ignored);
    assert_eq!(st.handle_key(ch('x'), &mut opts, now), Outcome::Ignored);
}
