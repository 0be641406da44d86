//! Prompt line for the sort/limit entries, drawn over the blank sixth row.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Clear, Paragraph},
};

use crate::input::PromptView;

pub const PROMPT_ROW: u16 = 5;

pub fn prompt_text(p: &PromptView) -> Option<String> {
    match p {
        PromptView::Hidden => None,
        PromptView::Sort { current, buffer } => Some(format!("sort by [{current}]: {buffer}")),
        PromptView::Limit { current, buffer } => Some(format!("limit   [{current}]: {buffer}")),
        PromptView::Invalid { buffer } => Some(format!("invalid order: {buffer}")),
    }
}

pub fn draw_prompt(f: &mut ratatui::Frame<'_>, area: Rect, p: &PromptView) {
    let Some(text) = prompt_text(p) else { return };
    if area.height <= PROMPT_ROW {
        return;
    }
    let row = Rect {
        x: area.x,
        y: area.y + PROMPT_ROW,
        width: area.width,
        height: 1,
    };
    let style = match p {
        PromptView::Invalid { .. } => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    };
    f.render_widget(Clear, row);
    f.render_widget(Paragraph::new(Span::styled(text, style)), row);
}
