//! UI module root: picks the active view and overlays the prompt line.

pub mod dashboard;
pub mod prompt;
pub mod top;
pub mod util;

use crate::input::{PromptView, ViewMode};
use crate::sort::SortKey;
use crate::widgets::Widgets;

pub fn draw(
    f: &mut ratatui::Frame<'_>,
    w: &Widgets,
    view: ViewMode,
    sort: SortKey,
    prompt: &PromptView,
) {
    let area = f.area();
    match view {
        ViewMode::Top => top::draw_top(f, area, &w.report, sort),
        ViewMode::Dashboard => dashboard::draw_dashboard(f, area, w),
    }
    prompt::draw_prompt(f, area, prompt);
}
