use crate::ui_state::UiState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub catalog: Rect,
    pub now_playing: Rect,
    pub progress_bar: Rect,
    pub buffer_line: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, state: &UiState) -> Self {
        let progress_height = match state.is_idle() {
            true => 0,
            false => 3,
        };

        let [header, upper_block, progress_bar, buffer_line] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(8),
                Constraint::Length(progress_height),
                Constraint::Length(1),
            ])
            .areas(area);

        let [catalog, _, now_playing] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(upper_block);

        AppLayout {
            header,
            catalog,
            now_playing,
            progress_bar,
            buffer_line,
        }
    }
}
