use super::{ACCENT, PAUSE_ICON, TEXT_FADED, TEXT_SECONDARY};
use crate::ui_state::UiState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Stylize,
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
};

pub struct BufferLine;

impl StatefulWidget for BufferLine {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let separator = match state.is_paused() {
            true => Span::from(format!(" {PAUSE_ICON} ")).fg(ACCENT),
            false => Span::from(" ✧ ").fg(TEXT_FADED),
        };

        let playing_title = match state.is_idle() {
            true => Line::default(),
            false => {
                let np = &state.playback().now_playing;
                Line::from_iter([
                    Span::from(np.title.clone()).fg(TEXT_SECONDARY),
                    separator,
                    Span::from(np.subtitle.clone()).fg(TEXT_FADED),
                ])
                .centered()
            }
        };

        let status = format!("  {}", state.status_label())
            .fg(TEXT_FADED)
            .into_left_aligned_line();
        let volume = format!("Vol {:>3}%  ", state.volume_percent())
            .fg(TEXT_FADED)
            .into_right_aligned_line();

        let [left, center, right] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .areas(area);

        status.render(left, buf);
        playing_title.render(center, buf);
        volume.render(right, buf);
    }
}
