use super::{ACCENT, TEXT_FADED};
use crate::ui_state::UiState;
use ratatui::{
    style::Stylize,
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
};

pub struct Header;
impl StatefulWidget for Header {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        Line::from_iter([
            Span::from(format!(" {} ", state.station_name)).fg(ACCENT).bold(),
            Span::from(state.station_slogan.as_str()).fg(TEXT_FADED).italic(),
        ])
        .left_aligned()
        .render(area, buf);
    }
}
