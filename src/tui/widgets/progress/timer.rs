use crate::{
    tui::widgets::{DUR_WIDTH, TEXT_FADED},
    ui_state::UiState,
};
use ratatui::{
    layout::Rect,
    style::Stylize,
    text::Text,
    widgets::{StatefulWidget, Widget},
};

pub struct Timer;
impl StatefulWidget for Timer {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        if area.width < DUR_WIDTH * 2 + 4 {
            return;
        }

        let y_pos = area.y + area.height / 2;
        let x_right = area.x + area.width - DUR_WIDTH - 2;

        Text::from(state.elapsed_display())
            .fg(TEXT_FADED)
            .right_aligned()
            .render(Rect::new(area.x + 2, y_pos, DUR_WIDTH, 1), buf);

        Text::from(state.duration_display())
            .fg(TEXT_FADED)
            .left_aligned()
            .render(Rect::new(x_right, y_pos, DUR_WIDTH, 1), buf);
    }
}
