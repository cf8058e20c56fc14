use crate::{
    tui::widgets::{ACCENT, DUR_WIDTH, LIVE_ICON, TEXT_FADED},
    ui_state::UiState,
};
use ratatui::{
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, LineGauge, Padding, StatefulWidget, Widget},
};

pub struct ProgressBar;

impl StatefulWidget for ProgressBar {
    type State = UiState;
    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let padding = Padding {
            left: DUR_WIDTH + 3,
            right: DUR_WIDTH + 3,
            top: area.height / 2,
            bottom: 0,
        };

        // Live streams have no end to measure against
        if state.is_live() {
            Line::from(format!("{LIVE_ICON} LIVE"))
                .fg(Color::LightRed)
                .centered()
                .render(Block::new().padding(padding).inner(area), buf);
            return;
        }

        let ratio = state.playback().progress_ratio().unwrap_or(0.0);

        LineGauge::default()
            .block(Block::new().padding(padding))
            .filled_style(Style::new().fg(ACCENT))
            .unfilled_style(Style::new().fg(TEXT_FADED))
            .label("")
            .ratio(ratio)
            .render(area, buf);
    }
}
