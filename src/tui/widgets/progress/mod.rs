mod progress_bar;
mod timer;

use crate::ui_state::UiState;
use progress_bar::ProgressBar;
use ratatui::widgets::StatefulWidget;
use timer::Timer;

pub struct Progress;
impl StatefulWidget for Progress {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        if state.is_idle() || area.height == 0 {
            return;
        }

        ProgressBar.render(area, buf, state);
        Timer.render(area, buf, state);
    }
}
