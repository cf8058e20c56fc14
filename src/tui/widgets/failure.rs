use super::{ACCENT, ERROR_BG};
use crate::ui_state::{ErrorNotice, UiState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Stylize},
    text::Line,
    widgets::{Block, BorderType, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};
use std::time::{Duration, Instant};

/// Popup describing the last failure and what happens next
pub struct FailureNotice;

impl StatefulWidget for FailureNotice {
    type State = UiState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let Some(notice) = state.get_notice() else {
            return;
        };

        let mut lines = vec![Line::from(notice.reason.clone()).bold()];
        if let Some(url) = &notice.source_url {
            lines.push(Line::from(url.clone()).italic());
        }
        lines.push(Line::default());
        lines.push(next_step(notice, state.reconnect_in(Instant::now())));

        let title = match notice.live {
            true => " Stream Lost ",
            false => " Playback Error ",
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .centered()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title_top(Line::from(title).centered().bold())
                    .title_bottom(Line::from(" <Esc> dismiss ").right_aligned())
                    .padding(Padding::symmetric(2, 1)),
            )
            .fg(Color::White)
            .bg(ERROR_BG)
            .render(area, buf);
    }
}

fn next_step(notice: &ErrorNotice, reconnect_in: Option<Duration>) -> Line<'static> {
    match (reconnect_in, notice.source_url.is_some()) {
        (Some(wait), _) => {
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            Line::from(format!("Reconnecting in {secs}s")).fg(ACCENT)
        }
        (None, true) => Line::from("Press <Space> to retry"),
        (None, false) => Line::default(),
    }
}
