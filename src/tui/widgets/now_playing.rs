use super::{ACCENT, LIVE_ICON, TEXT_FADED, TEXT_SECONDARY};
use crate::{player::SourceKind, ui_state::UiState};
use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Padding, Paragraph, StatefulWidget, Widget, Wrap},
};

pub struct NowPlayingPane;
impl StatefulWidget for NowPlayingPane {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(TEXT_FADED))
            .title_top(Line::from(" Now Playing ").left_aligned().fg(ACCENT))
            .padding(Padding::uniform(1));

        if state.is_idle() {
            Paragraph::new("Nothing playing.\nPress [l] to tune in.")
                .fg(TEXT_FADED)
                .centered()
                .block(block)
                .render(area, buf);
            return;
        }

        let playback = state.playback();
        let np = &playback.now_playing;

        let kind = match playback.source_kind {
            SourceKind::Live => Span::from(format!("{LIVE_ICON} ON AIR")).fg(Color::LightRed),
            SourceKind::OnDemand => Span::from("ON DEMAND").fg(TEXT_FADED),
        };

        let text = Text::from(vec![
            Line::from(np.title.as_str()).fg(ACCENT).bold(),
            Line::from(np.subtitle.as_str()).fg(TEXT_SECONDARY).italic(),
            Line::default(),
            Line::from(kind),
            Line::from(format!("Artwork: {}", np.artwork_url)).fg(TEXT_FADED),
        ]);

        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
