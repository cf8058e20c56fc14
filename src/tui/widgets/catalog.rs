use super::{ACCENT, SELECTOR, TEXT_FADED, TEXT_SECONDARY};
use crate::{
    DurationStyle,
    domain::{CatalogItem, MediaInfo},
    get_readable_duration, truncate_at_last_space,
    ui_state::UiState,
};
use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Padding, StatefulWidget},
};

pub struct CatalogList;
impl StatefulWidget for CatalogList {
    type State = UiState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) {
        let playing_url = state.playback().source_url.as_deref();
        let title_width = (area.width / 2) as usize;

        let items = state
            .catalog
            .iter()
            .map(|item| {
                let icon = match item {
                    CatalogItem::Song(_) => "♫ ",
                    CatalogItem::Episode(_) => "󰦔 ",
                };
                let is_playing = playing_url == Some(item.get_file_url());
                let title_style = match is_playing {
                    true => Style::new().fg(ACCENT),
                    false => Style::new().fg(TEXT_SECONDARY),
                };
                let duration = item
                    .get_duration()
                    .map(|d| format!("  {}", get_readable_duration(d, DurationStyle::Clean)))
                    .unwrap_or_default();

                ListItem::new(Line::from_iter([
                    Span::from(icon).fg(TEXT_FADED),
                    Span::from(truncate_at_last_space(item.get_title(), title_width))
                        .style(title_style),
                    Span::from(" · ").fg(TEXT_FADED),
                    Span::from(item.get_credit().to_string()).fg(TEXT_FADED).italic(),
                    Span::from(duration).fg(TEXT_FADED),
                ]))
            })
            .collect::<Vec<ListItem>>();

        let title = match items.is_empty() {
            true => " No catalog loaded ".to_string(),
            false => format!(" Catalog [{}] ", items.len()),
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(TEXT_FADED))
            .title_top(Line::from(title).left_aligned().fg(ACCENT))
            .title_bottom(
                Line::from(" [⏎] Play  [l] Live Radio ")
                    .centered()
                    .fg(TEXT_FADED),
            )
            .padding(Padding {
                left: 2,
                right: 2,
                top: 1,
                bottom: 0,
            });

        let list = List::new(items)
            .block(block)
            .highlight_symbol(SELECTOR)
            .highlight_style(Style::new().fg(Color::Black).bg(ACCENT))
            .scroll_padding(4);

        StatefulWidget::render(list, area, buf, &mut state.catalog_pos);
    }
}
