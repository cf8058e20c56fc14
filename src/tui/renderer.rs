use super::{AppLayout, BufferLine, CatalogList, FailureNotice, Header, NowPlayingPane, Progress};
use crate::ui_state::{Mode, UiState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Clear, StatefulWidget, Widget},
};

pub fn render(f: &mut Frame, state: &mut UiState) {
    if state.get_mode() == Mode::Fullscreen {
        let [now_playing, progress, bufferline] = get_full_screen_layout(f.area());

        NowPlayingPane.render(now_playing, f.buffer_mut(), state);
        Progress.render(progress, f.buffer_mut(), state);
        BufferLine.render(bufferline, f.buffer_mut(), state);
    } else {
        let layout = AppLayout::new(f.area(), state);

        Header.render(layout.header, f.buffer_mut(), state);
        CatalogList.render(layout.catalog, f.buffer_mut(), state);
        NowPlayingPane.render(layout.now_playing, f.buffer_mut(), state);
        Progress.render(layout.progress_bar, f.buffer_mut(), state);
        BufferLine.render(layout.buffer_line, f.buffer_mut(), state);
    }

    if state.get_error().is_some() {
        let popup_rect = centered_rect(40, 30, f.area());

        Clear.render(popup_rect, f.buffer_mut());
        FailureNotice.render(popup_rect, f.buffer_mut(), state);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

fn get_full_screen_layout(area: Rect) -> [Rect; 3] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas::<3>(area)
}
