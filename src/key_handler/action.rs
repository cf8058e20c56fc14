use crate::{
    REFRESH_RATE,
    app_core::OnAir,
    key_handler::*,
    ui_state::{Mode, UiState},
};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::time::Duration;

use KeyCode::*;

pub fn handle_key_event(key_event: KeyEvent, state: &UiState) -> Option<Action> {
    match (key_event.modifiers, key_event.code) {
        (C, Char('c')) => return Some(Action::QUIT),
        (X, Esc) if state.get_error().is_some() => return Some(Action::ClearError),
        _ => (),
    }

    match (key_event.modifiers, key_event.code) {
        // PLAYBACK COMMANDS
        (X, Char('l')) => Some(Action::PlayLive),
        (X, Enter) => Some(Action::PlaySelected),
        (X, Char(' ')) => Some(Action::TogglePause),
        (C, Char('s')) => Some(Action::Stop),

        (X, Char('n')) => Some(Action::SeekForward(SEEK_SMALL)),
        (S, Char('N')) => Some(Action::SeekForward(SEEK_LARGE)),
        (X, Char('p')) => Some(Action::SeekBack(SEEK_SMALL)),
        (S, Char('P')) => Some(Action::SeekBack(SEEK_LARGE)),

        (X, Char('=')) | (S, Char('+')) => Some(Action::Volume(VOLUME_STEP)),
        (X, Char('-')) => Some(Action::Volume(-VOLUME_STEP)),

        // SCROLLING
        (X, Char('j')) | (X, Down) => Some(Action::Scroll(Director::Down(1))),
        (X, Char('k')) | (X, Up) => Some(Action::Scroll(Director::Up(1))),
        (X, Char('d')) => Some(Action::Scroll(Director::Down(SCROLL_MID))),
        (X, Char('u')) => Some(Action::Scroll(Director::Up(SCROLL_MID))),
        (X, Char('g')) => Some(Action::Scroll(Director::Top)),
        (S, Char('G')) => Some(Action::Scroll(Director::Bottom)),

        (X, Char('f')) => Some(Action::ToggleFullscreen),
        (X, Char('q')) => Some(Action::QUIT),

        _ => None,
    }
}

pub fn next_event() -> Result<Option<Event>> {
    match event::poll(Duration::from_millis(REFRESH_RATE))? {
        true => Ok(Some(event::read()?)),
        false => Ok(None),
    }
}

impl OnAir {
    #[rustfmt::skip]
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // Player
            Action::PlayLive            => self.station.play_live()?,
            Action::PlaySelected        => self.play_selected()?,
            Action::TogglePause         => self.station.player_mut().toggle_play_pause(),
            Action::Stop                => self.station.stop(),
            Action::SeekForward(s)      => self.seek_by(s as f64),
            Action::SeekBack(s)         => self.seek_by(-(s as f64)),
            Action::Volume(step)        => self.nudge_volume(step),

            // Display
            Action::Scroll(d)           => self.ui.scroll(d),
            Action::ToggleFullscreen    => self.ui.toggle_fullscreen(),

            // Ops
            Action::ClearError          => self.ui.clear_error(),
            Action::QUIT                => self.ui.set_mode(Mode::QUIT),
        }

        // Transitions publish synchronously; show them before the next tick
        self.sync_ui();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StreamConfig, domain::Catalog, player::PlaybackState};

    fn key(modifiers: ratatui::crossterm::event::KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn ui() -> UiState {
        UiState::new(
            &StreamConfig::default(),
            Catalog::default(),
            PlaybackState::idle(0.8),
        )
    }

    #[test]
    fn playback_keys_map_to_actions() {
        let ui = ui();
        assert_eq!(handle_key_event(key(X, Char(' ')), &ui), Some(Action::TogglePause));
        assert_eq!(handle_key_event(key(X, Char('l')), &ui), Some(Action::PlayLive));
        assert_eq!(
            handle_key_event(key(S, Char('N')), &ui),
            Some(Action::SeekForward(SEEK_LARGE))
        );
        assert_eq!(
            handle_key_event(key(X, Char('-')), &ui),
            Some(Action::Volume(-VOLUME_STEP))
        );
        assert_eq!(handle_key_event(key(X, Char('z')), &ui), None);
    }

    #[test]
    fn escape_only_clears_a_visible_error() {
        let mut ui = ui();
        assert_eq!(handle_key_event(key(X, Esc), &ui), None);

        ui.set_error("stream offline");
        assert_eq!(handle_key_event(key(X, Esc), &ui), Some(Action::ClearError));
        assert_eq!(handle_key_event(key(C, Char('c')), &ui), Some(Action::QUIT));
    }
}
