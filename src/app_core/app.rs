use crate::{
    Station, StreamConfig,
    domain::Catalog,
    key_handler, overwrite_line,
    player::{PlaybackController, RodioOutput},
    tui,
    ui_state::{Mode, UiState},
};
use anyhow::Result;
use ratatui::{
    DefaultTerminal,
    crossterm::event::{Event, KeyEventKind},
};
use std::time::Instant;
use tracing::{info, warn};

pub struct OnAir {
    pub(crate) station: Station,
    pub(crate) ui: UiState,
}

impl OnAir {
    pub fn new() -> Result<Self> {
        let config = StreamConfig::load()?;

        let catalog = match config.catalog_path()? {
            Some(path) => Catalog::load_from_file(path)?,
            None => Catalog::default(),
        };
        info!(items = catalog.len(), "catalog ready");

        let player = PlaybackController::new(config.default_volume, RodioOutput::new)?
            .with_metadata(config.metadata_source()?, config.metadata_interval());

        let ui = UiState::new(&config, catalog, player.state().clone());
        let station = Station::new(player, config);

        Ok(OnAir { station, ui })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        let result = self.main_loop(&mut terminal);
        if let Err(e) = &result {
            warn!(error = %e, "main loop exited with an error");
        }

        self.station.stop();
        ratatui::restore();
        overwrite_line("Thanks for tuning in!\n\n")?;

        result
    }

    fn main_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        // MAIN ROUTINE
        loop {
            self.sync_ui();

            // Check for user input
            match key_handler::next_event()? {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = key_handler::handle_key_event(key, &self.ui) {
                        if let Err(e) = self.handle_action(action) {
                            self.ui.set_error(format!("{e:#}"));
                        }
                    }
                }
                _ => (),
            }

            terminal.draw(|f| tui::render(f, &mut self.ui))?;

            if self.ui.get_mode() == Mode::QUIT {
                break;
            }
        }

        Ok(())
    }

    /// Drains station events into the view along with the reconnect schedule
    pub(crate) fn sync_ui(&mut self) {
        let events = self.station.pump(Instant::now());
        self.ui.apply_events(events);
        self.ui.set_reconnect_due(self.station.reconnect_due_at());
    }
}
