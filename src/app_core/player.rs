use crate::app_core::OnAir;
use anyhow::{Result, anyhow};

impl OnAir {
    pub(crate) fn play_selected(&mut self) -> Result<()> {
        let item = self
            .ui
            .get_selected_item()
            .ok_or_else(|| anyhow!("Nothing selected!"))?;

        self.station.play_media(&item)?;
        Ok(())
    }

    /// Relative seek; the controller ignores it for live sources
    pub(crate) fn seek_by(&mut self, delta_secs: f64) {
        let player = self.station.player_mut();
        let target = player.state().position.as_secs_f64() + delta_secs;
        player.seek(target);
    }

    pub(crate) fn nudge_volume(&mut self, step: f32) {
        let player = self.station.player_mut();
        let volume = player.state().volume + step;
        player.set_volume((volume * 100.0).round() / 100.0);
    }
}
