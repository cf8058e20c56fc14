use anyhow::{Result, anyhow};
use ratatui::crossterm::{
    ExecutableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

pub mod access;
pub mod app_core;
pub mod config;
pub mod domain;
pub mod key_handler;
pub mod logging;
pub mod player;
pub mod station;
pub mod tui;
pub mod ui_state;

pub use config::StreamConfig;
pub use player::PlaybackController;
pub use station::Station;

// ~30fps
pub const REFRESH_RATE: u64 = 33;

pub const CONFIG_DIRECTORY: &str = "onair";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_FILE: &str = "onair.log";

pub enum DurationStyle {
    Clean,
    Compact,
}

pub fn get_readable_duration(duration: Duration, style: DurationStyle) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let mins = (total / 60) % 60;
    let secs = total % 60;

    match style {
        DurationStyle::Clean => match (hours, mins) {
            (0, 0) => format!("{secs:02}s"),
            (0, _) => format!("{mins}m {secs:02}s"),
            _ => format!("{hours}h {mins:02}m"),
        },
        // Live streams run for hours
        DurationStyle::Compact => match hours {
            0 => format!("{mins}:{secs:02}"),
            _ => format!("{hours}:{mins:02}:{secs:02}"),
        },
    }
}

pub(crate) fn truncate_at_last_space(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }

    let byte_limit = s
        .char_indices()
        .map(|(i, _)| i)
        .nth(limit)
        .unwrap_or(s.len());

    let cut = match s[..byte_limit].rfind(' ') {
        Some(last_space) => last_space,
        None => s[..byte_limit]
            .char_indices()
            .map(|(i, _)| i)
            .last()
            .unwrap_or(0),
    };

    let mut truncated = s[..cut].to_string();
    truncated.push('…');
    truncated
}

pub fn overwrite_line(message: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout
        .execute(MoveToColumn(0))?
        .execute(Clear(ClearType::CurrentLine))?
        .execute(Print(message))?;
    stdout.flush()
}

pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    match path_str.strip_prefix("~/").or(path_str.strip_prefix("~\\")) {
        Some(rest) => {
            let home =
                dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory!"))?;
            Ok(home.join(rest))
        }
        None if path_str == "~" => Err(anyhow!("Expected a file path, not the home directory")),
        None => Err(anyhow!("Error reading path with tilde (~): {path_str}")),
    }
}
