mod buffer_line;
mod catalog;
mod failure;
mod header;
mod now_playing;
mod progress;

pub use buffer_line::BufferLine;
pub use catalog::CatalogList;
pub use failure::FailureNotice;
pub use header::Header;
pub use now_playing::NowPlayingPane;
pub use progress::Progress;

use ratatui::style::Color;

const DUR_WIDTH: u16 = 8;
const PAUSE_ICON: &str = "󰏤";
const LIVE_ICON: &str = "●";
const SELECTOR: &str = "➤ ";

const ACCENT: Color = Color::Rgb(230, 126, 34);
const TEXT_FADED: Color = Color::DarkGray;
const TEXT_SECONDARY: Color = Color::Gray;
const ERROR_BG: Color = Color::Rgb(150, 40, 40);
