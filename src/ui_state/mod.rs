mod mode;
mod ui_state;

pub use mode::Mode;
pub use ui_state::{ErrorNotice, UiState};
