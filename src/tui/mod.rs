mod layout;
mod renderer;
mod widgets;

pub use layout::AppLayout;
pub use renderer::render;
pub use widgets::{BufferLine, CatalogList, FailureNotice, Header, NowPlayingPane, Progress};
