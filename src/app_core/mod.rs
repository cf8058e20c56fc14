mod app;
mod player;

pub use app::OnAir;
