mod app;
mod components;
mod theme;

pub use app::*;
pub use components::*;
pub use theme::*;
