mod app;
mod theme;
mod views;

pub use app::PlanGridApp;
pub use theme::{setup_fonts, setup_theme};
