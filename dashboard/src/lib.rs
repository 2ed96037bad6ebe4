pub mod api;
pub mod components;
pub mod settings;

pub use api::*;
pub use components::*;
pub use settings::{load_settings, DashboardSettings};
