pub mod settings;
pub mod styles;
pub mod workflow;

pub use settings::SettingsView;
pub use workflow::WorkflowView;
