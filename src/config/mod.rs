pub mod constants;
pub mod settings;

pub use settings::{ArtifactLayout, Settings, SettingsError};
