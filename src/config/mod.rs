pub mod proc_loader;
pub mod proc_validator;
pub mod settings;

pub use settings::{ClientSettings, LogFormat, LoggingConfig, PersistentRefreshConfig, SettingsOverrides};
