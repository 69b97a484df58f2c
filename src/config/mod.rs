/// Database connection and table creation
pub mod database;

/// Application settings loaded from `tabledesk.toml` and the environment
pub mod settings;

pub use settings::{AppConfig, Instance, load_app_configuration};
