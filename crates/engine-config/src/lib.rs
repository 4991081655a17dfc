pub mod env;
pub mod error;
pub mod settings;

pub use env::EnvSource;
pub use error::SettingsError;
pub use settings::QuerySettings;
