// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AvailabilityRules, FinanceRules, Settings};

/// Loads the analytics configuration from an optional `stayview.toml`.
///
/// Every setting has a built-in default matching the fixed business
/// constants, so a missing file yields `Settings::default()` rather than
/// an error.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("stayview").required(false))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}
