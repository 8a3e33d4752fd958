use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ParserConfig {
    /// Run the required-field check after each card is parsed.
    pub validate: bool,
    /// Keep properties the card's version does not support, filed as extensions.
    pub keep_unsupported: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validate: true,
            keep_unsupported: false,
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `cardfile.toml`.
    /// Environment variables (`CARDFILE_PARSER__VALIDATE=false`) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails,
    /// or if the log level is blank.
    pub fn load() -> CoreResult<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("parser.validate", true)?
            .set_default("parser.keep_unsupported", false)?
            // TOML file
            .add_source(config::File::with_name("cardfile.toml").required(false))
            // Environment
            .add_source(
                config::Environment::with_prefix("CARDFILE")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        if settings.logging.level.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::trace!(error = %e, "No .env file loaded");
    }

    Settings::load()
}
