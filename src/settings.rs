//! Settings for the HTTP server.
//!
//! Values come from the defaults below, then an optional `settings` file
//! (`settings.toml`, `settings.json`, ...) in the working directory, then
//! environment variables prefixed with `OPENSPLIT_`, e.g. `OPENSPLIT_PORT`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub log_level: String,
    /// Origin allowed by CORS. Every origin is allowed when unset.
    pub cors_origin: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("OPENSPLIT")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .add_source(builder.build()?)
            .build()?
            .try_deserialize()
    }
}
