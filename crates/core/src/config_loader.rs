use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};

use crate::config::AppConfig;
use crate::error::{GatewayError, Result};

/// Merges configuration from files and the environment.
///
/// Precedence, lowest to highest: built-in defaults, `config/Config.toml`,
/// `UTANG_*` environment variables. A `config/Config.json` fills any gaps
/// left by the others. Environment variables use `__` between section and
/// key, e.g. `UTANG_API__BASE_URL`.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration from the default locations.
    ///
    /// Missing files are fine; every setting has a default.
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration file cannot be parsed or
    /// a value has the wrong shape.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration with an explicit TOML file path.
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration file cannot be parsed or
    /// a value has the wrong shape.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("UTANG_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(config)
    }
}
