use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `HELPDESK_SERVER_PORT`.
pub const ENV_PREFIX: &str = "HELPDESK_";

/// Read `path` as TOML, then apply `HELPDESK_*` environment overrides.
///
/// Nested keys are joined with `_`: `HELPDESK_DATABASE_PATH` sets
/// `database.path`. The reference lists can only come from the file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    sources(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parse a TOML document with no environment layer.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn sources(path: &Path) -> Figment {
    // HELPDESK_CONFIG names the file itself.
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("_"))
}
