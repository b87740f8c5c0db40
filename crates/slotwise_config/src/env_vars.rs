//! Environment variable naming for the Slotwise configuration.
//!
//! Configuration values can be overridden with `SLOTWISE__SECTION__KEY`
//! variables, and secrets marked `secret_from_env` in a config file are read
//! from `SECTION_KEY`.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "SLOTWISE";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker value in config files meaning "read this value from the environment".
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"scheduling.buffer_minutes"` becomes `"SLOTWISE__SCHEDULING__BUFFER_MINUTES"`.
pub fn config_path_to_env_var(prefix: &str, path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `["auth", "api_key"]` becomes `"AUTH_API_KEY"`.
pub fn secret_path_to_env_var<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(SECRET_SEPARATOR)
        .to_uppercase()
}
