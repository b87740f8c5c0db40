use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;

pub use models::*;

use env_vars::{get_config_prefix, secret_path_to_env_var, CONFIG_SEPARATOR, SECRET_MARKER};

/// Where a configuration is read from.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Directory holding `default.*` and `{run_env}.*` files.
    pub config_dir: PathBuf,
    /// Name of the environment-specific file, e.g. `debug` or `production`.
    pub run_env: String,
    /// Prefix of overriding environment variables.
    pub env_prefix: String,
}

impl ConfigSources {
    /// Sources derived from `CONFIG_DIR`, `RUN_ENV` and `PREFIX`.
    pub fn from_env() -> Self {
        Self {
            config_dir: PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string())),
            run_env: env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string()),
            env_prefix: get_config_prefix(),
        }
    }
}

/// Loads the application configuration from files and environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    load_config_from(&ConfigSources::from_env())
}

/// Loads configuration from explicit sources.
///
/// Later sources win: `default`, then `{run_env}`, then prefixed environment variables.
pub fn load_config_from(sources: &ConfigSources) -> Result<AppConfig, ConfigError> {
    let default_path = sources.config_dir.join("default");
    let env_path = sources.config_dir.join(&sources.run_env);

    debug!("config: default_path: {}", default_path.display());
    debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&sources.env_prefix)
                .prefix_separator(CONFIG_SEPARATOR)
                .separator(CONFIG_SEPARATOR)
                .list_separator(",")
                .with_list_parse_key("scheduling.work_days")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = secret_path_to_env_var(&path);
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_MARKER);
                    *obj = Value::Null;
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config.
///
/// A marker whose variable is unset becomes `null`, so the optional field reads as missing.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to apply env secrets: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` when set, else a first command line argument
/// starting with `.env`, else `.env`. Loading happens at most once per process.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sources(dir: &std::path::Path, prefix: &str) -> ConfigSources {
        ConfigSources {
            config_dir: dir.to_path_buf(),
            run_env: "test".to_string(),
            env_prefix: prefix.to_string(),
        }
    }

    #[test]
    fn test_defaults_without_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&sources(dir.path(), "SLOTWISE_T_EMPTY")).unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(!config.use_gcal);
        assert_eq!(config.scheduling.time_zone, "Europe/Zurich");
        assert_eq!(config.scheduling.work_days, vec![1, 2, 3, 4, 5]);
        assert_eq!(config.scheduling.work_start_hour, 9);
        assert_eq!(config.scheduling.work_end_hour, 17);
        assert_eq!(config.scheduling.slot_interval_minutes, 30);
        assert_eq!(config.scheduling.buffer_minutes, 10);
        assert_eq!(config.scheduling.min_notice_minutes, 120);
    }

    #[test]
    fn test_run_env_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "use_gcal = true\n[scheduling]\nbuffer_minutes = 5\nwork_start_hour = 8\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("test.toml"),
            "[scheduling]\nbuffer_minutes = 15\n",
        )
        .unwrap();

        let config = load_config_from(&sources(dir.path(), "SLOTWISE_T_FILES")).unwrap();

        assert!(config.use_gcal);
        assert_eq!(config.scheduling.buffer_minutes, 15);
        assert_eq!(config.scheduling.work_start_hour, 8);
        assert_eq!(config.scheduling.work_end_hour, 17);
    }

    #[test]
    fn test_environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\nhost = \"0.0.0.0\"\nport = 3000\n").unwrap();
        env::set_var("SLOTWISE_T_ENV__SERVER__PORT", "9090");
        env::set_var("SLOTWISE_T_ENV__SCHEDULING__WORK_DAYS", "0,6");

        let config = load_config_from(&sources(dir.path(), "SLOTWISE_T_ENV")).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.scheduling.work_days, vec![0, 6]);
    }

    #[test]
    fn test_secret_marker_is_read_from_environment() {
        env::set_var("AUTH_API_KEY", "s3cret");
        let config = AppConfig {
            auth: Some(AuthConfig {
                api_key: Some(SECRET_MARKER.to_string()),
            }),
            ..Default::default()
        };

        let config = apply_env_overrides_from_marker(config).unwrap();

        assert_eq!(config.auth.unwrap().api_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_missing_secret_becomes_none() {
        let config = AppConfig {
            gcal: Some(GcalConfig {
                key_path: Some(SECRET_MARKER.to_string()),
                calendar_id: Some("primary".to_string()),
            }),
            ..Default::default()
        };

        let config = apply_env_overrides_from_marker(config).unwrap();

        let gcal = config.gcal.unwrap();
        assert_eq!(gcal.key_path, None);
        assert_eq!(gcal.calendar_id.as_deref(), Some("primary"));
    }
}
