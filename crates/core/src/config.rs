use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub mode: StoreMode,
    pub remote_base_url: Option<String>,
    pub request_timeout_secs: u64,
    pub snapshot_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Which persistence gateway backs the workflow store. The snapshot file is
/// tagged with this marker so mock-shaped and remote-shaped records never mix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMode {
    Mock,
    Remote,
}

impl StoreMode {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Remote => "remote",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub store_mode: Option<StoreMode>,
    pub remote_base_url: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                mode: StoreMode::Mock,
                remote_base_url: None,
                request_timeout_secs: 30,
                snapshot_path: PathBuf::from("sourcedesk-snapshot.json"),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for StoreMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "remote" => Ok(Self::Remote),
            other => Err(ConfigError::Validation(format!(
                "unsupported store mode `{other}` (expected mock|remote)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("sourcedesk.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(store) = patch.store {
            if let Some(mode) = store.mode {
                self.store.mode = mode;
            }
            if let Some(remote_base_url) = store.remote_base_url {
                self.store.remote_base_url = Some(remote_base_url);
            }
            if let Some(request_timeout_secs) = store.request_timeout_secs {
                self.store.request_timeout_secs = request_timeout_secs;
            }
            if let Some(snapshot_path) = store.snapshot_path {
                self.store.snapshot_path = snapshot_path;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SOURCEDESK_STORE_MODE") {
            self.store.mode = value.parse()?;
        }
        if let Some(value) = read_env("SOURCEDESK_REMOTE_BASE_URL") {
            self.store.remote_base_url = Some(value);
        }
        if let Some(value) = read_env("SOURCEDESK_REQUEST_TIMEOUT_SECS") {
            self.store.request_timeout_secs =
                parse_u64("SOURCEDESK_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SOURCEDESK_SNAPSHOT_PATH") {
            self.store.snapshot_path = PathBuf::from(value);
        }

        if let Some(value) = read_env("SOURCEDESK_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("SOURCEDESK_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(store_mode) = overrides.store_mode {
            self.store.mode = store_mode;
        }
        if let Some(remote_base_url) = overrides.remote_base_url {
            self.store.remote_base_url = Some(remote_base_url);
        }
        if let Some(snapshot_path) = overrides.snapshot_path {
            self.store.snapshot_path = snapshot_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_store(&self.store)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("sourcedesk.toml"), PathBuf::from("config/sourcedesk.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_store(store: &StoreConfig) -> Result<(), ConfigError> {
    if store.mode == StoreMode::Remote {
        let base_url = store.remote_base_url.as_deref().unwrap_or("").trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "store.remote_base_url is required when store.mode is `remote`".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "store.remote_base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if store.request_timeout_secs == 0 || store.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "store.request_timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if store.snapshot_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("store.snapshot_path must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    mode: Option<StoreMode>,
    remote_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, StoreMode};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_use_mock_store() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.store.mode == StoreMode::Mock, "default store mode should be mock")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_SD_REMOTE_URL", "https://api.example.test");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("sourcedesk.toml");
            fs::write(
                &path,
                r#"
[store]
mode = "remote"
remote_base_url = "${TEST_SD_REMOTE_URL}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.store.mode == StoreMode::Remote, "store mode should come from file")?;
            ensure(
                config.store.remote_base_url.as_deref() == Some("https://api.example.test"),
                "remote base url should be interpolated from environment",
            )
        })();

        clear_vars(&["TEST_SD_REMOTE_URL"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SOURCEDESK_LOG_LEVEL", "warn");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("sourcedesk.toml");
            fs::write(
                &path,
                r#"
[logging]
level = "error"

[store]
request_timeout_secs = 10
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "debug", "programmatic override should win")?;
            ensure(
                config.store.request_timeout_secs == 10,
                "file value should win over the default",
            )
        })();

        clear_vars(&["SOURCEDESK_LOG_LEVEL"]);
        result
    }

    #[test]
    fn remote_mode_requires_base_url() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                store_mode: Some(StoreMode::Remote),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure".to_string()),
            Err(error) => error,
        };

        let mentions_url = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("remote_base_url")
        );
        ensure(mentions_url, "validation failure should mention remote_base_url")
    }

    #[test]
    fn invalid_store_mode_env_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SOURCEDESK_STORE_MODE", "hybrid");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected store mode parse failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(error, ConfigError::Validation(ref message) if message.contains("hybrid")),
                "parse failure should name the offending value",
            )
        })();

        clear_vars(&["SOURCEDESK_STORE_MODE"]);
        result
    }
}
