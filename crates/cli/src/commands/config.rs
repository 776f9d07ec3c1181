use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sourcedesk_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "store.mode",
        config.store.mode.marker(),
        field_source(
            "store.mode",
            Some("SOURCEDESK_STORE_MODE"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "store.remote_base_url",
        config.store.remote_base_url.as_deref().unwrap_or("<unset>"),
        field_source(
            "store.remote_base_url",
            Some("SOURCEDESK_REMOTE_BASE_URL"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "store.request_timeout_secs",
        &config.store.request_timeout_secs.to_string(),
        field_source(
            "store.request_timeout_secs",
            Some("SOURCEDESK_REQUEST_TIMEOUT_SECS"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "store.snapshot_path",
        &config.store.snapshot_path.display().to_string(),
        field_source(
            "store.snapshot_path",
            Some("SOURCEDESK_SNAPSHOT_PATH"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            Some("SOURCEDESK_LOG_LEVEL"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source(
            "logging.format",
            Some("SOURCEDESK_LOG_FORMAT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("sourcedesk.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/sourcedesk.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::{contains_path, render_line};

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: toml::Value = r#"
[store]
mode = "remote"
"#
        .parse()
        .expect("valid toml");

        assert!(contains_path(&doc, "store.mode"));
        assert!(!contains_path(&doc, "store.snapshot_path"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn rendered_lines_carry_source_attribution() {
        let line = render_line("store.mode", "mock", "default".to_string());
        assert_eq!(line, "- store.mode = mock (source: default)");
    }
}
