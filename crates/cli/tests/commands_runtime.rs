use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use sourcedesk_cli::commands::{config, demo, seed};
use tempfile::TempDir;

#[test]
fn seed_writes_the_snapshot_and_reports_counts() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot_path = dir.path().join("snapshot.json");

    with_env(&[("SOURCEDESK_SNAPSHOT_PATH", &snapshot_path.display().to_string())], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected successful seed run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["outcome"], "ok");

        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("4 users"), "seed summary names the user count: {message}");
        assert!(message.contains("3 products"), "seed summary names the product count: {message}");
        assert!(snapshot_path.exists(), "seed writes the snapshot file");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot_path = dir.path().join("snapshot.json");

    with_env(&[("SOURCEDESK_SNAPSHOT_PATH", &snapshot_path.display().to_string())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");

        assert_eq!(
            parse_payload(&first.output)["message"],
            parse_payload(&second.output)["message"]
        );
    });
}

#[test]
fn seed_fails_fast_on_invalid_config() {
    with_env(&[("SOURCEDESK_STORE_MODE", "remote")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 2, "remote mode without a base url is a config failure");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["outcome"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn demo_walks_the_full_flow() {
    with_env(&[], || {
        let result = demo::run();
        assert_eq!(result.exit_code, 0, "expected successful demo run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "demo");
        assert_eq!(payload["outcome"], "ok");

        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("final price 1100"), "10% on 1000 prices at 1100: {message}");
        assert!(message.contains("order"), "acceptance materializes an order: {message}");
    });
}

#[test]
fn config_reports_defaults_with_source_attribution() {
    with_env(&[], || {
        let output = config::run();
        assert!(output.contains("- store.mode = mock (source: default)"), "{output}");
        assert!(output.contains("- logging.level = info (source: default)"), "{output}");
    });
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("SOURCEDESK_LOG_LEVEL", "debug")], || {
        let output = config::run();
        assert!(
            output.contains("- logging.level = debug (source: env (SOURCEDESK_LOG_LEVEL))"),
            "{output}"
        );
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SOURCEDESK_STORE_MODE",
        "SOURCEDESK_REMOTE_BASE_URL",
        "SOURCEDESK_REQUEST_TIMEOUT_SECS",
        "SOURCEDESK_SNAPSHOT_PATH",
        "SOURCEDESK_LOG_LEVEL",
        "SOURCEDESK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
