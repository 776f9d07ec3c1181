pub mod config;
pub mod demo;
pub mod seed;

use serde::Serialize;

/// One JSON report per subcommand invocation, so wrapping scripts can parse
/// the outcome without scraping log output.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    command: &'a str,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<&'a str>,
    message: &'a str,
    /// Operator-facing guidance carried from the workflow error taxonomy.
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl AsRef<str>) -> Self {
        Self::render(
            Report {
                command,
                outcome: Outcome::Ok,
                error_class: None,
                message: message.as_ref(),
                hint: None,
            },
            0,
        )
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl AsRef<str>,
        exit_code: u8,
    ) -> Self {
        Self::render(
            Report {
                command,
                outcome: Outcome::Error,
                error_class: Some(error_class),
                message: message.as_ref(),
                hint: None,
            },
            exit_code,
        )
    }

    /// Failure variant for workflow rejections, where the error taxonomy
    /// supplies a human-readable next step alongside the raw message.
    pub fn failure_with_hint(
        command: &str,
        error_class: &str,
        message: impl AsRef<str>,
        hint: &str,
        exit_code: u8,
    ) -> Self {
        Self::render(
            Report {
                command,
                outcome: Outcome::Error,
                error_class: Some(error_class),
                message: message.as_ref(),
                hint: Some(hint),
            },
            exit_code,
        )
    }

    fn render(report: Report<'_>, exit_code: u8) -> Self {
        let output = serde_json::to_string(&report).unwrap_or_else(|error| {
            serde_json::json!({
                "command": report.command,
                "outcome": "error",
                "error_class": "serialization",
                "message": error.to_string(),
            })
            .to_string()
        });
        Self { exit_code, output }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::CommandResult;

    #[test]
    fn success_reports_omit_error_fields() {
        let result = CommandResult::success("seed", "demo dataset loaded");
        let payload: Value = serde_json::from_str(&result.output).expect("valid json");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["outcome"], "ok");
        assert_eq!(payload.get("error_class"), None);
        assert_eq!(payload.get("hint"), None);
    }

    #[test]
    fn failures_carry_class_and_optional_hint() {
        let result = CommandResult::failure_with_hint(
            "demo",
            "workflow",
            "quote not found: Q-1",
            "The requested record could not be found.",
            5,
        );
        let payload: Value = serde_json::from_str(&result.output).expect("valid json");

        assert_eq!(result.exit_code, 5);
        assert_eq!(payload["outcome"], "error");
        assert_eq!(payload["error_class"], "workflow");
        assert_eq!(payload["hint"], "The requested record could not be found.");
    }
}
