//! Rendering of validation results.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use trellis_schema::error::ValidationErrors;

/// How `check` prints validation errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ErrorFormat {
    /// One `path: message` line per error.
    #[default]
    Flat,
    /// Errors nested by path, as JSON.
    Tree,
    /// The full error records, as a JSON array.
    Json,
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Render validation errors in the requested format.
pub fn render_errors(
    errors: &ValidationErrors,
    format: ErrorFormat,
    pretty: bool,
) -> serde_json::Result<String> {
    match format {
        ErrorFormat::Flat => Ok(errors.messages().join("\n")),
        ErrorFormat::Tree => to_json(&errors.error_tree(), pretty),
        ErrorFormat::Json => to_json(errors, pretty),
    }
}

/// Render a successful output.
pub fn render_output(output: &Value, pretty: bool) -> serde_json::Result<String> {
    to_json(output, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_schema::prelude::*;

    fn errors() -> ValidationErrors {
        object()
            .field("host", string())
            .field("port", number().min(1.0))
            .build()
            .unwrap()
            .safe_parse(&json!({"port": 0}))
            .unwrap_err()
    }

    #[test]
    fn flat_lists_one_error_per_line() {
        let text = render_errors(&errors(), ErrorFormat::Flat, false).unwrap();
        assert_eq!(text, "host: String is required\nport: Number is too small");
    }

    #[test]
    fn tree_nests_by_field() {
        let text = render_errors(&errors(), ErrorFormat::Tree, false).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["host"]["_errors"], json!(["String is required"]));
        assert_eq!(value["_errors"], json!([]));
    }

    #[test]
    fn json_keeps_codes() {
        let text = render_errors(&errors(), ErrorFormat::Json, true).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[1]["code"], json!("min"));
        assert_eq!(value[1]["path"], json!(["port"]));
    }
}
