use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::{GuardOutcome, RouteGuard};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });
            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// JSON mode prints the rows; text mode prints one line per row via `line`.
pub fn output_rows<T: Serialize>(
    output_format: &OutputFormat,
    rows: &[T],
    empty_message: &str,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Text if rows.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for row in rows {
                println!("{}", line(row));
            }
        }
    }
    Ok(())
}

pub fn output_value<T: Serialize>(output_format: &OutputFormat, value: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            let value = serde_json::to_value(value)?;
            match value.as_object() {
                Some(map) => {
                    for (key, v) in map {
                        println!("{:<20} {}", key, v);
                    }
                }
                None => println!("{}", value),
            }
        }
    }
    Ok(())
}

/// Same check the route guards make before a screen opens.
pub fn ensure_role(guard: RouteGuard) -> anyhow::Result<()> {
    let tokens = crate::cli::config::token_store()?;
    match guard.can_activate(tokens.as_ref()) {
        GuardOutcome::Allow => Ok(()),
        GuardOutcome::Redirect(to) => Err(anyhow::anyhow!(
            "Access denied: {} role required (redirected to {})",
            guard.required(),
            to
        )),
    }
}
