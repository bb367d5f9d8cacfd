//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use rejar::{Error, Result};
use serde::Serialize;

use crate::commands::CmdResult;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// Serialize a command's output value, preserving its exit code.
pub fn map_cmd_result_to_json<T: Serialize>(
    result: CmdResult<T>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), code),
            Err(e) => (Err(Error::Json(e)), 1),
        },
        Err(err) => (Err(err), 1),
    }
}

/// Print the JSON envelope for a finished command.
pub fn print_json_result(result: Result<serde_json::Value>) {
    match result {
        Ok(value) => print_response(&CliResponse::success(value)),
        Err(err) => print_response(&CliResponse::from_error(&err)),
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) {
    use std::io::{self, Write};

    let payload = response
        .to_json()
        .unwrap_or_else(|e| format!("{{\"success\":false,\"error\":{{\"message\":\"{}\"}}}}", e));
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Exit gracefully on SIGPIPE
    let _ = writeln!(handle, "{}", payload);
}
