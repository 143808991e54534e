//! Scripted-mode output: JSON payloads and human-readable sizes

use serde::Serialize;

use crate::error::{Error, Result};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Format a byte count as `B`, `KB`, `MB` or `GB` with two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// The JSON object every failed scripted command prints.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Failure {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self {
            success: false,
            error: err.code(),
            message: err.to_string(),
        }
    }
}

/// Pretty-printed JSON with two-space indentation, non-ASCII kept as is.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::from)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}
