// Output formatting: CSV tables, JSON, and terminal summaries.

pub mod tables;
pub mod terminal;

use anyhow::Result;
use serde::Serialize;

/// Render any result type (or a whole pipeline report) as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
