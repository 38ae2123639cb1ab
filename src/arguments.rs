//! Argument sources of templated files.
//!
//! An argument file is a JSON (or YAML) mapping. Every extension may provide
//! one per templated file; their values are accumulated into one list per key.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Key/value pairs contributed by one argument file, in declaration order.
pub type ArgsRecord = IndexMap<String, serde_json::Value>;

/// Accumulated arguments handed to a render function.
pub type CombinedArgs = IndexMap<String, Vec<serde_json::Value>>;

/// Parses argument-file content, JSON first and YAML second.
///
/// # Errors
/// * `Error::ArgsFileError` if the content is not a mapping in either format
pub fn parse_args(content: &str, origin: &Path) -> Result<ArgsRecord> {
    match serde_json::from_str::<ArgsRecord>(content) {
        Ok(record) => Ok(record),
        Err(_) => serde_yaml::from_str::<Option<ArgsRecord>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| Error::ArgsFileError {
                path: origin.display().to_string(),
                reason: format!("expected a mapping of argument names to values: {e}"),
            }),
    }
}

/// Reads and parses one argument file.
pub fn read_args_file(path: &Path) -> Result<ArgsRecord> {
    let content = std::fs::read_to_string(path)?;
    parse_args(&content, path)
}

/// Combines argument records, given in extension-selection order.
///
/// The key set of the first record is the schema of the result: every later
/// record appends to those keys only, and its other keys are dropped.
pub fn combine_args(records: &[ArgsRecord]) -> CombinedArgs {
    let mut combined: CombinedArgs = records
        .first()
        .map(|first| first.keys().map(|key| (key.clone(), Vec::new())).collect())
        .unwrap_or_default();

    for record in records {
        for (key, value) in record {
            if let Some(values) = combined.get_mut(key) {
                values.push(value.clone());
            }
        }
    }
    combined
}

/// Joined form of a value list used in diagnostics: `[a,b]`.
pub fn join_values(values: &[serde_json::Value]) -> String {
    let parts = values
        .iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>();
    format!("[{}]", parts.join(","))
}
