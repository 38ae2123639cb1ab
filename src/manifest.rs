//! Package manifest merging.
//!
//! Merge semantics:
//! - Objects: deep-merge by key (recursive)
//! - Arrays: source replaces target
//! - Scalars: source wins

use crate::constants::DEV_SUFFIX;
use crate::error::{Error, Result};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Deep merge `source` into `target`.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            // Merge in place so existing keys keep their position.
            for (key, source_value) in source_map {
                match target_map.get_mut(&key) {
                    Some(target_value) => {
                        let current = std::mem::take(target_value);
                        *target_value = deep_merge(current, source_value);
                    }
                    None => {
                        target_map.insert(key, source_value);
                    }
                }
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Dotted key paths whose value differs between `before` and `after`.
pub fn changed_keys(before: &Value, after: &Value) -> Vec<String> {
    let mut changed = Vec::new();
    collect_changes("", before, after, &mut changed);
    changed
}

fn collect_changes(prefix: &str, before: &Value, after: &Value, out: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(before_map), Value::Object(after_map)) => {
            for (key, after_value) in after_map {
                let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                match before_map.get(key) {
                    Some(before_value) => collect_changes(&path, before_value, after_value, out),
                    None => out.push(format!("{path} (added)")),
                }
            }
        }
        _ if before != after => out.push(format!("{prefix} (changed)")),
        _ => {}
    }
}

/// Reads a manifest; `Ok(None)` when the file does not exist.
///
/// # Errors
/// * `Error::ConfigError` naming the manifest if it is not valid JSON
pub fn read_manifest(path: &Path) -> Result<Option<Value>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| Error::ConfigError(format!("failed to parse manifest '{}': {e}", path.display())))
}

fn read_manifest_or_absent(path: &Path) -> Result<Option<Value>> {
    match read_manifest(path) {
        Err(Error::ConfigError(reason)) => {
            warn!("{reason}; treating it as absent");
            Ok(None)
        }
        other => other,
    }
}

/// Merges the manifest at `source_path` into the one at `target_path`.
///
/// Nothing happens when neither file exists. A missing or unparsable side
/// counts as `{}`. In development mode a `<target>.dev` file lists the keys
/// the merge added or changed.
pub fn merge_manifest(target_path: &Path, source_path: &Path, dev: bool) -> Result<()> {
    if !target_path.exists() && !source_path.exists() {
        return Ok(());
    }

    let target = read_manifest_or_absent(target_path)?.unwrap_or_else(|| Value::Object(Map::new()));
    let source = read_manifest_or_absent(source_path)?.unwrap_or_else(|| Value::Object(Map::new()));

    debug!("Merging manifest {} into {}", source_path.display(), target_path.display());
    let merged = deep_merge(target.clone(), source);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(&merged)
        .map_err(|e| Error::ConfigError(format!("failed to serialize manifest: {e}")))?;
    content.push('\n');
    fs::write(target_path, content)?;

    if dev {
        fs::write(dev_path(target_path), describe_merge(source_path, &target, &merged))?;
    }
    Ok(())
}

/// `<path>.dev`
pub fn dev_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(DEV_SUFFIX);
    PathBuf::from(name)
}

fn describe_merge(source_path: &Path, before: &Value, after: &Value) -> String {
    let changes = changed_keys(before, after);
    let changes = if changes.is_empty() {
        "(no keys changed by this merge)".to_string()
    } else {
        changes.iter().map(|c| format!("\t- {c}")).collect::<Vec<_>>().join("\n")
    };
    format!("--- MERGED MANIFEST\n{}\n\n\n--- CHANGED KEYS\n{}\n", source_path.display(), changes)
}
