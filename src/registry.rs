//! Extension discovery.
//!
//! Extensions live in directories named `extensions`, either directly under the
//! template root or nested inside another extension. The registry is built once
//! per run and is read-only afterwards.

use crate::config::read_extension_config;
use crate::constants::{EXTENSIONS_DIR, EXTENSION_CONFIG_FILE};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One discovered extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    /// Identifier, the extension's directory name
    pub value: String,
    /// Display name from `config.json`, or the identifier
    pub name: String,
    /// Absolute location of the extension directory
    pub path: PathBuf,
    /// Nested extensions; `None` for leaf extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    /// Parent extension applied before this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl ExtensionDescriptor {
    /// Returns true when the extension has nested extensions of its own.
    pub fn has_children(&self) -> bool {
        self.extensions.is_some()
    }
}

/// Identifier to descriptor lookup for a whole template tree.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    descriptors: IndexMap<String, ExtensionDescriptor>,
    top_level: Vec<String>,
}

impl ExtensionRegistry {
    /// Scans `root` recursively for extensions.
    ///
    /// # Errors
    /// * `Error::ExtensionConfigError` if an existing `config.json` cannot be parsed
    /// * `Error::DuplicateExtensionError` if two directories share an identifier
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let mut registry = Self::default();
        registry.top_level = registry.traverse(&root)?;
        debug!("Discovered {} extension(s) under {}", registry.len(), root.display());
        Ok(registry)
    }

    /// Registers the extensions found under `base_path/extensions` and returns
    /// their identifiers.
    fn traverse(&mut self, base_path: &Path) -> Result<Vec<String>> {
        let extensions_path = base_path.join(EXTENSIONS_DIR);
        if !extensions_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = std::fs::read_dir(&extensions_path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter(|entry| entry.path().is_dir())
            .collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.file_name());

        let mut found = Vec::with_capacity(entries.len());
        for entry in entries {
            let ext_path = entry.path();
            let value = entry.file_name().to_string_lossy().into_owned();
            let config = read_extension_config(&value, &ext_path.join(EXTENSION_CONFIG_FILE))?;

            let children = self.traverse(&ext_path)?;

            if let Some(existing) = self.descriptors.get(&value) {
                return Err(Error::DuplicateExtensionError {
                    extension: value,
                    first: existing.path.display().to_string(),
                    second: ext_path.display().to_string(),
                });
            }

            debug!("Found extension '{}' at {}", value, ext_path.display());
            let descriptor = ExtensionDescriptor {
                name: config.name.unwrap_or_else(|| value.clone()),
                value: value.clone(),
                path: ext_path,
                extensions: (!children.is_empty()).then_some(children),
                extends: config.extends,
            };
            self.descriptors.insert(value.clone(), descriptor);
            found.push(value);
        }

        Ok(found)
    }

    pub fn get(&self, id: &str) -> Option<&ExtensionDescriptor> {
        self.descriptors.get(id)
    }

    /// Like [`get`](Self::get), but an absent identifier is an error.
    pub fn require(&self, id: &str) -> Result<&ExtensionDescriptor> {
        self.get(id)
            .ok_or_else(|| Error::UnknownExtensionError { extension: id.to_string() })
    }

    /// Returns true when `id` names a discovered extension.
    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Identifiers found directly under the template root's `extensions` folder.
    pub fn top_level(&self) -> &[String] {
        &self.top_level
    }

    /// Descriptors in discovery order: nested extensions before their parent.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
