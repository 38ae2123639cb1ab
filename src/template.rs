//! Templated-file naming and discovery.
//!
//! A templated file is named `<target>.template.<ext>`. The text before the
//! marker is the name of the file it produces; its argument sources are named
//! `<target>.args.<ext>` at the same relative location inside an extension.

use crate::constants::{ARGS_MARKER, EXTENSIONS_DIR, TEMPLATE_MARKER};
use crate::error::Result;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/\\]*?)\.template\.").expect("valid template regex"));

static ARGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^/\\]*?)\.args\.").expect("valid args regex"));

/// Returns the target name of a templated file name, if it is one.
///
/// ```
/// use layercake::template::template_target_name;
/// assert_eq!(template_target_name("README.md.template.j2"), Some("README.md"));
/// assert_eq!(template_target_name("README.md"), None);
/// ```
pub fn template_target_name(file_name: &str) -> Option<&str> {
    TEMPLATE_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.is_empty())
}

/// Checks whether the final segment of `path` carries the template marker.
pub fn is_template_path<P: AsRef<Path>>(path: P) -> bool {
    file_name(path.as_ref()).is_some_and(|name| template_target_name(name).is_some())
}

/// Checks whether the final segment of `path` carries the args marker.
pub fn is_args_path<P: AsRef<Path>>(path: P) -> bool {
    file_name(path.as_ref()).is_some_and(|name| ARGS_RE.is_match(name))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Where a templated file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Base,
    /// Extension, by display name
    Extension(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Base => write!(f, "base"),
            Provenance::Extension(name) => write!(f, "extension {name}"),
        }
    }
}

/// A templated file found in one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatedFile {
    /// Absolute source path
    pub path: PathBuf,
    /// Path relative to the owning layer root
    pub relative_path: PathBuf,
    /// Name of the file this template produces
    pub target_name: String,
    pub provenance: Provenance,
}

impl TemplatedFile {
    fn new(path: PathBuf, layer_root: &Path, provenance: Provenance) -> Option<Self> {
        let target_name = template_target_name(file_name(&path)?)?.to_string();
        let relative_path = path.strip_prefix(layer_root).ok()?.to_path_buf();
        Some(Self { path, relative_path, target_name, provenance })
    }

    /// Relative path of the rendered output: the template's directory joined
    /// with the target name.
    pub fn output_relative_path(&self) -> PathBuf {
        match self.relative_path.parent() {
            Some(parent) => parent.join(&self.target_name),
            None => PathBuf::from(&self.target_name),
        }
    }

    /// Relative path at which extensions may provide argument sources.
    pub fn args_relative_path(&self) -> PathBuf {
        let name = file_name(&self.relative_path).unwrap_or_default();
        let marker = format!("{}{}", self.target_name, TEMPLATE_MARKER);
        let replacement = format!("{}{}", self.target_name, ARGS_MARKER);
        self.relative_path.with_file_name(name.replacen(&marker, &replacement, 1))
    }
}

/// Lists every templated file under `layer_root`, in file-name order.
///
/// For extension layers the nested `extensions` folder is a separate set of
/// layers and is not searched.
pub fn discover_templates(layer_root: &Path, provenance: Provenance) -> Result<Vec<TemplatedFile>> {
    let skip_nested = matches!(provenance, Provenance::Extension(_));
    let walker = WalkDir::new(layer_root).sort_by_file_name().into_iter().filter_entry(|entry| {
        !(skip_nested
            && entry.depth() == 1
            && entry.file_type().is_dir()
            && entry.file_name() == EXTENSIONS_DIR)
    });

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(templated) =
            TemplatedFile::new(entry.path().to_path_buf(), layer_root, provenance.clone())
        {
            found.push(templated);
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templated(relative: &str) -> TemplatedFile {
        TemplatedFile::new(
            PathBuf::from("/layer").join(relative),
            Path::new("/layer"),
            Provenance::Base,
        )
        .unwrap()
    }

    #[test]
    fn test_template_target_name() {
        assert_eq!(template_target_name("config.json.template.j2"), Some("config.json"));
        assert_eq!(template_target_name("config.template.json"), Some("config"));
        assert_eq!(template_target_name(".env.template.j2"), Some(".env"));
        assert_eq!(template_target_name(".template.j2"), None);
        assert_eq!(template_target_name("templates.json"), None);
    }

    #[test]
    fn test_is_args_path() {
        assert!(is_args_path("packages/app/README.md.args.json"));
        assert!(!is_args_path("packages/app/README.md"));
        assert!(!is_args_path("args/README.md"));
    }

    #[test]
    fn test_output_and_args_paths() {
        let file = templated("packages/app/README.md.template.j2");
        assert_eq!(file.target_name, "README.md");
        assert_eq!(file.output_relative_path(), PathBuf::from("packages/app/README.md"));
        assert_eq!(file.args_relative_path(), PathBuf::from("packages/app/README.md.args.j2"));

        let root = templated("config.json.template.j2");
        assert_eq!(root.output_relative_path(), PathBuf::from("config.json"));
    }

    #[test]
    fn test_provenance_display() {
        assert_eq!(Provenance::Base.to_string(), "base");
        assert_eq!(Provenance::Extension("Hardhat".into()).to_string(), "extension Hardhat");
    }
}
