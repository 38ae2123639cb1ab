//! Per-layer copy filters.
//! Decides, from a path relative to the layer root, whether the composer copies
//! an entry, descends into it, or leaves it to a dedicated step.

use crate::constants::{EXTENSIONS_DIR, EXTENSION_CONFIG_FILE, MANIFEST_FILE, PACKAGES_DIR};
use crate::error::{Error, Result};
use crate::template::{is_args_path, is_template_path};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Why an entry was left out of a copy pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rendered by the template pass
    Template,
    /// Consumed by the template pass
    Args,
    /// Merged by the manifest pass
    Manifest,
    /// Extension descriptor
    ExtensionConfig,
    /// Nested extensions are separate layers
    NestedExtensions,
    /// Composed into the target's `packages` folder
    Packages,
    /// Copied verbatim after the main pass in development mode
    DevVerbatim,
    /// Not selected by a verbatim pass
    NotVerbatim,
}

/// Filter decision for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Copy the file, or create the directory
    Keep,
    /// Directory only: walk its children without creating it
    Traverse,
    Skip(SkipReason),
}

impl Verdict {
    pub fn is_skip(&self) -> bool {
        matches!(self, Verdict::Skip(_))
    }
}

#[derive(Debug, Clone)]
enum Rules {
    Base { dev: bool, verbatim: GlobSet },
    ExtensionRoot,
    ExtensionPackages,
    Verbatim { verbatim: GlobSet },
}

/// Name-pattern filter applied to one layer.
#[derive(Debug, Clone)]
pub struct LayerFilter {
    rules: Rules,
}

impl LayerFilter {
    /// Base layer: skips templates and manifests; in development mode also
    /// skips the `verbatim` globs, which are copied separately.
    pub fn base(dev: bool, verbatim: GlobSet) -> Self {
        Self { rules: Rules::Base { dev, verbatim } }
    }

    /// Extension root: skips the descriptor, templates, args, manifests and the
    /// `extensions`/`packages` folders.
    pub fn extension_root() -> Self {
        Self { rules: Rules::ExtensionRoot }
    }

    /// Extension `packages` subtree: skips templates, args and manifests.
    pub fn extension_packages() -> Self {
        Self { rules: Rules::ExtensionPackages }
    }

    /// Keeps only files matching `verbatim`.
    pub fn verbatim(verbatim: GlobSet) -> Self {
        Self { rules: Rules::Verbatim { verbatim } }
    }

    /// Decides what to do with `relative`, a path inside the layer.
    pub fn verdict(&self, relative: &Path, is_dir: bool) -> Verdict {
        let name = relative.file_name().and_then(|n| n.to_str()).unwrap_or_default();

        match &self.rules {
            Rules::Base { dev, verbatim } => {
                if !is_dir {
                    if let Some(reason) = generated_or_manifest(relative, name) {
                        return Verdict::Skip(reason);
                    }
                }
                if *dev && !is_dir && matches_verbatim(verbatim, relative) {
                    return Verdict::Skip(SkipReason::DevVerbatim);
                }
                Verdict::Keep
            }
            Rules::ExtensionRoot => {
                if is_dir {
                    return match name {
                        EXTENSIONS_DIR => Verdict::Skip(SkipReason::NestedExtensions),
                        PACKAGES_DIR => Verdict::Skip(SkipReason::Packages),
                        _ => Verdict::Keep,
                    };
                }
                if relative == Path::new(EXTENSION_CONFIG_FILE) {
                    return Verdict::Skip(SkipReason::ExtensionConfig);
                }
                if is_args_path(relative) {
                    return Verdict::Skip(SkipReason::Args);
                }
                generated_or_manifest(relative, name).map_or(Verdict::Keep, Verdict::Skip)
            }
            Rules::ExtensionPackages => {
                if is_dir {
                    return Verdict::Keep;
                }
                if is_args_path(relative) {
                    return Verdict::Skip(SkipReason::Args);
                }
                generated_or_manifest(relative, name).map_or(Verdict::Keep, Verdict::Skip)
            }
            Rules::Verbatim { verbatim } => {
                if is_dir {
                    Verdict::Traverse
                } else if matches_verbatim(verbatim, relative) {
                    Verdict::Keep
                } else {
                    Verdict::Skip(SkipReason::NotVerbatim)
                }
            }
        }
    }
}

/// A file is verbatim when it, or one of its parent directories, matches.
fn matches_verbatim(verbatim: &GlobSet, relative: &Path) -> bool {
    relative.ancestors().filter(|p| !p.as_os_str().is_empty()).any(|p| verbatim.is_match(p))
}

fn generated_or_manifest(relative: &Path, name: &str) -> Option<SkipReason> {
    if is_template_path(relative) {
        Some(SkipReason::Template)
    } else if name == MANIFEST_FILE {
        Some(SkipReason::Manifest)
    } else {
        None
    }
}

/// Compiles glob patterns into a set.
///
/// # Errors
/// * `Error::ConfigError` naming the first invalid pattern
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        builder.add(Glob::new(pattern).map_err(|e| {
            Error::ConfigError(format!("invalid glob pattern '{pattern}': {e}"))
        })?);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigError(format!("glob set loading failed: {e}")))
}
