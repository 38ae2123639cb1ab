//! Per-run scaffolding options.

use crate::config::LayercakeConfig;

/// Options shared by the composition and render passes of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Development mode: hard links instead of copies, `.dev` diagnostics
    pub dev: bool,
    /// Base-layer globs copied verbatim after the main pass in development mode
    pub dev_verbatim: Vec<String>,
}

impl ScaffoldOptions {
    pub fn new(dev: bool, config: &LayercakeConfig) -> Self {
        Self { dev, dev_verbatim: config.dev_verbatim.clone() }
    }
}
