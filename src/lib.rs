//! layercake assembles a new project from a base template plus a selection of
//! extensions: it layers their file trees, merges their package manifests and
//! renders templated files from arguments contributed by each extension.

/// Argument sources and their accumulation
pub mod arguments;

/// Command-line interface module for the layercake application
pub mod cli;

/// External command execution (install, format)
pub mod command;

/// Layered file-tree copy with per-layer filters
pub mod composer;

/// Common constants
pub mod constants;

/// Configuration handling for template roots and extensions
/// Supports JSON and YAML formats (layercake.json, layercake.yml, layercake.yaml)
pub mod config;

/// Error types and handling for the layercake application
pub mod error;

/// Resolution of `extends` links into the applied extension list
pub mod expander;

/// Name-pattern filters deciding what each layer copies
pub mod filter;

/// Repository initialization and first commit
pub mod git;

/// Logger setup
pub mod logger;

/// Package manifest deep merge
pub mod manifest;

/// Options shared by the copy and render passes
pub mod options;

/// Sequencing of a whole project creation
pub mod orchestrator;

/// Render pass over all templated files
pub mod processor;

/// Extension discovery
pub mod registry;

/// Render functions: MiniJinja templates or functions registered in code
pub mod renderer;

/// Templated-file naming and discovery
pub mod template;
