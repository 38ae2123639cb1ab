//! Error handling for the layercake application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error as ThisError;

/// Custom error types for layercake operations.
///
/// This enum represents all possible errors that can occur while composing a project.
/// It implements the standard Error trait through thiserror's derive macro.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while walking a layer tree
    #[error("Directory traversal error: {0}.")]
    WalkError(#[from] walkdir::Error),

    /// Represents errors raised by the MiniJinja engine
    #[error("MiniJinja error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors raised while initializing the repository
    #[error("Git error: {0}.")]
    GitError(#[from] git2::Error),

    /// Template-root configuration could not be read or parsed
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// An existing `config.json` of an extension could not be parsed
    #[error("Couldn't parse existing config.json file. Extension: {extension}; config file path: {config_path}: {reason}.")]
    ExtensionConfigError { extension: String, config_path: String, reason: String },

    /// Two extension directories share the same identifier
    #[error("Extension '{extension}' is defined twice: '{first}' and '{second}'.")]
    DuplicateExtensionError { extension: String, first: String, second: String },

    /// A selected extension, or an `extends` parent, is not in the registry
    #[error("Unknown extension '{extension}'.")]
    UnknownExtensionError { extension: String },

    /// The `extends` links of an extension loop back on themselves
    #[error("Extension 'extends' cycle: {chain}.")]
    ExtendsCycleError { chain: String },

    /// A templated file does not provide a usable render function
    #[error("Template {template} from {source_label} {reason}.")]
    TemplateContractError { template: String, source_label: String, reason: String },

    /// A render function failed
    #[error("Template {template} from {source_label} failed to render: {reason}.")]
    RenderError { template: String, source_label: String, reason: String },

    /// An argument-source file could not be parsed
    #[error("Invalid args file '{path}': {reason}.")]
    ArgsFileError { path: String, reason: String },

    /// Output directory already exists and `--force` was not given
    #[error("Directory '{output_dir}' already exists. Use --force to reuse it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Template root does not exist
    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateRootMissingError { template_dir: String },

    /// An external command exited unsuccessfully
    #[error("Command '{command}' failed: {status}.")]
    CommandError { command: String, status: String },
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
