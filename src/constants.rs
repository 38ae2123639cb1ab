//! Common constants used throughout the layercake application.

/// Supported template-root configuration file names
pub const CONFIG_FILES: [&str; 3] = ["layercake.json", "layercake.yml", "layercake.yaml"];

/// Default name of the base layer directory inside the template root
pub const BASE_DIR: &str = "base";

/// Directory holding the extensions of a template root or of another extension
pub const EXTENSIONS_DIR: &str = "extensions";

/// Directory holding per-package subtrees inside an extension
pub const PACKAGES_DIR: &str = "packages";

/// Per-extension descriptor file
pub const EXTENSION_CONFIG_FILE: &str = "config.json";

/// Package manifest file name; manifests are merged instead of copied
pub const MANIFEST_FILE: &str = "package.json";

/// Suffix of development-mode diagnostic side files
pub const DEV_SUFFIX: &str = "dev";

/// Marker segment of a templated file name: `<target>.template.<ext>`
pub const TEMPLATE_MARKER: &str = ".template.";

/// Marker segment of an argument-source file name: `<target>.args.<ext>`
pub const ARGS_MARKER: &str = ".args.";
