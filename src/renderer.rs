//! Render functions of templated files.
//!
//! The render pass finds templated files on disk; a [`TemplateLoader`] decides
//! how each one turns combined arguments into file content.
use crate::arguments::{read_args_file, ArgsRecord, CombinedArgs};
use crate::error::{Error, Result};
use crate::template::TemplatedFile;
use cruet::Inflector;
use indexmap::IndexMap;
use minijinja::Environment;
use std::path::{Path, PathBuf};

/// Trait for turning templated files into output content.
pub trait TemplateLoader: Sync {
    /// Loads one argument-source file.
    fn load_args(&self, path: &Path) -> Result<ArgsRecord> {
        read_args_file(path)
    }

    /// Renders `template` with the combined arguments.
    ///
    /// # Errors
    /// * `Error::TemplateContractError` if the template has no usable render function
    /// * `Error::RenderError` if the render function fails
    fn render(&self, template: &TemplatedFile, args: &CombinedArgs) -> Result<String>;
}

fn contract_error(template: &TemplatedFile, reason: impl Into<String>) -> Error {
    Error::TemplateContractError {
        template: template.target_name.clone(),
        source_label: template.provenance.to_string(),
        reason: reason.into(),
    }
}

fn render_error(template: &TemplatedFile, reason: impl ToString) -> Error {
    Error::RenderError {
        template: template.target_name.clone(),
        source_label: template.provenance.to_string(),
        reason: reason.to_string(),
    }
}

/// MiniJinja-based loader: the templated file is a MiniJinja template and the
/// combined arguments are its context.
pub struct MiniJinjaLoader {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaLoader {
    /// Creates a loader whose environment carries the case-conversion filters.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_filter("camel_case", |value: String| value.to_camel_case());
        env.add_filter("pascal_case", |value: String| value.to_pascal_case());
        env.add_filter("snake_case", |value: String| value.to_snake_case());
        env.add_filter("kebab_case", |value: String| value.to_kebab_case());
        env.add_filter("title_case", |value: String| value.to_title_case());
        Self { env }
    }
}

impl Default for MiniJinjaLoader {
    fn default() -> Self {
        MiniJinjaLoader::new()
    }
}

impl TemplateLoader for MiniJinjaLoader {
    fn render(&self, template: &TemplatedFile, args: &CombinedArgs) -> Result<String> {
        let bytes = std::fs::read(&template.path)?;
        let source = String::from_utf8(bytes)
            .map_err(|_| contract_error(template, "is not a UTF-8 MiniJinja template"))?;

        let name = template.relative_path.to_string_lossy().into_owned();
        let mut env = self.env.clone();
        env.add_template_owned(name.clone(), source)
            .map_err(|e| contract_error(template, format!("is not a valid template: {e}")))?;

        let tmpl = env.get_template(&name).map_err(Error::MinijinjaError)?;
        tmpl.render(args).map_err(|e| render_error(template, e))
    }
}

/// Render function registered in code.
pub type RenderFn = Box<dyn Fn(&CombinedArgs) -> Result<String> + Send + Sync>;

/// Loader backed by render functions registered in code.
///
/// A templated file is looked up by its output path relative to the layer
/// (`packages/app/README.md`), then by its bare target name (`README.md`).
#[derive(Default)]
pub struct RegisteredTemplates {
    entries: IndexMap<PathBuf, RenderFn>,
}

impl RegisteredTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `render` for `key`, replacing any previous entry.
    pub fn register<K, F>(&mut self, key: K, render: F) -> &mut Self
    where
        K: Into<PathBuf>,
        F: Fn(&CombinedArgs) -> Result<String> + Send + Sync + 'static,
    {
        self.entries.insert(key.into(), Box::new(render));
        self
    }

    fn lookup(&self, template: &TemplatedFile) -> Option<&RenderFn> {
        self.entries
            .get(&template.output_relative_path())
            .or_else(|| self.entries.get(Path::new(&template.target_name)))
    }
}

impl TemplateLoader for RegisteredTemplates {
    fn render(&self, template: &TemplatedFile, args: &CombinedArgs) -> Result<String> {
        let render = self
            .lookup(template)
            .ok_or_else(|| contract_error(template, "has no registered render function"))?;
        render(args).map_err(|e| match e {
            contract @ Error::TemplateContractError { .. } => contract,
            other => render_error(template, other),
        })
    }
}
