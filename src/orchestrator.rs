//! Project creation: sequences composition, rendering and repository setup.

use crate::command::run_command;
use crate::composer::{compose_base, compose_extensions, CopyReport};
use crate::config::LayercakeConfig;
use crate::error::{Error, Result};
use crate::expander::expand;
use crate::git::{commit_all, init_repository};
use crate::options::ScaffoldOptions;
use crate::processor::render_templates;
use crate::registry::ExtensionRegistry;
use crate::renderer::TemplateLoader;
use log::info;
use std::path::{Path, PathBuf};

/// Checks that the template root exists.
pub fn resolve_template_root<P: AsRef<Path>>(template_root: P) -> Result<PathBuf> {
    let path = template_root.as_ref();
    if !path.is_dir() {
        return Err(Error::TemplateRootMissingError { template_dir: path.display().to_string() });
    }
    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

/// Creates the output directory.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if it exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    std::fs::create_dir_all(output_dir)?;
    Ok(output_dir.to_path_buf())
}

/// What to create and which optional stages to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRequest {
    pub target_dir: PathBuf,
    /// Extensions as selected, before expansion
    pub extensions: Vec<String>,
    pub dev: bool,
    pub force: bool,
    pub install: bool,
    pub skip_git: bool,
}

/// Outcome of the composition phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    /// Applied extensions, after expansion
    pub extensions: Vec<String>,
    pub copy: CopyReport,
    pub rendered: usize,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub target_dir: PathBuf,
    pub composition: Composition,
    pub installed: bool,
    pub formatted: bool,
    pub committed: bool,
}

/// Runs the steps of project creation against one template root.
pub struct Orchestrator<'a> {
    template_root: PathBuf,
    config: LayercakeConfig,
    registry: &'a ExtensionRegistry,
    loader: &'a dyn TemplateLoader,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        template_root: impl Into<PathBuf>,
        config: LayercakeConfig,
        registry: &'a ExtensionRegistry,
        loader: &'a dyn TemplateLoader,
    ) -> Self {
        Self { template_root: template_root.into(), config, registry, loader }
    }

    pub fn base_path(&self) -> PathBuf {
        self.template_root.join(&self.config.base_dir)
    }

    /// Composes base and extensions into `target_dir` and renders templates.
    ///
    /// Extensions are expanded, and therefore validated, before anything is
    /// written.
    pub fn compose<S: AsRef<str>>(&self, target_dir: &Path, selected: &[S], dev: bool) -> Result<Composition> {
        let extensions = expand(selected, self.registry)?;
        info!("Applying extensions: [{}]", extensions.join(", "));

        let options = ScaffoldOptions::new(dev, &self.config);
        let base_path = self.base_path();

        let mut copy = compose_base(&options, &base_path, target_dir)?;
        copy += compose_extensions(&options, self.registry, &extensions, target_dir)?;
        let rendered =
            render_templates(&options, self.registry, &extensions, &base_path, target_dir, self.loader)?;

        Ok(Composition { extensions, copy, rendered })
    }

    /// Creates the project described by `request`.
    ///
    /// Steps run strictly in order and the first failure stops the run:
    /// output directory, composition, repository init, install, format,
    /// first commit. Nothing already written is cleaned up.
    pub fn run(&self, request: &ProjectRequest) -> Result<Summary> {
        let target_dir = ensure_output_dir(&request.target_dir, request.force)?;
        info!("Creating project in {}", target_dir.display());

        let composition = self.compose(&target_dir, &request.extensions, request.dev)?;

        if !request.skip_git {
            init_repository(&target_dir, &self.config.branch)?;
        }

        let installed = request.install;
        if installed {
            info!("Installing dependencies");
            run_command(&self.config.install, &target_dir)?;
            info!("Formatting files");
            run_command(&self.config.format, &target_dir)?;
        }

        let committed = !request.skip_git;
        if committed {
            commit_all(&target_dir, &self.config.commit_message)?;
        }

        Ok(Summary { target_dir, composition, installed, formatted: installed, committed })
    }
}
