//! Render pass: turns the templated files of every layer into output files.

use crate::arguments::{combine_args, join_values, CombinedArgs};
use crate::error::Result;
use crate::manifest::dev_path;
use crate::options::ScaffoldOptions;
use crate::registry::ExtensionRegistry;
use crate::renderer::TemplateLoader;
use crate::template::{discover_templates, Provenance, TemplatedFile};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A templated file together with the argument files extensions provide for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub template: TemplatedFile,
    /// In extension-selection order
    pub args_files: Vec<PathBuf>,
}

/// Result of rendering one job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    pub job: RenderJob,
    pub args: CombinedArgs,
    pub content: String,
}

/// Lists the templated files of the base layer, then of each extension in order.
pub fn collect_templates<S: AsRef<str>>(
    registry: &ExtensionRegistry,
    extensions: &[S],
    base_path: &Path,
) -> Result<Vec<TemplatedFile>> {
    let mut templates = discover_templates(base_path, Provenance::Base)?;
    for id in extensions {
        let descriptor = registry.require(id.as_ref())?;
        templates.extend(discover_templates(
            &descriptor.path,
            Provenance::Extension(descriptor.name.clone()),
        )?);
    }
    Ok(templates)
}

/// Finds, for each selected extension in order, the argument file matching `template`.
pub fn resolve_args_files<S: AsRef<str>>(
    template: &TemplatedFile,
    registry: &ExtensionRegistry,
    extensions: &[S],
) -> Result<Vec<PathBuf>> {
    let relative = template.args_relative_path();
    let mut found = Vec::new();
    for id in extensions {
        let candidate = registry.require(id.as_ref())?.path.join(&relative);
        if candidate.is_file() {
            found.push(candidate);
        }
    }
    Ok(found)
}

/// Loads the job's argument files, combines them and renders the template.
///
/// All records are loaded before combining, so contribution order is the
/// order of `args_files`.
pub fn render_job(job: RenderJob, loader: &dyn TemplateLoader) -> Result<RenderedTemplate> {
    let records = job
        .args_files
        .iter()
        .map(|path| loader.load_args(path))
        .collect::<Result<Vec<_>>>()?;
    let args = combine_args(&records);

    debug!("Rendering {} from {}", job.template.target_name, job.template.provenance);
    let content = loader.render(&job.template, &args)?;
    Ok(RenderedTemplate { job, args, content })
}

/// Development-mode description of one rendered template.
pub fn describe_render(rendered: &RenderedTemplate) -> String {
    let template = &rendered.job.template;
    let args_files = if rendered.job.args_files.is_empty() {
        "(no args files writing to the template)".to_string()
    } else {
        rendered
            .job
            .args_files
            .iter()
            .map(|path| format!("\t- {}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let args = if rendered.args.is_empty() {
        "(no args sent for the template)".to_string()
    } else {
        rendered
            .args
            .iter()
            .map(|(name, values)| format!("\t- {name}:\t{}", join_values(values)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "--- TEMPLATE FILE\n{} ({})\n\n\n--- ARGS FILES\n{}\n\n\n--- RESULTING ARGS\n{}\n",
        template.path.display(),
        template.provenance,
        args_files,
        args
    )
}

/// Renders every templated file of the base and the selected extensions into
/// `target_dir` and returns the number of files written.
///
/// Templates render in parallel; nothing is written unless all of them
/// succeed. When two templates produce the same output path, the first one
/// (base before extensions, extensions in order) is kept.
pub fn render_templates<S: AsRef<str>>(
    options: &ScaffoldOptions,
    registry: &ExtensionRegistry,
    extensions: &[S],
    base_path: &Path,
    target_dir: &Path,
    loader: &dyn TemplateLoader,
) -> Result<usize> {
    let jobs = collect_templates(registry, extensions, base_path)?
        .into_iter()
        .map(|template| {
            let args_files = resolve_args_files(&template, registry, extensions)?;
            Ok(RenderJob { template, args_files })
        })
        .collect::<Result<Vec<_>>>()?;
    info!("Rendering {} templated file(s)", jobs.len());

    let rendered = jobs
        .into_par_iter()
        .map(|job| render_job(job, loader))
        .collect::<Result<Vec<_>>>()?;

    let mut written = HashSet::new();
    for item in &rendered {
        let template = &item.job.template;
        let output = target_dir.join(template.output_relative_path());
        if !written.insert(output.clone()) {
            warn!(
                "Skipping {} from {}: {} was already rendered",
                template.target_name,
                template.provenance,
                output.display()
            );
            continue;
        }
        write_output(&output, &item.content)?;
        if options.dev {
            fs::write(dev_path(&output), describe_render(item))?;
        }
    }
    Ok(written.len())
}

fn write_output(output: &Path, content: &str) -> Result<()> {
    debug!("Writing file: {}", output.display());
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    // A file already there may be a hard link into the templates.
    if output.symlink_metadata().is_ok() {
        fs::remove_file(output)?;
    }
    fs::write(output, content)?;
    Ok(())
}
