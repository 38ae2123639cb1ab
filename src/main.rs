//! layercake's main application entry point.
//! Handles command-line argument parsing and hands the run to the orchestrator.

use layercake::{
    cli::{get_args, Args},
    config::load_config,
    error::{default_error_handler, Result},
    logger::init_logger,
    orchestrator::{resolve_template_root, Orchestrator, ProjectRequest},
    registry::{ExtensionDescriptor, ExtensionRegistry},
    renderer::MiniJinjaLoader,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Prints `ids` and their nested extensions as an indented tree.
fn print_extensions(registry: &ExtensionRegistry, ids: &[String], depth: usize) {
    for id in ids {
        let Some(descriptor) = registry.get(id) else { continue };
        println!("{}{}", "  ".repeat(depth), describe(descriptor));
        if let Some(children) = &descriptor.extensions {
            print_extensions(registry, children, depth + 1);
        }
    }
}

fn describe(descriptor: &ExtensionDescriptor) -> String {
    let mut line = descriptor.value.clone();
    if descriptor.name != descriptor.value {
        line.push_str(&format!(" ({})", descriptor.name));
    }
    if let Some(parent) = &descriptor.extends {
        line.push_str(&format!(" extends {parent}"));
    }
    line
}

/// Main application logic execution.
///
/// # Flow
/// 1. Locates the template root and loads its configuration
/// 2. Scans the extension registry
/// 3. Lists extensions, or creates the project
fn run(args: Args) -> Result<()> {
    let template_root = resolve_template_root(&args.templates)?;
    let config = load_config(&template_root)?;
    let registry = ExtensionRegistry::scan(&template_root)?;

    if args.list_extensions {
        print_extensions(&registry, registry.top_level(), 0);
        return Ok(());
    }

    let Some(project) = args.project.clone() else {
        return Ok(());
    };

    let loader = MiniJinjaLoader::new();
    let orchestrator = Orchestrator::new(&template_root, config, &registry, &loader);
    let request = ProjectRequest {
        target_dir: project,
        install: args.should_install(),
        extensions: args.extensions,
        dev: args.dev,
        force: args.force,
        skip_git: args.skip_git,
    };

    let summary = orchestrator.run(&request)?;
    println!(
        "Project created in {} with {} extension(s): {} file(s) copied, {} rendered.",
        summary.target_dir.display(),
        summary.composition.extensions.len(),
        summary.composition.copy.written,
        summary.composition.rendered
    );
    Ok(())
}
