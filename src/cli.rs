//! Command-line interface implementation for layercake.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for layercake.
#[derive(Parser, Debug)]
#[command(author, version, about = "layercake: compose a project from a base template and extensions", long_about = None)]
pub struct Args {
    /// Directory where the generated project will be created
    #[arg(value_name = "PROJECT", required_unless_present = "list_extensions")]
    pub project: Option<PathBuf>,

    /// Template root containing `base/` and `extensions/`
    #[arg(short, long, value_name = "DIR", default_value = "templates")]
    pub templates: PathBuf,

    /// Extension to apply; repeat the flag or separate identifiers with commas
    #[arg(short, long = "extension", value_name = "ID", value_delimiter = ',', action = ArgAction::Append)]
    pub extensions: Vec<String>,

    /// Development mode: hard-link template files and write `.dev` diagnostics
    #[arg(long)]
    pub dev: bool,

    /// Install dependencies after composing (default)
    #[arg(short, long, conflicts_with = "skip_install")]
    pub install: bool,

    /// Skip dependency install and formatting
    #[arg(short, long)]
    pub skip_install: bool,

    /// Skip repository initialization and the first commit
    #[arg(long)]
    pub skip_git: bool,

    /// Reuse an existing project directory.
    /// Files already present are kept; layers never overwrite them.
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the extensions of the template root and exit
    #[arg(long)]
    pub list_extensions: bool,
}

impl Args {
    /// Whether the install and format stages run.
    pub fn should_install(&self) -> bool {
        self.install || !self.skip_install
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
