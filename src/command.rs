use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Runs `command` (program first) in `cwd` with inherited stdio.
///
/// # Errors
/// * `Error::CommandError` if the command is empty or exits unsuccessfully
/// * `Error::IoError` if the program cannot be spawned
pub fn run_command<S: AsRef<str>>(command: &[S], cwd: &Path) -> Result<()> {
    let display = command.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ");
    let (program, args) = command.split_first().ok_or_else(|| Error::CommandError {
        command: display.clone(),
        status: "empty command".to_string(),
    })?;

    log::debug!("Running '{}' in {}", display, cwd.display());
    let status = Command::new(program.as_ref())
        .args(args.iter().map(|a| a.as_ref()))
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        return Err(Error::CommandError { command: display, status: status.to_string() });
    }
    Ok(())
}
