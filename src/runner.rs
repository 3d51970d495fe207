//! External tool invocation with a single fallback environment.

use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::config::DA3_EXPORT_FORMAT;
use crate::error::{PrepError, Result};
use crate::utility::command_line;

/// Why a single subprocess attempt did not succeed.
#[derive(Debug)]
pub enum ProcessError {
    /// The program could not be started, e.g. not on `PATH`.
    Spawn(std::io::Error),
    /// The program ran and exited unsuccessfully.
    Failed(ExitStatus),
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "could not start: {e}"),
            Self::Failed(status) => write!(f, "{status}"),
        }
    }
}

/// A program plus arguments, run with the caller's stdout/stderr.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `da3 images <images_dir> --model-dir ... --export-dir ... --process-res ...`
    pub fn da3_images(images_dir: &Path, model_dir: &Path, export_dir: &Path, process_res: u32) -> Self {
        Self::new(
            "da3",
            vec![
                "images".to_string(),
                images_dir.display().to_string(),
                "--model-dir".to_string(),
                model_dir.display().to_string(),
                "--export-format".to_string(),
                DA3_EXPORT_FORMAT.to_string(),
                "--export-dir".to_string(),
                export_dir.display().to_string(),
                "--process-res".to_string(),
                process_res.to_string(),
            ],
        )
    }

    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }

    /// Run to completion. Blocks with no timeout.
    pub fn run(&self) -> std::result::Result<ExitStatus, ProcessError> {
        log::info!("> {}", self.command_line());
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(ProcessError::Spawn)?;
        if status.success() {
            Ok(status)
        } else {
            Err(ProcessError::Failed(status))
        }
    }
}

/// Launcher that runs a command inside another execution environment.
#[derive(Debug, Clone)]
pub struct ExecEnv {
    pub program: String,
    pub prefix_args: Vec<String>,
}

impl ExecEnv {
    /// `conda run -n <name> ...`
    pub fn conda(name: &str) -> Self {
        Self {
            program: "conda".to_string(),
            prefix_args: vec!["run".to_string(), "-n".to_string(), name.to_string()],
        }
    }

    /// The same command, launched through this environment.
    pub fn wrap(&self, command: &ToolCommand) -> ToolCommand {
        let mut args = self.prefix_args.clone();
        args.push(command.program.clone());
        args.extend(command.args.iter().cloned());
        ToolCommand::new(self.program.clone(), args)
    }
}

/// Run `command`, retrying once through `fallback` when it fails.
///
/// Failure of the last attempt is fatal for the caller.
pub fn run_with_fallback(command: &ToolCommand, fallback: Option<&ExecEnv>) -> Result<ExitStatus> {
    let err = match command.run() {
        Ok(status) => return Ok(status),
        Err(err) => err,
    };

    let Some(env) = fallback else {
        return Err(PrepError::ToolFailed {
            command: command.command_line(),
            reason: err.to_string(),
        });
    };

    log::warn!(
        "`{}` failed ({err}), retrying through `{}`",
        command.program,
        command_line(&env.program, &env.prefix_args)
    );
    let wrapped = env.wrap(command);
    wrapped.run().map_err(|err| PrepError::ToolFailed {
        command: wrapped.command_line(),
        reason: err.to_string(),
    })
}
