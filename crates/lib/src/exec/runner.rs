use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{ExecError, Invocation, OutputMode, ProcessOutput, Runner};

/// Runs invocations as real child processes.
///
/// Children inherit the parent environment with the invocation's overlay on
/// top, and are killed if the future driving them is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
  async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args).kill_on_drop(true);

    if let Some(dir) = invocation.working_dir() {
      command.current_dir(dir);
    }
    invocation.env.apply(&mut command);

    debug!(
      cmd = %invocation,
      cwd = ?invocation.working_dir(),
      "spawning process"
    );

    let spawn_err = |source| ExecError::Spawn {
      program: invocation.program.clone(),
      source,
    };

    match invocation.output {
      OutputMode::Inherit => {
        let status = command
          .stdin(Stdio::null())
          .stdout(Stdio::from(std::io::stderr()))
          .status()
          .await
          .map_err(spawn_err)?;

        if !status.success() {
          return Err(ExecError::Failed {
            cmd: invocation.command_line(),
            code: status.code(),
            stderr: String::new(),
          });
        }
        Ok(ProcessOutput::default())
      }
      OutputMode::Capture => {
        let output = command
          .stdin(Stdio::null())
          .output()
          .await
          .map_err(spawn_err)?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
          if !stdout.is_empty() {
            debug!(stdout = %stdout.trim(), "command stdout");
          }
          return Err(ExecError::Failed {
            cmd: invocation.command_line(),
            code: output.status.code(),
            stderr,
          });
        }

        Ok(ProcessOutput { stdout, stderr })
      }
    }
  }
}
