use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::{Result, VmonError};
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::debug;

pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        debug!("Запуск: {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => VmonError::ToolUnavailable(format!(
                    "{} не найден ({}): {}",
                    command.program, command, e
                )),
                _ => VmonError::Io(e),
            })?;

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.success() {
            debug!("{} вернул {}: {}", command, output.status_text(), output.stderr.trim());
        }

        Ok(output)
    }
}
