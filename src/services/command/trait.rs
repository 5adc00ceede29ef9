use super::{CommandOutput, CommandSpec};
use crate::error::{Result, VmonError};
use std::sync::Arc;

/// Trait for command runners that can run in different modes
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Запускает команду и дожидается её завершения.
    /// Ненулевой код возврата ошибкой НЕ считается.
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;

    /// Как `run`, но ненулевой код возврата превращается в `CommandFailed`
    async fn run_checked(&self, command: &CommandSpec) -> Result<CommandOutput> {
        let output = self.run(command).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(VmonError::CommandFailed {
                command: command.to_string(),
                status: output.status_text(),
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

/// Factory function to create an appropriate command runner based on the dry_run flag
pub fn create_command_runner(dry_run: bool) -> Arc<dyn CommandRunner> {
    if dry_run {
        Arc::new(super::dry_run_runner::DryRunCommandRunner::new(
            super::system_runner::SystemCommandRunner::new(),
        ))
    } else {
        Arc::new(super::system_runner::SystemCommandRunner::new())
    }
}
