use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::Result;
use tracing::info;

/// Пропускает запросы состояния к настоящим утилитам, а изменяющие команды
/// только логирует.
pub struct DryRunCommandRunner<R> {
    inner: R,
}

impl<R: CommandRunner> DryRunCommandRunner<R> {
    pub fn new(inner: R) -> Self {
        info!("Dry-run режим - команды, меняющие конфигурацию, выполняться не будут");
        Self { inner }
    }
}

#[async_trait::async_trait]
impl<R: CommandRunner> CommandRunner for DryRunCommandRunner<R> {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        if command.is_query() {
            return self.inner.run(command).await;
        }

        info!("[DRY RUN] {}", command);
        Ok(CommandOutput::ok(""))
    }
}
