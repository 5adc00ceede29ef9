use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::config::RetryConfig;
use crate::error::Result;
use tokio::time::{sleep, Duration};
use tracing::warn;

/// Выполняет команду до `retry.attempts` раз с паузой `retry.delay_ms`.
/// Повторяется только ненулевой код возврата; ошибка запуска процесса
/// возвращается сразу.
pub async fn run_with_retry(
    runner: &dyn CommandRunner,
    command: &CommandSpec,
    retry: &RetryConfig,
) -> Result<CommandOutput> {
    let attempts = retry.attempts.max(1);
    let mut attempt = 1;

    loop {
        match runner.run_checked(command).await {
            Ok(output) => return Ok(output),
            Err(e) if e.is_command_failure() && attempt < attempts => {
                warn!(
                    "Попытка {}/{} для `{}` не удалась: {}. Повтор через {} мс",
                    attempt, attempts, command, e, retry.delay_ms
                );
                sleep(Duration::from_millis(retry.delay_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VmonError;
    use crate::services::command::scripted::ScriptedRunner;

    fn addmode() -> CommandSpec {
        CommandSpec::xrandr().args(["--addmode", "VIRTUAL1", "1112x834_60.00"])
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let runner = ScriptedRunner::new().fail_prefix("xrandr --addmode", 1, "BadMatch");
        let retry = RetryConfig { attempts: 1, delay_ms: 0 };

        let err = run_with_retry(&runner, &addmode(), &retry).await.unwrap_err();
        assert!(err.is_command_failure());
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let runner = ScriptedRunner::new()
            .fail_prefix_times("xrandr --addmode", 2, 1, "BadMatch");
        let retry = RetryConfig { attempts: 3, delay_ms: 0 };

        let output = run_with_retry(&runner, &addmode(), &retry).await.unwrap();
        assert!(output.success());
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_all_attempts() {
        let runner = ScriptedRunner::new().fail_prefix("xrandr --addmode", 1, "BadMatch");
        let retry = RetryConfig { attempts: 3, delay_ms: 0 };

        let err = run_with_retry(&runner, &addmode(), &retry).await.unwrap_err();
        match err {
            VmonError::CommandFailed { command, stderr, .. } => {
                assert_eq!(command, "xrandr --addmode VIRTUAL1 1112x834_60.00");
                assert_eq!(stderr, "BadMatch");
            }
            other => panic!("неожиданная ошибка: {other}"),
        }
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_tool_is_not_retried() {
        let runner = ScriptedRunner::new().missing("xrandr");
        let retry = RetryConfig { attempts: 3, delay_ms: 0 };

        let err = run_with_retry(&runner, &addmode(), &retry).await.unwrap_err();
        assert!(matches!(err, VmonError::ToolUnavailable(_)));
        assert_eq!(runner.calls().len(), 1);
    }
}
