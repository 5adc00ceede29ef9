use crate::events::MonitorState;
use crate::services::command::{CommandRunner, CommandSpec};
use std::sync::Arc;
use tracing::debug;

/// Определяет состояние виртуального выхода по выводу `xrandr`
pub struct DisplayProber {
    runner: Arc<dyn CommandRunner>,
    virtual_output: String,
}

/// Выход считается подключённым, если в тексте есть подстрока `"<output> connected"`
pub fn is_output_connected(xrandr_output: &str, output: &str) -> bool {
    xrandr_output.contains(&format!("{} connected", output))
}

impl DisplayProber {
    pub fn new(runner: Arc<dyn CommandRunner>, virtual_output: impl Into<String>) -> Self {
        Self {
            runner,
            virtual_output: virtual_output.into(),
        }
    }

    /// Любая ошибка запуска `xrandr` трактуется как "не подключён"
    pub async fn is_virtual_active(&self) -> bool {
        match self.runner.run(&CommandSpec::xrandr()).await {
            Ok(output) if output.success() => {
                is_output_connected(&output.stdout, &self.virtual_output)
            }
            Ok(output) => {
                debug!("xrandr вернул {}: {}", output.status_text(), output.stderr.trim());
                false
            }
            Err(e) => {
                debug!("Не удалось опросить xrandr: {}", e);
                false
            }
        }
    }

    pub async fn query_state(&self) -> MonitorState {
        MonitorState::from_connected(self.is_virtual_active().await)
    }

    /// Текущий вывод `xrandr` для диагностики
    pub async fn dump(&self) -> String {
        match self.runner.run_checked(&CommandSpec::xrandr()).await {
            Ok(output) => output.stdout.trim_end().to_string(),
            Err(e) => format!("<не удалось получить состояние xrandr: {}>", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::command::scripted::ScriptedRunner;
    use crate::services::command::CommandOutput;

    const XRANDR_ENABLED: &str = "\
Screen 0: minimum 8 x 8, current 3032 x 1080, maximum 32767 x 32767
eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 344mm x 194mm
   1920x1080     60.01*+
VIRTUAL1 connected 1112x834+1920+0 (normal left inverted right x axis y axis) 0mm x 0mm
   1112x834_60.00  59.95*
";

    const XRANDR_DISABLED: &str = "\
Screen 0: minimum 8 x 8, current 1920 x 1080, maximum 32767 x 32767
eDP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 344mm x 194mm
   1920x1080     60.01*+
VIRTUAL1 disconnected (normal left inverted right x axis y axis)
";

    #[test]
    fn test_substring_matching() {
        assert!(is_output_connected("VIRTUAL1 connected 1112x834+0+0 ...", "VIRTUAL1"));
        assert!(is_output_connected(XRANDR_ENABLED, "VIRTUAL1"));
        assert!(!is_output_connected(XRANDR_DISABLED, "VIRTUAL1"));
        assert!(!is_output_connected("eDP-1 connected primary 1920x1080+0+0", "VIRTUAL1"));
        assert!(!is_output_connected("", "VIRTUAL1"));
        assert!(!is_output_connected("\u{fffd}\u{fffd} VIRTUAL1connected ~~", "VIRTUAL1"));
        assert!(!is_output_connected("VIRTUAL10 connected", "VIRTUAL1"));
    }

    #[tokio::test]
    async fn test_enabled_when_virtual_output_connected() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .respond_exact("xrandr", CommandOutput::ok("VIRTUAL1 connected 1112x834+0+0 ...")),
        );
        let prober = DisplayProber::new(runner, "VIRTUAL1");
        assert_eq!(prober.query_state().await, MonitorState::Enabled);
    }

    #[tokio::test]
    async fn test_disabled_without_virtual_output() {
        let runner = Arc::new(ScriptedRunner::new().respond_exact(
            "xrandr",
            CommandOutput::ok("eDP-1 connected primary 1920x1080+0+0"),
        ));
        let prober = DisplayProber::new(runner, "VIRTUAL1");
        assert_eq!(prober.query_state().await, MonitorState::Disabled);
    }

    #[tokio::test]
    async fn test_disabled_on_invocation_failure() {
        let missing = DisplayProber::new(Arc::new(ScriptedRunner::new().missing("xrandr")), "VIRTUAL1");
        assert!(!missing.is_virtual_active().await);

        let failing = DisplayProber::new(
            Arc::new(ScriptedRunner::new().fail_prefix("xrandr", 1, "Can't open display")),
            "VIRTUAL1",
        );
        assert!(!failing.is_virtual_active().await);
        assert!(failing.dump().await.contains("Can't open display"));
    }

    #[tokio::test]
    async fn test_dump_returns_raw_output() {
        let runner = Arc::new(ScriptedRunner::new().respond_exact("xrandr", CommandOutput::ok(XRANDR_DISABLED)));
        let prober = DisplayProber::new(runner, "VIRTUAL1");
        let dump = prober.dump().await;
        assert!(dump.starts_with("Screen 0:"));
        assert!(dump.ends_with("VIRTUAL1 disconnected (normal left inverted right x axis y axis)"));
    }
}
