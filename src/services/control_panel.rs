use crate::error::{Result, VmonError};
use crate::events::MonitorState;
use crate::services::notifier::{Notice, Notifier};
use crate::services::virtual_monitor::{Transition, VirtualMonitor};
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Enable,
    Disable,
}

/// Обработчики "кнопок": запускают переход и сообщают пользователю результат
pub struct ControlPanel {
    monitor: Arc<VirtualMonitor>,
    notifier: Arc<dyn Notifier>,
}

impl ControlPanel {
    pub fn new(monitor: Arc<VirtualMonitor>, notifier: Arc<dyn Notifier>) -> Self {
        Self { monitor, notifier }
    }

    pub fn status(&self) -> MonitorState {
        let state = self.monitor.state();
        self.notifier
            .notify(&Notice::info(format!("Виртуальный монитор {}", state)));
        state
    }

    pub async fn enable(&self) -> Result<Transition> {
        self.handle(Action::Enable).await
    }

    pub async fn disable(&self) -> Result<Transition> {
        self.handle(Action::Disable).await
    }

    /// Действие единственной доступной в текущем состоянии кнопки
    pub async fn toggle(&self) -> Result<Transition> {
        match self.monitor.state() {
            MonitorState::Disabled => self.enable().await,
            MonitorState::Enabled => self.disable().await,
        }
    }

    async fn handle(&self, action: Action) -> Result<Transition> {
        let result = match action {
            Action::Enable => self.monitor.enable().await,
            Action::Disable => self.monitor.disable().await,
        };

        match &result {
            Ok(Transition::AlreadyInState(state)) => {
                self.notifier
                    .notify(&Notice::info(format!("Виртуальный монитор уже {}!", state)));
            }
            Ok(Transition::Completed(state)) => {
                let verb = match action {
                    Action::Enable => "включён",
                    Action::Disable => "отключён",
                };
                let mut body = format!("Виртуальный монитор успешно {}!", verb);
                if *state != expected_state(action) {
                    body.push_str(&format!(" (xrandr сообщает, что монитор {})", state));
                }
                self.notifier.notify(&Notice::success(body));
            }
            Err(e) => {
                error!("Не удалось выполнить {:?}: {}", action, e);
                let body = self.failure_body(action, e).await;
                self.notifier.notify(&Notice::error(body));
            }
        }

        result
    }

    async fn failure_body(&self, action: Action, e: &VmonError) -> String {
        let what = match action {
            Action::Enable => "включить",
            Action::Disable => "отключить",
        };
        let mut body = format!("Не удалось {} виртуальный монитор:\n{}", what, e);
        if let Some(dump) = self.monitor.diagnostics().await {
            body.push_str("\n\nТекущее состояние xrandr:\n");
            body.push_str(&dump);
        }
        body
    }
}

fn expected_state(action: Action) -> MonitorState {
    match action {
        Action::Enable => MonitorState::Enabled,
        Action::Disable => MonitorState::Disabled,
    }
}
