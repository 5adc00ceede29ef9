use crate::services::command::{CommandRunner, CommandSpec};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Есть ли `name` где-либо в выводе списка процессов
pub fn process_list_contains(process_list: &str, name: &str) -> bool {
    process_list.contains(name)
}

pub struct ProcessChecker {
    runner: Arc<dyn CommandRunner>,
}

impl ProcessChecker {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Ошибка `ps` трактуется как "процесс не запущен"
    pub async fn is_running(&self, name: &str) -> bool {
        match self.runner.run_checked(&CommandSpec::new("ps").arg("-A")).await {
            Ok(output) => process_list_contains(&output.stdout, name),
            Err(e) => {
                warn!("Не удалось получить список процессов: {}", e);
                false
            }
        }
    }

    /// `pkill <name>`; неудача только логируется
    pub async fn terminate(&self, name: &str) {
        match self.runner.run_checked(&CommandSpec::new("pkill").arg(name)).await {
            Ok(_) => info!("Процесс '{}' завершён", name),
            Err(e) => warn!("Не удалось завершить процесс '{}': {}", name, e),
        }
    }

    pub async fn terminate_if_running(&self, name: &str) -> bool {
        if self.is_running(name).await {
            self.terminate(name).await;
            true
        } else {
            debug!("Процесс '{}' не запущен", name);
            false
        }
    }
}
