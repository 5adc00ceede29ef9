use crate::config::Config;
use crate::error::Result;
use crate::events::MonitorState;
use crate::services::command::{run_with_retry, CommandRunner, CommandSpec};
use crate::services::display_prober::DisplayProber;
use crate::services::modeline::{resolve_modeline, Modeline};
use crate::services::mouse::MouseAdjuster;
use crate::services::process::ProcessChecker;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Результат обработки запроса на смену состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Последовательность команд выполнена, состояние перепроверено
    Completed(MonitorState),
    /// Монитор уже был в запрошенном состоянии, команды не запускались
    AlreadyInState(MonitorState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepPolicy {
    /// Ошибка прерывает последовательность
    Required,
    /// Ошибка только логируется
    BestEffort,
}

struct Step {
    command: CommandSpec,
    policy: StepPolicy,
}

impl Step {
    fn required(command: CommandSpec) -> Self {
        Self { command, policy: StepPolicy::Required }
    }

    fn best_effort(command: CommandSpec) -> Self {
        Self { command, policy: StepPolicy::BestEffort }
    }
}

/// Включает и отключает виртуальный выход. Хранит последнее наблюдаемое
/// состояние; при сбое посреди последовательности отката нет.
pub struct VirtualMonitor {
    config: Arc<Config>,
    runner: Arc<dyn CommandRunner>,
    prober: DisplayProber,
    mouse: MouseAdjuster,
    processes: ProcessChecker,
    state: RwLock<MonitorState>,
}

impl VirtualMonitor {
    pub fn new(config: Arc<Config>, runner: Arc<dyn CommandRunner>) -> Self {
        info!(
            "Инициализация VirtualMonitor (выход: {}, основной: {})",
            config.display.virtual_output, config.display.primary_output
        );

        Self {
            prober: DisplayProber::new(runner.clone(), config.display.virtual_output.as_str()),
            mouse: MouseAdjuster::new(runner.clone(), config.mouse.clone()),
            processes: ProcessChecker::new(runner.clone()),
            state: RwLock::new(MonitorState::Disabled),
            config,
            runner,
        }
    }

    /// Создаёт контроллер и сразу опрашивает текущее состояние
    pub async fn initialize(config: Arc<Config>, runner: Arc<dyn CommandRunner>) -> Self {
        let monitor = Self::new(config, runner);
        let state = monitor.refresh().await;
        info!("Текущее состояние виртуального монитора: {}", state);
        monitor
    }

    pub fn state(&self) -> MonitorState {
        *self.state.read()
    }

    pub async fn refresh(&self) -> MonitorState {
        let state = self.prober.query_state().await;
        *self.state.write() = state;
        state
    }

    /// Текущий вывод xrandr для сообщений об ошибках
    pub async fn diagnostics(&self) -> Option<String> {
        if self.config.display.dump_state_on_error {
            Some(self.prober.dump().await)
        } else {
            None
        }
    }

    pub async fn enable(&self) -> Result<Transition> {
        if self.state().is_enabled() {
            info!("Виртуальный монитор уже включён");
            return Ok(Transition::AlreadyInState(MonitorState::Enabled));
        }

        info!("Включение виртуального монитора {}", self.config.display.virtual_output);
        let modeline = resolve_modeline(&self.config.mode, self.runner.as_ref()).await?;

        if self.config.process.terminate_before_enable {
            if let Some(name) = &self.config.process.name {
                self.processes.terminate_if_running(name).await;
            }
        }

        self.execute(self.enable_steps(&modeline)).await?;

        if self.config.mouse.enabled {
            if let Err(e) = self.mouse.apply_scale().await {
                warn!("Не удалось изменить чувствительность мыши: {}", e);
            }
        }

        let state = self.refresh().await;
        info!("Последовательность включения завершена, состояние: {}", state);
        Ok(Transition::Completed(state))
    }

    pub async fn disable(&self) -> Result<Transition> {
        if !self.state().is_enabled() {
            info!("Виртуальный монитор уже отключён");
            return Ok(Transition::AlreadyInState(MonitorState::Disabled));
        }

        info!("Отключение виртуального монитора {}", self.config.display.virtual_output);
        let modeline = resolve_modeline(&self.config.mode, self.runner.as_ref()).await?;

        self.execute(self.release_steps(&modeline)).await?;

        debug!("Пауза {} мс, пока X-сервер применяет изменения", self.config.display.settle_delay_ms);
        sleep(Duration::from_millis(self.config.display.settle_delay_ms)).await;

        self.execute(self.restore_primary_steps()).await?;

        if self.config.mouse.enabled && self.config.mouse.restore_on_disable {
            if let Err(e) = self.mouse.restore().await {
                warn!("Не удалось восстановить чувствительность мыши: {}", e);
            }
        }

        let state = self.refresh().await;
        info!("Последовательность отключения завершена, состояние: {}", state);
        Ok(Transition::Completed(state))
    }

    fn enable_steps(&self, modeline: &Modeline) -> Vec<Step> {
        let display = &self.config.display;

        let mut activate = CommandSpec::xrandr()
            .args(["--output", display.virtual_output.as_str(), "--mode", modeline.name.as_str()]);
        if let Some(scale) = display.scale {
            activate = activate.arg("--scale").arg(format!("{}x{}", scale, scale));
        }
        if let Some(position) = &display.position {
            activate = activate.arg("--pos").arg(position.as_str());
        }

        vec![
            // Режим может остаться от прошлого запуска
            Step::best_effort(modeline.newmode_command()),
            Step::required(
                CommandSpec::xrandr()
                    .args(["--addmode", display.virtual_output.as_str(), modeline.name.as_str()]),
            ),
            Step::required(activate),
        ]
    }

    fn release_steps(&self, modeline: &Modeline) -> Vec<Step> {
        let display = &self.config.display;

        let mut steps = vec![
            Step::required(
                CommandSpec::xrandr().args(["--output", display.virtual_output.as_str(), "--off"]),
            ),
            Step::required(
                CommandSpec::xrandr()
                    .args(["--delmode", display.virtual_output.as_str(), modeline.name.as_str()]),
            ),
        ];
        if display.remove_mode {
            steps.push(Step::required(
                CommandSpec::xrandr().args(["--rmmode", modeline.name.as_str()]),
            ));
        }
        steps
    }

    fn restore_primary_steps(&self) -> Vec<Step> {
        let display = &self.config.display;

        vec![
            Step::required(
                CommandSpec::xrandr().args(["--output", display.primary_output.as_str(), "--auto"]),
            ),
            Step::required(CommandSpec::xrandr().args(["--dpi".to_string(), display.dpi.to_string()])),
            Step::required(
                CommandSpec::xrandr().args(["--output", display.primary_output.as_str(), "--primary"]),
            ),
        ]
    }

    async fn execute(&self, steps: Vec<Step>) -> Result<()> {
        for step in steps {
            match step.policy {
                StepPolicy::Required => {
                    run_with_retry(self.runner.as_ref(), &step.command, &self.config.retry).await?;
                }
                StepPolicy::BestEffort => {
                    if let Err(e) = self.runner.run_checked(&step.command).await {
                        warn!("Необязательный шаг не выполнен: {}", e);
                    }
                }
            }
        }
        Ok(())
    }
}
