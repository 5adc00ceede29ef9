use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_command_runner, ControlPanel, StateWatcher, TerminalNotifier, VirtualMonitor};

#[derive(Parser, Debug)]
#[command(name = "vmonctl")]
#[command(about = "Включение и отключение виртуального монитора X11 через xrandr")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "vmon.toml")]
    config: String,

    /// Режим сухого запуска (команды, меняющие конфигурацию, только логируются)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию берётся из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Показать текущее состояние виртуального монитора
    Status,
    /// Включить виртуальный монитор
    Enable,
    /// Отключить виртуальный монитор
    Disable,
    /// Переключить состояние (действие по умолчанию)
    Toggle,
    /// Следить за состоянием до Ctrl+C
    Watch,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск vmonctl v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - конфигурация дисплея меняться не будет");
    }

    utils::check_session(args.dry_run)?;

    let runner = create_command_runner(args.dry_run);
    let monitor = Arc::new(VirtualMonitor::initialize(config.clone(), runner).await);
    let panel = ControlPanel::new(monitor.clone(), Arc::new(TerminalNotifier));

    let outcome = match args.command.unwrap_or(Action::Toggle) {
        Action::Status => {
            panel.status();
            Ok(())
        }
        Action::Enable => panel.enable().await.map(|_| ()),
        Action::Disable => panel.disable().await.map(|_| ()),
        Action::Toggle => panel.toggle().await.map(|_| ()),
        Action::Watch => {
            watch(monitor, config.display.poll_interval_ms).await;
            Ok(())
        }
    };

    // Об ошибке пользователь уже уведомлён через ControlPanel
    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

async fn watch(monitor: Arc<VirtualMonitor>, poll_interval_ms: u64) {
    let watcher = StateWatcher::new(monitor, poll_interval_ms);
    let handle = tokio::spawn(watcher.run());

    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    handle.abort();
    let _ = handle.await;
    info!("Отслеживание остановлено");
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let compact = format == "compact";

    tracing_subscriber::registry()
        .with(filter)
        .with(compact.then(|| tracing_subscriber::fmt::layer().compact()))
        .with((!compact).then(|| tracing_subscriber::fmt::layer()))
        .init();

    Ok(())
}
