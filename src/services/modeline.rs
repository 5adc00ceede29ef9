use crate::config::{ModeConfig, ModeSource};
use crate::error::Result;
use crate::services::command::{CommandRunner, CommandSpec};
use crate::vmon_error;
use tracing::{debug, info};

/// Именованный видеорежим для `xrandr --newmode`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modeline {
    pub name: String,
    pub timings: Vec<String>,
}

impl Modeline {
    pub fn from_fixed(config: &ModeConfig) -> Self {
        Self {
            name: config.name.clone(),
            timings: config.timings.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn newmode_command(&self) -> CommandSpec {
        CommandSpec::xrandr()
            .arg("--newmode")
            .arg(self.name.as_str())
            .args(self.timings.iter().map(String::as_str))
    }
}

/// Разбирает вывод `gtf`:
///
/// ```text
///   # 1112x834 @ 60.00 Hz (GTF) hsync: 51.78 kHz; pclk: 75.81 MHz
///   Modeline "1112x834_60.00"  75.81  1112 1168 1288 1464  834 835 838 863  -HSync +Vsync
/// ```
pub fn parse_gtf_output(output: &str) -> Result<Modeline> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("Modeline"))
        .ok_or_else(|| vmon_error!(parse, "в выводе gtf нет строки Modeline"))?;

    let rest = line["Modeline".len()..].trim_start();
    let rest = rest
        .strip_prefix('"')
        .ok_or_else(|| vmon_error!(parse, "имя режима в gtf не в кавычках: {}", line))?;
    let (name, timings) = rest
        .split_once('"')
        .ok_or_else(|| vmon_error!(parse, "незакрытая кавычка в строке gtf: {}", line))?;

    let timings: Vec<String> = timings.split_whitespace().map(str::to_string).collect();
    if name.is_empty() || timings.len() < 9 {
        return Err(vmon_error!(parse, "неполная строка Modeline: {}", line));
    }

    Ok(Modeline {
        name: name.to_string(),
        timings,
    })
}

/// Возвращает режим из конфигурации или генерирует его через `gtf`
pub async fn resolve_modeline(config: &ModeConfig, runner: &dyn CommandRunner) -> Result<Modeline> {
    match config.source {
        ModeSource::Fixed => Ok(Modeline::from_fixed(config)),
        ModeSource::Gtf => {
            let command = CommandSpec::new("gtf").args([
                config.width.to_string(),
                config.height.to_string(),
                config.refresh.to_string(),
            ]);
            let output = runner.run_checked(&command).await?;
            let modeline = parse_gtf_output(&output.stdout)?;
            info!("gtf сгенерировал режим {}", modeline.name);
            debug!("Тайминги: {}", modeline.timings.join(" "));
            Ok(modeline)
        }
    }
}
