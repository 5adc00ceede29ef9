use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
    pub mode: ModeConfig,
    pub mouse: MouseConfig,
    pub process: ProcessConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Имя виртуального выхода в выводе xrandr
    pub virtual_output: String,
    /// Физический выход, который восстанавливается при отключении
    pub primary_output: String,
    pub dpi: u32,
    pub scale: Option<f64>,
    /// Позиция виртуального выхода в формате `<x>x<y>`
    pub position: Option<String>,
    /// Удалять режим из X-сервера (`--rmmode`) после `--delmode`
    pub remove_mode: bool,
    pub settle_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub dump_state_on_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSource {
    Fixed,
    Gtf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModeConfig {
    pub source: ModeSource,
    pub name: String,
    /// Тайминги для `xrandr --newmode` (частота пикселей и 8 значений развёртки + флаги)
    pub timings: String,
    pub width: u32,
    pub height: u32,
    pub refresh: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MouseConfig {
    pub enabled: bool,
    pub device_pattern: String,
    pub scale: f64,
    pub restore_on_disable: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub name: Option<String>,
    pub terminate_before_enable: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            virtual_output: "VIRTUAL1".to_string(),
            primary_output: "eDP-1".to_string(),
            dpi: 96,
            scale: None,
            position: None,
            remove_mode: false,
            settle_delay_ms: 1000,
            poll_interval_ms: 2000,
            dump_state_on_error: true,
        }
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            source: ModeSource::Fixed,
            name: "1112x834_60.00".to_string(),
            timings: "75.81 1112 1168 1288 1464 834 835 838 863 -HSync +Vsync".to_string(),
            width: 1112,
            height: 834,
            refresh: 60.0,
        }
    }
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device_pattern: "Mouse".to_string(),
            scale: 1.42,
            restore_on_disable: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 1,
            delay_ms: 2000,
        }
    }
}

impl Config {
    /// Загружает конфигурацию: значения по умолчанию, затем TOML-файл (если есть),
    /// затем переменные окружения `VMON_*` (вложенные ключи через `__`).
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("VMON_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.display.virtual_output.trim().is_empty() {
            anyhow::bail!("display.virtual_output не может быть пустым");
        }
        if self.display.primary_output.trim().is_empty() {
            anyhow::bail!("display.primary_output не может быть пустым");
        }
        if let Some(scale) = self.display.scale {
            if !(scale > 0.0) {
                anyhow::bail!("display.scale должно быть больше 0, получено {}", scale);
            }
        }
        if let Some(position) = &self.display.position {
            if !is_valid_position(position) {
                anyhow::bail!("display.position должно иметь вид <x>x<y>, получено '{}'", position);
            }
        }
        if self.display.poll_interval_ms < 100 {
            anyhow::bail!("display.poll_interval_ms должно быть минимум 100");
        }

        match self.mode.source {
            ModeSource::Fixed => {
                if self.mode.name.trim().is_empty() {
                    anyhow::bail!("mode.name не может быть пустым");
                }
                let tokens = self.mode.timings.split_whitespace().count();
                if tokens < 9 {
                    anyhow::bail!(
                        "mode.timings должно содержать минимум 9 значений, получено {}",
                        tokens
                    );
                }
            }
            ModeSource::Gtf => {
                if self.mode.width == 0 || self.mode.height == 0 {
                    anyhow::bail!("mode.width и mode.height должны быть больше 0");
                }
                if !(self.mode.refresh > 0.0) {
                    anyhow::bail!("mode.refresh должно быть больше 0");
                }
            }
        }

        if self.mouse.enabled {
            if self.mouse.device_pattern.is_empty() {
                anyhow::bail!("mouse.device_pattern не может быть пустым");
            }
            if !(self.mouse.scale > 0.0) {
                anyhow::bail!("mouse.scale должно быть больше 0, получено {}", self.mouse.scale);
            }
        }

        if self.process.terminate_before_enable
            && self.process.name.as_deref().map_or(true, |n| n.trim().is_empty())
        {
            anyhow::bail!("process.terminate_before_enable требует непустого process.name");
        }

        if self.retry.attempts == 0 {
            anyhow::bail!("retry.attempts должно быть минимум 1");
        }

        Ok(())
    }
}

fn is_valid_position(position: &str) -> bool {
    match position.split_once('x') {
        Some((x, y)) => x.parse::<i32>().is_ok() && y.parse::<i32>().is_ok(),
        None => false,
    }
}
