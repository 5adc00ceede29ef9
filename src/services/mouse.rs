use crate::config::MouseConfig;
use crate::error::Result;
use crate::services::command::{CommandRunner, CommandSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

const MATRIX_PROPERTY: &str = "Coordinate Transformation Matrix";

// Строка slave-устройства в `xinput list`: "⎜   ↳ Logitech USB Optical Mouse   id=10   [slave  pointer  (2)]"
static DEVICE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"↳\s*(.+?)\s+id=(\d+)").expect("регулярное выражение корректно"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerDevice {
    pub name: String,
    pub id: u32,
}

/// Матрица преобразования координат 3x3, построчно
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix([f64; 9]);

impl TransformMatrix {
    pub fn identity() -> Self {
        Self::scale(1.0)
    }

    pub fn scale(factor: f64) -> Self {
        Self([factor, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, 1.0])
    }

    pub fn to_args(&self) -> Vec<String> {
        self.0.iter().map(|v| v.to_string()).collect()
    }
}

/// Первое устройство из `xinput list`, имя которого содержит `pattern`
pub fn find_pointer_device(xinput_list: &str, pattern: &str) -> Option<PointerDevice> {
    xinput_list.lines().find_map(|line| {
        let caps = DEVICE_LINE.captures(line)?;
        let name = caps.get(1)?.as_str().trim();
        if !name.contains(pattern) {
            return None;
        }
        let id = caps.get(2)?.as_str().parse().ok()?;
        Some(PointerDevice {
            name: name.to_string(),
            id,
        })
    })
}

pub fn set_matrix_command(device: &PointerDevice, matrix: &TransformMatrix) -> CommandSpec {
    CommandSpec::xinput()
        .arg("--set-prop")
        .arg(device.name.as_str())
        .arg(MATRIX_PROPERTY)
        .args(matrix.to_args())
}

/// Находит мышь и меняет её чувствительность через матрицу преобразования
pub struct MouseAdjuster {
    runner: Arc<dyn CommandRunner>,
    config: MouseConfig,
}

impl MouseAdjuster {
    pub fn new(runner: Arc<dyn CommandRunner>, config: MouseConfig) -> Self {
        Self { runner, config }
    }

    pub async fn detect_device(&self) -> Result<Option<PointerDevice>> {
        let output = self.runner.run_checked(&CommandSpec::xinput().arg("list")).await?;
        Ok(find_pointer_device(&output.stdout, &self.config.device_pattern))
    }

    /// Применяет масштаб из конфигурации
    pub async fn apply_scale(&self) -> Result<Option<PointerDevice>> {
        self.apply(TransformMatrix::scale(self.config.scale)).await
    }

    pub async fn restore(&self) -> Result<Option<PointerDevice>> {
        self.apply(TransformMatrix::identity()).await
    }

    /// Возвращает `None`, если подходящее устройство не найдено (шаг пропускается)
    async fn apply(&self, matrix: TransformMatrix) -> Result<Option<PointerDevice>> {
        let device = match self.detect_device().await? {
            Some(device) => device,
            None => {
                warn!(
                    "Устройство с '{}' в названии не найдено, настройка мыши пропущена",
                    self.config.device_pattern
                );
                return Ok(None);
            }
        };

        self.runner.run_checked(&set_matrix_command(&device, &matrix)).await?;
        info!("Матрица преобразования для '{}' (id={}) обновлена", device.name, device.id);
        Ok(Some(device))
    }
}
