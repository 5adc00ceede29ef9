use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние виртуального монитора. Других состояний нет: промежуточные
/// и ошибочные ситуации не моделируются.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorState {
    Disabled,
    Enabled,
}

impl MonitorState {
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            MonitorState::Enabled
        } else {
            MonitorState::Disabled
        }
    }

    pub fn is_enabled(self) -> bool {
        self == MonitorState::Enabled
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorState::Disabled => write!(f, "отключён"),
            MonitorState::Enabled => write!(f, "включён"),
        }
    }
}

/// Событие смены наблюдаемого состояния виртуального монитора
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEvent {
    pub state: MonitorState,
    pub previous: Option<MonitorState>,
    pub timestamp: std::time::Instant,
}

impl DisplayEvent {
    pub fn new(state: MonitorState, previous: Option<MonitorState>) -> Self {
        Self {
            state,
            previous,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for DisplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.previous {
            Some(previous) => write!(f, "виртуальный монитор: {} -> {}", previous, self.state),
            None => write!(f, "виртуальный монитор: {}", self.state),
        }
    }
}
