use crate::events::{DisplayEvent, MonitorState};
use crate::services::virtual_monitor::VirtualMonitor;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

/// Периодически опрашивает xrandr и сообщает о смене состояния
pub struct StateWatcher {
    monitor: Arc<VirtualMonitor>,
    poll_interval: Duration,
    last: Option<MonitorState>,
}

impl StateWatcher {
    pub fn new(monitor: Arc<VirtualMonitor>, poll_interval_ms: u64) -> Self {
        Self {
            monitor,
            poll_interval: Duration::from_millis(poll_interval_ms),
            last: None,
        }
    }

    /// Первое наблюдение всегда порождает событие
    pub async fn poll_once(&mut self) -> Option<DisplayEvent> {
        let state = self.monitor.refresh().await;
        if self.last == Some(state) {
            return None;
        }

        let event = DisplayEvent::new(state, self.last);
        self.last = Some(state);
        Some(event)
    }

    pub async fn run(mut self) {
        info!("Отслеживание состояния запущено (интервал {:?})", self.poll_interval);
        let mut ticker = interval(self.poll_interval);

        loop {
            ticker.tick().await;
            match self.poll_once().await {
                Some(event) => {
                    info!("{}", event);
                    debug!("Обработка события заняла {:?}", event.timestamp.elapsed());
                }
                None => debug!("Состояние не изменилось"),
            }
        }
    }
}
