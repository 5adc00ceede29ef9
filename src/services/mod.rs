pub mod command;
pub mod control_panel;
pub mod display_prober;
pub mod modeline;
pub mod mouse;
pub mod notifier;
pub mod process;
pub mod state_watcher;
pub mod virtual_monitor;

pub use command::create_command_runner;
pub use control_panel::ControlPanel;
pub use notifier::TerminalNotifier;
pub use state_watcher::StateWatcher;
pub use virtual_monitor::VirtualMonitor;
