pub mod display;

pub use display::{DisplayEvent, MonitorState};
