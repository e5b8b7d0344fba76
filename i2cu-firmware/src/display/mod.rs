//! Display plumbing between the probe screen and the ST7789

pub mod sink;

pub use sink::{Panel, PanelSink, FLUSH_GATE};
