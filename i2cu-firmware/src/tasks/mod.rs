//! Embassy async tasks
//!
//! The scanner runs on its own executor on core 1; the probe loop owns
//! core 0. They share only `channels::SHARED_PRESENCE`.

pub mod probe;
pub mod scanner;

pub use probe::{probe_task, Keys, ProbeResources};
pub use scanner::scanner_task;
