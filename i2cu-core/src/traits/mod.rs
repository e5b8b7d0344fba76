//! Interfaces to the outside of the core
//!
//! Hardware traits live in `i2cu-hal`; what remains here is the view the
//! probe loop renders into.

pub mod view;

pub use view::{ProbeSource, ProbeView};
