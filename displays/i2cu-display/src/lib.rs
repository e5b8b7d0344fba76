//! Probe screen and flush pipeline for i2cu
//!
//! This crate provides:
//! - [`FlushSink`], the interface to whatever pushes pixels to the panel
//! - [`FlushGate`], the "previous transfer finished" handshake
//! - [`FrameBuffer`], an RGB565 `embedded-graphics` target that tracks the
//!   region changed since the last flush
//! - [`ProbeScreen`], the probe UI (title, probe text, status overlay)
//!   implementing `i2cu_core::ProbeView`
//!
//! # Pipeline
//!
//! ```text
//!  ProbeView setters ──► ProbeScreen::refresh
//!                            │ redraw scene into FrameBuffer
//!                            │ dirty rect ─► bands ─► transfer buffer(s)
//!                            ▼
//!                        FlushSink::flush ──(done)──► FlushGate::mark_flush_complete
//! ```
//!
//! A band is only submitted while the gate reports ready; whatever is left
//! goes out on the next refresh.

#![no_std]

pub mod backend;
pub mod flush;
pub mod framebuffer;
pub mod screen;

// Re-export key types
pub use backend::{DisplayError, FlushSink};
pub use flush::FlushGate;
pub use framebuffer::{FrameBuffer, Region};
pub use screen::{ProbeScreen, SCREEN_HEIGHT, SCREEN_WIDTH};
