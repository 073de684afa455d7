//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing and suspend/resume
//! - Input events
//! - Storage (LocalStorage on web)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{Direction, InputState, Keyboard, TouchTracker};
pub use time::Timebase;
