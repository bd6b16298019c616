//! Frame loop core for interactive applications
//!
//! Gamepads of different makes are normalized into one logical button model,
//! keyboard/mouse/text input is latched once per frame, and shader programs are
//! bound through a guard that allows only one active program at a time.

pub mod config;
pub mod controller;
pub mod frame;
pub mod gpu;
pub mod input;
