//! Keyboard, mouse and text input latched per frame

pub mod frame_input;
pub mod latch;

pub use frame_input::{FrameInput, MouseButton};
pub use latch::{InputLatch, LatchEntry};
