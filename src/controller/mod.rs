//! Controller subsystem for gamepad input handling
//!
//! Turns whatever a physical pad reports into one logical model:
//!
//! 1. [`joystick`] - raw hardware view (button bits, `i16` axes, hat)
//! 2. [`normalizer`] - model detection and the per-model mapping tables
//! 3. [`controller`] - one attached pad: normalized state plus a button latch
//! 4. [`registry`] - all attached pads, hot-plug by hardware handle
//! 5. [`gilrs_backend`] - gilrs pads presented as raw joysticks
//!
//! # Architecture
//!
//! ```text
//! gilrs ──► GilrsJoystick ──► Controller ──► state() / down() / pressed()
//!           (RawSample)       (model tables, latch)
//! ```

pub mod button;
#[allow(clippy::module_inception)]
pub mod controller;
pub mod gilrs_backend;
pub mod joystick;
pub mod normalizer;
pub mod registry;

pub use button::{ControllerModel, LogicalButton};
pub use controller::Controller;
pub use gilrs_backend::{BackendError, GilrsJoystick, GilrsPoller};
pub use joystick::{Hat, RawJoystick, RawSample, SampledJoystick};
pub use registry::ControllerRegistry;
