use std::fmt::Debug;

/// Hat (POV) state as reported by the hardware: one bit per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hat(pub u8);

impl Hat {
    pub const CENTERED: Hat = Hat(0);
    pub const UP: u8 = 0x01;
    pub const RIGHT: u8 = 0x02;
    pub const DOWN: u8 = 0x04;
    pub const LEFT: u8 = 0x08;

    pub fn contains(self, direction: u8) -> bool {
        self.0 & direction != 0
    }
}

/// Raw hardware view of one physical joystick.
///
/// Implementors only report what the driver says; all interpretation happens
/// in [`crate::controller::Controller`].
pub trait RawJoystick {
    /// Identity used by the registry to find the controller for a hardware event.
    type Handle: Copy + PartialEq + Debug;

    fn handle(&self) -> Self::Handle;

    /// Number of physical buttons, used once for model detection.
    fn button_count(&self) -> usize;

    /// Out of range indices read as released.
    fn button(&self, index: usize) -> bool;

    /// Out of range indices read as centered.
    fn axis(&self, index: usize) -> i16;

    fn hat(&self) -> Hat;
}

/// Snapshot of everything a joystick reported in one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub buttons: u32,
    pub axes: [i16; RawSample::AXIS_COUNT],
    pub hat: Hat,
}

impl RawSample {
    pub const AXIS_COUNT: usize = 6;

    pub fn button(&self, index: usize) -> bool {
        index < 32 && self.buttons & (1 << index) != 0
    }

    pub fn set_button(&mut self, index: usize, down: bool) {
        if index >= 32 {
            return;
        }
        if down {
            self.buttons |= 1 << index;
        } else {
            self.buttons &= !(1 << index);
        }
    }

    pub fn axis(&self, index: usize) -> i16 {
        self.axes.get(index).copied().unwrap_or(0)
    }

    pub fn set_axis(&mut self, index: usize, value: i16) {
        if let Some(slot) = self.axes.get_mut(index) {
            *slot = value;
        }
    }
}

/// A joystick whose state is pushed in from outside, one [`RawSample`] at a time.
///
/// Backends that receive hardware state as events (or tests) keep one of these
/// and overwrite its sample whenever the driver reports something new.
#[derive(Debug, Clone)]
pub struct SampledJoystick<H> {
    handle: H,
    button_count: usize,
    pub sample: RawSample,
}

impl<H> SampledJoystick<H> {
    pub fn new(handle: H, button_count: usize) -> Self {
        Self {
            handle,
            button_count,
            sample: RawSample::default(),
        }
    }

    pub fn with_sample(mut self, sample: RawSample) -> Self {
        self.sample = sample;
        self
    }
}

impl<H: Copy + PartialEq + Debug> RawJoystick for SampledJoystick<H> {
    type Handle = H;

    fn handle(&self) -> H {
        self.handle
    }

    fn button_count(&self) -> usize {
        self.button_count
    }

    fn button(&self, index: usize) -> bool {
        index < self.button_count && self.sample.button(index)
    }

    fn axis(&self, index: usize) -> i16 {
        self.sample.axis(index)
    }

    fn hat(&self) -> Hat {
        self.sample.hat
    }
}
