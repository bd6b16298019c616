//! gilrs as the hardware layer
//!
//! gilrs already applies the SDL controller database, so every pad it knows
//! arrives with a standard button set. We present those pads to the
//! normalizer in the Xbox wireless layout (15 buttons), which keeps one code
//! path for all of them.

use super::joystick::{Hat, RawJoystick, RawSample, SampledJoystick};
use super::registry::ControllerRegistry;
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

/// Button count of the Xbox wireless layout we emulate.
pub const XBOX_LAYOUT_BUTTONS: usize = 15;

// Raw indices in that layout
const BUTTON_LAYOUT: [(Button, usize); 11] = [
    (Button::South, 0),
    (Button::East, 1),
    (Button::West, 2),
    (Button::North, 3),
    (Button::LeftTrigger, 4),
    (Button::RightTrigger, 5),
    (Button::Select, 6),
    (Button::Start, 7),
    (Button::Mode, 8),
    (Button::LeftThumb, 9),
    (Button::RightThumb, 10),
];

const AXIS_LEFT_X: usize = 0;
const AXIS_LEFT_Y: usize = 1;
const AXIS_LEFT_TRIGGER: usize = 2;
const AXIS_RIGHT_X: usize = 3;
const AXIS_RIGHT_Y: usize = 4;
const AXIS_RIGHT_TRIGGER: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to initialize gilrs: {0}")]
    InitializationError(String),
}

/// A gilrs gamepad seen through the raw joystick interface.
#[derive(Debug, Clone)]
pub struct GilrsJoystick {
    name: String,
    inner: SampledJoystick<GamepadId>,
}

impl GilrsJoystick {
    pub fn new(id: GamepadId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: SampledJoystick::new(id, XBOX_LAYOUT_BUTTONS),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Re-reads the gamepad state into the raw sample.
    pub fn refresh(&mut self, gamepad: &Gamepad<'_>) {
        let mut sample = RawSample::default();

        for (button, index) in BUTTON_LAYOUT {
            sample.set_button(index, gamepad.is_pressed(button));
        }

        // gilrs reports up as positive, the hardware convention is the opposite
        sample.set_axis(AXIS_LEFT_X, stick_to_raw(gamepad.value(Axis::LeftStickX)));
        sample.set_axis(AXIS_LEFT_Y, stick_to_raw(-gamepad.value(Axis::LeftStickY)));
        sample.set_axis(AXIS_RIGHT_X, stick_to_raw(gamepad.value(Axis::RightStickX)));
        sample.set_axis(AXIS_RIGHT_Y, stick_to_raw(-gamepad.value(Axis::RightStickY)));
        sample.set_axis(
            AXIS_LEFT_TRIGGER,
            trigger_to_raw(trigger_value(gamepad, Button::LeftTrigger2)),
        );
        sample.set_axis(
            AXIS_RIGHT_TRIGGER,
            trigger_to_raw(trigger_value(gamepad, Button::RightTrigger2)),
        );

        let mut hat = 0;
        for (button, bit) in [
            (Button::DPadUp, Hat::UP),
            (Button::DPadRight, Hat::RIGHT),
            (Button::DPadDown, Hat::DOWN),
            (Button::DPadLeft, Hat::LEFT),
        ] {
            if gamepad.is_pressed(button) {
                hat |= bit;
            }
        }
        sample.hat = Hat(hat);

        self.inner.sample = sample;
    }
}

impl RawJoystick for GilrsJoystick {
    type Handle = GamepadId;

    fn handle(&self) -> GamepadId {
        self.inner.handle()
    }

    fn button_count(&self) -> usize {
        self.inner.button_count()
    }

    fn button(&self, index: usize) -> bool {
        self.inner.button(index)
    }

    fn axis(&self, index: usize) -> i16 {
        self.inner.axis(index)
    }

    fn hat(&self) -> Hat {
        self.inner.hat()
    }
}

fn trigger_value(gamepad: &Gamepad<'_>, button: Button) -> f32 {
    gamepad
        .button_data(button)
        .map(|data| data.value())
        .unwrap_or(0.0)
}

/// `[-1, 1]` back to the asymmetric `i16` range.
pub fn stick_to_raw(value: f32) -> i16 {
    let value = value.clamp(-1.0, 1.0);
    if value < 0.0 {
        (value * 32768.0).round() as i16
    } else {
        (value * 32767.0).round() as i16
    }
}

/// `[0, 1]` trigger travel to a full-range axis resting at `i16::MIN`.
pub fn trigger_to_raw(value: f32) -> i16 {
    stick_to_raw(value.clamp(0.0, 1.0) * 2.0 - 1.0)
}

/// Pumps gilrs events into a [`ControllerRegistry`].
pub struct GilrsPoller {
    gilrs: Gilrs,
}

impl GilrsPoller {
    pub fn new() -> Result<Self, BackendError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(BackendError::InitializationError(e.to_string()));
            }
        };
        Ok(Self { gilrs })
    }

    /// Attaches every gamepad that is already plugged in.
    pub fn attach_connected(&mut self, registry: &mut ControllerRegistry<GilrsJoystick>) {
        let gamepads: Vec<(GamepadId, String)> = self
            .gilrs
            .gamepads()
            .map(|(id, gamepad)| (id, gamepad.name().to_string()))
            .collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, continuing with keyboard and mouse only");
        }
        for (id, name) in gamepads {
            info!("Found gamepad {} ({})", name, id);
            registry.attach(GilrsJoystick::new(id, name));
        }
    }

    /// Drains pending gilrs events, handles hot-plug and refreshes all samples.
    pub fn poll(&mut self, registry: &mut ControllerRegistry<GilrsJoystick>) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    let name = self.gilrs.gamepad(id).name().to_string();
                    info!("Controller connected: {} ({})", name, id);
                    registry.attach(GilrsJoystick::new(id, name));
                }
                EventType::Disconnected => {
                    warn!("Controller disconnected: {}", id);
                    registry.detach(id);
                }
                _ => debug!("gilrs event from {}: {:?}", id, event),
            }
        }

        for controller in registry.iter_mut() {
            let id = controller.handle();
            match self.gilrs.connected_gamepad(id) {
                Some(gamepad) => controller.joystick_mut().refresh(&gamepad),
                None => debug!("Gamepad {} vanished before refresh", id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::normalizer::{normalize_axis, AxisOrientation};

    #[test]
    fn stick_conversion_hits_both_extremes() {
        assert_eq!(stick_to_raw(1.0), i16::MAX);
        assert_eq!(stick_to_raw(-1.0), i16::MIN);
        assert_eq!(stick_to_raw(0.0), 0);
        assert_eq!(stick_to_raw(3.0), i16::MAX);
    }

    #[test]
    fn stick_conversion_survives_normalization() {
        for value in [-0.75f32, -0.2, 0.0, 0.33, 0.9] {
            let back = normalize_axis(stick_to_raw(value), AxisOrientation::Forward);
            assert!((back - value).abs() < 1e-4, "{value} came back as {back}");
        }
    }

    #[test]
    fn released_trigger_rests_at_minimum() {
        assert_eq!(trigger_to_raw(0.0), i16::MIN);
        assert_eq!(trigger_to_raw(1.0), i16::MAX);
        assert!(trigger_to_raw(0.6) > 0);
    }
}
