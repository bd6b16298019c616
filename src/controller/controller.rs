use super::button::{ControllerModel, LogicalButton};
use super::joystick::{Hat, RawJoystick};
use super::normalizer::{
    apply_deadzone, apply_stick_shaping, detect_model, normalize_axis, raw_axis_index,
    raw_button_index, AxisOrientation,
};
use crate::input::InputLatch;
use tracing::{debug, info};

/// One attached gamepad.
///
/// Owns its joystick exclusively: dropping the controller releases the
/// hardware. The model is detected once here and never changes afterwards.
#[derive(Debug)]
pub struct Controller<J: RawJoystick> {
    joystick: J,
    model: ControllerModel,
    latch: InputLatch<LogicalButton>,
}

impl<J: RawJoystick> Controller<J> {
    pub fn attach(joystick: J) -> Self {
        let button_count = joystick.button_count();
        let model = detect_model(button_count);
        info!(
            "Attached controller {:?}: {} buttons, detected as {}",
            joystick.handle(),
            button_count,
            model
        );
        Self {
            joystick,
            model,
            latch: InputLatch::new(),
        }
    }

    pub fn model(&self) -> ControllerModel {
        self.model
    }

    pub fn handle(&self) -> J::Handle {
        self.joystick.handle()
    }

    /// Does this controller wrap the given hardware handle?
    pub fn is(&self, handle: J::Handle) -> bool {
        self.joystick.handle() == handle
    }

    pub fn joystick(&self) -> &J {
        &self.joystick
    }

    // Backends refresh their samples through this; the model stays fixed.
    pub fn joystick_mut(&mut self) -> &mut J {
        &mut self.joystick
    }

    /// Normalized value of a control in `[-1, 1]`.
    ///
    /// Stick axes get square-to-circle correction (DS4) and the deadzone
    /// (Xbox family). Triggers are returned raw. Digital buttons read `1.0`
    /// while held and `0.0` otherwise.
    pub fn state(&self, button: LogicalButton) -> f32 {
        let value = self.state_without_deadzone(button);
        let Some(partner) = button.stick_partner() else {
            return value;
        };
        let partner_value = self.state_without_deadzone(partner);
        let (value, partner_value) = apply_stick_shaping(self.model, value, partner_value);
        let (value, _) = apply_deadzone(self.model, value, partner_value);
        value
    }

    fn state_without_deadzone(&self, button: LogicalButton) -> f32 {
        match raw_axis_index(self.model, button) {
            Some(index) => normalize_axis(self.joystick.axis(index), AxisOrientation::of(button)),
            None => {
                if self.down(button) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Is the control held right now (straight from the latest hardware sample)?
    pub fn down(&self, button: LogicalButton) -> bool {
        if self.model.is_xbox() && button.is_trigger() {
            return self.state(button) > 0.0;
        }
        let hat = self.joystick.hat();
        match button {
            LogicalButton::DpadUp => hat.contains(Hat::UP),
            LogicalButton::DpadDown => hat.contains(Hat::DOWN),
            LogicalButton::DpadLeft => hat.contains(Hat::LEFT),
            LogicalButton::DpadRight => hat.contains(Hat::RIGHT),
            _ => match raw_button_index(self.model, button) {
                Some(index) => self.joystick.button(index),
                None => false,
            },
        }
    }

    /// Folds the current hardware state into the button latch. Called once per frame.
    pub fn poll(&mut self) {
        let samples = LogicalButton::DIGITAL.map(|button| (button, self.down(button)));
        for (button, down) in samples {
            self.latch.record(button, down);
        }
        self.latch.advance();
    }

    /// Is the control held according to the last [`poll`](Self::poll)?
    pub fn held(&self, button: LogicalButton) -> bool {
        self.latch.is_down(button)
    }

    /// Did the control go down during the last [`poll`](Self::poll)?
    pub fn pressed(&self, button: LogicalButton) -> bool {
        self.latch.was_pressed(button)
    }

    pub fn any_pressed(&self) -> bool {
        self.latch.any_pressed()
    }
}

impl<J: RawJoystick> Drop for Controller<J> {
    fn drop(&mut self) {
        debug!("Releasing controller {:?}", self.joystick.handle());
    }
}
