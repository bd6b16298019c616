//! Table driven translation from raw joystick layouts to logical controls
//!
//! Everything in here is a pure function of the detected [`ControllerModel`],
//! so the same raw sample always maps to the same logical value.
//!
//! ```text
//! button count ──► detect_model ──► ControllerModel
//! raw i16 axis ──► normalize_axis ──► apply_stick_shaping ──► apply_deadzone ──► [-1, 1]
//! ```

use super::button::{ControllerModel, LogicalButton};

/// Squared stick radius below which Xbox sticks are reported as centered.
pub const DEADZONE_RADIUS_SQUARED: f32 = 0.1;

/// Direction of a raw axis relative to its logical direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    Forward,
    Inverted,
}

impl AxisOrientation {
    pub fn of(button: LogicalButton) -> Self {
        if button.is_vertical_axis() {
            AxisOrientation::Inverted
        } else {
            AxisOrientation::Forward
        }
    }
}

/// Detects the controller family from the number of physical buttons.
pub fn detect_model(button_count: usize) -> ControllerModel {
    match button_count {
        11 => ControllerModel::XboxWired,
        13 => ControllerModel::Ds4,
        15 => ControllerModel::Xbox,
        16 => ControllerModel::Ds4,
        _ => ControllerModel::Unknown,
    }
}

/// Raw axis index for an analog control.
///
/// The wired Xbox driver orders its right stick and triggers differently from
/// every other layout we know of.
pub fn raw_axis_index(model: ControllerModel, button: LogicalButton) -> Option<usize> {
    let wired = model == ControllerModel::XboxWired;
    let index = match button {
        LogicalButton::LeftStickX => 0,
        LogicalButton::LeftStickY => 1,
        LogicalButton::RightStickX => {
            if wired {
                2
            } else {
                3
            }
        }
        LogicalButton::RightStickY => {
            if wired {
                3
            } else {
                4
            }
        }
        LogicalButton::LeftTrigger => {
            if wired {
                5
            } else {
                2
            }
        }
        LogicalButton::RightTrigger => {
            if wired {
                4
            } else {
                5
            }
        }
        _ => return None,
    };
    Some(index)
}

/// Raw button index for a digital control.
///
/// D-pad directions live on the hat and stick axes are not buttons, both
/// yield `None`. Xbox triggers also yield `None` because they are analog.
pub fn raw_button_index(model: ControllerModel, button: LogicalButton) -> Option<usize> {
    let xbox = model.is_xbox();
    let index = match button {
        LogicalButton::A => 0,
        LogicalButton::B => 1,
        LogicalButton::X => {
            if xbox {
                2
            } else {
                3
            }
        }
        LogicalButton::Y => {
            if xbox {
                3
            } else {
                2
            }
        }
        LogicalButton::LeftBumper => 4,
        LogicalButton::RightBumper => 5,
        LogicalButton::LeftTrigger if !xbox => 6,
        LogicalButton::RightTrigger if !xbox => 7,
        LogicalButton::Start => {
            if xbox {
                7
            } else {
                9
            }
        }
        LogicalButton::Back => {
            if xbox {
                6
            } else {
                8
            }
        }
        LogicalButton::LeftStick => {
            if xbox {
                9
            } else {
                11
            }
        }
        LogicalButton::RightStick => {
            if xbox {
                10
            } else {
                12
            }
        }
        _ => return None,
    };
    Some(index)
}

/// Scales a signed 16-bit sample into `[-1, 1]`.
///
/// The negative half of an `i16` is one step longer than the positive half,
/// so each side gets its own divisor and both extremes land exactly on ±1.
pub fn normalize_axis(raw: i16, orientation: AxisOrientation) -> f32 {
    let raw = f32::from(raw);
    let value = if raw < 0.0 {
        raw / 32768.0
    } else {
        raw / 32767.0
    };
    match orientation {
        AxisOrientation::Forward => value,
        AxisOrientation::Inverted => -value,
    }
}

/// Maps square stick coordinates onto a circle for models that report squares.
///
/// Both outputs are computed from the uncorrected inputs.
pub fn apply_stick_shaping(model: ControllerModel, primary: f32, secondary: f32) -> (f32, f32) {
    if model != ControllerModel::Ds4 {
        return (primary, secondary);
    }
    let (p, s) = (f64::from(primary), f64::from(secondary));
    let shaped_primary = p * (1.0 - 0.5 * s * s).sqrt();
    let shaped_secondary = s * (1.0 - 0.5 * p * p).sqrt();
    (shaped_primary as f32, shaped_secondary as f32)
}

/// Snaps a stick to the center when it rests inside the deadzone circle.
///
/// Only the Xbox family is calibrated this way.
pub fn apply_deadzone(model: ControllerModel, x: f32, y: f32) -> (f32, f32) {
    if !model.is_xbox() {
        return (x, y);
    }
    if x * x + y * y < DEADZONE_RADIUS_SQUARED {
        (0.0, 0.0)
    } else {
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_documented_models() {
        assert_eq!(detect_model(11), ControllerModel::XboxWired);
        assert_eq!(detect_model(13), ControllerModel::Ds4);
        assert_eq!(detect_model(15), ControllerModel::Xbox);
        assert_eq!(detect_model(16), ControllerModel::Ds4);
    }

    #[test]
    fn other_button_counts_are_unknown() {
        for count in [0, 1, 10, 12, 14, 17, 32] {
            assert_eq!(detect_model(count), ControllerModel::Unknown, "count {count}");
        }
    }

    #[test]
    fn wired_xbox_axis_layout_differs() {
        use LogicalButton::*;
        let wired = ControllerModel::XboxWired;
        let wireless = ControllerModel::Xbox;
        assert_eq!(raw_axis_index(wired, RightStickX), Some(2));
        assert_eq!(raw_axis_index(wired, RightStickY), Some(3));
        assert_eq!(raw_axis_index(wired, LeftTrigger), Some(5));
        assert_eq!(raw_axis_index(wired, RightTrigger), Some(4));
        assert_eq!(raw_axis_index(wireless, RightStickX), Some(3));
        assert_eq!(raw_axis_index(wireless, RightStickY), Some(4));
        assert_eq!(raw_axis_index(wireless, LeftTrigger), Some(2));
        assert_eq!(raw_axis_index(wireless, RightTrigger), Some(5));
        assert_eq!(raw_axis_index(ControllerModel::Ds4, LeftStickX), Some(0));
        assert_eq!(raw_axis_index(ControllerModel::Unknown, LeftStickY), Some(1));
        assert_eq!(raw_axis_index(wireless, A), None);
    }

    #[test]
    fn face_buttons_swap_between_layouts() {
        use LogicalButton::*;
        assert_eq!(raw_button_index(ControllerModel::Xbox, X), Some(2));
        assert_eq!(raw_button_index(ControllerModel::Xbox, Y), Some(3));
        assert_eq!(raw_button_index(ControllerModel::Ds4, X), Some(3));
        assert_eq!(raw_button_index(ControllerModel::Ds4, Y), Some(2));
        assert_eq!(raw_button_index(ControllerModel::Ds4, Start), Some(9));
        assert_eq!(raw_button_index(ControllerModel::XboxWired, Start), Some(7));
        assert_eq!(raw_button_index(ControllerModel::Ds4, RightStick), Some(12));
        assert_eq!(raw_button_index(ControllerModel::Xbox, LeftTrigger), None);
        assert_eq!(raw_button_index(ControllerModel::Ds4, LeftTrigger), Some(6));
        assert_eq!(raw_button_index(ControllerModel::Xbox, DpadUp), None);
        assert_eq!(raw_button_index(ControllerModel::Xbox, LeftStickX), None);
    }

    #[test]
    fn normalizes_asymmetric_range() {
        assert_eq!(normalize_axis(i16::MIN, AxisOrientation::Forward), -1.0);
        assert_eq!(normalize_axis(i16::MAX, AxisOrientation::Forward), 1.0);
        assert_eq!(normalize_axis(0, AxisOrientation::Forward), 0.0);
        assert_eq!(normalize_axis(-16384, AxisOrientation::Forward), -0.5);
        assert_eq!(normalize_axis(i16::MIN, AxisOrientation::Inverted), 1.0);
    }

    #[test]
    fn normalizing_is_deterministic() {
        let first = normalize_axis(12345, AxisOrientation::Inverted);
        let second = normalize_axis(12345, AxisOrientation::Inverted);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn ds4_shaping_shrinks_square_corners() {
        let (x, y) = apply_stick_shaping(ControllerModel::Ds4, 0.6, 0.6);
        assert!(x * x <= 0.36);
        assert!(y * y <= 0.36);
        let expected = (0.6f64 * (1.0f64 - 0.5 * 0.36).sqrt()) as f32;
        assert!((x - expected).abs() < 1e-6);
        assert!((y - expected).abs() < 1e-6);
    }

    #[test]
    fn ds4_shaping_uses_uncorrected_values() {
        let (x, y) = apply_stick_shaping(ControllerModel::Ds4, 0.8, 0.3);
        let expected_x = (0.8f64 * (1.0 - 0.5 * 0.3f64 * 0.3).sqrt()) as f32;
        let expected_y = (0.3f64 * (1.0 - 0.5 * 0.8f64 * 0.8).sqrt()) as f32;
        assert!((x - expected_x).abs() < 1e-6);
        assert!((y - expected_y).abs() < 1e-6);

        // Sequential evaluation would have fed the corrected x into y.
        let sequential_y = (0.3f64 * (1.0 - 0.5 * f64::from(x) * f64::from(x)).sqrt()) as f32;
        assert!((y - sequential_y).abs() > 1e-4);
    }

    #[test]
    fn shaping_leaves_other_models_alone() {
        for model in [
            ControllerModel::Xbox,
            ControllerModel::XboxWired,
            ControllerModel::Unknown,
        ] {
            assert_eq!(apply_stick_shaping(model, 0.6, 0.6), (0.6, 0.6));
        }
    }

    #[test]
    fn xbox_deadzone_snaps_small_deflection() {
        assert_eq!(apply_deadzone(ControllerModel::Xbox, 0.2, 0.2), (0.0, 0.0));
        assert_eq!(apply_deadzone(ControllerModel::XboxWired, 0.2, -0.2), (0.0, 0.0));
        assert_eq!(apply_deadzone(ControllerModel::Xbox, 0.4, 0.4), (0.4, 0.4));
    }

    #[test]
    fn deadzone_skips_ds4_and_unknown() {
        assert_eq!(apply_deadzone(ControllerModel::Ds4, 0.2, 0.2), (0.2, 0.2));
        assert_eq!(apply_deadzone(ControllerModel::Unknown, 0.1, 0.0), (0.1, 0.0));
    }
}
