use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware independent identifier for a gamepad control.
///
/// Digital buttons, the two analog triggers and the four stick axes share one
/// enum so that application code can ask any controller the same questions
/// regardless of the physical index layout behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalButton {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Start,
    Back,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    LeftStick,
    RightStick,
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

impl LogicalButton {
    /// Every control that has a meaningful "down" state. Triggers are included
    /// because they are read as buttons on pads without analog triggers.
    pub const DIGITAL: [LogicalButton; 16] = [
        LogicalButton::A,
        LogicalButton::B,
        LogicalButton::X,
        LogicalButton::Y,
        LogicalButton::LeftBumper,
        LogicalButton::RightBumper,
        LogicalButton::LeftTrigger,
        LogicalButton::RightTrigger,
        LogicalButton::Start,
        LogicalButton::Back,
        LogicalButton::DpadUp,
        LogicalButton::DpadDown,
        LogicalButton::DpadLeft,
        LogicalButton::DpadRight,
        LogicalButton::LeftStick,
        LogicalButton::RightStick,
    ];

    /// Controls backed by a hardware axis.
    pub const ANALOG: [LogicalButton; 6] = [
        LogicalButton::LeftStickX,
        LogicalButton::LeftStickY,
        LogicalButton::RightStickX,
        LogicalButton::RightStickY,
        LogicalButton::LeftTrigger,
        LogicalButton::RightTrigger,
    ];

    pub fn is_trigger(self) -> bool {
        matches!(self, LogicalButton::LeftTrigger | LogicalButton::RightTrigger)
    }

    /// The other axis of the same stick, used for deadzone and circle correction.
    pub fn stick_partner(self) -> Option<LogicalButton> {
        match self {
            LogicalButton::LeftStickX => Some(LogicalButton::LeftStickY),
            LogicalButton::LeftStickY => Some(LogicalButton::LeftStickX),
            LogicalButton::RightStickX => Some(LogicalButton::RightStickY),
            LogicalButton::RightStickY => Some(LogicalButton::RightStickX),
            _ => None,
        }
    }

    // Hardware reports "up" as negative
    pub fn is_vertical_axis(self) -> bool {
        matches!(self, LogicalButton::LeftStickY | LogicalButton::RightStickY)
    }
}

impl fmt::Display for LogicalButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Physical controller family, detected once when the controller is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerModel {
    XboxWired,
    Xbox,
    Ds4,
    Unknown,
}

impl ControllerModel {
    pub fn is_xbox(self) -> bool {
        matches!(self, ControllerModel::Xbox | ControllerModel::XboxWired)
    }
}

impl fmt::Display for ControllerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerModel::XboxWired => write!(f, "Xbox (wired)"),
            ControllerModel::Xbox => write!(f, "Xbox"),
            ControllerModel::Ds4 => write!(f, "DualShock 4"),
            ControllerModel::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_partners_are_symmetric() {
        for axis in [
            LogicalButton::LeftStickX,
            LogicalButton::LeftStickY,
            LogicalButton::RightStickX,
            LogicalButton::RightStickY,
        ] {
            let partner = axis.stick_partner().unwrap();
            assert_eq!(partner.stick_partner(), Some(axis));
        }
        assert_eq!(LogicalButton::LeftTrigger.stick_partner(), None);
    }

    #[test]
    fn only_xbox_family_counts_as_xbox() {
        assert!(ControllerModel::Xbox.is_xbox());
        assert!(ControllerModel::XboxWired.is_xbox());
        assert!(!ControllerModel::Ds4.is_xbox());
        assert!(!ControllerModel::Unknown.is_xbox());
    }
}
