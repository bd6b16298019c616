use super::latch::InputLatch;
use egui::{Event, Key, PointerButton, Pos2, Vec2};
use tracing::debug;

/// Mouse button as a latch key; egui's `PointerButton` cannot be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    Extra1,
    Extra2,
}

impl From<PointerButton> for MouseButton {
    fn from(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => MouseButton::Primary,
            PointerButton::Secondary => MouseButton::Secondary,
            PointerButton::Middle => MouseButton::Middle,
            PointerButton::Extra1 => MouseButton::Extra1,
            PointerButton::Extra2 => MouseButton::Extra2,
        }
    }
}

/// Keyboard, mouse and text input as seen by one frame.
///
/// Platform events are recorded as they arrive and become visible together
/// when the frame loop calls [`FrameInput::advance`].
#[derive(Debug, Default)]
pub struct FrameInput {
    keys: InputLatch<Key>,
    mouse: InputLatch<MouseButton>,
    // Text has no release events, so characters are per-cycle events instead of a latch
    typed_since_advance: String,
    typed: String,
    pointer: Pos2,
    pending_wheel: Vec2,
    wheel: Vec2,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one platform event. Nothing becomes visible before [`advance`](Self::advance).
    pub fn record_event(&mut self, event: &Event) {
        match event {
            Event::Key { key, pressed, .. } => self.keys.record(*key, *pressed),
            Event::PointerButton {
                button, pressed, ..
            } => self.mouse.record(MouseButton::from(*button), *pressed),
            Event::PointerMoved(pos) => self.pointer = *pos,
            Event::MouseWheel { delta, .. } => self.pending_wheel += *delta,
            Event::Text(text) => self.typed_since_advance.push_str(text),
            Event::WindowFocused(false) => {
                debug!("Window lost focus, releasing all keys");
                self.release_all();
            }
            _ => (),
        }
    }

    pub fn record_key(&mut self, key: Key, down: bool) {
        self.keys.record(key, down);
    }

    pub fn record_mouse_button(&mut self, button: impl Into<MouseButton>, down: bool) {
        self.mouse.record(button.into(), down);
    }

    /// Starts a new polling cycle.
    pub fn advance(&mut self) {
        self.keys.advance();
        self.mouse.advance();

        // Every character typed since the last cycle is pressed in this one,
        // even when the same character was typed the cycle before.
        self.typed = std::mem::take(&mut self.typed_since_advance);

        self.wheel = std::mem::take(&mut self.pending_wheel);
    }

    pub fn release_all(&mut self) {
        self.keys.release_all();
        self.mouse.release_all();
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys.is_down(key)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys.was_pressed(key)
    }

    pub fn mouse_down(&self, button: impl Into<MouseButton>) -> bool {
        self.mouse.is_down(button.into())
    }

    pub fn mouse_pressed(&self, button: impl Into<MouseButton>) -> bool {
        self.mouse.was_pressed(button.into())
    }

    /// A typed character is down for exactly the cycle it was typed in.
    pub fn character_down(&self, character: char) -> bool {
        self.typed.contains(character)
    }

    pub fn character_pressed(&self, character: char) -> bool {
        self.typed.contains(character)
    }

    /// How often `character` was typed during the last cycle.
    pub fn character_presses(&self, character: char) -> usize {
        self.typed.chars().filter(|typed| *typed == character).count()
    }

    /// Was any key pressed this frame?
    pub fn any_key_pressed(&self) -> bool {
        self.keys.any_pressed()
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.pressed_keys()
    }

    pub fn down_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.down_keys()
    }

    /// Characters typed during the last cycle, in order.
    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn mouse_pos(&self) -> Pos2 {
        self.pointer
    }

    /// Wheel movement accumulated over the last cycle.
    pub fn mouse_wheel(&self) -> Vec2 {
        self.wheel
    }

    pub fn cycle(&self) -> u64 {
        self.keys.cycle()
    }
}
