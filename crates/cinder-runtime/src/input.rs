//! Input state management
//!
//! Tracks keyboard modifiers, a small set of explicitly tracked keys, mouse
//! buttons, and two motion vectors: one recomputed from the input-slot binding
//! table, one fed by joystick axes. Motion vectors are always recomputed from
//! current raw state, never accumulated, so a rebind takes effect on the next
//! event and opposing triggers cancel to zero.

use cinder_core::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Modifier mask bits
pub mod kmod {
    pub const SHIFT: u32 = 1 << 0;
    pub const CONTROL: u32 = 1 << 1;
    pub const ALT: u32 = 1 << 2;
    pub const META: u32 = 1 << 3;
}

/// Non-modifier keys whose pressed/released state the shell tracks explicitly
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackedKey {
    Shift,
    Control,
    NumUp,
    NumDown,
    NumLeft,
    NumRight,
    NumPlus,
    NumMinus,
    PageUp,
    PageDown,
}

impl TrackedKey {
    pub const COUNT: usize = 10;

    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Self::Shift),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Self::Control),
            KeyCode::Numpad8 => Some(Self::NumUp),
            KeyCode::Numpad2 => Some(Self::NumDown),
            KeyCode::Numpad4 => Some(Self::NumLeft),
            KeyCode::Numpad6 => Some(Self::NumRight),
            KeyCode::NumpadAdd => Some(Self::NumPlus),
            KeyCode::NumpadSubtract => Some(Self::NumMinus),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            _ => None,
        }
    }
}

/// The modifier bit a key contributes, if any
fn modifier_bit(key: KeyCode) -> Option<u32> {
    match key {
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(kmod::SHIFT),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(kmod::CONTROL),
        KeyCode::AltLeft | KeyCode::AltRight => Some(kmod::ALT),
        KeyCode::SuperLeft | KeyCode::SuperRight => Some(kmod::META),
        _ => None,
    }
}

/// Logical input slots that can be bound to a physical trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSlot {
    Left,
    Right,
    Up,
    Down,
    GasUp,
    GasDown,
    Camera,
    Deselect,
    Action,
    Near,
    Away,
    Next,
    Human,
    Quit,
    Help,
    Program,
    Visit,
    Speed10,
    Speed15,
    Speed20,
    Speed30,
    AimUp,
    AimDown,
    Console,
}

impl InputSlot {
    pub const COUNT: usize = 24;

    pub const ALL: [InputSlot; Self::COUNT] = [
        InputSlot::Left,
        InputSlot::Right,
        InputSlot::Up,
        InputSlot::Down,
        InputSlot::GasUp,
        InputSlot::GasDown,
        InputSlot::Camera,
        InputSlot::Deselect,
        InputSlot::Action,
        InputSlot::Near,
        InputSlot::Away,
        InputSlot::Next,
        InputSlot::Human,
        InputSlot::Quit,
        InputSlot::Help,
        InputSlot::Program,
        InputSlot::Visit,
        InputSlot::Speed10,
        InputSlot::Speed15,
        InputSlot::Speed20,
        InputSlot::Speed30,
        InputSlot::AimUp,
        InputSlot::AimDown,
        InputSlot::Console,
    ];
}

/// The physical trigger bound to an input slot. Exactly one trigger per
/// binding, by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputBinding {
    Key(KeyCode),
    Kmod(u32),
    JoyButton(u32),
    #[default]
    Unbound,
}

/// Fixed table mapping every input slot to its binding
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputBindings {
    table: [InputBinding; InputSlot::COUNT],
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            table: [InputBinding::Unbound; InputSlot::COUNT],
        };
        bindings.reset_defaults();
        bindings
    }
}

impl InputBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind one slot. Never alters any other slot.
    pub fn set(&mut self, slot: InputSlot, binding: InputBinding) {
        self.table[slot as usize] = binding;
    }

    pub fn get(&self, slot: InputSlot) -> InputBinding {
        self.table[slot as usize]
    }

    /// Restore the built-in default bindings for every slot.
    pub fn reset_defaults(&mut self) {
        use InputBinding::{JoyButton, Key, Kmod};
        self.set(InputSlot::Left, Key(KeyCode::ArrowLeft));
        self.set(InputSlot::Right, Key(KeyCode::ArrowRight));
        self.set(InputSlot::Up, Key(KeyCode::ArrowUp));
        self.set(InputSlot::Down, Key(KeyCode::ArrowDown));
        self.set(InputSlot::GasUp, Kmod(kmod::SHIFT));
        self.set(InputSlot::GasDown, Kmod(kmod::CONTROL));
        self.set(InputSlot::Camera, Key(KeyCode::Space));
        self.set(InputSlot::Deselect, Key(KeyCode::Numpad0));
        self.set(InputSlot::Action, JoyButton(0));
        self.set(InputSlot::Near, Key(KeyCode::NumpadAdd));
        self.set(InputSlot::Away, Key(KeyCode::NumpadSubtract));
        self.set(InputSlot::Next, Key(KeyCode::Tab));
        self.set(InputSlot::Human, Key(KeyCode::Home));
        self.set(InputSlot::Quit, Key(KeyCode::Escape));
        self.set(InputSlot::Help, Key(KeyCode::F1));
        self.set(InputSlot::Program, Key(KeyCode::F2));
        self.set(InputSlot::Visit, Key(KeyCode::KeyV));
        self.set(InputSlot::Speed10, Key(KeyCode::F5));
        self.set(InputSlot::Speed15, Key(KeyCode::F6));
        self.set(InputSlot::Speed20, Key(KeyCode::F7));
        self.set(InputSlot::Speed30, Key(KeyCode::F8));
        self.set(InputSlot::AimUp, Key(KeyCode::KeyR));
        self.set(InputSlot::AimDown, Key(KeyCode::KeyF));
        self.set(InputSlot::Console, Key(KeyCode::F10));
    }
}

/// Current keyboard/mouse/joystick state visible to event consumers
pub struct InputState {
    /// Active modifier mask (kmod bits)
    kmods: u32,
    /// Tracked-key pressed state, indexed by `TrackedKey`
    tracked: [bool; TrackedKey::COUNT],
    /// Pressed mouse buttons, as a bitmask of button indices
    mouse_buttons: u32,
    /// All keys currently held, for binding evaluation
    keys_down: HashSet<KeyCode>,
    /// Joystick buttons currently held, for binding evaluation
    joy_buttons_down: HashSet<u32>,
    /// Motion vector driven by the binding table (keyboard/kmod/joy buttons)
    key_motion: Vec2,
    /// Motion vector driven by joystick axes
    joy_motion: Vec2,
    /// Current mouse position in interface coordinates
    mouse_pos: Point,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            kmods: 0,
            tracked: [false; TrackedKey::COUNT],
            mouse_buttons: 0,
            keys_down: HashSet::new(),
            joy_buttons_down: HashSet::new(),
            key_motion: Vec2::ZERO,
            joy_motion: Vec2::ZERO,
            mouse_pos: Point::default(),
        }
    }

    /// Process a key press and recompute the bound motion vector
    pub fn process_key_down(&mut self, key: KeyCode, bindings: &InputBindings) {
        self.keys_down.insert(key);
        if let Some(bit) = modifier_bit(key) {
            self.kmods |= bit;
        }
        if let Some(tracked) = TrackedKey::from_key(key) {
            self.tracked[tracked as usize] = true;
        }
        self.recompute_key_motion(bindings);
    }

    /// Process a key release and recompute the bound motion vector
    pub fn process_key_up(&mut self, key: KeyCode, bindings: &InputBindings) {
        self.keys_down.remove(&key);
        if let Some(bit) = modifier_bit(key) {
            self.kmods &= !bit;
        }
        if let Some(tracked) = TrackedKey::from_key(key) {
            self.tracked[tracked as usize] = false;
        }
        self.recompute_key_motion(bindings);
    }

    /// Process a joystick button change and recompute the bound motion vector
    pub fn process_joy_button(&mut self, button: u32, pressed: bool, bindings: &InputBindings) {
        if pressed {
            self.joy_buttons_down.insert(button);
        } else {
            self.joy_buttons_down.remove(&button);
        }
        self.recompute_key_motion(bindings);
    }

    /// Process mouse button press
    pub fn process_mouse_button_down(&mut self, button: u32) {
        self.mouse_buttons |= 1 << button;
    }

    /// Process mouse button release
    pub fn process_mouse_button_up(&mut self, button: u32) {
        self.mouse_buttons &= !(1 << button);
    }

    pub fn process_mouse_move(&mut self, pos: Point) {
        self.mouse_pos = pos;
    }

    /// Replace the joystick motion vector from raw axis values.
    /// Axis 0 is horizontal, axis 1 vertical; missing axes read as neutral.
    pub fn apply_joy_axes(&mut self, axes: &[f32]) {
        let x = axes.first().copied().unwrap_or(0.0);
        let y = axes.get(1).copied().unwrap_or(0.0);
        self.joy_motion = Vec2::new(x, y).clamped_unit();
    }

    /// Is the slot's bound trigger currently active?
    pub fn slot_active(&self, slot: InputSlot, bindings: &InputBindings) -> bool {
        match bindings.get(slot) {
            InputBinding::Key(key) => self.keys_down.contains(&key),
            InputBinding::Kmod(mask) => self.kmods & mask != 0,
            InputBinding::JoyButton(button) => self.joy_buttons_down.contains(&button),
            InputBinding::Unbound => false,
        }
    }

    /// Recompute the bound motion vector from current raw state. Opposing
    /// triggers cancel; the result is never accumulated across calls.
    fn recompute_key_motion(&mut self, bindings: &InputBindings) {
        let axis = |neg: InputSlot, pos: InputSlot| -> f32 {
            let neg = self.slot_active(neg, bindings);
            let pos = self.slot_active(pos, bindings);
            (pos as i32 - neg as i32) as f32
        };
        self.key_motion = Vec2::new(
            axis(InputSlot::Left, InputSlot::Right),
            axis(InputSlot::Down, InputSlot::Up),
        );
    }

    /// Clear tracked keys, modifiers, held keys/buttons, and both motion
    /// vectors. Used on focus loss or grab changes to avoid stuck keys.
    pub fn reset_key_states(&mut self) {
        self.kmods = 0;
        self.tracked = [false; TrackedKey::COUNT];
        self.mouse_buttons = 0;
        self.keys_down.clear();
        self.joy_buttons_down.clear();
        self.key_motion = Vec2::ZERO;
        self.joy_motion = Vec2::ZERO;
    }

    /// Zero the joystick motion contribution without touching anything else
    pub fn clear_joy_motion(&mut self) {
        self.joy_motion = Vec2::ZERO;
    }

    // --- Query methods ---

    /// Current modifier mask
    pub fn kmods(&self) -> u32 {
        self.kmods
    }

    /// Is the given modifier bit active?
    pub fn kmod_state(&self, mask: u32) -> bool {
        self.kmods & mask != 0
    }

    /// Is the tracked key pressed?
    pub fn tracked_key_state(&self, key: TrackedKey) -> bool {
        self.tracked[key as usize]
    }

    /// Snapshot of all tracked keys, indexed by `TrackedKey`
    pub fn tracked_keys(&self) -> [bool; TrackedKey::COUNT] {
        self.tracked
    }

    /// Is the mouse button with the given index pressed?
    pub fn mouse_button_state(&self, button: u32) -> bool {
        self.mouse_buttons & (1 << button) != 0
    }

    /// Bitmask of pressed mouse buttons
    pub fn mouse_buttons(&self) -> u32 {
        self.mouse_buttons
    }

    pub fn key_motion(&self) -> Vec2 {
        self.key_motion
    }

    pub fn joy_motion(&self) -> Vec2 {
        self.joy_motion
    }

    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_exclusivity() {
        let mut bindings = InputBindings::new();
        let before: Vec<_> = InputSlot::ALL.iter().map(|s| bindings.get(*s)).collect();

        bindings.set(InputSlot::Camera, InputBinding::Key(KeyCode::KeyC));
        assert_eq!(
            bindings.get(InputSlot::Camera),
            InputBinding::Key(KeyCode::KeyC)
        );

        for (i, slot) in InputSlot::ALL.iter().enumerate() {
            if *slot != InputSlot::Camera {
                assert_eq!(bindings.get(*slot), before[i]);
            }
        }
    }

    #[test]
    fn reset_defaults_restores_all_slots() {
        let mut bindings = InputBindings::new();
        bindings.set(InputSlot::Left, InputBinding::Unbound);
        bindings.set(InputSlot::Quit, InputBinding::JoyButton(7));
        bindings.reset_defaults();
        assert_eq!(
            bindings.get(InputSlot::Left),
            InputBinding::Key(KeyCode::ArrowLeft)
        );
        assert_eq!(
            bindings.get(InputSlot::Quit),
            InputBinding::Key(KeyCode::Escape)
        );
    }

    #[test]
    fn key_motion_from_arrows() {
        let bindings = InputBindings::new();
        let mut input = InputState::new();

        input.process_key_down(KeyCode::ArrowRight, &bindings);
        assert_eq!(input.key_motion(), Vec2::new(1.0, 0.0));

        input.process_key_down(KeyCode::ArrowUp, &bindings);
        assert_eq!(input.key_motion(), Vec2::new(1.0, 1.0));

        input.process_key_up(KeyCode::ArrowRight, &bindings);
        assert_eq!(input.key_motion(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn opposing_triggers_cancel() {
        let bindings = InputBindings::new();
        let mut input = InputState::new();

        input.process_key_down(KeyCode::ArrowLeft, &bindings);
        input.process_key_down(KeyCode::ArrowRight, &bindings);
        assert_eq!(input.key_motion().x, 0.0);

        input.process_key_up(KeyCode::ArrowLeft, &bindings);
        assert_eq!(input.key_motion().x, 1.0);
    }

    #[test]
    fn rebind_takes_effect_on_next_event() {
        let mut bindings = InputBindings::new();
        let mut input = InputState::new();

        input.process_key_down(KeyCode::ArrowRight, &bindings);
        assert_eq!(input.key_motion().x, 1.0);

        // Rebind "right" to D; the held arrow no longer matches on the next
        // recompute
        bindings.set(InputSlot::Right, InputBinding::Key(KeyCode::KeyD));
        input.process_key_down(KeyCode::KeyA, &bindings);
        assert_eq!(input.key_motion().x, 0.0);

        input.process_key_down(KeyCode::KeyD, &bindings);
        assert_eq!(input.key_motion().x, 1.0);
    }

    #[test]
    fn kmod_binding_drives_motion() {
        let mut bindings = InputBindings::new();
        bindings.set(InputSlot::Up, InputBinding::Kmod(kmod::SHIFT));
        let mut input = InputState::new();

        input.process_key_down(KeyCode::ShiftLeft, &bindings);
        assert!(input.kmod_state(kmod::SHIFT));
        assert_eq!(input.key_motion().y, 1.0);

        input.process_key_up(KeyCode::ShiftLeft, &bindings);
        assert_eq!(input.key_motion().y, 0.0);
    }

    #[test]
    fn joy_button_binding_drives_motion() {
        let mut bindings = InputBindings::new();
        bindings.set(InputSlot::Right, InputBinding::JoyButton(3));
        let mut input = InputState::new();

        input.process_joy_button(3, true, &bindings);
        assert_eq!(input.key_motion().x, 1.0);
        input.process_joy_button(3, false, &bindings);
        assert_eq!(input.key_motion().x, 0.0);
    }

    #[test]
    fn tracked_keys_and_modifiers() {
        let bindings = InputBindings::new();
        let mut input = InputState::new();

        input.process_key_down(KeyCode::PageUp, &bindings);
        input.process_key_down(KeyCode::ControlLeft, &bindings);
        assert!(input.tracked_key_state(TrackedKey::PageUp));
        assert!(input.tracked_key_state(TrackedKey::Control));
        assert!(input.kmod_state(kmod::CONTROL));
        assert!(!input.tracked_key_state(TrackedKey::NumPlus));

        input.process_key_up(KeyCode::ControlLeft, &bindings);
        assert!(!input.kmod_state(kmod::CONTROL));
    }

    #[test]
    fn mouse_button_mask() {
        let mut input = InputState::new();
        input.process_mouse_button_down(0);
        input.process_mouse_button_down(2);
        assert!(input.mouse_button_state(0));
        assert!(!input.mouse_button_state(1));
        assert!(input.mouse_button_state(2));
        assert_eq!(input.mouse_buttons(), 0b101);

        input.process_mouse_button_up(0);
        assert!(!input.mouse_button_state(0));
    }

    #[test]
    fn joy_axes_clamped() {
        let mut input = InputState::new();
        input.apply_joy_axes(&[0.75, -2.0]);
        assert_eq!(input.joy_motion(), Vec2::new(0.75, -1.0));

        input.apply_joy_axes(&[]);
        assert_eq!(input.joy_motion(), Vec2::ZERO);
    }

    #[test]
    fn reset_clears_everything() {
        let bindings = InputBindings::new();
        let mut input = InputState::new();
        input.process_key_down(KeyCode::ArrowLeft, &bindings);
        input.process_key_down(KeyCode::ShiftLeft, &bindings);
        input.process_key_down(KeyCode::PageDown, &bindings);
        input.process_mouse_button_down(1);
        input.apply_joy_axes(&[0.5, 0.5]);

        input.reset_key_states();

        assert_eq!(input.kmods(), 0);
        assert_eq!(input.mouse_buttons(), 0);
        assert_eq!(input.key_motion(), Vec2::ZERO);
        assert_eq!(input.joy_motion(), Vec2::ZERO);
        for key in [TrackedKey::Shift, TrackedKey::PageDown] {
            assert!(!input.tracked_key_state(key));
        }
    }
}
