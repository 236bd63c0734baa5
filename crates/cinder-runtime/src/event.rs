//! Internal event records
//!
//! Platform events are translated into this closed set of kinds and enriched
//! with a snapshot of the input state at translation time, so consumers never
//! have to reach back into mutable shared state.

use crate::input::TrackedKey;
use cinder_core::{IntSize, Point, Vec2};
use winit::keyboard::KeyCode;

/// The closed set of internal event kinds
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    KeyDown { key: KeyCode, kmods: u32 },
    KeyUp { key: KeyCode, kmods: u32 },
    MouseMove { pos: Point },
    MouseButtonDown { button: u32 },
    MouseButtonUp { button: u32 },
    MouseWheel { delta: f32 },
    FocusGained,
    FocusLost,
    Resized { size: IntSize },
    CloseRequested,
    JoyAxis { axis: u32, value: f32 },
    JoyButton { button: u32, pressed: bool },
    Quit,
    Custom(u32),
}

/// An internal event plus the input-state snapshot taken when it was
/// translated
#[derive(Clone, Debug)]
pub struct Event {
    pub kind: EventKind,
    /// Modifier mask at translation time
    pub kmods: u32,
    /// Tracked-key state at translation time, indexed by `TrackedKey`
    pub tracked_keys: [bool; TrackedKey::COUNT],
    /// Pressed mouse buttons at translation time
    pub mouse_buttons: u32,
    /// Bound motion vector at translation time
    pub key_motion: Vec2,
    /// Joystick motion vector at translation time
    pub joy_motion: Vec2,
    /// Mouse position at translation time
    pub mouse_pos: Point,
}

impl Event {
    /// An event with a neutral state snapshot. The translator overwrites the
    /// snapshot fields from live input state.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            kmods: 0,
            tracked_keys: [false; TrackedKey::COUNT],
            mouse_buttons: 0,
            key_motion: Vec2::ZERO,
            joy_motion: Vec2::ZERO,
            mouse_pos: Point::default(),
        }
    }
}
