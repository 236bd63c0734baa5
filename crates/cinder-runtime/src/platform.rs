//! Platform binding seam
//!
//! The shell pulls raw events through this trait instead of depending on a
//! concrete windowing toolkit. The winit implementation lives in
//! cinder-shell; tests drive a queue-backed stub.

use cinder_core::{IntSize, Point, Result};
use winit::keyboard::KeyCode;

/// A raw platform event, before translation and enrichment
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformEvent {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    MouseMove { pos: Point },
    MouseButtonDown { button: u32 },
    MouseButtonUp { button: u32 },
    MouseWheel { delta: f32 },
    FocusGained,
    FocusLost,
    Resized { size: IntSize },
    CloseRequested,
}

/// Capability interface for the windowing platform
pub trait Platform {
    /// Pull the next pending event. `Ok(None)` means nothing is pending;
    /// an error is a recoverable device hiccup, not a fatal condition.
    fn poll_event(&mut self) -> Result<Option<PlatformEvent>>;

    /// Set the window title
    fn set_window_title(&mut self, title: &str);

    /// Grab or release keyboard/mouse input
    fn set_cursor_grab(&mut self, grab: bool);

    /// Show or hide the system mouse cursor
    fn set_cursor_visible(&mut self, visible: bool);

    /// Move the system mouse cursor, in interface coordinates
    fn set_cursor_pos(&mut self, pos: Point);
}
