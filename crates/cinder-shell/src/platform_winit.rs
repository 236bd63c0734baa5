//! Winit implementation of the platform binding
//!
//! Winit pushes events at us through `ApplicationHandler`; the shell's run
//! loop pulls them. `WinitPlatform` bridges the two with a buffered queue:
//! the handler feeds `push_window_event`, the `Platform` impl drains.

use cinder_core::{IntSize, Point, Result};
use cinder_runtime::{Platform, PlatformEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window};

/// Shared event buffer between the winit handler and the pull-model platform
pub type EventQueue = Arc<Mutex<VecDeque<PlatformEvent>>>;

pub struct WinitPlatform {
    window: Arc<Window>,
    queue: EventQueue,
}

impl WinitPlatform {
    pub fn new(window: Arc<Window>, queue: EventQueue) -> Self {
        Self { window, queue }
    }
}

/// Translate a winit window event into a raw platform event
pub fn translate_window_event(event: &WindowEvent, window: &Window) -> Option<PlatformEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(key) = event.physical_key else {
                return None;
            };
            Some(match event.state {
                ElementState::Pressed => PlatformEvent::KeyDown { key },
                ElementState::Released => PlatformEvent::KeyUp { key },
            })
        }
        WindowEvent::CursorMoved { position, .. } => {
            let size = window.inner_size();
            if size.width == 0 || size.height == 0 {
                return None;
            }
            Some(PlatformEvent::MouseMove {
                pos: Point::new(
                    position.x as f32 / size.width as f32,
                    position.y as f32 / size.height as f32,
                ),
            })
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = match button {
                MouseButton::Left => 0,
                MouseButton::Right => 1,
                MouseButton::Middle => 2,
                _ => return None,
            };
            Some(match state {
                ElementState::Pressed => PlatformEvent::MouseButtonDown { button },
                ElementState::Released => PlatformEvent::MouseButtonUp { button },
            })
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
            };
            Some(PlatformEvent::MouseWheel { delta })
        }
        WindowEvent::Focused(true) => Some(PlatformEvent::FocusGained),
        WindowEvent::Focused(false) => Some(PlatformEvent::FocusLost),
        WindowEvent::Resized(size) => Some(PlatformEvent::Resized {
            size: IntSize::new(size.width, size.height),
        }),
        WindowEvent::CloseRequested => Some(PlatformEvent::CloseRequested),
        _ => None,
    }
}

impl Platform for WinitPlatform {
    fn poll_event(&mut self) -> Result<Option<PlatformEvent>> {
        Ok(self.queue.lock().unwrap().pop_front())
    }

    fn set_window_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_cursor_grab(&mut self, grab: bool) {
        let result = if grab {
            // Try confined first, then locked
            self.window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            log::warn!("cursor grab change failed: {e}");
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    fn set_cursor_pos(&mut self, pos: Point) {
        let size = self.window.inner_size();
        let pixel = PhysicalPosition::new(
            (pos.x * size.width as f32) as f64,
            (pos.y * size.height as f32) as f64,
        );
        if let Err(e) = self.window.set_cursor_position(pixel) {
            log::warn!("cursor position change failed: {e}");
        }
    }
}
