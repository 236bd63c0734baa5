//! Cinder Shell - winit platform binding and standalone shell binary

mod platform_winit;
mod shell_app;
mod video_winit;

pub use platform_winit::{translate_window_event, EventQueue, WinitPlatform};
pub use shell_app::{ShellApp, ShellOptions};
pub use video_winit::WinitVideoBackend;
