//! Winit implementation of the video backend

use cinder_core::IntSize;
use cinder_runtime::{VideoBackend, VideoConfig, VideoMode};
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

pub struct WinitVideoBackend {
    window: Arc<Window>,
}

impl WinitVideoBackend {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl VideoBackend for WinitVideoBackend {
    fn enumerate_modes(&self) -> Option<Vec<VideoMode>> {
        let monitor = self.window.current_monitor()?;
        let mut modes: Vec<VideoMode> = monitor
            .video_modes()
            .map(|m| VideoMode {
                size: IntSize::new(m.size().width, m.size().height),
                fullscreen_capable: true,
                // Any enumerated size works as a resizeable window too
                resizeable_capable: true,
            })
            .collect();
        modes.dedup_by_key(|m| m.size);
        Some(modes)
    }

    fn apply(&mut self, config: &VideoConfig) -> bool {
        if config.size.width == 0 || config.size.height == 0 {
            return false;
        }

        self.window.set_resizable(config.resizeable);

        if config.fullscreen {
            self.window
                .set_fullscreen(Some(Fullscreen::Borderless(None)));
            return true;
        }

        self.window.set_fullscreen(None);
        let requested = PhysicalSize::new(config.size.width, config.size.height);
        match self.window.request_inner_size(requested) {
            // None means the platform applies the size asynchronously
            None => true,
            Some(size) => size.width == requested.width && size.height == requested.height,
        }
    }
}
