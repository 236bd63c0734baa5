//! Shell application implementing winit ApplicationHandler
//!
//! Owns the window and the `Application`, feeds the platform event buffer
//! from winit callbacks, and drives one `step()` per redraw.

use crate::platform_winit::{translate_window_event, EventQueue, WinitPlatform};
use crate::video_winit::WinitVideoBackend;
use cinder_runtime::{
    Application, GilrsBackend, InputBindings, JoystickChannel, VideoConfig,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

pub struct ShellOptions {
    pub video: VideoConfig,
    pub bindings: InputBindings,
    pub joystick_interval: Duration,
    pub debug: bool,
}

pub struct ShellApp {
    options: ShellOptions,
    app: Option<Application>,
    window: Option<Arc<Window>>,
    queue: EventQueue,
    exit_code: i32,
    error_message: String,
}

impl ShellApp {
    pub fn new(options: ShellOptions) -> Self {
        Self {
            options,
            app: None,
            window: None,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            exit_code: 0,
            error_message: String::new(),
        }
    }

    /// Exit code to return from the process
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Error message explaining a non-zero exit code
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let size = self.options.video.size;
        let window_attrs = Window::default_attributes()
            .with_inner_size(PhysicalSize::new(size.width, size.height))
            .with_resizable(self.options.video.resizeable);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                // Fatal: the run loop never starts
                self.exit_code = 1;
                self.error_message =
                    cinder_core::CinderError::WindowCreation(e.to_string()).to_string();
                log::error!("{}", self.error_message);
                event_loop.exit();
                return;
            }
        };

        if self.options.video.fullscreen {
            window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
        }

        let platform = WinitPlatform::new(window.clone(), self.queue.clone());
        let video = WinitVideoBackend::new(window.clone());

        let mut app =
            match Application::new(Box::new(platform), Box::new(video), self.options.video) {
                Ok(app) => app,
                Err(e) => {
                    self.exit_code = 1;
                    self.error_message = format!("failed to create application: {e}");
                    log::error!("{}", self.error_message);
                    event_loop.exit();
                    return;
                }
            };

        app.set_window_title("Cinder");
        app.set_bindings(self.options.bindings.clone());
        app.set_debug_mode(self.options.debug);

        // A missing joystick subsystem degrades to keyboard/mouse only
        match GilrsBackend::new() {
            Ok(backend) => {
                let mut channel =
                    JoystickChannel::new(Box::new(backend), self.options.joystick_interval);
                let devices = channel.devices();
                if let Some(device) = devices.first() {
                    if let Err(e) = channel.open(device) {
                        log::warn!("failed to open joystick {}: {e}", device.name);
                    }
                }
                app.attach_joystick(channel);
            }
            Err(e) => log::warn!("joystick subsystem unavailable: {e}"),
        }

        self.window = Some(window);
        self.app = Some(app);
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.initialize(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(app), Some(window)) = (&mut self.app, &self.window) else {
            return;
        };

        if matches!(event, WindowEvent::RedrawRequested) {
            app.step();
            if app.quit_requested() {
                self.exit_code = app.exit_code();
                self.error_message = app.error_message().to_string();
                event_loop.exit();
            }
            return;
        }

        if let Some(raw) = translate_window_event(&event, window) {
            self.queue.lock().unwrap().push_back(raw);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
