//! The application shell
//!
//! `Application` is the single process-wide owner of the clock, the input
//! state, the joystick channel, and the negotiated video configuration. Each
//! `step()` pulls platform events, translates and enriches them, runs them
//! through the dispatch chain, merges joystick state, advances the clock, and
//! triggers a render pass.

use crate::clock::SimulationClock;
use crate::dispatch::{DispatchChain, EventConsumer, EventFlow};
use crate::event::{Event, EventKind};
use crate::input::{InputBinding, InputBindings, InputSlot, InputState, TrackedKey};
use crate::joystick::{JoystickChannel, JoystickDevice};
use crate::platform::{Platform, PlatformEvent};
use crate::video::{ResolutionQuery, VideoBackend, VideoConfig, VideoNegotiator};
use cinder_core::{CinderError, Point, Result, Vec2};
use std::sync::atomic::{AtomicBool, Ordering};

/// Guards the one-instance-per-process requirement
static INSTANCE_LIVE: AtomicBool = AtomicBool::new(false);

/// Opaque audio collaborator, notified of simulation suspend/resume
pub trait AudioSink {
    fn on_suspend(&mut self);
    fn on_resume(&mut self);
}

/// Render collaborator, invoked once per loop iteration
pub trait RenderHook {
    fn render(&mut self);
}

/// Main application shell. Exactly one instance may exist per process; the
/// constructor fails with `InstanceExists` if a live instance is requested
/// twice.
pub struct Application {
    platform: Box<dyn Platform>,
    video_backend: Box<dyn VideoBackend>,

    clock: SimulationClock,
    input: InputState,
    bindings: InputBindings,
    joystick: Option<JoystickChannel>,
    video: VideoNegotiator,

    /// Engine stage then simulation stage, in registration order
    chain: DispatchChain,
    render_hook: Option<Box<dyn RenderHook>>,
    audio: Option<Box<dyn AudioSink>>,

    quit_requested: bool,
    exit_code: i32,
    error_message: String,
    window_title: String,
    debug_mode: bool,
    grab_input: bool,
    mouse_visible: bool,
}

impl Application {
    pub fn new(
        platform: Box<dyn Platform>,
        video_backend: Box<dyn VideoBackend>,
        initial_video: VideoConfig,
    ) -> Result<Self> {
        if INSTANCE_LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CinderError::InstanceExists);
        }

        Ok(Self {
            platform,
            video_backend,
            clock: SimulationClock::new(),
            input: InputState::new(),
            bindings: InputBindings::new(),
            joystick: None,
            video: VideoNegotiator::new(initial_video),
            chain: DispatchChain::new(),
            render_hook: None,
            audio: None,
            quit_requested: false,
            exit_code: 0,
            error_message: String::new(),
            window_title: String::new(),
            debug_mode: false,
            grab_input: false,
            mouse_visible: true,
        })
    }

    // --- Collaborator registration ---

    /// Append a dispatch stage. Register the engine stage before the
    /// simulation stage; the last registered stage is terminal.
    pub fn register_stage(&mut self, stage: Box<dyn EventConsumer>) {
        self.chain.push(stage);
    }

    pub fn set_render_hook(&mut self, hook: Box<dyn RenderHook>) {
        self.render_hook = Some(hook);
    }

    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = Some(audio);
    }

    pub fn attach_joystick(&mut self, channel: JoystickChannel) {
        self.joystick = Some(channel);
    }

    // --- Run loop ---

    /// Drive the loop until quit is requested; returns the exit code
    pub fn run(&mut self) -> i32 {
        while !self.quit_requested {
            self.step();
        }
        self.exit_code
    }

    /// One loop iteration: events, joystick merge, clock, render
    pub fn step(&mut self) {
        self.pump_platform_events();
        self.pump_joystick();
        self.clock.tick();
        if let Some(hook) = &mut self.render_hook {
            hook.render();
        }
    }

    fn pump_platform_events(&mut self) {
        loop {
            match self.platform.poll_event() {
                Ok(Some(raw)) => {
                    if let Some(event) = self.translate(raw) {
                        self.dispatch(event);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    // Recoverable: log and continue with last-known state
                    log::warn!("event source unavailable: {e}");
                    break;
                }
            }
        }
    }

    fn pump_joystick(&mut self) {
        let Some(channel) = &mut self.joystick else {
            return;
        };
        let kinds = channel.drain_events();
        if channel.active() {
            let snapshot = channel.snapshot();
            self.input.apply_joy_axes(&snapshot.axes);
        } else {
            self.input.clear_joy_motion();
        }
        for kind in kinds {
            if let EventKind::JoyButton { button, pressed } = &kind {
                self.input
                    .process_joy_button(*button, *pressed, &self.bindings);
            }
            let event = self.enrich(Event::new(kind));
            self.dispatch(event);
        }
    }

    /// Translate a raw platform event, applying its side effects on input
    /// state first, then stamping the state snapshot.
    fn translate(&mut self, raw: PlatformEvent) -> Option<Event> {
        let kind = match raw {
            PlatformEvent::KeyDown { key } => {
                self.input.process_key_down(key, &self.bindings);
                EventKind::KeyDown {
                    key,
                    kmods: self.input.kmods(),
                }
            }
            PlatformEvent::KeyUp { key } => {
                self.input.process_key_up(key, &self.bindings);
                EventKind::KeyUp {
                    key,
                    kmods: self.input.kmods(),
                }
            }
            PlatformEvent::MouseMove { pos } => {
                self.input.process_mouse_move(pos);
                EventKind::MouseMove { pos }
            }
            PlatformEvent::MouseButtonDown { button } => {
                self.input.process_mouse_button_down(button);
                EventKind::MouseButtonDown { button }
            }
            PlatformEvent::MouseButtonUp { button } => {
                self.input.process_mouse_button_up(button);
                EventKind::MouseButtonUp { button }
            }
            PlatformEvent::MouseWheel { delta } => EventKind::MouseWheel { delta },
            PlatformEvent::FocusGained => EventKind::FocusGained,
            PlatformEvent::FocusLost => {
                // Avoid stuck keys while unfocused
                self.input.reset_key_states();
                self.set_grab_input(false);
                EventKind::FocusLost
            }
            PlatformEvent::Resized { size } => {
                // Window geometry changes go through the video negotiator
                let new = VideoConfig {
                    size,
                    ..self.video.config()
                };
                self.video.change_config(&mut *self.video_backend, new);
                EventKind::Resized { size }
            }
            PlatformEvent::CloseRequested => EventKind::CloseRequested,
        };
        Some(self.enrich(Event::new(kind)))
    }

    fn enrich(&self, mut event: Event) -> Event {
        event.kmods = self.input.kmods();
        event.tracked_keys = self.input.tracked_keys();
        event.mouse_buttons = self.input.mouse_buttons();
        event.key_motion = self.input.key_motion();
        event.joy_motion = self.input.joy_motion();
        event.mouse_pos = self.input.mouse_pos();
        event
    }

    /// Inject an application-defined event into the chain, enriched with the
    /// current state snapshot. Used for `Quit` and `Custom` events.
    pub fn post_event(&mut self, kind: EventKind) {
        let event = self.enrich(Event::new(kind));
        self.dispatch(event);
    }

    /// Internal stage first, then the registered chain
    fn dispatch(&mut self, event: Event) {
        if self.process_internal(&event) == EventFlow::Consumed {
            return;
        }
        self.chain.dispatch(&event);
    }

    /// Application-internal event handling; consuming here keeps
    /// window-management traffic away from gameplay logic
    fn process_internal(&mut self, event: &Event) -> EventFlow {
        match event.kind {
            EventKind::CloseRequested => {
                self.request_quit(0);
                EventFlow::Consumed
            }
            EventKind::Quit => {
                self.quit_requested = true;
                EventFlow::Pass
            }
            _ => EventFlow::Pass,
        }
    }

    /// Request a clean shutdown with the given exit code
    pub fn request_quit(&mut self, exit_code: i32) {
        self.quit_requested = true;
        self.exit_code = exit_code;
    }

    /// Record a fatal condition: the exit code is non-zero and the message
    /// explains it
    pub fn set_fatal(&mut self, exit_code: i32, message: impl Into<String>) {
        self.quit_requested = true;
        self.exit_code = exit_code;
        self.error_message = message.into();
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    // --- Simulation clock ---

    /// Freeze scaled-time advancement; events and rendering continue
    pub fn suspend_simulation(&mut self) {
        self.clock.suspend();
        if let Some(audio) = &mut self.audio {
            audio.on_suspend();
        }
    }

    pub fn resume_simulation(&mut self) {
        self.clock.resume();
        if let Some(audio) = &mut self.audio {
            audio.on_resume();
        }
    }

    pub fn simulation_suspended(&self) -> bool {
        self.clock.suspended()
    }

    pub fn set_simulation_speed(&mut self, speed: f32) {
        self.clock.set_speed(speed);
    }

    pub fn simulation_speed(&self) -> f32 {
        self.clock.speed()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    // --- Input state ---

    pub fn kmods(&self) -> u32 {
        self.input.kmods()
    }

    pub fn kmod_state(&self, mask: u32) -> bool {
        self.input.kmod_state(mask)
    }

    pub fn tracked_key_state(&self, key: TrackedKey) -> bool {
        self.input.tracked_key_state(key)
    }

    pub fn mouse_button_state(&self, button: u32) -> bool {
        self.input.mouse_button_state(button)
    }

    pub fn key_motion(&self) -> Vec2 {
        self.input.key_motion()
    }

    pub fn joy_motion(&self) -> Vec2 {
        self.input.joy_motion()
    }

    pub fn reset_key_states(&mut self) {
        self.input.reset_key_states();
    }

    pub fn set_input_binding(&mut self, slot: InputSlot, binding: InputBinding) {
        self.bindings.set(slot, binding);
    }

    pub fn input_binding(&self, slot: InputSlot) -> InputBinding {
        self.bindings.get(slot)
    }

    pub fn set_default_input_bindings(&mut self) {
        self.bindings.reset_defaults();
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: InputBindings) {
        self.bindings = bindings;
    }

    // --- Joystick ---

    pub fn joystick_list(&self) -> Vec<JoystickDevice> {
        self.joystick
            .as_ref()
            .map(|c| c.devices())
            .unwrap_or_default()
    }

    pub fn joystick(&self) -> Option<&JoystickDevice> {
        self.joystick.as_ref().and_then(|c| c.device())
    }

    pub fn change_joystick(&mut self, device: &JoystickDevice) -> Result<()> {
        match &mut self.joystick {
            Some(channel) => channel.change(device),
            None => Err(CinderError::Joystick("no joystick channel attached".into())),
        }
    }

    pub fn set_joystick_enabled(&mut self, enabled: bool) {
        if let Some(channel) = &mut self.joystick {
            channel.set_enabled(enabled);
        }
        if !enabled {
            self.input.clear_joy_motion();
        }
    }

    pub fn joystick_enabled(&self) -> bool {
        self.joystick.as_ref().is_some_and(|c| c.enabled())
    }

    // --- Video ---

    pub fn video_config(&self) -> VideoConfig {
        self.video.config()
    }

    /// Apply a new video configuration; false leaves the previous
    /// configuration authoritative
    pub fn change_video_config(&mut self, new: VideoConfig) -> bool {
        self.video.change_config(&mut *self.video_backend, new)
    }

    pub fn video_resolution_list(&self, fullscreen: bool, resizeable: bool) -> ResolutionQuery {
        self.video
            .resolution_list(&*self.video_backend, fullscreen, resizeable)
    }

    // --- Window/cursor management ---

    pub fn set_window_title(&mut self, title: impl Into<String>) {
        self.window_title = title.into();
        self.platform.set_window_title(&self.window_title);
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn set_grab_input(&mut self, grab: bool) {
        self.grab_input = grab;
        self.platform.set_cursor_grab(grab);
    }

    pub fn grab_input(&self) -> bool {
        self.grab_input
    }

    pub fn set_system_mouse_visible(&mut self, visible: bool) {
        self.mouse_visible = visible;
        self.platform.set_cursor_visible(visible);
    }

    pub fn system_mouse_visible(&self) -> bool {
        self.mouse_visible
    }

    pub fn set_system_mouse_pos(&mut self, pos: Point) {
        self.input.process_mouse_move(pos);
        self.platform.set_cursor_pos(pos);
    }

    pub fn system_mouse_pos(&self) -> Point {
        self.input.mouse_pos()
    }

    pub fn set_debug_mode(&mut self, debug: bool) {
        self.debug_mode = debug;
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        INSTANCE_LIVE.store(false, Ordering::SeqCst);
    }
}
