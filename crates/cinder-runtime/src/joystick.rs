//! Polled joystick channel
//!
//! Joystick state is produced on its own schedule, decoupled from the frame
//! rate: a background poller reads the device at a fixed interval, diffs
//! against the last published snapshot, synthesizes `JoyAxis`/`JoyButton`
//! events on change, and swaps in a new immutable snapshot. The main loop
//! drains the synthesized events and reads whole snapshots, so it never
//! observes a partially updated axis/button container.

use crate::event::EventKind;
use cinder_core::{CinderError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Information about a joystick device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoystickDevice {
    /// Device index in the enumeration order
    pub index: usize,
    /// Device name
    pub name: String,
    /// Number of axes (valid only after the device is opened)
    pub axis_count: usize,
    /// Number of buttons (valid only after the device is opened)
    pub button_count: usize,
}

/// Raw device access. One implementation per platform layer; tests script one.
pub trait JoystickBackend {
    /// Enumerate currently visible devices. No side effects on open state.
    fn devices(&mut self) -> Vec<JoystickDevice>;

    /// Open the device with the given index. Returns (axis count, button
    /// count) on success.
    fn open(&mut self, index: usize) -> Result<(usize, usize)>;

    /// Read the electrical state of the open device into the given buffers.
    /// Returns false if the device is gone.
    fn read(&mut self, axes: &mut [f32], buttons: &mut [bool]) -> bool;

    /// Release the open device, if any.
    fn close(&mut self);
}

/// Immutable snapshot of joystick axis/button state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoySnapshot {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

/// State shared between the poller thread and the main thread
struct JoyShared {
    /// Latest published snapshot; readers clone the Arc, never the contents
    snapshot: Mutex<Arc<JoySnapshot>>,
    /// Backend handle, locked for every access
    backend: Mutex<Box<dyn JoystickBackend + Send>>,
    open: AtomicBool,
    enabled: AtomicBool,
    shutdown: AtomicBool,
}

/// Owns the open joystick device and its polling thread
pub struct JoystickChannel {
    shared: Arc<JoyShared>,
    device: Option<JoystickDevice>,
    events: Receiver<EventKind>,
    poller: Option<JoinHandle<()>>,
}

impl JoystickChannel {
    /// Create the channel and start its poller at the given interval. No
    /// device is open until `open` is called.
    pub fn new(backend: Box<dyn JoystickBackend + Send>, interval: Duration) -> Self {
        let shared = Arc::new(JoyShared {
            snapshot: Mutex::new(Arc::new(JoySnapshot::default())),
            backend: Mutex::new(backend),
            open: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
            shutdown: AtomicBool::new(false),
        });

        let (tx, rx) = mpsc::channel();
        let poller = spawn_poller(shared.clone(), tx, interval);

        Self {
            shared,
            device: None,
            events: rx,
            poller: Some(poller),
        }
    }

    /// Enumerate currently visible devices
    pub fn devices(&self) -> Vec<JoystickDevice> {
        self.shared.backend.lock().unwrap().devices()
    }

    /// Info about the currently open device, if any
    pub fn device(&self) -> Option<&JoystickDevice> {
        self.device.as_ref()
    }

    /// Open a device by descriptor, closing any currently open one first
    pub fn open(&mut self, device: &JoystickDevice) -> Result<()> {
        self.close();

        let (axis_count, button_count) = {
            let mut backend = self.shared.backend.lock().unwrap();
            backend.open(device.index)?
        };

        self.publish(Arc::new(JoySnapshot {
            axes: vec![0.0; axis_count],
            buttons: vec![false; button_count],
        }));
        self.device = Some(JoystickDevice {
            index: device.index,
            name: device.name.clone(),
            axis_count,
            button_count,
        });
        self.shared.open.store(true, Ordering::SeqCst);
        log::info!(
            "joystick open: {} ({} axes, {} buttons)",
            device.name,
            axis_count,
            button_count
        );
        Ok(())
    }

    /// Close the open device and clear its state. Safe to call while a poll
    /// tick is in flight; the poller rechecks the open flag under the backend
    /// lock and no-ops.
    pub fn close(&mut self) {
        if self.device.is_none() {
            return;
        }
        self.shared.open.store(false, Ordering::SeqCst);
        self.shared.backend.lock().unwrap().close();
        self.publish(Arc::new(JoySnapshot::default()));
        self.device = None;
    }

    /// Switch to a different device. Never leaves two devices open.
    pub fn change(&mut self, device: &JoystickDevice) -> Result<()> {
        self.close();
        self.open(device)
    }

    /// Enable or disable polling. Disabling keeps the device open so
    /// re-enabling is instant.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }

    /// True when a device is open and polling is enabled
    pub fn active(&self) -> bool {
        self.device.is_some() && self.enabled()
    }

    /// Latest published snapshot, as an atomic whole
    pub fn snapshot(&self) -> Arc<JoySnapshot> {
        self.shared.snapshot.lock().unwrap().clone()
    }

    /// Drain the events synthesized since the last call
    pub fn drain_events(&mut self) -> Vec<EventKind> {
        self.events.try_iter().collect()
    }

    fn publish(&self, snapshot: Arc<JoySnapshot>) {
        *self.shared.snapshot.lock().unwrap() = snapshot;
    }
}

impl Drop for JoystickChannel {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.poller.take() {
            let _ = handle.join();
        }
    }
}

fn spawn_poller(
    shared: Arc<JoyShared>,
    events: Sender<EventKind>,
    interval: Duration,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("joystick-poll".into())
        .spawn(move || loop {
            std::thread::sleep(interval);
            if shared.shutdown.load(Ordering::SeqCst) {
                return;
            }
            if !shared.open.load(Ordering::SeqCst) || !shared.enabled.load(Ordering::SeqCst) {
                continue;
            }

            let last = shared.snapshot.lock().unwrap().clone();
            let mut axes = vec![0.0f32; last.axes.len()];
            let mut buttons = vec![false; last.buttons.len()];

            // `close()` clears the open flag before it takes the backend
            // lock, so holding the lock from this recheck through the
            // publish keeps a tick that raced with close from overwriting
            // the cleared snapshot.
            let mut backend = shared.backend.lock().unwrap();
            if !shared.open.load(Ordering::SeqCst) {
                continue;
            }
            let ok = backend.read(&mut axes, &mut buttons);

            if !ok {
                // Disconnected mid-session: degrade to neutral, keep polling
                log::warn!("joystick read failed, degrading to neutral state");
                axes.fill(0.0);
                buttons.fill(false);
            }

            if axes == last.axes && buttons == last.buttons {
                continue;
            }

            for (i, value) in axes.iter().enumerate() {
                if last.axes.get(i) != Some(value) {
                    let _ = events.send(EventKind::JoyAxis {
                        axis: i as u32,
                        value: *value,
                    });
                }
            }
            for (i, pressed) in buttons.iter().enumerate() {
                if last.buttons.get(i) != Some(pressed) {
                    let _ = events.send(EventKind::JoyButton {
                        button: i as u32,
                        pressed: *pressed,
                    });
                }
            }

            *shared.snapshot.lock().unwrap() = Arc::new(JoySnapshot { axes, buttons });
        })
        .expect("failed to spawn joystick poller")
}

// --- gilrs backend ---

const STICK_DEADZONE: f32 = 0.1;

const GILRS_AXES: [gilrs::Axis; 6] = [
    gilrs::Axis::LeftStickX,
    gilrs::Axis::LeftStickY,
    gilrs::Axis::RightStickX,
    gilrs::Axis::RightStickY,
    gilrs::Axis::LeftZ,
    gilrs::Axis::RightZ,
];

const GILRS_BUTTONS: [gilrs::Button; 12] = [
    gilrs::Button::South,
    gilrs::Button::East,
    gilrs::Button::West,
    gilrs::Button::North,
    gilrs::Button::LeftTrigger,
    gilrs::Button::RightTrigger,
    gilrs::Button::Select,
    gilrs::Button::Start,
    gilrs::Button::DPadUp,
    gilrs::Button::DPadDown,
    gilrs::Button::DPadLeft,
    gilrs::Button::DPadRight,
];

/// Scale to full range outside the deadzone
fn apply_stick_deadzone(value: f32) -> f32 {
    if value.abs() < STICK_DEADZONE {
        0.0
    } else {
        let sign = value.signum();
        let magnitude = (value.abs() - STICK_DEADZONE) / (1.0 - STICK_DEADZONE);
        sign * magnitude.clamp(0.0, 1.0)
    }
}

/// `JoystickBackend` over gilrs. Gamepads are exposed with gilrs' mapped
/// (standardized) axis and button layout.
pub struct GilrsBackend {
    gilrs: gilrs::Gilrs,
    current: Option<gilrs::GamepadId>,
}

impl GilrsBackend {
    pub fn new() -> Result<Self> {
        let gilrs = gilrs::Gilrs::new().map_err(|e| CinderError::Joystick(e.to_string()))?;
        Ok(Self {
            gilrs,
            current: None,
        })
    }

    fn id_for_index(&self, index: usize) -> Option<gilrs::GamepadId> {
        self.gilrs.gamepads().nth(index).map(|(id, _)| id)
    }
}

impl JoystickBackend for GilrsBackend {
    fn devices(&mut self) -> Vec<JoystickDevice> {
        self.gilrs
            .gamepads()
            .enumerate()
            .map(|(index, (_, gamepad))| JoystickDevice {
                index,
                name: gamepad.name().to_string(),
                axis_count: 0,
                button_count: 0,
            })
            .collect()
    }

    fn open(&mut self, index: usize) -> Result<(usize, usize)> {
        let id = self
            .id_for_index(index)
            .ok_or_else(|| CinderError::Joystick(format!("no joystick at index {index}")))?;
        self.current = Some(id);
        Ok((GILRS_AXES.len(), GILRS_BUTTONS.len()))
    }

    fn read(&mut self, axes: &mut [f32], buttons: &mut [bool]) -> bool {
        // Pump the gilrs event queue so gamepad state is current
        while self.gilrs.next_event().is_some() {}

        let Some(id) = self.current else {
            return false;
        };
        let gamepad = self.gilrs.gamepad(id);
        if !gamepad.is_connected() {
            return false;
        }

        for (slot, axis) in axes.iter_mut().zip(GILRS_AXES.iter()) {
            *slot = apply_stick_deadzone(gamepad.value(*axis));
        }
        for (slot, button) in buttons.iter_mut().zip(GILRS_BUTTONS.iter()) {
            *slot = gamepad.is_pressed(*button);
        }
        true
    }

    fn close(&mut self) {
        self.current = None;
    }
}
