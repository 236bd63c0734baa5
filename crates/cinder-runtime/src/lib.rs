//! Cinder Runtime - Application shell infrastructure
//!
//! Provides the core application/event/timing layer:
//! - `SimulationClock` — dual real/scaled clock with suspend and speed control
//! - `InputState` / `InputBindings` — key, mouse, and slot-binding tracking
//! - `Event` / `DispatchChain` — translated events and the ordered handler chain
//! - `JoystickChannel` — independently polled joystick state with snapshot merge
//! - `VideoNegotiator` — video mode queries and rollback-safe configuration
//! - `Application` — the single process-wide shell tying it all together

mod application;
mod clock;
mod dispatch;
mod event;
mod input;
mod joystick;
mod platform;
mod settings;
mod video;

pub use application::{Application, AudioSink, RenderHook};
pub use clock::SimulationClock;
pub use dispatch::{DispatchChain, DispatchOutcome, EventConsumer, EventFlow};
pub use event::{Event, EventKind};
pub use input::{kmod, InputBinding, InputBindings, InputSlot, InputState, TrackedKey};
pub use joystick::{
    GilrsBackend, JoySnapshot, JoystickBackend, JoystickChannel, JoystickDevice,
};
pub use platform::{Platform, PlatformEvent};
pub use settings::Settings;
pub use video::{ResolutionQuery, VideoBackend, VideoConfig, VideoMode, VideoNegotiator};
