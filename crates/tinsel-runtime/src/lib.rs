//! Tinsel Runtime - Frame loop infrastructure
//!
//! Provides the building blocks a host uses to drive the scene:
//! - `FrameClock` - wall-clock or explicit stepping, capped at `MAX_FRAME_TIME`
//! - `SceneEvent` / `EventBus` - typed event queue from controllers to the host
//! - `HandController` - gesture smoothing that emits scene events
//! - `RuntimeSystem` - trait for systems ticked by the frame loop

mod clock;
mod event;
mod event_bus;
mod gesture;
mod system;

pub use clock::{FrameClock, MAX_FRAME_TIME};
pub use event::SceneEvent;
pub use event_bus::EventBus;
pub use gesture::{GestureSettings, HandController, HandObservation, HandPose};
pub use system::RuntimeSystem;
