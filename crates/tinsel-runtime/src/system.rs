//! Runtime system trait

use tinsel_choreo::FrameInput;
use tinsel_core::Result;

/// A system ticked by the host frame loop
///
/// Systems are updated in registration order, once per frame, after the host
/// has drained input and before it renders.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self) -> Result<()>;

    /// Called once per frame with the host's intent for this frame
    fn update(&mut self, input: &FrameInput) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
