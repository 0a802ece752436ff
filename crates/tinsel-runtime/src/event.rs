//! Scene events raised by input sources and consumed by the host

use serde::{Deserialize, Serialize};
use tinsel_choreo::{MacroState, ScatterShape};

/// Events that flow from controllers (gestures, UI, keyboard) to the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    /// Switch the whole scene toward a macro state
    MacroStateRequested(MacroState),
    /// Change the chaos layout of every binding
    ScatterShapeChanged(ScatterShape),
    /// Focus the photo nearest to a screen point (pixels)
    FocusRequested { x: f32, y: f32 },
    /// Release any focused photo
    FocusReleased,
    /// Camera orbit delta in radians
    Orbit { yaw: f32, pitch: f32 },
}
