//! Hand gesture controller
//!
//! Turns a noisy stream of per-frame hand observations (from an external
//! landmark detector) into discrete scene events:
//!
//! - open palm held for `hold_time` → request Chaos
//! - fist held for `hold_time` → request Formed
//! - pinch start → focus the photo under the palm; pinch end → release
//! - palm offset from screen center (outside a dead zone) → camera orbit
//!
//! The palm position is smoothed with an exponential decay so orbit output
//! does not jitter with the detector.

use crate::event::SceneEvent;
use serde::{Deserialize, Serialize};
use tinsel_choreo::MacroState;

/// Hand pose as classified by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandPose {
    Neutral,
    OpenPalm,
    Fist,
    Pinch,
}

impl HandPose {
    fn macro_state(self) -> Option<MacroState> {
        match self {
            HandPose::OpenPalm => Some(MacroState::Chaos),
            HandPose::Fist => Some(MacroState::Formed),
            _ => None,
        }
    }
}

/// One detector sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    pub pose: HandPose,
    /// Palm center in normalized screen coordinates, `[0, 1]` on both axes
    pub palm: [f32; 2],
    pub confidence: f32,
}

impl HandObservation {
    pub fn new(pose: HandPose, palm: [f32; 2]) -> Self {
        Self {
            pose,
            palm,
            confidence: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Exponential decay rate of the palm filter, per second
    pub smoothing_rate: f32,
    /// Palm offset from center (normalized) below which no orbit is produced
    pub dead_zone: f32,
    /// Seconds a pose must persist before it switches the macro state
    pub hold_time: f32,
    /// Orbit speed in radians per second at full deflection
    pub orbit_speed: f32,
    /// Observations below this confidence count as "no hand"
    pub min_confidence: f32,
    /// Viewport size in pixels, for focus requests
    pub viewport: [f32; 2],
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            smoothing_rate: 12.0,
            dead_zone: 0.08,
            hold_time: 0.3,
            orbit_speed: 1.5,
            min_confidence: 0.5,
            viewport: [1280.0, 720.0],
        }
    }
}

/// Smoothing state machine over hand observations
pub struct HandController {
    settings: GestureSettings,
    smoothed: Option<[f32; 2]>,
    candidate: Option<(HandPose, f32)>,
    committed: MacroState,
    pinching: bool,
}

impl HandController {
    pub fn new(settings: GestureSettings, initial: MacroState) -> Self {
        Self {
            settings,
            smoothed: None,
            candidate: None,
            committed: initial,
            pinching: false,
        }
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    /// Last macro state this controller requested (or started with)
    pub fn committed_state(&self) -> MacroState {
        self.committed
    }

    pub fn smoothed_palm(&self) -> Option<[f32; 2]> {
        self.smoothed
    }

    /// Keep the committed state in sync when something else changes it
    pub fn set_committed_state(&mut self, state: MacroState) {
        self.committed = state;
    }

    /// Feed one frame. `None` (or a low-confidence sample) means no hand.
    pub fn observe(&mut self, observation: Option<&HandObservation>, dt: f32) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let obs = match observation {
            Some(o) if o.confidence >= self.settings.min_confidence && palm_is_valid(o.palm) => o,
            _ => {
                self.lose_hand(&mut events);
                return events;
            }
        };

        let palm = self.smooth(obs.palm, dt);
        self.track_pose(obs.pose, dt, &mut events);
        self.track_pinch(obs.pose, palm, &mut events);

        if obs.pose != HandPose::Pinch {
            if let Some((yaw, pitch)) = self.orbit(palm, dt) {
                events.push(SceneEvent::Orbit { yaw, pitch });
            }
        }
        events
    }

    /// Forget all tracking state without emitting events
    pub fn reset(&mut self) {
        self.smoothed = None;
        self.candidate = None;
        self.pinching = false;
    }

    fn lose_hand(&mut self, events: &mut Vec<SceneEvent>) {
        if self.pinching {
            events.push(SceneEvent::FocusReleased);
        }
        self.reset();
    }

    fn smooth(&mut self, palm: [f32; 2], dt: f32) -> [f32; 2] {
        let next = match self.smoothed {
            None => palm,
            Some(prev) => {
                let alpha = 1.0 - (-self.settings.smoothing_rate * dt).exp();
                [
                    prev[0] + (palm[0] - prev[0]) * alpha,
                    prev[1] + (palm[1] - prev[1]) * alpha,
                ]
            }
        };
        self.smoothed = Some(next);
        next
    }

    fn track_pose(&mut self, pose: HandPose, dt: f32, events: &mut Vec<SceneEvent>) {
        let held = match self.candidate {
            Some((p, held)) if p == pose => held + dt,
            _ => 0.0,
        };
        self.candidate = Some((pose, held));

        let Some(state) = pose.macro_state() else {
            return;
        };
        if state != self.committed && held >= self.settings.hold_time {
            log::debug!("[gesture] {:?} held {:.2}s -> {:?}", pose, held, state);
            self.committed = state;
            events.push(SceneEvent::MacroStateRequested(state));
        }
    }

    fn track_pinch(&mut self, pose: HandPose, palm: [f32; 2], events: &mut Vec<SceneEvent>) {
        let pinching = pose == HandPose::Pinch;
        if pinching && !self.pinching {
            let [w, h] = self.settings.viewport;
            events.push(SceneEvent::FocusRequested {
                x: palm[0] * w,
                y: palm[1] * h,
            });
        } else if !pinching && self.pinching {
            events.push(SceneEvent::FocusReleased);
        }
        self.pinching = pinching;
    }

    fn orbit(&self, palm: [f32; 2], dt: f32) -> Option<(f32, f32)> {
        let dz = self.settings.dead_zone.clamp(0.0, 0.49);
        let x = dead_zone(palm[0] - 0.5, dz);
        let y = dead_zone(palm[1] - 0.5, dz);
        if (x == 0.0 && y == 0.0) || dt == 0.0 {
            return None;
        }
        let k = self.settings.orbit_speed * dt;
        Some((x * k, y * k))
    }
}

fn palm_is_valid(palm: [f32; 2]) -> bool {
    palm[0].is_finite() && palm[1].is_finite()
}

/// Rescale `offset` (in [-0.5, 0.5]) to [-1, 1] with a flat zone around zero
fn dead_zone(offset: f32, dz: f32) -> f32 {
    let mag = offset.abs();
    if mag <= dz {
        return 0.0;
    }
    let scaled = ((mag - dz) / (0.5 - dz)).min(1.0);
    scaled.copysign(offset)
}
