//! Choreography state — per-entity scatter/target blending driven by one
//! scene progress scalar
//!
//! The state owns parallel arrays (scatter, previous scatter, target, delay,
//! output position, output progress) and two scalars:
//!
//! - `scene_progress` in [0, 1], 0 = fully scattered, 1 = fully formed
//! - `shape_transition` in [0, 1], 1 = no scatter-shape change in flight
//!
//! Each entity's progress is a pure function of `scene_progress` and its fixed
//! gather delay. Nothing is tracked per entity over time, so reversing the
//! macro state mid-flight simply runs every entity backwards from where it is.

use crate::easing::Easing;
use crate::gather::GatherShape;
use crate::scatter::ScatterShape;
use crate::target::{LayoutParams, TargetShape};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tinsel_core::{Named, TinselError, Vec3};

pub const MIN_SPEED: f32 = 0.3;
pub const MAX_SPEED: f32 = 3.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Upper bound on entities per binding
pub const MAX_ENTITIES: u32 = 100_000;

pub const DEFAULT_STAGGER: f32 = 0.5;

/// Progress within this distance of its target snaps onto it
const SNAP_EPSILON: f32 = 1e-4;
/// Delays (and compression denominators) below this count as zero
const DELAY_EPSILON: f32 = 1e-4;

/// The two macroscopic display states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroState {
    /// Scattered
    #[default]
    Chaos,
    /// Assembled into the target silhouette
    Formed,
}

impl MacroState {
    pub fn target_progress(self) -> f32 {
        match self {
            MacroState::Chaos => 0.0,
            MacroState::Formed => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            MacroState::Chaos => MacroState::Formed,
            MacroState::Formed => MacroState::Chaos,
        }
    }
}

impl Named for MacroState {
    const ALL: &'static [Self] = &[MacroState::Chaos, MacroState::Formed];

    fn name(&self) -> &'static str {
        match self {
            MacroState::Chaos => "chaos",
            MacroState::Formed => "formed",
        }
    }
}

impl FromStr for MacroState {
    type Err = TinselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s)
    }
}

/// Clamp a speed knob into `[MIN_SPEED, MAX_SPEED]`; non-finite becomes the default
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}

/// Seconds for a full chaos ↔ formed sweep at `speed`
pub fn duration_for(speed: f32) -> f32 {
    1.0 / clamp_speed(speed)
}

/// Remap scene progress into one entity's own progress, before easing.
///
/// `(p − delay·k) / (1 − delay·k)`, clamped to [0, 1]. Zero delays and
/// degenerate denominators fall back to `p` itself.
pub fn adjusted_progress(scene_progress: f32, delay: f32, stagger: f32) -> f32 {
    let p = scene_progress.clamp(0.0, 1.0);
    if delay <= DELAY_EPSILON {
        return p;
    }
    let shift = delay * stagger;
    let span = 1.0 - shift;
    if !span.is_finite() || span <= DELAY_EPSILON {
        return p;
    }
    ((p - shift) / span).clamp(0.0, 1.0)
}

/// Eased blend weight for one entity. May leave [0, 1] for overshooting
/// easings; see [`Choreography::progress`] for the clamped value.
pub fn entity_weight(scene_progress: f32, delay: f32, stagger: f32, easing: Easing) -> f32 {
    easing.apply(adjusted_progress(scene_progress, delay, stagger))
}

/// Move `current` toward `target` by at most `step`, never overshooting
fn move_toward(current: f32, target: f32, step: f32) -> f32 {
    let next = if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    };
    if (next - target).abs() < SNAP_EPSILON {
        target
    } else {
        next
    }
}

/// Construction-time settings for one choreography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreoSettings {
    pub count: u32,
    pub target_shape: TargetShape,
    pub layout: LayoutParams,
    pub gather_shape: GatherShape,
    pub scatter_shape: ScatterShape,
    pub easing: Easing,
    pub speed: f32,
    /// Stagger compression constant `k` applied to gather delays
    pub stagger: f32,
    /// Macro state the entities start settled in
    pub initial_state: MacroState,
}

impl Default for ChoreoSettings {
    fn default() -> Self {
        Self {
            count: 0,
            target_shape: TargetShape::ConeVolume,
            layout: LayoutParams::default(),
            gather_shape: GatherShape::Direct,
            scatter_shape: ScatterShape::Sphere,
            easing: Easing::EaseInOut,
            speed: DEFAULT_SPEED,
            stagger: DEFAULT_STAGGER,
            initial_state: MacroState::Chaos,
        }
    }
}

impl ChoreoSettings {
    /// Clamp every knob into its safe range
    pub fn sanitized(self) -> Self {
        Self {
            count: self.count.min(MAX_ENTITIES),
            layout: self.layout.sanitized(),
            speed: clamp_speed(self.speed),
            stagger: sanitize_stagger(self.stagger),
            ..self
        }
    }
}

fn sanitize_stagger(k: f32) -> f32 {
    if k.is_finite() {
        k.clamp(0.0, 1.0)
    } else {
        DEFAULT_STAGGER
    }
}

/// Per-frame input from the host. Optional knobs are applied before the step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub delta_seconds: f32,
    pub macro_state: MacroState,
    pub scatter_shape: Option<ScatterShape>,
    pub easing: Option<Easing>,
    pub speed: Option<f32>,
}

impl FrameInput {
    pub fn new(delta_seconds: f32, macro_state: MacroState) -> Self {
        Self {
            delta_seconds,
            macro_state,
            scatter_shape: None,
            easing: None,
            speed: None,
        }
    }

    pub fn with_scatter_shape(mut self, shape: ScatterShape) -> Self {
        self.scatter_shape = Some(shape);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Stateful engine for one binding
#[derive(Debug, Clone)]
pub struct Choreography {
    settings: ChoreoSettings,
    scatter: Vec<Vec3>,
    scatter_prev: Vec<Vec3>,
    targets: Vec<Vec3>,
    delays: Vec<f32>,
    positions: Vec<Vec3>,
    progress: Vec<f32>,
    scene_progress: f32,
    shape_transition: f32,
}

impl Choreography {
    pub fn new(settings: ChoreoSettings) -> Self {
        let settings = settings.sanitized();
        let scene_progress = settings.initial_state.target_progress();
        let mut choreo = Self {
            settings,
            scatter: Vec::new(),
            scatter_prev: Vec::new(),
            targets: Vec::new(),
            delays: Vec::new(),
            positions: Vec::new(),
            progress: Vec::new(),
            scene_progress,
            shape_transition: 1.0,
        };
        choreo.regenerate();
        choreo
    }

    // ── Configuration ──

    /// Change the chaos layout without moving anything this frame.
    ///
    /// The current blended chaos position becomes the start of a new
    /// cross-fade toward the new layout.
    pub fn set_scatter_shape(&mut self, shape: ScatterShape) {
        if shape == self.settings.scatter_shape {
            return;
        }
        let blend = self.settings.easing.apply(self.shape_transition);
        for (prev, cur) in self.scatter_prev.iter_mut().zip(&self.scatter) {
            *prev = prev.lerp(cur, blend);
        }
        self.settings.scatter_shape = shape;
        shape.fill(self.settings.count, &mut self.scatter);
        self.shape_transition = 0.0;
        log::debug!(
            "[choreo] scatter shape -> {} ({} entities)",
            shape.name(),
            self.settings.count
        );
    }

    /// Change the gather policy; recomputes targets and delays
    pub fn set_gather_shape(&mut self, shape: GatherShape) {
        if shape == self.settings.gather_shape {
            return;
        }
        self.settings.gather_shape = shape;
        self.regenerate_targets();
    }

    /// Change the formed-layout dimensions; recomputes targets and delays
    pub fn set_layout(&mut self, layout: LayoutParams) {
        let layout = layout.sanitized();
        if layout == self.settings.layout {
            return;
        }
        self.settings.layout = layout;
        self.regenerate_targets();
    }

    pub fn set_target_shape(&mut self, shape: TargetShape) {
        if shape == self.settings.target_shape {
            return;
        }
        self.settings.target_shape = shape;
        self.regenerate_targets();
    }

    /// Change the entity count; every array is rebuilt from scratch
    pub fn set_count(&mut self, count: u32) {
        let count = count.min(MAX_ENTITIES);
        if count == self.settings.count {
            return;
        }
        self.settings.count = count;
        self.regenerate();
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.settings.easing = easing;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.settings.speed = clamp_speed(speed);
    }

    pub fn set_stagger(&mut self, stagger: f32) {
        self.settings.stagger = sanitize_stagger(stagger);
    }

    /// Jump straight to a settled macro state, skipping the animation
    pub fn settle(&mut self, state: MacroState) {
        self.scene_progress = state.target_progress();
        self.shape_transition = 1.0;
        self.scatter_prev.clone_from(&self.scatter);
        self.write_positions();
    }

    // ── Per-frame ──

    /// Apply the frame's optional knobs, then step
    pub fn apply(&mut self, input: &FrameInput) {
        if let Some(speed) = input.speed {
            self.set_speed(speed);
        }
        if let Some(easing) = input.easing {
            self.set_easing(easing);
        }
        if let Some(shape) = input.scatter_shape {
            self.set_scatter_shape(shape);
        }
        self.update(input.delta_seconds, input.macro_state);
    }

    /// Advance both clocks by `delta_seconds` toward `macro_state` and
    /// rewrite the output buffers
    pub fn update(&mut self, delta_seconds: f32, macro_state: MacroState) {
        let dt = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            delta_seconds
        } else {
            0.0
        };
        let step = dt / self.duration();

        self.scene_progress = move_toward(self.scene_progress, macro_state.target_progress(), step);
        if self.shape_transition < 1.0 {
            self.shape_transition = move_toward(self.shape_transition, 1.0, step);
        }

        self.write_positions();
    }

    fn write_positions(&mut self) {
        if self.settings.count == 0 {
            return;
        }
        let easing = self.settings.easing;
        let stagger = self.settings.stagger;
        let p = self.scene_progress;
        let blending = self.shape_transition < 1.0;
        let blend = easing.apply(self.shape_transition);

        for i in 0..self.positions.len() {
            let weight = entity_weight(p, self.delays[i], stagger, easing);
            let chaos = if blending {
                self.scatter_prev[i].lerp(&self.scatter[i], blend)
            } else {
                self.scatter[i]
            };
            self.positions[i] = chaos.lerp(&self.targets[i], weight);
            self.progress[i] = weight.clamp(0.0, 1.0);
        }
    }

    // ── Regeneration ──

    fn regenerate(&mut self) {
        let count = self.settings.count;
        self.settings.scatter_shape.fill(count, &mut self.scatter);
        self.scatter_prev.clone_from(&self.scatter);
        self.shape_transition = 1.0;
        self.positions.clear();
        self.positions.resize(count as usize, Vec3::ZERO);
        self.progress.clear();
        self.progress.resize(count as usize, 0.0);
        self.regenerate_targets();
        log::debug!(
            "[choreo] regenerated {} entities (scatter {}, gather {})",
            count,
            self.settings.scatter_shape.name(),
            self.settings.gather_shape.name()
        );
    }

    fn regenerate_targets(&mut self) {
        let s = &self.settings;
        s.target_shape.fill(s.count, &s.layout, &mut self.targets);
        s.gather_shape.fill(&self.targets, &s.layout, &mut self.delays);
        self.write_positions();
    }

    // ── Accessors ──

    pub fn settings(&self) -> &ChoreoSettings {
        &self.settings
    }

    pub fn count(&self) -> u32 {
        self.settings.count
    }

    pub fn is_empty(&self) -> bool {
        self.settings.count == 0
    }

    pub fn scene_progress(&self) -> f32 {
        self.scene_progress
    }

    pub fn shape_transition(&self) -> f32 {
        self.shape_transition
    }

    /// Seconds for a full sweep at the current speed
    pub fn duration(&self) -> f32 {
        duration_for(self.settings.speed)
    }

    /// True when both clocks rest at a terminal value
    pub fn is_settled(&self) -> bool {
        (self.scene_progress == 0.0 || self.scene_progress == 1.0) && self.shape_transition >= 1.0
    }

    /// Output positions, one per entity, as of the last update
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Eased per-entity progress clamped to [0, 1], as of the last update
    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    pub fn delays(&self) -> &[f32] {
        &self.delays
    }

    pub fn scatter_positions(&self) -> &[Vec3] {
        &self.scatter
    }

    pub fn previous_scatter_positions(&self) -> &[Vec3] {
        &self.scatter_prev
    }

    pub fn position(&self, index: u32) -> Option<Vec3> {
        self.positions.get(index as usize).copied()
    }

    /// Current blended chaos position for one entity
    pub fn chaos_position(&self, index: u32) -> Option<Vec3> {
        let i = index as usize;
        let prev = self.scatter_prev.get(i)?;
        let cur = self.scatter.get(i)?;
        Some(prev.lerp(cur, self.settings.easing.apply(self.shape_transition)))
    }
}
