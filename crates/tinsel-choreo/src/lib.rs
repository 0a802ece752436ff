//! Tinsel Choreo - scatter/gather particle choreography
//!
//! Drives a fixed set of entities between a scattered "chaos" layout and an
//! assembled "formed" layout:
//! - Deterministic sampler so every layout regenerates bit for bit
//! - Five scatter shapes, four target shapes, six gather (delay) shapes
//! - Staggered per-entity progress derived from one scene progress scalar
//! - Cross-faded scatter-shape changes (nothing ever teleports)
//! - Packed instance data and fingerprinted tables for GPU upload

pub mod easing;
pub mod gather;
pub mod instance;
pub mod sampler;
pub mod scatter;
pub mod state;
pub mod target;

pub use easing::Easing;
pub use gather::{GatherShape, MAX_DELAY};
pub use instance::{ChoreoUniforms, EntityInstance, GpuTables};
pub use sampler::{sample, KeyedSampler};
pub use scatter::ScatterShape;
pub use state::{
    clamp_speed, duration_for, ChoreoSettings, Choreography, FrameInput, MacroState, MAX_ENTITIES,
};
pub use target::{LayoutParams, TargetShape};
