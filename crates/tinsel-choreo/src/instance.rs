//! GPU-facing data: per-entity instances and packed target/delay tables

use crate::state::Choreography;
use bytemuck::{Pod, Zeroable};
use tinsel_core::{Color, ContentHash, Named};

/// GPU instance data for one entity.
/// 32 bytes, 16-byte aligned (2 rows of vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EntityInstance {
    pub pos_progress: [f32; 4], // xyz = position, w = eased progress
    pub color: [f32; 4],        // rgba, alpha carries the scale
}

impl EntityInstance {
    pub fn new(position: [f32; 3], progress: f32, color: Color, scale: f32) -> Self {
        Self {
            pos_progress: [position[0], position[1], position[2], progress],
            color: [color.r, color.g, color.b, scale],
        }
    }

    pub fn position(&self) -> [f32; 3] {
        [self.pos_progress[0], self.pos_progress[1], self.pos_progress[2]]
    }

    pub fn progress(&self) -> f32 {
        self.pos_progress[3]
    }
}

/// Per-binding uniforms for a shader that evaluates the blend itself
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ChoreoUniforms {
    pub scene_progress: f32,
    pub shape_transition: f32,
    pub stagger: f32,
    /// Index into the easing list, in declaration order
    pub easing: u32,
}

impl ChoreoUniforms {
    pub fn from_choreography(choreo: &Choreography) -> Self {
        let settings = choreo.settings();
        Self {
            scene_progress: choreo.scene_progress(),
            shape_transition: choreo.shape_transition(),
            stagger: settings.stagger,
            easing: settings.easing.ordinal(),
        }
    }
}

/// Static tables a GPU variant uploads once per regeneration.
///
/// `targets` rows are `[x, y, z, delay]`; `scatter` rows are `[x, y, z, 0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuTables {
    pub targets: Vec<[f32; 4]>,
    pub scatter: Vec<[f32; 4]>,
}

impl GpuTables {
    pub fn from_choreography(choreo: &Choreography) -> Self {
        let targets = choreo
            .targets()
            .iter()
            .zip(choreo.delays())
            .map(|(t, d)| [t.x, t.y, t.z, *d])
            .collect();
        let scatter = choreo
            .scatter_positions()
            .iter()
            .map(|s| [s.x, s.y, s.z, 0.0])
            .collect();
        Self { targets, scatter }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn target_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.targets)
    }

    pub fn scatter_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.scatter)
    }

    /// Fingerprint of the target/delay table alone
    pub fn target_fingerprint(&self) -> ContentHash {
        ContentHash::from_bytes(self.target_bytes())
    }

    /// Fingerprint of both tables
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::from_chunks([self.target_bytes(), self.scatter_bytes()])
    }
}
