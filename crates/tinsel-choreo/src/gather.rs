//! Gather shapes — per-entity start delays that choreograph assembly

use crate::target::LayoutParams;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::str::FromStr;
use tinsel_core::{Named, TinselError, Vec3};

/// Upper bound on any gather delay. Strictly below 1 so every entity still
/// finishes its motion by the time scene progress reaches 1.
pub const MAX_DELAY: f32 = 0.85;

/// Delay span of the single-axis policies (stack, implode, waterfall, wave)
pub const AXIS_DELAY: f32 = 0.7;

const SPIRAL_HEIGHT_WEIGHT: f32 = 0.6;
const SPIRAL_ANGLE_WEIGHT: f32 = 0.25;

/// Policy deciding when each entity starts moving during assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatherShape {
    /// Everyone moves at once
    #[default]
    Direct,
    /// Bottom first, building up from the ground
    Stack,
    /// Helical fill order: height plus angle around the trunk
    SpiralIn,
    /// Outer entities first, near-axis entities last
    Implode,
    /// Top first, cascading down
    Waterfall,
    /// Left-to-right sweep along X
    Wave,
}

impl GatherShape {
    /// Start delay for an entity whose formed position is `target`.
    ///
    /// Always within `[0, MAX_DELAY]`.
    pub fn delay(self, target: Vec3, layout: &LayoutParams) -> f32 {
        let hn = layout.normalized_height(target.y);
        let raw = match self {
            GatherShape::Direct => 0.0,
            GatherShape::Stack => AXIS_DELAY * hn,
            GatherShape::SpiralIn => {
                let angle_norm = (target.z.atan2(target.x) + PI) / TAU;
                SPIRAL_HEIGHT_WEIGHT * hn + SPIRAL_ANGLE_WEIGHT * angle_norm
            }
            GatherShape::Implode => {
                let radial = (target.horizontal_length() / layout.base_radius).clamp(0.0, 1.0);
                AXIS_DELAY * (1.0 - radial)
            }
            GatherShape::Waterfall => AXIS_DELAY * (1.0 - hn),
            GatherShape::Wave => {
                let r = layout.base_radius;
                let xn = ((target.x + r) / (2.0 * r)).clamp(0.0, 1.0);
                AXIS_DELAY * xn
            }
        };
        if raw.is_finite() {
            raw.clamp(0.0, MAX_DELAY)
        } else {
            0.0
        }
    }

    /// Compute delays for every target into `out`
    pub fn fill(self, targets: &[Vec3], layout: &LayoutParams, out: &mut Vec<f32>) {
        out.clear();
        out.extend(targets.iter().map(|t| self.delay(*t, layout)));
    }
}

impl Named for GatherShape {
    const ALL: &'static [Self] = &[
        GatherShape::Direct,
        GatherShape::Stack,
        GatherShape::SpiralIn,
        GatherShape::Implode,
        GatherShape::Waterfall,
        GatherShape::Wave,
    ];

    fn name(&self) -> &'static str {
        match self {
            GatherShape::Direct => "direct",
            GatherShape::Stack => "stack",
            GatherShape::SpiralIn => "spiralIn",
            GatherShape::Implode => "implode",
            GatherShape::Waterfall => "waterfall",
            GatherShape::Wave => "wave",
        }
    }
}

impl FromStr for GatherShape {
    type Err = TinselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s)
    }
}
