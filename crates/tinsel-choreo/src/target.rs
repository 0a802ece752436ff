//! Target shapes — the formed (tree) layout for each entity role

use crate::sampler::KeyedSampler;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tinsel_core::Vec3;

const STRIDE: u32 = 4;
/// Keeps target streams apart from the scatter streams of the same index
const PHASE: f64 = 0.5;

/// Golden angle in radians, π(3 − √5)
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Fraction of the tree height that photo bands cover, from the bottom
const BAND_FLOOR: f32 = 0.08;
const BAND_SPAN: f32 = 0.8;

pub const DEFAULT_HEIGHT: f32 = 22.0;
pub const DEFAULT_BASE_RADIUS: f32 = 9.0;

/// Dimensions of the formed silhouette: a cone centered on the origin,
/// spanning `y ∈ [-height/2, height/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub height: f32,
    pub base_radius: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            base_radius: DEFAULT_BASE_RADIUS,
        }
    }
}

impl LayoutParams {
    pub fn new(height: f32, base_radius: f32) -> Self {
        Self {
            height,
            base_radius,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.height.is_finite()
            && self.height > 0.0
            && self.base_radius.is_finite()
            && self.base_radius > 0.0
    }

    /// Replace non-finite or non-positive dimensions with the defaults
    pub fn sanitized(self) -> Self {
        let height = if self.height.is_finite() && self.height > 0.0 {
            self.height
        } else {
            DEFAULT_HEIGHT
        };
        let base_radius = if self.base_radius.is_finite() && self.base_radius > 0.0 {
            self.base_radius
        } else {
            DEFAULT_BASE_RADIUS
        };
        Self {
            height,
            base_radius,
        }
    }

    pub fn floor_y(&self) -> f32 {
        -self.height * 0.5
    }

    /// Height above the floor as a fraction of the tree height, clamped to [0, 1]
    pub fn normalized_height(&self, y: f32) -> f32 {
        ((y - self.floor_y()) / self.height).clamp(0.0, 1.0)
    }

    /// Cone radius at a normalized height
    pub fn radius_at(&self, height_norm: f32) -> f32 {
        self.base_radius * (1.0 - height_norm.clamp(0.0, 1.0))
    }
}

/// How a category arranges its entities in the formed state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetShape {
    /// Filled cone; foliage
    ConeVolume,
    /// On the cone surface, pulled `inset` units toward the axis
    ConeSurface { inset: f32 },
    /// Golden-angle sweep with even height bands, `offset` units outside the surface
    GoldenBands { offset: f32 },
    /// Around the foot of the tree, radius as a fraction of the base radius
    GroundRing { inner: f32, outer: f32 },
}

impl Default for TargetShape {
    fn default() -> Self {
        TargetShape::ConeVolume
    }
}

impl TargetShape {
    /// Formed position of entity `index` out of `count`
    pub fn position(&self, index: u32, count: u32, layout: &LayoutParams) -> Vec3 {
        let mut s = KeyedSampler::new(index, STRIDE, PHASE);
        match *self {
            TargetShape::ConeVolume => {
                let hn = s.next_f32();
                let angle = s.angle();
                // sqrt spreads points evenly over each horizontal disc
                let dist = layout.radius_at(hn) * s.next_f32().sqrt();
                cone_point(layout, hn, angle, dist)
            }
            TargetShape::ConeSurface { inset } => {
                let hn = s.next_f32();
                let angle = s.angle();
                let dist = (layout.radius_at(hn) - inset).max(0.0);
                cone_point(layout, hn, angle, dist)
            }
            TargetShape::GoldenBands { offset } => {
                let t = (index as f32 + 0.5) / count.max(1) as f32;
                let hn = BAND_FLOOR + BAND_SPAN * t;
                let angle = (index as f32 * GOLDEN_ANGLE) % TAU;
                let dist = layout.radius_at(hn) + offset;
                cone_point(layout, hn, angle, dist)
            }
            TargetShape::GroundRing { inner, outer } => {
                let angle = s.angle();
                let frac = s.range(inner, outer);
                let dist = layout.base_radius * frac;
                Vec3::new(angle.cos() * dist, layout.floor_y(), angle.sin() * dist)
            }
        }
    }

    /// Generate the whole layout into `out`, resizing it to `count`
    pub fn fill(&self, count: u32, layout: &LayoutParams, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend((0..count).map(|i| self.position(i, count, layout)));
    }
}

fn cone_point(layout: &LayoutParams, hn: f32, angle: f32, dist: f32) -> Vec3 {
    Vec3::new(
        angle.cos() * dist,
        layout.floor_y() + hn * layout.height,
        angle.sin() * dist,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LayoutParams {
        LayoutParams::new(22.0, 9.0)
    }

    fn generate(shape: TargetShape, count: u32) -> Vec<Vec3> {
        let mut out = Vec::new();
        shape.fill(count, &layout(), &mut out);
        out
    }

    #[test]
    fn cone_volume_inside_silhouette() {
        let l = layout();
        for p in generate(TargetShape::ConeVolume, 1000) {
            assert!(p.y >= -11.0 && p.y <= 11.0);
            let hn = l.normalized_height(p.y);
            assert!(p.horizontal_length() <= l.radius_at(hn) + 1e-3);
        }
    }

    #[test]
    fn cone_volume_radius_shrinks_toward_apex() {
        let points = generate(TargetShape::ConeVolume, 2000);
        let low: Vec<_> = points.iter().filter(|p| p.y < -6.0).collect();
        let high: Vec<_> = points.iter().filter(|p| p.y > 6.0).collect();
        let max_low = low.iter().map(|p| p.horizontal_length()).fold(0.0, f32::max);
        let max_high = high.iter().map(|p| p.horizontal_length()).fold(0.0, f32::max);
        assert!(max_low > max_high);
    }

    #[test]
    fn cone_surface_hugs_surface() {
        let l = layout();
        for p in generate(TargetShape::ConeSurface { inset: 0.2 }, 300) {
            let expected = (l.radius_at(l.normalized_height(p.y)) - 0.2).max(0.0);
            assert!((p.horizontal_length() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn golden_bands_never_share_a_height() {
        let points = generate(TargetShape::GoldenBands { offset: 0.5 }, 24);
        for w in points.windows(2) {
            assert!(w[1].y > w[0].y + 0.5, "bands overlap");
        }
        let l = layout();
        assert!(points[0].y > l.floor_y());
        assert!(points[23].y < -l.floor_y());
    }

    #[test]
    fn golden_bands_rotate_by_golden_angle() {
        let points = generate(TargetShape::GoldenBands { offset: 0.0 }, 10);
        let a0 = points[1].z.atan2(points[1].x);
        let expected = GOLDEN_ANGLE;
        let diff = (a0 - expected).rem_euclid(TAU);
        assert!(diff < 1e-3 || (TAU - diff) < 1e-3);
    }

    #[test]
    fn ground_ring_sits_on_floor() {
        let l = layout();
        for p in generate(TargetShape::GroundRing { inner: 0.35, outer: 1.25 }, 100) {
            assert_eq!(p.y, l.floor_y());
            let r = p.horizontal_length();
            assert!(r >= 0.35 * 9.0 - 1e-3 && r <= 1.25 * 9.0 + 1e-3);
        }
    }

    #[test]
    fn targets_are_deterministic() {
        let a = generate(TargetShape::ConeVolume, 100);
        let b = generate(TargetShape::ConeVolume, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn sanitize_replaces_bad_dimensions() {
        let l = LayoutParams::new(f32::NAN, -3.0).sanitized();
        assert_eq!(l, LayoutParams::default());
        let ok = LayoutParams::new(10.0, 4.0).sanitized();
        assert_eq!(ok, LayoutParams::new(10.0, 4.0));
        assert!(!LayoutParams::new(0.0, 4.0).is_valid());
    }

    #[test]
    fn target_shape_from_toml() {
        #[derive(Deserialize)]
        struct Wrap {
            target: TargetShape,
        }
        let w: Wrap = toml::from_str("target = { kind = \"cone_surface\", inset = 0.3 }").unwrap();
        assert_eq!(w.target, TargetShape::ConeSurface { inset: 0.3 });
    }
}
