//! Scatter shapes — procedural layouts for the chaotic state
//!
//! Each generator is a pure function of `(index, count)`. All randomness
//! comes from the deterministic sampler keyed off the index, so regenerating
//! a layout reproduces it bit for bit.

use crate::sampler::KeyedSampler;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::str::FromStr;
use tinsel_core::{Named, TinselError, Vec3};

/// Samples drawn per entity by any scatter generator
const STRIDE: u32 = 4;
const PHASE: f64 = 0.0;

pub const SPHERE_RADIUS: f32 = 25.0;

pub const EXPLOSION_INNER: f32 = 20.0;
pub const EXPLOSION_OUTER: f32 = 35.0;

pub const SPIRAL_TURNS: f32 = 5.0;
pub const SPIRAL_BOTTOM: f32 = -15.0;
pub const SPIRAL_TOP: f32 = 25.0;
pub const SPIRAL_RADIUS_START: f32 = 4.0;
pub const SPIRAL_RADIUS_END: f32 = 24.0;

pub const RAIN_HALF_SPREAD: f32 = 30.0;
pub const RAIN_FLOOR: f32 = 25.0;
pub const RAIN_CEILING: f32 = 50.0;

pub const RING_INNER: f32 = 18.0;
pub const RING_OUTER: f32 = 30.0;
pub const RING_HALF_HEIGHT: f32 = 3.0;

/// Spatial distribution used for the chaotic state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScatterShape {
    /// Volumetric cloud around the origin
    #[default]
    Sphere,
    /// Radial shell, biased toward its outer radius
    Explosion,
    /// Helix climbing in Y with growing radius
    Spiral,
    /// Wide sheet suspended high above the scene
    Rain,
    /// Annulus with bounded vertical jitter
    Ring,
}

impl ScatterShape {
    /// Position of entity `index` out of `count` in this layout
    pub fn position(self, index: u32, count: u32) -> Vec3 {
        let mut s = KeyedSampler::new(index, STRIDE, PHASE);
        match self {
            ScatterShape::Sphere => {
                let dir = unit_direction(&mut s);
                // cbrt gives uniform density by volume
                let r = SPHERE_RADIUS * s.next_f32().cbrt();
                dir * r
            }
            ScatterShape::Explosion => {
                let dir = unit_direction(&mut s);
                let r = EXPLOSION_INNER + (EXPLOSION_OUTER - EXPLOSION_INNER) * s.next_f32().sqrt();
                dir * r
            }
            ScatterShape::Spiral => {
                let t = (index as f32 + 0.5) / count.max(1) as f32;
                let angle = t * SPIRAL_TURNS * TAU + s.jitter(0.05);
                let radius =
                    SPIRAL_RADIUS_START + (SPIRAL_RADIUS_END - SPIRAL_RADIUS_START) * t + s.jitter(0.75);
                let y = SPIRAL_BOTTOM + (SPIRAL_TOP - SPIRAL_BOTTOM) * t + s.jitter(0.5);
                Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
            }
            ScatterShape::Rain => {
                let x = s.jitter(RAIN_HALF_SPREAD);
                let z = s.jitter(RAIN_HALF_SPREAD);
                let y = s.range(RAIN_FLOOR, RAIN_CEILING);
                Vec3::new(x, y, z)
            }
            ScatterShape::Ring => {
                let angle = s.angle();
                let radius = s.range(RING_INNER, RING_OUTER);
                let y = s.jitter(RING_HALF_HEIGHT);
                Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
            }
        }
    }

    /// Generate the whole layout into `out`, resizing it to `count`
    pub fn fill(self, count: u32, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend((0..count).map(|i| self.position(i, count)));
    }
}

/// Uniform direction on the unit sphere from two samples
fn unit_direction(s: &mut KeyedSampler) -> Vec3 {
    let theta = s.angle();
    let cos_phi = s.next_f32() * 2.0 - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin())
}

impl Named for ScatterShape {
    const ALL: &'static [Self] = &[
        ScatterShape::Sphere,
        ScatterShape::Explosion,
        ScatterShape::Spiral,
        ScatterShape::Rain,
        ScatterShape::Ring,
    ];

    fn name(&self) -> &'static str {
        match self {
            ScatterShape::Sphere => "sphere",
            ScatterShape::Explosion => "explosion",
            ScatterShape::Spiral => "spiral",
            ScatterShape::Rain => "rain",
            ScatterShape::Ring => "ring",
        }
    }
}

impl FromStr for ScatterShape {
    type Err = TinselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(shape: ScatterShape, count: u32) -> Vec<Vec3> {
        let mut out = Vec::new();
        shape.fill(count, &mut out);
        out
    }

    #[test]
    fn positions_are_deterministic() {
        for shape in ScatterShape::ALL {
            let a = layout(*shape, 200);
            let b = layout(*shape, 200);
            for (p, q) in a.iter().zip(&b) {
                assert_eq!(p.to_array().map(f32::to_bits), q.to_array().map(f32::to_bits));
            }
        }
    }

    #[test]
    fn ring_radius_within_band() {
        for p in layout(ScatterShape::Ring, 50) {
            let r = p.horizontal_length();
            assert!((17.9..=30.1).contains(&r), "ring radius {r}");
            assert!(p.y.abs() <= RING_HALF_HEIGHT);
        }
    }

    #[test]
    fn ring_points_are_distinct() {
        let points = layout(ScatterShape::Ring, 50);
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert!(
                    points[i].distance(&points[j]) > 1e-3,
                    "entities {i} and {j} coincide"
                );
            }
        }
    }

    #[test]
    fn sphere_stays_inside_radius() {
        for p in layout(ScatterShape::Sphere, 500) {
            assert!(p.length() <= SPHERE_RADIUS + 1e-3);
        }
    }

    #[test]
    fn explosion_is_a_shell() {
        for p in layout(ScatterShape::Explosion, 500) {
            let r = p.length();
            assert!(r >= EXPLOSION_INNER - 1e-3 && r <= EXPLOSION_OUTER + 1e-3, "radius {r}");
        }
    }

    #[test]
    fn spiral_climbs_with_index() {
        let points = layout(ScatterShape::Spiral, 400);
        let first: f32 = points[..50].iter().map(|p| p.y).sum::<f32>() / 50.0;
        let last: f32 = points[350..].iter().map(|p| p.y).sum::<f32>() / 50.0;
        assert!(last > first + 20.0);
        assert!(points[399].horizontal_length() > points[0].horizontal_length());
    }

    #[test]
    fn spiral_neighbours_stay_close() {
        let points = layout(ScatterShape::Spiral, 1000);
        for w in points.windows(2) {
            assert!(w[0].distance(&w[1]) < 5.0);
        }
    }

    #[test]
    fn rain_hangs_above_scene() {
        for p in layout(ScatterShape::Rain, 300) {
            assert!(p.y >= RAIN_FLOOR && p.y < RAIN_CEILING);
            assert!(p.x.abs() <= RAIN_HALF_SPREAD && p.z.abs() <= RAIN_HALF_SPREAD);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(layout(ScatterShape::Spiral, 0).is_empty());
    }

    #[test]
    fn parse_names() {
        assert_eq!("ring".parse::<ScatterShape>().unwrap(), ScatterShape::Ring);
        assert_eq!("Explosion".parse::<ScatterShape>().unwrap(), ScatterShape::Explosion);
        assert!("cube".parse::<ScatterShape>().is_err());
    }
}
