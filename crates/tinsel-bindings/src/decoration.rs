//! Per-entity decoration table: color, scale, spin seed, texture

use crate::category::Category;
use tinsel_choreo::KeyedSampler;
use tinsel_core::Color;

const STRIDE: u32 = 4;
/// Keeps decoration streams apart from the scatter and target streams
const PHASE: f64 = 0.25;

/// Static look of one entity, fixed for the life of the binding
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub color: Color,
    pub scale: f32,
    /// In [0, 1); the renderer maps it to an initial spin
    pub rotation_seed: f32,
    /// Index into the binding's texture list (photos only)
    pub texture: Option<usize>,
}

impl Decoration {
    pub fn generate(category: Category, index: u32, texture_count: usize) -> Self {
        let mut s = KeyedSampler::new(index, STRIDE, PHASE);
        let palette = category.palette();
        let pick = (s.next_f32() * palette.len() as f32) as usize;
        let color = Color::from_hex(palette[pick.min(palette.len() - 1)]);
        let (lo, hi) = category.scale_range();
        let scale = s.range(lo, hi);
        let rotation_seed = s.next_f32();
        let texture = (texture_count > 0).then(|| index as usize % texture_count);
        Self {
            color,
            scale,
            rotation_seed,
            texture,
        }
    }
}

/// Build the table for `count` entities
pub fn decorate(category: Category, count: u32, texture_count: usize) -> Vec<Decoration> {
    (0..count)
        .map(|i| Decoration::generate(category, i, texture_count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinsel_core::Named;

    #[test]
    fn decorations_are_deterministic() {
        let a = decorate(Category::Ornaments, 100, 0);
        let b = decorate(Category::Ornaments, 100, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn colors_come_from_palette() {
        for category in Category::ALL {
            let palette: Vec<Color> = category.palette().iter().map(|h| Color::from_hex(*h)).collect();
            for d in decorate(*category, 200, 0) {
                assert!(palette.contains(&d.color));
                let (lo, hi) = category.scale_range();
                assert!(d.scale >= lo && d.scale <= hi);
                assert!((0.0..1.0).contains(&d.rotation_seed));
            }
        }
    }

    #[test]
    fn photo_textures_cycle() {
        let table = decorate(Category::Photos, 7, 3);
        let textures: Vec<_> = table.iter().map(|d| d.texture).collect();
        assert_eq!(
            textures,
            vec![Some(0), Some(1), Some(2), Some(0), Some(1), Some(2), Some(0)]
        );
        assert!(decorate(Category::Photos, 3, 0).iter().all(|d| d.texture.is_none()));
    }
}
