//! Visual entity categories and their defaults

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tinsel_choreo::{GatherShape, TargetShape};
use tinsel_core::{Named, TinselError};

/// One family of visual entities, each driven by its own choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Foliage,
    Lights,
    Ornaments,
    Gifts,
    Photos,
}

impl Category {
    pub fn default_count(self) -> u32 {
        match self {
            Category::Foliage => 4000,
            Category::Lights => 300,
            Category::Ornaments => 180,
            Category::Gifts => 40,
            Category::Photos => 24,
        }
    }

    pub fn target_shape(self) -> TargetShape {
        match self {
            Category::Foliage => TargetShape::ConeVolume,
            Category::Lights => TargetShape::ConeSurface { inset: 0.15 },
            Category::Ornaments => TargetShape::ConeSurface { inset: 0.4 },
            Category::Gifts => TargetShape::GroundRing {
                inner: 0.35,
                outer: 1.25,
            },
            Category::Photos => TargetShape::GoldenBands { offset: 0.6 },
        }
    }

    pub fn default_gather(self) -> GatherShape {
        match self {
            Category::Foliage | Category::Ornaments => GatherShape::Stack,
            Category::Lights => GatherShape::SpiralIn,
            Category::Gifts => GatherShape::Direct,
            Category::Photos => GatherShape::SpiralIn,
        }
    }

    /// Stagger compression constant `k`
    pub fn default_stagger(self) -> f32 {
        match self {
            Category::Photos => 1.0,
            _ => 0.5,
        }
    }

    /// Colors decorations are drawn from, as 0xRRGGBB
    pub fn palette(self) -> &'static [u32] {
        match self {
            Category::Foliage => &[0x0B5D1E, 0x138A36, 0x1F6F3A, 0x2E8B57],
            Category::Lights => &[0xFFE8A3, 0xFFD166, 0xFFF4E0],
            Category::Ornaments => &[0xC1121F, 0xD4AF37, 0x1D3557, 0xE9ECEF],
            Category::Gifts => &[0xB5179E, 0x3A86FF, 0xFB5607, 0x2A9D8F],
            Category::Photos => &[0xFFFFFF],
        }
    }

    /// Scale range `[min, max)` for decorations
    pub fn scale_range(self) -> (f32, f32) {
        match self {
            Category::Foliage => (0.6, 1.0),
            Category::Lights => (0.3, 0.5),
            Category::Ornaments => (0.5, 0.9),
            Category::Gifts => (0.8, 1.6),
            Category::Photos => (1.0, 1.0),
        }
    }

    /// Whether entities of this category can be pulled out for a close-up
    pub fn is_focusable(self) -> bool {
        matches!(self, Category::Photos)
    }
}

impl Named for Category {
    const ALL: &'static [Self] = &[
        Category::Foliage,
        Category::Lights,
        Category::Ornaments,
        Category::Gifts,
        Category::Photos,
    ];

    fn name(&self) -> &'static str {
        match self {
            Category::Foliage => "foliage",
            Category::Lights => "lights",
            Category::Ornaments => "ornaments",
            Category::Gifts => "gifts",
            Category::Photos => "photos",
        }
    }
}

impl FromStr for Category {
    type Err = TinselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_name(s).map_err(|_| TinselError::UnknownCategory(s.to_string()))
    }
}
