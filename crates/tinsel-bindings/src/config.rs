//! Scene configuration loaded from TOML
//!
//! ```toml
//! [scene]
//! macro_state = "chaos"
//! scatter_shape = "sphere"
//! easing = "easeInOut"
//! speed = 1.0
//!
//! [layout]
//! height = 22.0
//! base_radius = 9.0
//!
//! [foliage]
//! count = 4000
//! gather_shape = "stack"
//! stagger = 0.5
//! ```
//!
//! Every field is optional. Category fields left out fall back to that
//! category's own defaults.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tinsel_choreo::{
    clamp_speed, ChoreoSettings, Easing, GatherShape, LayoutParams, MacroState, ScatterShape,
    MAX_ENTITIES,
};
use tinsel_core::{Named, Result};

/// Scene-wide knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSection {
    pub macro_state: MacroState,
    pub scatter_shape: ScatterShape,
    pub easing: Easing,
    pub speed: f32,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            macro_state: MacroState::Chaos,
            scatter_shape: ScatterShape::Sphere,
            easing: Easing::EaseInOut,
            speed: 1.0,
        }
    }
}

/// Per-category overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Signed so that negative counts in hand-written files clamp instead of failing to parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gather_shape: Option<GatherShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<String>,
}

impl CategoryConfig {
    /// Fully spelled-out defaults for a category
    pub fn defaults_for(category: Category) -> Self {
        Self {
            count: Some(category.default_count() as i64),
            gather_shape: Some(category.default_gather()),
            stagger: Some(category.default_stagger()),
            textures: Vec::new(),
        }
    }
}

/// A whole scene file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub scene: SceneSection,
    pub layout: LayoutParams,
    pub foliage: CategoryConfig,
    pub lights: CategoryConfig,
    pub ornaments: CategoryConfig,
    pub gifts: CategoryConfig,
    pub photos: CategoryConfig,
}

impl SceneConfig {
    /// Config with every category's defaults written out, as `tinsel init` emits it
    pub fn template() -> Self {
        Self {
            foliage: CategoryConfig::defaults_for(Category::Foliage),
            lights: CategoryConfig::defaults_for(Category::Lights),
            ornaments: CategoryConfig::defaults_for(Category::Ornaments),
            gifts: CategoryConfig::defaults_for(Category::Gifts),
            photos: CategoryConfig::defaults_for(Category::Photos),
            ..Self::default()
        }
    }

    /// Parse from a TOML string. Values are not sanitized; see [`SceneConfig::sanitize`].
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load, parse and sanitize a scene file, logging every adjustment
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&source)?;
        let warnings = config.sanitize();
        for w in &warnings {
            log::warn!("{}: {}", path.display(), w);
        }
        log::info!(
            "Loaded scene config {} ({} adjustment(s))",
            path.display(),
            warnings.len()
        );
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn category(&self, category: Category) -> &CategoryConfig {
        match category {
            Category::Foliage => &self.foliage,
            Category::Lights => &self.lights,
            Category::Ornaments => &self.ornaments,
            Category::Gifts => &self.gifts,
            Category::Photos => &self.photos,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut CategoryConfig {
        match category {
            Category::Foliage => &mut self.foliage,
            Category::Lights => &mut self.lights,
            Category::Ornaments => &mut self.ornaments,
            Category::Gifts => &mut self.gifts,
            Category::Photos => &mut self.photos,
        }
    }

    /// Clamp every value into its safe range. Returns one message per change.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        let speed = clamp_speed(self.scene.speed);
        if speed != self.scene.speed {
            warnings.push(format!("scene.speed {} clamped to {}", self.scene.speed, speed));
            self.scene.speed = speed;
        }

        let layout = self.layout.sanitized();
        if layout != self.layout {
            warnings.push(format!(
                "layout {}x{} replaced with {}x{}",
                self.layout.height, self.layout.base_radius, layout.height, layout.base_radius
            ));
            self.layout = layout;
        }

        for category in Category::ALL {
            let name = category.name();
            let section = self.category_mut(*category);

            if let Some(count) = section.count {
                let clamped = count.clamp(0, MAX_ENTITIES as i64);
                if clamped != count {
                    warnings.push(format!("{name}.count {count} clamped to {clamped}"));
                    section.count = Some(clamped);
                }
            }

            if let Some(k) = section.stagger {
                let clamped = if k.is_finite() {
                    k.clamp(0.0, 1.0)
                } else {
                    category.default_stagger()
                };
                if clamped != k {
                    warnings.push(format!("{name}.stagger {k} clamped to {clamped}"));
                    section.stagger = Some(clamped);
                }
            }

            if !section.textures.is_empty() && !category.is_focusable() {
                warnings.push(format!("{name}.textures ignored; only photos carry textures"));
                section.textures.clear();
            }
        }

        warnings
    }

    /// Resolve the engine settings for one category
    pub fn settings_for(&self, category: Category) -> ChoreoSettings {
        let section = self.category(category);
        let count = section
            .count
            .map(|c| c.clamp(0, MAX_ENTITIES as i64) as u32)
            .unwrap_or_else(|| category.default_count());
        ChoreoSettings {
            count,
            target_shape: category.target_shape(),
            layout: self.layout,
            gather_shape: section.gather_shape.unwrap_or_else(|| category.default_gather()),
            scatter_shape: self.scene.scatter_shape,
            easing: self.scene.easing,
            speed: self.scene.speed,
            stagger: section.stagger.unwrap_or_else(|| category.default_stagger()),
            initial_state: self.scene.macro_state,
        }
        .sanitized()
    }

    pub fn textures_for(&self, category: Category) -> &[String] {
        &self.category(category).textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SceneConfig::from_toml("").unwrap();
        assert_eq!(config, SceneConfig::default());
        let s = config.settings_for(Category::Photos);
        assert_eq!(s.count, 24);
        assert_eq!(s.stagger, 1.0);
        assert_eq!(s.layout, LayoutParams::new(22.0, 9.0));
    }

    #[test]
    fn parse_full_scene() {
        let toml_str = r#"
[scene]
macro_state = "formed"
scatter_shape = "ring"
easing = "bounce"
speed = 2.0

[layout]
height = 30.0
base_radius = 12.0

[foliage]
count = 1200
gather_shape = "waterfall"

[photos]
count = 6
textures = ["a.png", "b.png"]
"#;
        let config = SceneConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.scene.macro_state, MacroState::Formed);
        assert_eq!(config.scene.scatter_shape, ScatterShape::Ring);
        assert_eq!(config.scene.easing, Easing::Bounce);

        let foliage = config.settings_for(Category::Foliage);
        assert_eq!(foliage.count, 1200);
        assert_eq!(foliage.gather_shape, GatherShape::Waterfall);
        assert_eq!(foliage.stagger, 0.5);
        assert_eq!(foliage.layout.height, 30.0);
        assert_eq!(foliage.speed, 2.0);

        // unspecified fields keep the category's own defaults
        let lights = config.settings_for(Category::Lights);
        assert_eq!(lights.count, 300);
        assert_eq!(lights.gather_shape, GatherShape::SpiralIn);

        assert_eq!(config.textures_for(Category::Photos).len(), 2);
    }

    #[test]
    fn sanitize_clamps_and_reports() {
        let toml_str = r#"
[scene]
speed = 12.0

[layout]
height = -4.0
base_radius = 9.0

[gifts]
count = -5
stagger = 3.0

[lights]
textures = ["x.png"]
"#;
        let mut config = SceneConfig::from_toml(toml_str).unwrap();
        let warnings = config.sanitize();
        assert_eq!(warnings.len(), 5);
        assert_eq!(config.scene.speed, 3.0);
        assert_eq!(config.layout, LayoutParams::default());
        assert_eq!(config.gifts.count, Some(0));
        assert_eq!(config.gifts.stagger, Some(1.0));
        assert!(config.lights.textures.is_empty());

        // idempotent
        assert!(config.sanitize().is_empty());
    }

    #[test]
    fn huge_count_is_clamped() {
        let mut config = SceneConfig::from_toml("[foliage]\ncount = 5000000\n").unwrap();
        config.sanitize();
        assert_eq!(config.foliage.count, Some(MAX_ENTITIES as i64));
    }

    #[test]
    fn unknown_enum_is_an_error() {
        let err = SceneConfig::from_toml("[scene]\nscatter_shape = \"cube\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn template_round_trips_through_toml() {
        let template = SceneConfig::template();
        let text = template.to_toml().unwrap();
        assert!(text.contains("[foliage]"));
        assert!(text.contains("gather_shape = \"spiralIn\""));
        let parsed = SceneConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("tinsel-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[scene]\nspeed = 0.0\n").unwrap();
        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.scene.speed, 0.3);
        std::fs::remove_file(&path).ok();

        assert!(SceneConfig::load("/nonexistent/scene.toml").is_err());
    }
}
