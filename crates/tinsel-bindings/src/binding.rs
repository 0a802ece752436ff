//! One category's entities: choreography, decorations, focus override, instances

use crate::category::Category;
use crate::config::SceneConfig;
use crate::decoration::{decorate, Decoration};
use crate::projector::ScreenProjector;
use serde::Serialize;
use tinsel_choreo::easing::ease_in_out_cubic;
use tinsel_choreo::{
    ChoreoSettings, Choreography, EntityInstance, FrameInput, GatherShape, GpuTables, LayoutParams,
};
use tinsel_core::{Named, Result, TinselError, Vec3};

/// Focus blend advance per second
pub const FOCUS_RATE: f32 = 2.5;
/// Scale multiplier of a fully focused entity
pub const FOCUS_SCALE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Focus {
    index: u32,
    anchor: Vec3,
    blend: f32,
}

/// Summary of a binding's current frame, for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingStats {
    pub category: String,
    pub count: u32,
    pub scene_progress: f32,
    pub shape_transition: f32,
    pub mean_progress: f32,
    pub min_progress: f32,
    pub max_progress: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

/// Adapter from one [`Choreography`] to a renderable category
pub struct Binding {
    category: Category,
    choreo: Choreography,
    decorations: Vec<Decoration>,
    textures: Vec<String>,
    instances: Vec<EntityInstance>,
    /// Entity moving toward (or resting at) the focus anchor
    focus: Option<Focus>,
    /// Previously focused entities on their way back
    releasing: Vec<Focus>,
}

impl Binding {
    pub fn new(category: Category, settings: ChoreoSettings, textures: Vec<String>) -> Self {
        let choreo = Choreography::new(settings);
        let decorations = decorate(category, choreo.count(), textures.len());
        log::debug!(
            "[bindings] {} binding with {} entities ({} textures)",
            category.name(),
            choreo.count(),
            textures.len()
        );
        let mut binding = Self {
            category,
            choreo,
            decorations,
            textures,
            instances: Vec::new(),
            focus: None,
            releasing: Vec::new(),
        };
        binding.pack_instances();
        binding
    }

    /// Binding with the category's built-in defaults
    pub fn with_defaults(category: Category) -> Self {
        Self::from_config(category, &SceneConfig::default())
    }

    pub fn from_config(category: Category, config: &SceneConfig) -> Self {
        Self::new(
            category,
            config.settings_for(category),
            config.textures_for(category).to_vec(),
        )
    }

    // ── Per-frame ──

    pub fn update(&mut self, input: &FrameInput) {
        self.choreo.apply(input);
        let dt = if input.delta_seconds.is_finite() {
            input.delta_seconds.max(0.0)
        } else {
            0.0
        };
        self.advance_focus(dt);
        self.pack_instances();
    }

    fn advance_focus(&mut self, dt: f32) {
        let step = dt * FOCUS_RATE;
        if let Some(f) = self.focus.as_mut() {
            f.blend = (f.blend + step).min(1.0);
        }
        for r in &mut self.releasing {
            r.blend = (r.blend - step).max(0.0);
        }
        self.releasing.retain(|r| r.blend > 0.0);
    }

    /// Rebuild the packed instance buffer from the current frame
    pub fn pack_instances(&mut self) {
        self.instances.clear();
        let progress = self.choreo.progress();
        for (i, deco) in self.decorations.iter().enumerate() {
            let index = i as u32;
            let weight = self.focus_weight(index);
            let position = self.position(index).unwrap_or(Vec3::ZERO);
            let scale = deco.scale * (1.0 + (FOCUS_SCALE - 1.0) * weight);
            self.instances.push(EntityInstance::new(
                position.to_array(),
                progress[i],
                deco.color,
                scale,
            ));
        }
    }

    // ── Focus override ──

    /// Pull one entity out to `anchor`. Any previously focused entity eases back.
    pub fn focus(&mut self, index: u32, anchor: Vec3) -> Result<()> {
        if !self.category.is_focusable() {
            return Err(TinselError::NotFocusable(self.category.name().to_string()));
        }
        if index >= self.count() {
            return Err(TinselError::EntityOutOfRange {
                index,
                count: self.count(),
            });
        }
        if let Some(current) = self.focus {
            if current.index == index {
                self.set_focus_anchor(anchor);
                return Ok(());
            }
            self.releasing.push(current);
        }
        // Re-focusing an entity that is still returning resumes from its blend
        let blend = match self.releasing.iter().position(|r| r.index == index) {
            Some(i) => self.releasing.swap_remove(i).blend,
            None => 0.0,
        };
        log::debug!("[bindings] {} focus -> {}", self.category.name(), index);
        self.focus = Some(Focus {
            index,
            anchor,
            blend,
        });
        Ok(())
    }

    /// Let the focused entity ease back into the choreography
    pub fn release_focus(&mut self) {
        if let Some(f) = self.focus.take() {
            log::debug!("[bindings] {} focus released", self.category.name());
            self.releasing.push(f);
        }
    }

    /// Move the focus anchor, e.g. when the camera orbits
    pub fn set_focus_anchor(&mut self, anchor: Vec3) {
        if let Some(f) = self.focus.as_mut() {
            f.anchor = anchor;
        }
    }

    pub fn focused(&self) -> Option<u32> {
        self.focus.map(|f| f.index)
    }

    /// Eased focus weight of one entity in [0, 1]
    pub fn focus_weight(&self, index: u32) -> f32 {
        self.focus_of(index).map(|f| ease_in_out_cubic(f.blend)).unwrap_or(0.0)
    }

    fn focus_of(&self, index: u32) -> Option<&Focus> {
        self.focus.iter().chain(&self.releasing).find(|f| f.index == index)
    }

    // ── Queries ──

    /// Final position of one entity, including any focus override
    pub fn position(&self, index: u32) -> Option<Vec3> {
        let base = self.choreo.position(index)?;
        let overridden = self
            .focus_of(index)
            .map(|f| base.lerp(&f.anchor, ease_in_out_cubic(f.blend)));
        Some(overridden.unwrap_or(base))
    }

    /// Entity whose projected position is closest to `screen_point`, within
    /// `max_pixels`. Entities behind the camera are skipped.
    pub fn nearest_entity_to<P>(
        &self,
        screen_point: [f32; 2],
        projector: &P,
        max_pixels: f32,
    ) -> Option<u32>
    where
        P: ScreenProjector + ?Sized,
    {
        let mut best: Option<(u32, f32)> = None;
        for index in 0..self.count() {
            let Some(world) = self.position(index) else {
                continue;
            };
            let Some([x, y]) = projector.project(world) else {
                continue;
            };
            let d = ((x - screen_point[0]).powi(2) + (y - screen_point[1]).powi(2)).sqrt();
            if d <= max_pixels && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((index, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn stats(&self) -> BindingStats {
        let progress = self.choreo.progress();
        let count = self.count();
        let (mut min_p, mut max_p, mut sum) = (f32::MAX, f32::MIN, 0.0f64);
        for p in progress {
            min_p = min_p.min(*p);
            max_p = max_p.max(*p);
            sum += *p as f64;
        }
        let mut lo = Vec3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut hi = Vec3::new(f32::MIN, f32::MIN, f32::MIN);
        for i in 0..count {
            if let Some(p) = self.position(i) {
                lo = Vec3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z));
                hi = Vec3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z));
            }
        }
        if count == 0 {
            (min_p, max_p) = (0.0, 0.0);
            (lo, hi) = (Vec3::ZERO, Vec3::ZERO);
        }
        BindingStats {
            category: self.category.name().to_string(),
            count,
            scene_progress: self.choreo.scene_progress(),
            shape_transition: self.choreo.shape_transition(),
            mean_progress: if count == 0 { 0.0 } else { (sum / count as f64) as f32 },
            min_progress: min_p,
            max_progress: max_p,
            bounds_min: lo,
            bounds_max: hi,
        }
    }

    // ── Reconfiguration ──

    /// Change the entity count; decorations are rebuilt and any focus dropped
    pub fn set_count(&mut self, count: u32) {
        self.choreo.set_count(count);
        self.decorations = decorate(self.category, self.choreo.count(), self.textures.len());
        self.focus = None;
        self.releasing.clear();
        self.pack_instances();
    }

    pub fn set_gather_shape(&mut self, shape: GatherShape) {
        self.choreo.set_gather_shape(shape);
        self.pack_instances();
    }

    pub fn set_layout(&mut self, layout: LayoutParams) {
        self.choreo.set_layout(layout);
        self.pack_instances();
    }

    // ── Accessors ──

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn count(&self) -> u32 {
        self.choreo.count()
    }

    pub fn choreography(&self) -> &Choreography {
        &self.choreo
    }

    pub fn choreography_mut(&mut self) -> &mut Choreography {
        &mut self.choreo
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    /// Texture path of one entity, if it carries one
    pub fn texture_of(&self, index: u32) -> Option<&str> {
        let t = self.decorations.get(index as usize)?.texture?;
        self.textures.get(t).map(String::as_str)
    }

    pub fn instances(&self) -> &[EntityInstance] {
        &self.instances
    }

    pub fn tables(&self) -> GpuTables {
        GpuTables::from_choreography(&self.choreo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::PerspectiveProjector;
    use tinsel_choreo::MacroState;

    const FRAME: f32 = 1.0 / 60.0;

    fn photos(count: u32) -> Binding {
        let settings = ChoreoSettings {
            count,
            target_shape: Category::Photos.target_shape(),
            gather_shape: GatherShape::SpiralIn,
            stagger: 1.0,
            initial_state: MacroState::Formed,
            ..Default::default()
        };
        Binding::new(
            Category::Photos,
            settings,
            vec!["a.png".into(), "b.png".into()],
        )
    }

    fn front_camera() -> PerspectiveProjector {
        PerspectiveProjector::look_at(
            Vec3::new(0.0, 0.0, 60.0),
            Vec3::ZERO,
            45.0,
            [800.0, 600.0],
            0.1,
            200.0,
        )
    }

    fn run(b: &mut Binding, state: MacroState, frames: usize) {
        let input = FrameInput::new(FRAME, state);
        for _ in 0..frames {
            b.update(&input);
        }
    }

    #[test]
    fn defaults_follow_category() {
        let b = Binding::with_defaults(Category::Gifts);
        assert_eq!(b.count(), 40);
        assert_eq!(b.instances().len(), 40);
        assert_eq!(b.choreography().settings().stagger, 0.5);
        assert_eq!(b.decorations().len(), 40);
    }

    #[test]
    fn instances_track_positions() {
        let mut b = photos(12);
        run(&mut b, MacroState::Chaos, 20);
        for (i, inst) in b.instances().iter().enumerate() {
            let p = b.position(i as u32).unwrap();
            assert_eq!(inst.position(), p.to_array());
            assert_eq!(inst.progress(), b.choreography().progress()[i]);
        }
    }

    #[test]
    fn focus_blends_to_anchor_and_back() {
        let mut b = photos(8);
        let anchor = Vec3::new(0.0, 5.0, 15.0);
        let home = b.position(3).unwrap();

        b.focus(3, anchor).unwrap();
        assert_eq!(b.focused(), Some(3));
        // zero blend on the frame focus starts
        assert_eq!(b.position(3).unwrap(), home);

        run(&mut b, MacroState::Formed, 60);
        assert!(b.position(3).unwrap().distance(&anchor) < 1e-4);
        assert!((b.instances()[3].color[3] - b.decorations()[3].scale * FOCUS_SCALE).abs() < 1e-4);

        b.release_focus();
        assert_eq!(b.focused(), None);
        let mut last = b.position(3).unwrap();
        for _ in 0..60 {
            run(&mut b, MacroState::Formed, 1);
            let p = b.position(3).unwrap();
            assert!(p.distance(&last) < 3.0, "focused entity jumped");
            last = p;
        }
        assert!(b.position(3).unwrap().distance(&home) < 1e-4);
        assert_eq!(b.focus_weight(3), 0.0);
    }

    #[test]
    fn switching_focus_returns_previous() {
        let mut b = photos(8);
        b.focus(1, Vec3::new(0.0, 0.0, 20.0)).unwrap();
        run(&mut b, MacroState::Formed, 30);
        let w1 = b.focus_weight(1);
        b.focus(2, Vec3::new(0.0, 0.0, 20.0)).unwrap();
        assert_eq!(b.focused(), Some(2));
        assert_eq!(b.focus_weight(1), w1);
        run(&mut b, MacroState::Formed, 60);
        assert_eq!(b.focus_weight(1), 0.0);
        assert_eq!(b.focus_weight(2), 1.0);
    }

    #[test]
    fn rapid_focus_switches_never_jump() {
        let mut b = photos(8);
        let anchor = Vec3::new(0.0, 0.0, 40.0);
        b.focus(1, anchor).unwrap();
        run(&mut b, MacroState::Formed, 60);

        let before: Vec<Vec3> = (0..8).map(|i| b.position(i).unwrap()).collect();
        b.focus(2, anchor).unwrap();
        run(&mut b, MacroState::Formed, 1);
        b.focus(3, anchor).unwrap();
        run(&mut b, MacroState::Formed, 1);
        let after: Vec<Vec3> = (0..8).map(|i| b.position(i).unwrap()).collect();
        for i in 0..8 {
            assert!(
                before[i].distance(&after[i]) < 6.0,
                "entity {} moved {} over two frames",
                i,
                before[i].distance(&after[i])
            );
        }

        // the first entity is still easing back
        assert!(b.focus_weight(1) > 0.0);
        let mut last = b.position(1).unwrap();
        for _ in 0..60 {
            run(&mut b, MacroState::Formed, 1);
            let p = b.position(1).unwrap();
            assert!(p.distance(&last) < 3.0, "releasing entity jumped");
            last = p;
        }
        assert_eq!(b.focus_weight(1), 0.0);
        assert_eq!(b.focus_weight(2), 0.0);
        assert_eq!(b.focused(), Some(3));
    }

    #[test]
    fn refocus_while_releasing_resumes_blend() {
        let mut b = photos(8);
        b.focus(1, Vec3::ZERO).unwrap();
        run(&mut b, MacroState::Formed, 60);
        b.focus(2, Vec3::ZERO).unwrap();
        b.focus(3, Vec3::ZERO).unwrap();
        run(&mut b, MacroState::Formed, 10);
        let w = b.focus_weight(1);
        assert!(w > 0.0 && w < 1.0);

        b.focus(1, Vec3::ZERO).unwrap();
        assert_eq!(b.focused(), Some(1));
        assert_eq!(b.focus_weight(1), w);
        assert!(b.focus_weight(3) > 0.0);
    }

    #[test]
    fn only_focusable_categories_accept_focus() {
        let mut b = Binding::with_defaults(Category::Lights);
        let err = b.focus(0, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, TinselError::NotFocusable(ref c) if c == "lights"));
        assert_eq!(b.focused(), None);
    }

    #[test]
    fn focus_out_of_range_is_an_error() {
        let mut b = photos(4);
        let err = b.focus(4, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, TinselError::EntityOutOfRange { index: 4, count: 4 }));
    }

    #[test]
    fn nearest_entity_picks_closest_projection() {
        let b = photos(24);
        let projector = front_camera();
        let target = b.position(7).unwrap();
        let screen = projector.project(target).unwrap();
        assert_eq!(b.nearest_entity_to(screen, &projector, 5.0), Some(7));
        assert_eq!(b.nearest_entity_to([-500.0, -500.0], &projector, 5.0), None);
    }

    #[test]
    fn nearest_entity_skips_behind_camera() {
        let b = photos(24);
        // camera inside the tree looking outward; some entities are behind it
        let projector = PerspectiveProjector::look_at(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            45.0,
            [800.0, 600.0],
            0.1,
            200.0,
        );
        if let Some(i) = b.nearest_entity_to([400.0, 300.0], &projector, 10_000.0) {
            assert!(b.position(i).unwrap().z > 0.0);
        }
    }

    #[test]
    fn textures_cycle_over_photos() {
        let b = photos(5);
        assert_eq!(b.texture_of(0), Some("a.png"));
        assert_eq!(b.texture_of(1), Some("b.png"));
        assert_eq!(b.texture_of(4), Some("a.png"));
        assert_eq!(b.texture_of(5), None);
    }

    #[test]
    fn count_change_rebuilds_and_drops_focus() {
        let mut b = photos(8);
        b.focus(2, Vec3::ZERO).unwrap();
        b.set_count(3);
        assert_eq!(b.focused(), None);
        assert_eq!(b.decorations().len(), 3);
        assert_eq!(b.instances().len(), 3);
    }

    #[test]
    fn stats_report_progress_and_bounds() {
        let mut b = photos(24);
        let s = b.stats();
        assert_eq!(s.count, 24);
        assert_eq!(s.min_progress, 1.0);
        assert!(s.bounds_min.y <= s.bounds_max.y);

        run(&mut b, MacroState::Chaos, 600);
        let s = b.stats();
        assert_eq!(s.scene_progress, 0.0);
        assert_eq!(s.max_progress, 0.0);
    }

    #[test]
    fn empty_binding_is_inert() {
        let mut b = Binding::new(Category::Lights, ChoreoSettings::default(), Vec::new());
        run(&mut b, MacroState::Formed, 10);
        assert!(b.instances().is_empty());
        let s = b.stats();
        assert_eq!(s.count, 0);
        assert_eq!(s.mean_progress, 0.0);
        let projector = front_camera();
        assert!(b.nearest_entity_to([0.0, 0.0], &projector, 100.0).is_none());
    }

    #[test]
    fn tables_match_choreography() {
        let b = Binding::with_defaults(Category::Ornaments);
        let t = b.tables();
        assert_eq!(t.len(), 180);
        assert_eq!(t.targets[0][3], b.choreography().delays()[0]);
    }
}
