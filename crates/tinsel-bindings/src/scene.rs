//! The whole tree: every category binding plus the shared host state

use crate::binding::Binding;
use crate::category::Category;
use crate::config::SceneConfig;
use crate::projector::{OrbitCamera, PerspectiveProjector};
use tinsel_choreo::{Easing, FrameInput, MacroState, ScatterShape};
use tinsel_core::{Named, Result};
use tinsel_runtime::{EventBus, RuntimeSystem, SceneEvent};

/// Max distance in pixels between a focus request and the photo it picks
pub const FOCUS_PICK_RADIUS: f32 = 60.0;
/// Distance in front of the camera where a focused photo settles
pub const FOCUS_DISTANCE: f32 = 14.0;

/// All five bindings, advanced together
pub struct TreeScene {
    bindings: Vec<Binding>,
    macro_state: MacroState,
    scatter_shape: ScatterShape,
    easing: Easing,
    speed: f32,
    /// Scatter change requested by an event, applied on the next frame
    pending_scatter: Option<ScatterShape>,
    camera: OrbitCamera,
    viewport: [f32; 2],
}

impl TreeScene {
    pub fn from_config(config: &SceneConfig) -> Self {
        let bindings = Category::ALL
            .iter()
            .map(|c| Binding::from_config(*c, config))
            .collect();
        Self {
            bindings,
            macro_state: config.scene.macro_state,
            scatter_shape: config.scene.scatter_shape,
            easing: config.scene.easing,
            speed: config.scene.speed,
            pending_scatter: None,
            camera: OrbitCamera::default(),
            viewport: [1280.0, 720.0],
        }
    }

    pub fn with_viewport(mut self, viewport: [f32; 2]) -> Self {
        self.viewport = viewport;
        self
    }

    // ── Host state ──

    pub fn macro_state(&self) -> MacroState {
        self.macro_state
    }

    pub fn set_macro_state(&mut self, state: MacroState) {
        if state != self.macro_state {
            log::debug!("[scene] macro state -> {}", state.name());
            self.macro_state = state;
        }
    }

    pub fn scatter_shape(&self) -> ScatterShape {
        self.scatter_shape
    }

    /// Queue a scatter change for every binding on the next frame
    pub fn set_scatter_shape(&mut self, shape: ScatterShape) {
        if shape != self.scatter_shape {
            log::debug!("[scene] scatter shape -> {}", shape.name());
            self.scatter_shape = shape;
            self.pending_scatter = Some(shape);
        }
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn projector(&self) -> PerspectiveProjector {
        self.camera.projector(self.viewport)
    }

    // ── Bindings ──

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding(&self, category: Category) -> &Binding {
        &self.bindings[category.ordinal() as usize]
    }

    pub fn binding_mut(&mut self, category: Category) -> &mut Binding {
        &mut self.bindings[category.ordinal() as usize]
    }

    pub fn total_entities(&self) -> u64 {
        self.bindings.iter().map(|b| b.count() as u64).sum()
    }

    // ── Events ──

    pub fn handle_event(&mut self, event: &SceneEvent) {
        match *event {
            SceneEvent::MacroStateRequested(state) => self.set_macro_state(state),
            SceneEvent::ScatterShapeChanged(shape) => self.set_scatter_shape(shape),
            SceneEvent::FocusRequested { x, y } => self.focus_at([x, y]),
            SceneEvent::FocusReleased => self.binding_mut(Category::Photos).release_focus(),
            SceneEvent::Orbit { yaw, pitch } => {
                self.camera.orbit(yaw, pitch);
                let anchor = self.camera.point_in_front(FOCUS_DISTANCE);
                self.binding_mut(Category::Photos).set_focus_anchor(anchor);
            }
        }
    }

    /// Drain and apply every pending event
    pub fn process_events(&mut self, bus: &mut EventBus) {
        for event in bus.drain() {
            self.handle_event(&event);
        }
    }

    /// Focus the photo under a screen point, if any is close enough
    pub fn focus_at(&mut self, screen_point: [f32; 2]) {
        let projector = self.projector();
        let anchor = self.camera.point_in_front(FOCUS_DISTANCE);
        let photos = self.binding_mut(Category::Photos);
        match photos.nearest_entity_to(screen_point, &projector, FOCUS_PICK_RADIUS) {
            Some(index) => {
                if let Err(e) = photos.focus(index, anchor) {
                    log::warn!("[scene] focus failed: {e}");
                }
            }
            None => log::debug!(
                "[scene] no photo within {FOCUS_PICK_RADIUS}px of ({:.0}, {:.0})",
                screen_point[0],
                screen_point[1]
            ),
        }
    }

    // ── Frame ──

    /// Frame input built from the scene's own state
    pub fn frame_input(&mut self, delta_seconds: f32) -> FrameInput {
        let mut input = FrameInput::new(delta_seconds, self.macro_state)
            .with_easing(self.easing)
            .with_speed(self.speed);
        if let Some(shape) = self.pending_scatter.take() {
            input = input.with_scatter_shape(shape);
        }
        input
    }

    /// Advance one frame from the scene's own state
    pub fn step(&mut self, delta_seconds: f32) {
        let input = self.frame_input(delta_seconds);
        self.advance(&input);
    }

    /// Advance every binding with the same input
    pub fn advance(&mut self, input: &FrameInput) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.bindings.par_iter_mut().for_each(|b| b.update(input));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for binding in &mut self.bindings {
                binding.update(input);
            }
        }
    }

    /// True once every binding rests at a terminal state
    pub fn is_settled(&self) -> bool {
        self.bindings.iter().all(|b| b.choreography().is_settled())
    }
}

impl RuntimeSystem for TreeScene {
    fn initialize(&mut self) -> Result<()> {
        log::info!(
            "[scene] {} entities across {} bindings, starting {}",
            self.total_entities(),
            self.bindings.len(),
            self.macro_state.name()
        );
        for b in &self.bindings {
            log::debug!("[scene]   {:<10} {}", b.category().name(), b.count());
        }
        Ok(())
    }

    fn update(&mut self, input: &FrameInput) -> Result<()> {
        self.set_macro_state(input.macro_state);
        if let Some(shape) = input.scatter_shape {
            self.scatter_shape = shape;
        }
        if let Some(easing) = input.easing {
            self.easing = easing;
        }
        if let Some(speed) = input.speed {
            self.speed = speed;
        }
        self.advance(input);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        log::info!("[scene] shutdown");
        Ok(())
    }

    fn name(&self) -> &str {
        "tree_scene"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::ScreenProjector;

    const FRAME: f32 = 1.0 / 60.0;

    fn small_scene() -> TreeScene {
        let config = SceneConfig::from_toml(
            r#"
[foliage]
count = 200
[lights]
count = 40
[ornaments]
count = 30
[gifts]
count = 8
[photos]
count = 12
"#,
        )
        .unwrap();
        TreeScene::from_config(&config)
    }

    #[test]
    fn builds_every_category() {
        let scene = small_scene();
        assert_eq!(scene.bindings().len(), 5);
        for c in Category::ALL {
            assert_eq!(scene.binding(*c).category(), *c);
        }
        assert_eq!(scene.total_entities(), 290);
        assert!(scene.is_settled());
    }

    #[test]
    fn macro_event_drives_every_binding() {
        let mut scene = small_scene();
        let mut bus = EventBus::new();
        bus.push(SceneEvent::MacroStateRequested(MacroState::Formed));
        scene.process_events(&mut bus);
        assert!(bus.is_empty());

        for _ in 0..61 {
            scene.step(FRAME);
        }
        for b in scene.bindings() {
            assert_eq!(b.choreography().scene_progress(), 1.0);
            assert_eq!(b.choreography().positions(), b.choreography().targets());
        }
        assert!(scene.is_settled());
    }

    #[test]
    fn scatter_event_applies_once() {
        let mut scene = small_scene();
        scene.handle_event(&SceneEvent::ScatterShapeChanged(ScatterShape::Rain));
        scene.step(FRAME);
        for b in scene.bindings() {
            assert_eq!(b.choreography().settings().scatter_shape, ScatterShape::Rain);
            assert!(b.choreography().shape_transition() < 1.0);
        }
        let input = scene.frame_input(FRAME);
        assert!(input.scatter_shape.is_none());
    }

    #[test]
    fn focus_request_picks_projected_photo() {
        let mut scene = small_scene();
        scene.set_macro_state(MacroState::Formed);
        for _ in 0..70 {
            scene.step(FRAME);
        }
        let projector = scene.projector();
        let photos = scene.binding(Category::Photos);
        let (index, screen) = (0..photos.count())
            .find_map(|i| {
                let p = projector.project(photos.position(i)?)?;
                let on_screen = p[0] > 0.0 && p[0] < 1280.0 && p[1] > 0.0 && p[1] < 720.0;
                on_screen.then_some((i, p))
            })
            .unwrap();

        scene.handle_event(&SceneEvent::FocusRequested {
            x: screen[0],
            y: screen[1],
        });
        assert_eq!(scene.binding(Category::Photos).focused(), Some(index));

        scene.handle_event(&SceneEvent::FocusReleased);
        assert_eq!(scene.binding(Category::Photos).focused(), None);
    }

    #[test]
    fn focus_request_far_from_photos_is_ignored() {
        let mut scene = small_scene();
        scene.handle_event(&SceneEvent::FocusRequested {
            x: -5000.0,
            y: -5000.0,
        });
        assert_eq!(scene.binding(Category::Photos).focused(), None);
    }

    #[test]
    fn orbit_moves_camera() {
        let mut scene = small_scene();
        let before = scene.camera().eye();
        scene.handle_event(&SceneEvent::Orbit {
            yaw: 0.3,
            pitch: 0.0,
        });
        assert!(scene.camera().eye().distance(&before) > 1.0);
    }

    #[test]
    fn runtime_system_lifecycle() {
        let mut scene = small_scene();
        scene.initialize().unwrap();
        let input = FrameInput::new(0.5, MacroState::Formed).with_scatter_shape(ScatterShape::Ring);
        scene.update(&input).unwrap();
        assert_eq!(scene.macro_state(), MacroState::Formed);
        assert_eq!(scene.scatter_shape(), ScatterShape::Ring);
        assert!((scene.binding(Category::Foliage).choreography().scene_progress() - 0.5).abs() < 1e-6);
        scene.shutdown().unwrap();
        assert_eq!(scene.name(), "tree_scene");
    }

    #[test]
    fn runtime_update_knobs_persist_into_step() {
        let mut scene = small_scene();
        let input = FrameInput::new(FRAME, MacroState::Formed)
            .with_easing(Easing::Linear)
            .with_speed(2.0);
        scene.update(&input).unwrap();

        let next = scene.frame_input(FRAME);
        assert_eq!(next.easing, Some(Easing::Linear));
        assert_eq!(next.speed, Some(2.0));

        // at double speed the remaining travel takes half the frames
        for _ in 0..29 {
            scene.step(FRAME);
        }
        for b in scene.bindings() {
            assert_eq!(b.choreography().scene_progress(), 1.0);
        }
    }
}
