//! Tinsel Bindings - category adapters over the choreography engine
//!
//! Each visual category (foliage, lights, ornaments, gifts, photos) owns one
//! choreography, a decoration table, a packed instance buffer, and (for
//! photos) a smooth focus override. `TreeScene` advances all of them as one
//! `RuntimeSystem`, optionally in parallel with the `parallel` feature.

pub mod binding;
pub mod category;
pub mod config;
pub mod decoration;
pub mod projector;
pub mod scene;

pub use binding::{Binding, BindingStats};
pub use category::Category;
pub use config::{CategoryConfig, SceneConfig, SceneSection};
pub use decoration::Decoration;
pub use projector::{OrbitCamera, PerspectiveProjector, ScreenProjector};
pub use scene::TreeScene;
