//! Scene config check command

use anyhow::{Context, Result};
use tinsel_bindings::{Category, SceneConfig};
use tinsel_core::Named;

pub fn run(path: &str) -> Result<()> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let mut config = SceneConfig::from_toml(&source)?;
    let warnings = config.sanitize();

    if warnings.is_empty() {
        println!("{}: ok", path);
    } else {
        println!("{}: {} adjustment(s)", path, warnings.len());
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    println!();
    println!(
        "scene: {} / {} / {} / speed {}",
        config.scene.macro_state.name(),
        config.scene.scatter_shape.name(),
        config.scene.easing.name(),
        config.scene.speed
    );
    println!(
        "layout: height {} base_radius {}",
        config.layout.height, config.layout.base_radius
    );
    for category in Category::ALL {
        let s = config.settings_for(*category);
        println!(
            "  {:<10} count {:>6}  gather {:<10} stagger {}",
            category.name(),
            s.count,
            s.gather_shape.name(),
            s.stagger
        );
    }

    Ok(())
}
