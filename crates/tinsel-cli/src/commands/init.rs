//! Scene config initialization command

use anyhow::Result;
use std::fs;
use std::path::Path;
use tinsel_bindings::SceneConfig;

pub fn run(path: &str, force: bool) -> Result<()> {
    let target = Path::new(path);

    if target.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path);
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let text = SceneConfig::template().to_toml()?;
    fs::write(target, text)?;

    println!("Wrote default scene config to {}", path);
    println!();
    println!("Next steps:");
    println!("  tinsel check {}", path);
    println!("  tinsel simulate --config {}", path);

    Ok(())
}
