//! Headless simulation command

use super::load_config;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tinsel_bindings::{BindingStats, TreeScene};
use tinsel_choreo::{MacroState, ScatterShape};
use tinsel_core::Named;
use tinsel_runtime::{EventBus, FrameClock, RuntimeSystem, SceneEvent, MAX_FRAME_TIME};

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u32,
    pub fps: f32,
    pub state: Option<MacroState>,
    pub scatter: Option<ScatterShape>,
    pub switch_at: Option<u32>,
    pub format: String,
    pub output: Option<String>,
}

#[derive(Serialize)]
struct SimulationReport {
    frames: u32,
    fps: f32,
    elapsed_seconds: f64,
    macro_state: String,
    scatter_shape: String,
    settled: bool,
    bindings: Vec<BindingStats>,
    /// Final positions per category, JSON output only
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    positions: BTreeMap<String, Vec<[f32; 3]>>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    check_fps(args.fps)?;

    let config = load_config(args.config.as_deref())?;
    let mut scene = TreeScene::from_config(&config);
    scene.initialize()?;

    let mut bus = EventBus::new();
    // Default to heading for the state the scene does not start in
    let goal = args.state.unwrap_or_else(|| config.scene.macro_state.toggled());
    bus.push(SceneEvent::MacroStateRequested(goal));
    if let Some(shape) = args.scatter {
        bus.push(SceneEvent::ScatterShapeChanged(shape));
    }

    let mut clock = FrameClock::new();
    let dt = 1.0 / args.fps as f64;

    for frame in 0..args.frames {
        if args.switch_at == Some(frame) {
            let flipped = scene.macro_state().toggled();
            log::info!("frame {}: switching to {}", frame, flipped.name());
            bus.push(SceneEvent::MacroStateRequested(flipped));
        }
        scene.process_events(&mut bus);

        clock.advance(dt);
        let input = scene.frame_input(clock.delta_seconds());
        scene.update(&input)?;
    }

    scene.shutdown()?;

    let json = args.format == "json";
    let report = SimulationReport {
        frames: args.frames,
        fps: args.fps,
        elapsed_seconds: clock.total_time,
        macro_state: scene.macro_state().name().to_string(),
        scatter_shape: scene.scatter_shape().name().to_string(),
        settled: scene.is_settled(),
        bindings: scene.bindings().iter().map(|b| b.stats()).collect(),
        positions: if json {
            scene
                .bindings()
                .iter()
                .map(|b| {
                    let points = (0..b.count())
                        .filter_map(|i| b.position(i))
                        .map(|p| p.to_array())
                        .collect();
                    (b.category().name().to_string(), points)
                })
                .collect()
        } else {
            BTreeMap::new()
        },
    };

    let text = if json {
        serde_json::to_string_pretty(&report)?
    } else {
        format_text(&report)
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("Wrote report to {}", path);
        }
        None => println!("{}", text),
    }

    Ok(())
}

/// Frames longer than the clock's cap would silently lose time
fn check_fps(fps: f32) -> Result<()> {
    let min_fps = (1.0 / MAX_FRAME_TIME) as f32;
    if !fps.is_finite() || fps < min_fps {
        anyhow::bail!("--fps must be at least {}, got {}", min_fps, fps);
    }
    Ok(())
}

fn format_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} frames at {} fps ({:.3}s) -> {} / {}{}\n\n",
        report.frames,
        report.fps,
        report.elapsed_seconds,
        report.macro_state,
        report.scatter_shape,
        if report.settled { " (settled)" } else { "" }
    ));
    out.push_str(&format!(
        "{:<10} {:>6} {:>8} {:>8} {:>8} {:>8}  bounds\n",
        "category", "count", "scene", "mean", "min", "max"
    ));
    for b in &report.bindings {
        out.push_str(&format!(
            "{:<10} {:>6} {:>8.3} {:>8.3} {:>8.3} {:>8.3}  [{:.1}, {:.1}, {:.1}] .. [{:.1}, {:.1}, {:.1}]\n",
            b.category,
            b.count,
            b.scene_progress,
            b.mean_progress,
            b.min_progress,
            b.max_progress,
            b.bounds_min.x,
            b.bounds_min.y,
            b.bounds_min.z,
            b.bounds_max.x,
            b.bounds_max.y,
            b.bounds_max.z,
        ));
    }
    out
}
