//! Play command - runs the playback controller against the headless engine

use crate::config::HoistConfig;
use crate::headless::{HeadlessLoader, HeadlessModel};
use anyhow::{anyhow, Context, Result};
use hoist_animation::{
    AssetLoader, ClipCatalog, ControlHandle, PlaybackCommand, PlaybackController,
    PlaybackDefaults, PoseMap, SpeedMultiplier,
};
use hoist_core::HoistError;
use hoist_runtime::{FrameScheduler, MonotonicClock, RefreshDriver};
use log::{info, warn};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct PlayArgs {
    pub model: Option<String>,
    pub config: Option<String>,
    pub pose: Option<String>,
    pub once: bool,
    pub looping: bool,
    pub speed: Option<u32>,
    pub frames: Option<u64>,
    pub fps: Option<u32>,
    pub env: Option<String>,
}

/// A parsed line of terminal input
#[derive(Debug, PartialEq)]
enum Input {
    Command(PlaybackCommand),
    Quit,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => HoistConfig::load_from_file(Path::new(path)),
        None => HoistConfig::load(),
    }
    .context("Failed to load config")?;
    apply_flags(&mut config, &args)?;

    let model_path = config
        .model_path
        .clone()
        .ok_or_else(|| anyhow!("No model given: pass a path or set [model] path in the config"))?;

    // Load model and environment
    let mut loader = HeadlessLoader::new(config.ibl_intensity);
    let mut model = loader
        .load_model(&model_path)
        .with_context(|| format!("Failed to load model {}", model_path.display()))?;
    if let Some(env) = &config.environment {
        let env_path: PathBuf = config.environment_dir.join(env);
        let environment = loader
            .load_environment(&env_path)
            .with_context(|| format!("Failed to load environment {}", env_path.display()))?;
        model.set_environment(environment);
    }

    let mut controller: PlaybackController<HeadlessModel> = PlaybackController::new();
    controller
        .attach(
            model,
            PlaybackDefaults {
                speed: config.speed,
                ..Default::default()
            },
        )
        .context("Failed to attach model")?;

    let catalog = controller.catalog()?.clone();
    if catalog.is_empty() {
        warn!("Model has no clips; holding the bind pose");
    } else {
        let index = config.poses.resolve(&config.pose, &catalog)?;
        controller.select_clip(index, config.looping)?;
    }

    println!("Loaded model: {}", model_path.display());
    println!("Clips: {}", catalog.len());
    println!();
    println!("Controls (type a line, then Enter):");
    println!("  down | idle-final | idle-mid | up   - Play pose, looping");
    println!("  once <pose>                         - Play pose once");
    println!("  faster | slower                     - Double / halve speed");
    println!("  quit                                - Exit");

    let quit = Arc::new(AtomicBool::new(false));
    spawn_input_reader(
        controller.control_handle(),
        config.poses.clone(),
        catalog,
        Arc::clone(&quit),
        args.frames.is_none(),
    )?;

    let mut scheduler = FrameScheduler::new(RefreshDriver::new(MonotonicClock::new(), config.fps));
    scheduler.start();
    while let Some(tick) = scheduler.driver_mut().next_frame() {
        if let Err(e) = scheduler.on_frame(tick, &mut controller) {
            warn!("Frame {} failed: {}", scheduler.frame_count(), e);
        }
        let done = args.frames.is_some_and(|limit| scheduler.frame_count() >= limit);
        if done || quit.load(Ordering::Relaxed) {
            scheduler.stop();
        }
    }

    if let Some(model) = controller.model() {
        info!(
            "Rendered {} frames, final pose {:?}, environment {}",
            model.frames_rendered(),
            model.current_pose(),
            model.environment().map_or("none", |e| e.name.as_str())
        );
    }
    Ok(())
}

fn apply_flags(config: &mut HoistConfig, args: &PlayArgs) -> Result<()> {
    if let Some(model) = &args.model {
        config.model_path = Some(PathBuf::from(model));
    }
    if let Some(pose) = &args.pose {
        config.pose = pose.clone();
    }
    if args.once {
        config.looping = false;
    }
    if args.looping {
        config.looping = true;
    }
    if let Some(speed) = args.speed {
        config.speed = SpeedMultiplier::new(speed).ok_or_else(|| anyhow!("--speed must be at least 1"))?;
    }
    if let Some(fps) = args.fps {
        config.fps = fps.max(1);
    }
    if let Some(env) = &args.env {
        config.environment = Some(env.clone());
    }
    Ok(())
}

/// Read commands from stdin on a separate thread and hand them to the frame
/// loop. End of input quits unless the run has a frame limit.
fn spawn_input_reader(
    handle: ControlHandle,
    poses: PoseMap,
    catalog: ClipCatalog,
    quit: Arc<AtomicBool>,
    quit_on_eof: bool,
) -> Result<()> {
    std::thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_input(&line, &poses, &catalog) {
                    Ok(Some(Input::Quit)) => {
                        quit.store(true, Ordering::Relaxed);
                        return;
                    }
                    Ok(Some(Input::Command(command))) => {
                        if let Err(e) = handle.send(command) {
                            warn!("{}", e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{}", e),
                }
            }
            if quit_on_eof {
                quit.store(true, Ordering::Relaxed);
            }
        })
        .context("Failed to start input thread")?;
    Ok(())
}

fn parse_input(
    line: &str,
    poses: &PoseMap,
    catalog: &ClipCatalog,
) -> std::result::Result<Option<Input>, HoistError> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };

    let input = match first {
        "quit" | "q" | "exit" => Input::Quit,
        "faster" | "+" => Input::Command(PlaybackCommand::IncreaseSpeed),
        "slower" | "-" => Input::Command(PlaybackCommand::DecreaseSpeed),
        "once" => {
            let pose = words
                .next()
                .ok_or_else(|| HoistError::UnknownPose(String::new()))?;
            Input::Command(PlaybackCommand::SelectClip {
                index: poses.resolve(pose, catalog)?,
                looping: false,
            })
        }
        pose => Input::Command(PlaybackCommand::SelectClip {
            index: poses.resolve(pose, catalog)?,
            looping: true,
        }),
    };
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_animation::Clip;

    fn lift_catalog() -> ClipCatalog {
        ClipCatalog::new(vec![
            Clip::new(0, "down", 0.0),
            Clip::new(1, "idle-final", 1.0),
            Clip::new(2, "idle-mid", 1.5),
            Clip::new(3, "up", 2.0),
        ])
    }

    fn parse(line: &str) -> std::result::Result<Option<Input>, HoistError> {
        parse_input(line, &PoseMap::default(), &lift_catalog())
    }

    #[test]
    fn test_pose_names_loop_by_default() {
        assert_eq!(
            parse("idle-mid").unwrap(),
            Some(Input::Command(PlaybackCommand::SelectClip { index: 2, looping: true }))
        );
        assert_eq!(
            parse("  once up ").unwrap(),
            Some(Input::Command(PlaybackCommand::SelectClip { index: 3, looping: false }))
        );
    }

    #[test]
    fn test_speed_and_quit_words() {
        assert_eq!(
            parse("faster").unwrap(),
            Some(Input::Command(PlaybackCommand::IncreaseSpeed))
        );
        assert_eq!(
            parse("-").unwrap(),
            Some(Input::Command(PlaybackCommand::DecreaseSpeed))
        );
        assert_eq!(parse("quit").unwrap(), Some(Input::Quit));
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_unknown_pose_is_an_error() {
        assert!(matches!(parse("sideways"), Err(HoistError::UnknownPose(_))));
        assert!(matches!(parse("once"), Err(HoistError::UnknownPose(_))));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = HoistConfig::default();
        let args = PlayArgs {
            model: Some("lift.glb".into()),
            config: None,
            pose: Some("up".into()),
            once: false,
            looping: true,
            speed: Some(4),
            frames: Some(10),
            fps: Some(0),
            env: Some("studio".into()),
        };
        apply_flags(&mut config, &args).unwrap();
        assert_eq!(config.model_path, Some(PathBuf::from("lift.glb")));
        assert_eq!(config.pose, "up");
        assert!(config.looping);
        assert_eq!(config.speed.get(), 4);
        assert_eq!(config.fps, 1);
        assert_eq!(config.environment.as_deref(), Some("studio"));

        let zero = PlayArgs { speed: Some(0), ..args };
        assert!(apply_flags(&mut config, &zero).is_err());
    }
}
