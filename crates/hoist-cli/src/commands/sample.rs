//! Sample command - evaluates the playback clock without a model

use anyhow::{anyhow, Result};
use hoist_animation::{in_clip_time, SpeedMultiplier};

pub struct SampleArgs {
    pub duration: f64,
    pub speed: u32,
    pub once: bool,
    pub elapsed: Vec<f64>,
}

pub fn run(args: SampleArgs) -> Result<()> {
    let speed = SpeedMultiplier::new(args.speed).ok_or_else(|| anyhow!("--speed must be at least 1"))?;
    if !(args.duration.is_finite() && args.duration >= 0.0) {
        return Err(anyhow!("--duration must be a non-negative number of seconds"));
    }

    println!(
        "duration {}s, speed {}, {}",
        args.duration,
        speed,
        if args.once { "once" } else { "looping" }
    );
    for elapsed in &args.elapsed {
        let t = in_clip_time(*elapsed, speed, !args.once, args.duration);
        println!("  elapsed {:>9.3}s -> {:.3}s", elapsed, t);
    }
    Ok(())
}
