//! Hoist CLI - Command-line front end for the Hoist pose viewer

mod commands;
mod config;
mod headless;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{clips, play, sample};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Scrub a rigged lift model between its named poses", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// log4rs config file, replaces the default console logger
    #[arg(long, global = true)]
    log_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the animation clips of a model
    Clips {
        /// Path to a .glb or .gltf model
        model: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Play a model's poses in a headless frame loop
    Play {
        /// Path to a .glb or .gltf model (defaults to [model] path in the config)
        model: Option<String>,

        /// Config file to use instead of the layered lookup
        #[arg(long)]
        config: Option<String>,

        /// Pose to start with
        #[arg(long)]
        pose: Option<String>,

        /// Play the starting pose once and hold its final frame
        #[arg(long, conflicts_with = "looping")]
        once: bool,

        /// Loop the starting pose
        #[arg(long = "loop")]
        looping: bool,

        /// Initial speed multiplier (integer, at least 1)
        #[arg(long)]
        speed: Option<u32>,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Refresh rate of the frame loop
        #[arg(long)]
        fps: Option<u32>,

        /// Environment name under the environment directory
        #[arg(long)]
        env: Option<String>,
    },

    /// Print the in-clip time for elapsed times, without a model
    Sample {
        /// Elapsed seconds since the clip was selected
        #[arg(required = true, allow_negative_numbers = true)]
        elapsed: Vec<f64>,

        /// Clip duration in seconds
        #[arg(long)]
        duration: f64,

        /// Speed multiplier
        #[arg(long, default_value = "1")]
        speed: u32,

        /// Clamp at the end instead of looping
        #[arg(long)]
        once: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level, cli.log_config.as_deref())?;

    match cli.command {
        Commands::Clips { model, format } => clips::run(&model, &format),
        Commands::Play {
            model,
            config,
            pose,
            once,
            looping,
            speed,
            frames,
            fps,
            env,
        } => play::run(play::PlayArgs {
            model,
            config,
            pose,
            once,
            looping,
            speed,
            frames,
            fps,
            env,
        }),
        Commands::Sample {
            elapsed,
            duration,
            speed,
            once,
        } => sample::run(sample::SampleArgs {
            duration,
            speed,
            once,
            elapsed,
        }),
    }
}
