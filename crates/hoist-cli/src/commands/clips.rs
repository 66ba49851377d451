//! Clips command - prints the clip catalog of a model

use crate::config::HoistConfig;
use crate::headless::HeadlessLoader;
use anyhow::{bail, Context, Result};
use hoist_animation::{AssetLoader, ClipCatalog};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ClipRow<'a> {
    index: usize,
    name: &'a str,
    duration: f32,
    degenerate: bool,
    poses: Vec<&'a str>,
}

pub fn run(model: &str, format: &str) -> Result<()> {
    let config = HoistConfig::load().context("Failed to load config")?;
    let mut loader = HeadlessLoader::new(config.ibl_intensity);
    let model = loader
        .load_model(Path::new(model))
        .context("Failed to load model")?;
    let catalog = ClipCatalog::from_model(&model)?;
    let poses = &config.poses;

    let rows: Vec<ClipRow> = catalog
        .iter()
        .map(|clip| ClipRow {
            index: clip.index,
            name: &clip.name,
            duration: clip.reported_duration(),
            degenerate: clip.is_degenerate(),
            poses: poses
                .iter()
                .filter(|(_, index)| *index == clip.index)
                .map(|(name, _)| name)
                .collect(),
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "text" => {
            println!("{} ({} clips)", model.info().name, rows.len());
            for row in &rows {
                let note = if row.degenerate { "  (zero duration)" } else { "" };
                let poses = if row.poses.is_empty() {
                    String::new()
                } else {
                    format!("  [{}]", row.poses.join(", "))
                };
                println!(
                    "  {:>3}  {:<24} {:>8.3}s{}{}",
                    row.index, row.name, row.duration, poses, note
                );
            }
        }
        other => bail!("Unknown format '{}'; valid values: text, json", other),
    }

    Ok(())
}
