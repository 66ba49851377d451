//! Clip catalog - read-only clip metadata sourced from the loaded model

use crate::capability::AnimatedModel;
use hoist_core::{HoistError, Result};
use log::{info, warn};
use serde::Serialize;

/// One animation clip as reported by the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clip {
    pub index: usize,
    pub name: String,
    /// Duration in seconds, never negative
    pub duration: f64,
}

impl Clip {
    pub fn new(index: usize, name: impl Into<String>, duration: f64) -> Self {
        Self {
            index,
            name: name.into(),
            duration: sanitize_duration(duration),
        }
    }

    /// A zero-duration clip holds its single frame forever
    pub fn is_degenerate(&self) -> bool {
        self.duration == 0.0
    }

    /// Duration at the engine's `f32` precision, for display
    pub fn reported_duration(&self) -> f32 {
        self.duration as f32
    }
}

/// Clip metadata indexed by clip position in the model
#[derive(Debug, Clone, Default)]
pub struct ClipCatalog {
    clips: Vec<Clip>,
}

impl ClipCatalog {
    /// Catalog over clips that were already read
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    /// Read names and durations of every clip in a model
    pub fn from_model<M: AnimatedModel + ?Sized>(model: &M) -> Result<Self> {
        let count = model.clip_count();
        let mut clips = Vec::with_capacity(count);
        for index in 0..count {
            let name = model.clip_name(index)?;
            let raw = f64::from(model.clip_duration(index)?);
            if !(raw.is_finite() && raw >= 0.0) {
                warn!("Clip '{}' reports duration {}, treating as 0", name, raw);
            }
            clips.push(Clip::new(index, name, raw));
        }
        info!("Clip catalog populated with {} clips", clips.len());
        Ok(Self { clips })
    }

    /// Look up a clip by index
    pub fn get(&self, index: usize) -> Result<&Clip> {
        self.clips.get(index).ok_or(HoistError::InvalidClipIndex {
            index,
            count: self.clips.len(),
        })
    }

    /// Look up a clip by its engine name
    pub fn find(&self, name: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Number of clips in the model
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clips in index order
    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter()
    }
}

fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct FixedModel {
        clips: Vec<(&'static str, f32)>,
    }

    impl AnimatedModel for FixedModel {
        fn clip_count(&self) -> usize {
            self.clips.len()
        }

        fn clip_duration(&self, index: usize) -> Result<f32> {
            Ok(self.clips[index].1)
        }

        fn clip_name(&self, index: usize) -> Result<String> {
            Ok(self.clips[index].0.to_string())
        }

        fn apply_pose(&mut self, _index: usize, _in_clip_time: f32) -> Result<()> {
            Ok(())
        }

        fn render(&mut self, _timestamp: Instant) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_catalog_reads_model_clips_in_order() {
        let model = FixedModel {
            clips: vec![("down", 0.0), ("idle-final", 1.0), ("idle-mid", 1.5), ("up", 2.0)],
        };
        let catalog = ClipCatalog::from_model(&model).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(3).unwrap().name, "up");
        assert_eq!(catalog.get(2).unwrap().duration, 1.5);
        assert!(catalog.get(0).unwrap().is_degenerate());
        assert_eq!(catalog.find("idle-mid").map(|c| c.index), Some(2));
    }

    #[test]
    fn test_out_of_range_lookup_is_invalid_clip_index() {
        let catalog = ClipCatalog::new(vec![Clip::new(0, "down", 1.0)]);
        match catalog.get(5) {
            Err(HoistError::InvalidClipIndex { index, count }) => {
                assert_eq!(index, 5);
                assert_eq!(count, 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bad_durations_become_degenerate() {
        let model = FixedModel {
            clips: vec![("neg", -1.0), ("nan", f32::NAN), ("inf", f32::INFINITY)],
        };
        let catalog = ClipCatalog::from_model(&model).unwrap();
        assert!(catalog.iter().all(Clip::is_degenerate));
    }
}
