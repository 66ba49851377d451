//! Named poses of the lift rig and the clip each one plays

use crate::catalog::ClipCatalog;
use hoist_core::{HoistError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DOWN: &str = "down";
pub const IDLE_FINAL: &str = "idle-final";
pub const IDLE_MID: &str = "idle-mid";
pub const UP: &str = "up";

/// Pose name to clip index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseMap {
    poses: BTreeMap<String, usize>,
}

impl Default for PoseMap {
    /// Clip order of the stock car lift model
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert(DOWN, 0);
        map.insert(IDLE_FINAL, 1);
        map.insert(IDLE_MID, 2);
        map.insert(UP, 3);
        map
    }
}

impl PoseMap {
    pub fn empty() -> Self {
        Self {
            poses: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, clip: usize) {
        self.poses.insert(name.into(), clip);
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.poses.get(name).copied()
    }

    /// Resolve a pose name, falling back to a clip with the same name in
    /// the catalog.
    pub fn resolve(&self, name: &str, catalog: &ClipCatalog) -> Result<usize> {
        self.index_of(name)
            .or_else(|| catalog.find(name).map(|clip| clip.index))
            .ok_or_else(|| HoistError::UnknownPose(name.to_string()))
    }

    /// Overlay another map, its entries winning
    pub fn merge(&mut self, other: PoseMap) {
        self.poses.extend(other.poses);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.poses.iter().map(|(name, &clip)| (name.as_str(), clip))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
