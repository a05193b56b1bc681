//! JSON rig descriptions.
//!
//! ```json
//! {
//!   "scene": { "skeletonPath": "skeletonPath", "keySeparator": "-" },
//!   "joints": [
//!     { "id": 11 },
//!     { "id": 10, "parent": 11 },
//!     { "id": 12, "parent": 11 }
//!   ]
//! }
//! ```
//!
//! Joints may be listed in any order; siblings keep their listed order.

use crate::{Error, SceneConfig, SkeletonTree};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Root {
    #[serde(default)]
    scene: Option<SceneDef>,
    joints: Vec<JointEntry>,
}

#[derive(Debug, Deserialize)]
struct SceneDef {
    #[serde(default, rename = "skeletonPath")]
    skeleton_path: Option<String>,
    #[serde(default, rename = "keySeparator")]
    key_separator: Option<char>,
}

#[derive(Debug, Deserialize)]
struct JointEntry {
    id: u32,
    #[serde(default)]
    parent: Option<u32>,
}

/// Scene options plus joint topology, as loaded from one JSON document.
#[derive(Clone, Debug)]
pub struct RigConfig {
    pub scene: SceneConfig,
    pub skeleton: SkeletonTree,
}

impl RigConfig {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let root: Root = serde_json::from_str(input).map_err(|e| Error::JsonParse {
            message: e.to_string(),
        })?;

        let mut scene = SceneConfig::default();
        if let Some(def) = root.scene {
            if let Some(id) = def.skeleton_path {
                scene.skeleton_path_id = id;
            }
            if let Some(sep) = def.key_separator {
                scene.key_separator = sep;
            }
        }

        let pairs: Vec<(u32, Option<u32>)> =
            root.joints.iter().map(|j| (j.id, j.parent)).collect();
        let skeleton = SkeletonTree::from_parents(&pairs)?;

        Ok(Self { scene, skeleton })
    }
}

impl SkeletonTree {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        RigConfig::from_json_str(input).map(|config| config.skeleton)
    }
}
