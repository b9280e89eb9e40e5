//! Boundary patch names and types.

use super::BoundaryTagger;
use crate::graph::FaceAttributes;
use crate::topology::Face;
use ::config::constants::DEFAULT_PATCH_NAME;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Boundary condition class written next to each patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchType {
    /// Solid wall
    #[default]
    Wall,
    /// Generic patch
    Patch,
    /// Empty (2D) patch
    Empty,
    /// Symmetry plane
    Symmetry,
}

impl PatchType {
    /// Name as written by mesh writers
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchType::Wall => "wall",
            PatchType::Patch => "patch",
            PatchType::Empty => "empty",
            PatchType::Symmetry => "symmetry",
        }
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" => Ok(PatchType::Wall),
            "patch" => Ok(PatchType::Patch),
            "empty" => Ok(PatchType::Empty),
            "symmetry" => Ok(PatchType::Symmetry),
            other => Err(format!("unknown patch type: {other}")),
        }
    }
}

/// Patch name and type of one face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchTag {
    /// Normalized patch name
    pub name: String,
    /// Boundary condition class
    #[serde(rename = "type")]
    pub kind: PatchType,
}

impl Default for PatchTag {
    fn default() -> Self {
        Self {
            name: DEFAULT_PATCH_NAME.to_string(),
            kind: PatchType::Wall,
        }
    }
}

/// Trims a patch name and replaces inner whitespace with underscores.
///
/// # Examples
/// ```
/// use hexblock::collab::normalize_patch_name;
/// assert_eq!(normalize_patch_name("  inlet  left "), "inlet_left");
/// ```
pub fn normalize_patch_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// In-memory patch table keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct PatchRegistry {
    patches: BTreeMap<String, PatchType>,
}

impl PatchRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or retypes a patch; returns the normalized name, or `None` when
    /// the name is blank.
    pub fn register(&mut self, name: &str, kind: PatchType) -> Option<String> {
        let name = normalize_patch_name(name);
        if name.is_empty() {
            return None;
        }
        self.patches.insert(name.clone(), kind);
        Some(name)
    }

    /// Type of a registered patch
    pub fn kind(&self, name: &str) -> Option<PatchType> {
        self.patches.get(&normalize_patch_name(name)).copied()
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.patches.keys().map(String::as_str)
    }
}

impl BoundaryTagger for PatchRegistry {
    /// Faces naming an unregistered patch keep the name and default to wall.
    fn tag(&self, _face: &Face, attributes: &FaceAttributes) -> Option<PatchTag> {
        let name = normalize_patch_name(attributes.patch.as_deref()?);
        if name.is_empty() {
            return None;
        }
        let kind = self.patches.get(&name).copied().unwrap_or_default();
        Some(PatchTag { name, kind })
    }
}
