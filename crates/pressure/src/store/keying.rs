//! Brush identity to curve store key

use std::fmt;

use serde::{Deserialize, Serialize};
use stylus_config::BrushKeying;

/// What the host knows about a brush
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrushIdentity {
    /// Display name shown in the brush picker
    pub name: String,
    /// Host identifier that survives renames, if the host has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,
}

impl BrushIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stable_id: None,
        }
    }

    pub fn with_stable_id(name: impl Into<String>, stable_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stable_id: Some(stable_id.into()),
        }
    }
}

/// Curve store key for a brush
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrushKey(String);

impl BrushKey {
    /// Returns None for an empty key
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrushKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a brush identity to its store key
pub trait KeyStrategy {
    fn key_for(&self, brush: &BrushIdentity) -> Option<BrushKey>;
}

impl KeyStrategy for BrushKeying {
    fn key_for(&self, brush: &BrushIdentity) -> Option<BrushKey> {
        match self {
            BrushKeying::DisplayName => BrushKey::new(brush.name.clone()),
            BrushKeying::StableId => brush
                .stable_id
                .as_ref()
                .and_then(|id| BrushKey::new(id.clone()))
                .or_else(|| BrushKey::new(brush.name.clone())),
        }
    }
}
