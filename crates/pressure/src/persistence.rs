//! On-disk curve store
//!
//! The store is written as one JSON document:
//!
//! ```text
//! {
//!   "version": 1,
//!   "enabled": true,
//!   "global_default": { "mode": "power_law", "points": [[0.0, 0.0], [1.0, 1.0]] },
//!   "brushes": [ { "brush": "Pencil", "mode": "sigmoid", "points": [...] } ]
//! }
//! ```
//!
//! Writes go to a temporary file in the target directory which is then
//! renamed over the old document. Loading never fails: a missing or broken
//! document gives an empty store, broken records are skipped.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stylus_config::FitMode;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::STORE_FORMAT_VERSION;
use crate::store::{BrushKey, CurveStore, CurveStoreState};
use crate::types::Curve;
use crate::validation::CurveError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Curve store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Curve store JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to replace curve store: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Serialize, Deserialize)]
struct CurveRecord {
    #[serde(default)]
    mode: Option<String>,
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BrushRecord {
    brush: String,
    #[serde(flatten)]
    curve: CurveRecord,
}

#[derive(Debug, Serialize)]
struct StoreDocument {
    version: u32,
    enabled: bool,
    global_default: Option<CurveRecord>,
    brushes: Vec<BrushRecord>,
}

impl CurveRecord {
    fn from_curve(curve: &Curve) -> Self {
        Self {
            mode: curve.mode().map(|mode| mode_name(mode).to_string()),
            points: curve.to_pairs(),
        }
    }

    fn into_curve(self) -> Result<Curve, CurveError> {
        let mode = self.mode.as_deref().and_then(FitMode::parse);
        Curve::from_pairs(&self.points, mode)
    }
}

/// Serialized mode tag, matching the serde name of [`FitMode`]
fn mode_name(mode: FitMode) -> &'static str {
    match mode {
        FitMode::PowerLaw => "power_law",
        FitMode::RangeNormalize => "range_normalize",
        FitMode::SquaredNormalize => "squared_normalize",
        FitMode::Sigmoid => "sigmoid",
    }
}

/// Reads and writes the curve store document at a fixed path
#[derive(Debug, Clone)]
pub struct CurveStorePersistence {
    path: PathBuf,
}

impl CurveStorePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store atomically, creating parent directories
    pub fn save(&self, store: &CurveStore) -> Result<(), PersistenceError> {
        let json = encode(store.state())?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        info!(
            "Saved {} brush curves to {}",
            store.brush_count(),
            self.path.display()
        );
        Ok(())
    }

    /// Load the store; never fails
    pub fn load(&self) -> CurveStore {
        CurveStore::from_state(self.load_state())
    }

    pub fn load_state(&self) -> CurveStoreState {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No curve store at {}, starting empty", self.path.display());
                return CurveStoreState::default();
            }
            Err(e) => {
                warn!("Failed to read curve store {}: {}", self.path.display(), e);
                return CurveStoreState::default();
            }
        };

        let state = decode(&text);
        debug!(
            "Loaded {} brush curves from {}",
            state.brushes.len(),
            self.path.display()
        );
        state
    }
}

/// Serialize store contents to the JSON document
pub fn encode(state: &CurveStoreState) -> Result<String, PersistenceError> {
    let document = StoreDocument {
        version: STORE_FORMAT_VERSION,
        enabled: state.enabled,
        global_default: state.global_default.as_ref().map(CurveRecord::from_curve),
        brushes: state
            .brushes
            .iter()
            .map(|(key, curve)| BrushRecord {
                brush: key.as_str().to_string(),
                curve: CurveRecord::from_curve(curve),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse a JSON document, skipping anything that does not check out
pub fn decode(text: &str) -> CurveStoreState {
    let mut state = CurveStoreState::default();

    let root = match serde_json::from_str::<Value>(text) {
        Ok(root) if root.is_object() => root,
        Ok(_) => {
            warn!("Curve store is not a JSON object, ignoring it");
            return state;
        }
        Err(e) => {
            warn!("Failed to parse curve store: {}", e);
            return state;
        }
    };

    if let Some(version) = root.get("version").and_then(Value::as_u64) {
        if version > STORE_FORMAT_VERSION as u64 {
            warn!(
                "Curve store version {} is newer than {}, reading what we can",
                version, STORE_FORMAT_VERSION
            );
        }
    }

    if let Some(enabled) = root.get("enabled").and_then(Value::as_bool) {
        state.enabled = enabled;
    }

    match root.get("global_default") {
        None | Some(Value::Null) => {}
        Some(value) => match serde_json::from_value::<CurveRecord>(value.clone()) {
            Ok(record) => match record.into_curve() {
                Ok(curve) => state.global_default = Some(curve),
                Err(e) => warn!("Skipping invalid global default curve: {}", e),
            },
            Err(e) => warn!("Skipping malformed global default curve: {}", e),
        },
    }

    let records = root
        .get("brushes")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut brushes = BTreeMap::new();
    for (index, value) in records.into_iter().enumerate() {
        let record = match serde_json::from_value::<BrushRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed brush record {}: {}", index, e);
                continue;
            }
        };

        let Some(key) = BrushKey::new(record.brush.clone()) else {
            warn!("Skipping brush record {} with an empty name", index);
            continue;
        };

        match record.curve.into_curve() {
            Ok(curve) => {
                brushes.insert(key, curve);
            }
            Err(e) => warn!("Skipping invalid curve for brush '{}': {}", record.brush, e),
        }
    }
    state.brushes = brushes;

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApplyScope;

    fn key(name: &str) -> BrushKey {
        BrushKey::new(name).unwrap()
    }

    fn sample_store() -> CurveStore {
        let mut store = CurveStore::new();
        let global = Curve::from_pairs(
            &[[0.0, 0.0], [1.0 / 3.0, 0.1], [2.0 / 3.0, 0.45], [1.0, 0.9]],
            Some(FitMode::PowerLaw),
        )
        .unwrap();
        let pencil = Curve::from_pairs(
            &[[0.0, 0.0], [0.5, 0.123456789012345], [1.0, 1.0]],
            Some(FitMode::Sigmoid),
        )
        .unwrap();
        let ink = Curve::from_pairs(&[[0.0, 0.1], [1.0, 0.7]], None).unwrap();

        store.apply(None, &global, ApplyScope::AllBrushes).unwrap();
        store
            .apply(Some(&key("Pencil")), &pencil, ApplyScope::CurrentBrushOnly)
            .unwrap();
        store
            .apply(Some(&key("Ink")), &ink, ApplyScope::CurrentBrushOnly)
            .unwrap();
        store.set_enabled(false);
        store
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = CurveStorePersistence::new(dir.path().join("nested/curves.json"));

        let store = sample_store();
        persistence.save(&store).unwrap();

        let loaded = persistence.load();
        assert_eq!(loaded, store);
        assert_eq!(loaded.brush_count(), 2);
        assert!(!loaded.is_enabled());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = CurveStorePersistence::new(dir.path().join("curves.json"));

        persistence.save(&sample_store()).unwrap();
        let empty = CurveStore::new();
        persistence.save(&empty).unwrap();

        assert_eq!(persistence.load(), empty);
        // Only the document remains, no stray temp files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = CurveStorePersistence::new(dir.path().join("absent.json"));
        assert_eq!(persistence.load(), CurveStore::new());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.json");
        std::fs::write(&path, "{ not json").unwrap();

        let persistence = CurveStorePersistence::new(path);
        assert_eq!(persistence.load(), CurveStore::new());
        assert_eq!(decode("[1, 2, 3]"), CurveStoreState::default());
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let text = r#"{
            "version": 1,
            "enabled": true,
            "global_default": { "mode": "power_law", "points": [[0.0, 0.2], [0.5, 0.1]] },
            "brushes": [
                { "brush": "Pencil", "mode": "sigmoid", "points": [[0.0, 0.0], [1.0, 0.8]] },
                { "brush": "Broken", "points": "nope" },
                { "brush": "Backwards", "points": [[0.0, 0.0], [0.7, 0.5], [0.3, 0.6], [1.0, 1.0]] },
                { "brush": "", "points": [[0.0, 0.0], [1.0, 1.0]] },
                { "brush": "Odd mode", "mode": "spline", "points": [[0.0, 0.0], [1.0, 1.0]] },
                42
            ]
        }"#;

        let state = decode(text);
        assert_eq!(state.global_default, None);
        assert_eq!(state.brushes.len(), 2);

        let pencil = &state.brushes[&key("Pencil")];
        assert_eq!(pencil.mode(), Some(FitMode::Sigmoid));
        assert_eq!(pencil.to_pairs(), vec![[0.0, 0.0], [1.0, 0.8]]);

        // Unknown mode tags keep the curve, without a mode
        assert_eq!(state.brushes[&key("Odd mode")].mode(), None);
    }

    #[test]
    fn test_encode_layout() {
        let json = encode(sample_store().state()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["enabled"], false);
        assert_eq!(value["global_default"]["mode"], "power_law");
        let brushes = value["brushes"].as_array().unwrap();
        assert_eq!(brushes.len(), 2);
        assert_eq!(brushes[0]["brush"], "Ink");
        assert_eq!(brushes[0]["mode"], Value::Null);
        assert_eq!(brushes[1]["brush"], "Pencil");
    }
}
