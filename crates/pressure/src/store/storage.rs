//! Per-brush and global curve storage.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::types::{ApplyScope, Curve};

use super::events::CurveStoreEvent;
use super::keying::BrushKey;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("No active brush for a current-brush calibration")]
    NoActiveBrush,
}

/// Plain curve store contents, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveStoreState {
    pub brushes: BTreeMap<BrushKey, Curve>,
    pub global_default: Option<Curve>,
    pub enabled: bool,
}

impl Default for CurveStoreState {
    fn default() -> Self {
        Self {
            brushes: BTreeMap::new(),
            global_default: None,
            enabled: true,
        }
    }
}

/// Brush curves, the global default and the enabled flag.
///
/// Curves are cloned in and out; nothing handed to a device aliases a
/// stored curve.
pub struct CurveStore {
    state: CurveStoreState,
    /// Change listeners. Each receives cloned events.
    #[allow(clippy::type_complexity)]
    event_listeners: Vec<Box<dyn Fn(CurveStoreEvent) + Send + Sync>>,
}

impl std::fmt::Debug for CurveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveStore")
            .field("brush_count", &self.state.brushes.len())
            .field("has_global_default", &self.state.global_default.is_some())
            .field("enabled", &self.state.enabled)
            .field("listener_count", &self.event_listeners.len())
            .finish()
    }
}

impl Default for CurveStore {
    fn default() -> Self {
        Self::from_state(CurveStoreState::default())
    }
}

impl PartialEq for CurveStore {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: CurveStoreState) -> Self {
        Self {
            state,
            event_listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &CurveStoreState {
        &self.state
    }

    /// Store a fitted curve.
    ///
    /// `AllBrushes` drops every brush curve and makes `curve` the global
    /// default. `CurrentBrushOnly` needs a brush; without one nothing
    /// changes.
    pub fn apply(
        &mut self,
        brush: Option<&BrushKey>,
        curve: &Curve,
        scope: ApplyScope,
    ) -> Result<(), StoreError> {
        match scope {
            ApplyScope::AllBrushes => {
                debug!(
                    "CurveStore::apply: global default, dropping {} brush curves",
                    self.state.brushes.len()
                );
                self.state.brushes.clear();
                self.state.global_default = Some(curve.clone());
            }
            ApplyScope::CurrentBrushOnly => {
                let brush = brush.ok_or(StoreError::NoActiveBrush)?;
                debug!("CurveStore::apply: brush '{}'", brush);
                self.state.brushes.insert(brush.clone(), curve.clone());
            }
        }

        self.emit_event(CurveStoreEvent::CurveApplied {
            brush: match scope {
                ApplyScope::AllBrushes => None,
                ApplyScope::CurrentBrushOnly => brush.cloned(),
            },
            scope,
            curve: curve.clone(),
        });
        Ok(())
    }

    /// Curve for a brush: its own curve, else the global default, else identity
    pub fn resolve(&self, brush: Option<&BrushKey>) -> Curve {
        brush
            .and_then(|key| self.state.brushes.get(key))
            .or(self.state.global_default.as_ref())
            .cloned()
            .unwrap_or_else(Curve::identity)
    }

    /// Drop one brush's curve. Returns whether it had one.
    pub fn reset_one(&mut self, brush: &BrushKey) -> bool {
        let removed = self.state.brushes.remove(brush).is_some();
        if removed {
            self.emit_event(CurveStoreEvent::BrushReset {
                brush: brush.clone(),
            });
        }
        removed
    }

    /// Drop every brush curve and the global default
    pub fn reset_all(&mut self) {
        self.state.brushes.clear();
        self.state.global_default = None;
        self.emit_event(CurveStoreEvent::AllReset);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.state.enabled == enabled {
            return;
        }
        self.state.enabled = enabled;
        self.emit_event(CurveStoreEvent::EnabledChanged { enabled });
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn brush_count(&self) -> usize {
        self.state.brushes.len()
    }

    pub fn brush_keys(&self) -> Vec<BrushKey> {
        self.state.brushes.keys().cloned().collect()
    }

    pub fn brush_curve(&self, brush: &BrushKey) -> Option<Curve> {
        self.state.brushes.get(brush).cloned()
    }

    pub fn global_default(&self) -> Option<Curve> {
        self.state.global_default.clone()
    }

    /// Register a change listener.
    ///
    /// The listener receives cloned events for:
    /// - `CurveApplied` - a fitted curve was stored
    /// - `BrushReset` - a brush curve was removed
    /// - `AllReset` - the store was emptied
    /// - `EnabledChanged` - calibrated curves were switched on or off
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(CurveStoreEvent) + Send + Sync + 'static,
    {
        self.event_listeners.push(Box::new(listener));
    }

    fn emit_event(&self, event: CurveStoreEvent) {
        for listener in &self.event_listeners {
            listener(event.clone());
        }
    }
}
