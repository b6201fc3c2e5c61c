//! Calibration session
//!
//! This module provides the session object the host drives:
//! - Recording (stroke input feeds the sample buffer)
//! - Applying (samples are fitted and the curve is stored)
//! - Curve management (enable toggle, resets, brush/device changes)
//! - Live device updates through a [`DeviceCurveSink`]
//!
//! All state lives on [`CalibrationSession`]; there are no globals.

mod apply;
mod curves;
mod recording;

use stylus_config::{clamp_power, CalibrationConfig};
use tracing::{info, warn};

use crate::device::{DeviceCurveSink, DeviceId};
use crate::fitter::CurveFitter;
use crate::persistence::CurveStorePersistence;
use crate::samples::SampleBuffer;
use crate::store::{BrushIdentity, BrushKey, CurveStore, KeyStrategy};

pub use apply::CalibrationReport;
pub use recording::SessionSummary;

/// Pressure calibration for one host session
///
/// Input flows in via `begin_stroke`, `record_sample` and `end_stroke`.
/// `apply_calibration` fits the recorded samples, stores the curve for the
/// active brush (or all brushes), saves the store and pushes the resolved
/// curve to the active device.
pub struct CalibrationSession<S: DeviceCurveSink> {
    pub(crate) buffer: SampleBuffer,
    pub(crate) store: CurveStore,
    pub(crate) fitter: CurveFitter,
    pub(crate) config: CalibrationConfig,
    /// None keeps everything in memory
    pub(crate) persistence: Option<CurveStorePersistence>,
    pub(crate) sink: S,
    /// User power setting used when apply gets no explicit exponent
    pub(crate) power: f64,
    /// True from the first stroke until clear or apply
    pub(crate) recording: bool,
    /// True while the pen is down
    pub(crate) drawing: bool,
    pub(crate) active_brush: Option<BrushIdentity>,
    pub(crate) active_device: Option<DeviceId>,
}

impl<S: DeviceCurveSink> std::fmt::Debug for CalibrationSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationSession")
            .field("samples", &self.buffer.sample_count())
            .field("store", &self.store)
            .field("power", &self.power)
            .field("recording", &self.recording)
            .field("active_brush", &self.active_brush)
            .field("active_device", &self.active_device)
            .finish()
    }
}

impl<S: DeviceCurveSink> CalibrationSession<S> {
    /// In-memory session starting from an empty store
    pub fn new(config: CalibrationConfig, sink: S) -> Self {
        Self::with_store(config, CurveStore::new(), sink)
    }

    /// In-memory session over an existing store
    pub fn with_store(config: CalibrationConfig, store: CurveStore, sink: S) -> Self {
        Self {
            buffer: SampleBuffer::new(),
            store,
            fitter: CurveFitter::from_config(&config),
            power: clamp_power(config.default_power),
            config,
            persistence: None,
            sink,
            recording: false,
            drawing: false,
            active_brush: None,
            active_device: None,
        }
    }

    /// Session backed by a store file, loading whatever it holds
    pub fn with_persistence(
        config: CalibrationConfig,
        persistence: CurveStorePersistence,
        sink: S,
    ) -> Self {
        let store = persistence.load();
        info!(
            "Curve store {}: {} brush curves, global default: {}, enabled: {}",
            persistence.path().display(),
            store.brush_count(),
            store.global_default().is_some(),
            store.is_enabled()
        );
        let mut session = Self::with_store(config, store, sink);
        session.persistence = Some(persistence);
        session
    }

    /// Session using the store location from the configuration
    ///
    /// Falls back to an in-memory store when no location can be resolved.
    pub fn open(config: CalibrationConfig, sink: S) -> Self {
        match config.resolved_store_path() {
            Some(path) => Self::with_persistence(config, CurveStorePersistence::new(path), sink),
            None => {
                warn!("No config directory available, curves will not be saved");
                Self::new(config, sink)
            }
        }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn fitter(&self) -> &CurveFitter {
        &self.fitter
    }

    pub fn store(&self) -> &CurveStore {
        &self.store
    }

    /// Mutable store access, e.g. to register change listeners
    pub fn store_mut(&mut self) -> &mut CurveStore {
        &mut self.store
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn persistence(&self) -> Option<&CurveStorePersistence> {
        self.persistence.as_ref()
    }

    pub fn active_brush(&self) -> Option<&BrushIdentity> {
        self.active_brush.as_ref()
    }

    pub fn active_device(&self) -> Option<&DeviceId> {
        self.active_device.as_ref()
    }

    /// Store key of the active brush under the configured keying
    pub fn active_brush_key(&self) -> Option<BrushKey> {
        self.key_for(self.active_brush.as_ref())
    }

    pub(crate) fn key_for(&self, brush: Option<&BrushIdentity>) -> Option<BrushKey> {
        brush.and_then(|b| self.config.brush_keying.key_for(b))
    }
}
