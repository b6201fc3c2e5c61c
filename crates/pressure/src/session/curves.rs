//! Curve management for the calibration session

use stylus_config::clamp_power;
use tracing::{debug, info, warn};

use crate::device::{DeviceAxis, DeviceCurveSink, DeviceId};
use crate::persistence::PersistenceError;
use crate::store::BrushIdentity;
use crate::types::Curve;

use super::CalibrationSession;

impl<S: DeviceCurveSink> CalibrationSession<S> {
    /// Flip calibrated curves on or off; returns the new state
    pub fn toggle_enabled(&mut self) -> bool {
        let enabled = !self.store.is_enabled();
        self.set_enabled(enabled);
        enabled
    }

    /// While disabled the device runs on the identity curve. Stored curves
    /// are kept and still shown.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.store.is_enabled() == enabled {
            return;
        }
        self.store.set_enabled(enabled);
        info!(
            "Calibrated pressure curves {}",
            if enabled { "enabled" } else { "disabled" }
        );
        self.push_live_curve();
        self.persist();
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    pub fn current_power_setting(&self) -> f64 {
        self.power
    }

    /// Set the power used by the next apply; clamped to the valid range
    pub fn set_power_setting(&mut self, power: f64) -> f64 {
        self.power = clamp_power(power);
        debug!("Power setting: {:.2}", self.power);
        self.power
    }

    /// Stored curve for a brush, regardless of the enabled flag
    pub fn curve_for_brush(&self, brush: Option<&BrushIdentity>) -> Curve {
        self.store.resolve(self.key_for(brush).as_ref())
    }

    /// Curve the active device should be using right now
    pub fn active_curve(&self) -> Curve {
        if self.store.is_enabled() {
            self.store.resolve(self.active_brush_key().as_ref())
        } else {
            Curve::identity()
        }
    }

    /// The host switched brushes
    pub fn brush_changed(&mut self, brush: Option<BrushIdentity>) {
        debug!(
            "Active brush: {}",
            brush.as_ref().map(|b| b.name.as_str()).unwrap_or("<none>")
        );
        self.active_brush = brush;
        self.push_live_curve();
    }

    /// The host switched input devices
    pub fn device_changed(&mut self, device: Option<DeviceId>) {
        debug!(
            "Active device: {}",
            device.as_ref().map(DeviceId::as_str).unwrap_or("<none>")
        );
        self.active_device = device;
        self.push_live_curve();
    }

    /// Drop one brush's curve; it falls back to the global default
    pub fn reset_brush(&mut self, brush: &BrushIdentity) -> bool {
        let Some(key) = self.key_for(Some(brush)) else {
            return false;
        };
        let removed = self.store.reset_one(&key);
        if removed {
            info!("Reset pressure curve for brush '{}'", key);
            if self.active_brush_key().as_ref() == Some(&key) {
                self.push_live_curve();
            }
            self.persist();
        }
        removed
    }

    /// Drop every stored curve
    pub fn reset_all(&mut self) {
        self.store.reset_all();
        info!("Reset all pressure curves");
        self.push_live_curve();
        self.persist();
    }

    /// Write the store now
    pub fn save(&self) -> Result<(), PersistenceError> {
        match &self.persistence {
            Some(persistence) => persistence.save(&self.store),
            None => Ok(()),
        }
    }

    /// Final save before the host exits
    pub fn shutdown(&mut self) {
        self.drawing = false;
        if let Err(e) = self.save() {
            warn!("Failed to save pressure curves on shutdown: {}", e);
        }
    }

    /// Send the curve the active device should use to the sink
    pub(crate) fn push_live_curve(&mut self) {
        let Some(device) = self.active_device.clone() else {
            return;
        };

        if self.store.is_enabled() {
            let curve = self.active_curve();
            debug!("Device {}: {} point pressure curve", device, curve.len());
            self.sink
                .set_device_curve(&device, DeviceAxis::Pressure, curve);
        } else {
            debug!("Device {}: identity pressure curve (disabled)", device);
            self.sink.reset_device_curve(&device, DeviceAxis::Pressure);
        }
    }

    /// Save, logging failures. Returns whether a file was written.
    pub(crate) fn persist(&self) -> bool {
        let Some(persistence) = &self.persistence else {
            return false;
        };
        match persistence.save(&self.store) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save pressure curves: {}", e);
                false
            }
        }
    }
}
