//! Live device curve sink

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Curve;

/// Host identifier of an input device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Device axis a curve is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceAxis {
    Pressure,
}

/// Receives the curve a device should use right now.
///
/// Implemented by the host's device manager. Every curve passed in is a
/// fresh copy owned by the sink.
pub trait DeviceCurveSink {
    fn set_device_curve(&mut self, device: &DeviceId, axis: DeviceAxis, curve: Curve);

    /// Put the device back on its linear response
    fn reset_device_curve(&mut self, device: &DeviceId, axis: DeviceAxis);
}

/// Sink that just remembers the last curve per device and axis
#[derive(Debug, Clone, Default)]
pub struct MemoryDeviceSink {
    curves: HashMap<(DeviceId, DeviceAxis), Curve>,
    updates: usize,
}

impl MemoryDeviceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current curve for a device axis (identity if never set)
    pub fn curve(&self, device: &DeviceId, axis: DeviceAxis) -> Curve {
        self.curves
            .get(&(device.clone(), axis))
            .cloned()
            .unwrap_or_else(Curve::identity)
    }

    /// Number of set/reset calls received
    pub fn update_count(&self) -> usize {
        self.updates
    }
}

impl DeviceCurveSink for MemoryDeviceSink {
    fn set_device_curve(&mut self, device: &DeviceId, axis: DeviceAxis, curve: Curve) {
        self.curves.insert((device.clone(), axis), curve);
        self.updates += 1;
    }

    fn reset_device_curve(&mut self, device: &DeviceId, axis: DeviceAxis) {
        self.curves.remove(&(device.clone(), axis));
        self.updates += 1;
    }
}
