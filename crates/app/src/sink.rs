//! Device curve sink that reports curve changes to the UI

use pressure::{Curve, DeviceAxis, DeviceCurveSink, DeviceId};
use stylus_ipc::CalibrationToUi;
use tracing::trace;

use crate::handler::curve_data;

/// Queues a `DeviceCurveChanged` message for every live curve update.
///
/// The host applies the curve when it receives the message.
#[derive(Debug, Default)]
pub struct OutboundDeviceSink {
    pending: Vec<CalibrationToUi>,
}

impl OutboundDeviceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued message
    pub fn drain(&mut self) -> Vec<CalibrationToUi> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl DeviceCurveSink for OutboundDeviceSink {
    fn set_device_curve(&mut self, device: &DeviceId, axis: DeviceAxis, curve: Curve) {
        trace!("Queue {:?} curve for device {}", axis, device);
        self.pending.push(CalibrationToUi::DeviceCurveChanged {
            device: device.to_string(),
            curve: curve_data(&curve),
        });
    }

    fn reset_device_curve(&mut self, device: &DeviceId, axis: DeviceAxis) {
        self.set_device_curve(device, axis, Curve::identity());
    }
}
