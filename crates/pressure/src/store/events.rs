//! Events emitted when the curve store changes.

use crate::types::{ApplyScope, Curve};

use super::keying::BrushKey;

/// Curve store change notifications.
///
/// Lets the host refresh brush editors or mark its settings dirty without
/// polling the store.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveStoreEvent {
    /// A fitted curve was stored. `brush` is None for the global default.
    CurveApplied {
        brush: Option<BrushKey>,
        scope: ApplyScope,
        curve: Curve,
    },
    /// One brush lost its calibration.
    BrushReset { brush: BrushKey },
    /// Every brush curve and the global default were dropped.
    AllReset,
    /// Calibrated curves were switched on or off.
    EnabledChanged { enabled: bool },
}
