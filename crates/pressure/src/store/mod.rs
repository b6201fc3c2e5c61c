//! Pressure curve storage.
//!
//! This module provides:
//! - [`CurveStore`] - Brush curves and the global default, with change listeners
//! - [`CurveStoreEvent`] - Change notifications for host integration
//! - [`BrushIdentity`] / [`BrushKey`] - Brush identity and its store key
//!
//! ## Resolution order
//!
//! When a brush becomes active its curve is looked up as:
//!
//! ```text
//! brush curve -> global default -> identity
//! ```
//!
//! Applying a curve to all brushes drops every brush curve, so the new
//! global default takes effect everywhere.

mod events;
mod keying;
mod storage;

pub use events::CurveStoreEvent;
pub use keying::{BrushIdentity, BrushKey, KeyStrategy};
pub use storage::{CurveStore, CurveStoreState, StoreError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplyScope, Curve};
    use std::sync::{Arc, Mutex};
    use stylus_config::FitMode;

    fn key(name: &str) -> BrushKey {
        BrushKey::new(name).unwrap()
    }

    fn soft_curve() -> Curve {
        Curve::from_pairs(&[[0.0, 0.0], [0.5, 0.25], [1.0, 1.0]], Some(FitMode::PowerLaw)).unwrap()
    }

    fn hard_curve() -> Curve {
        Curve::from_pairs(&[[0.0, 0.0], [0.5, 0.7], [1.0, 0.9]], Some(FitMode::Sigmoid)).unwrap()
    }

    #[test]
    fn test_resolve_empty_store_is_identity() {
        let store = CurveStore::new();
        assert!(store.is_enabled());
        assert_eq!(store.resolve(None), Curve::identity());
        assert_eq!(store.resolve(Some(&key("Pencil"))), Curve::identity());
    }

    #[test]
    fn test_apply_current_brush() {
        let mut store = CurveStore::new();
        store
            .apply(Some(&key("Pencil")), &soft_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();

        assert_eq!(store.brush_count(), 1);
        assert_eq!(store.resolve(Some(&key("Pencil"))), soft_curve());
        assert_eq!(store.resolve(Some(&key("Ink"))), Curve::identity());

        // Upsert replaces
        store
            .apply(Some(&key("Pencil")), &hard_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();
        assert_eq!(store.brush_count(), 1);
        assert_eq!(store.brush_curve(&key("Pencil")), Some(hard_curve()));
    }

    #[test]
    fn test_apply_without_brush_fails() {
        let mut store = CurveStore::new();
        let before = store.state().clone();
        assert_eq!(
            store.apply(None, &soft_curve(), ApplyScope::CurrentBrushOnly),
            Err(StoreError::NoActiveBrush)
        );
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_apply_all_brushes_replaces_brush_curves() {
        let mut store = CurveStore::new();
        store
            .apply(Some(&key("Pencil")), &soft_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();
        store
            .apply(Some(&key("Pencil")), &hard_curve(), ApplyScope::AllBrushes)
            .unwrap();

        assert_eq!(store.brush_count(), 0);
        assert_eq!(store.global_default(), Some(hard_curve()));
        assert_eq!(store.resolve(Some(&key("Pencil"))), hard_curve());
    }

    #[test]
    fn test_resolve_falls_back_to_global_default() {
        let mut store = CurveStore::new();
        store.apply(None, &hard_curve(), ApplyScope::AllBrushes).unwrap();
        store
            .apply(Some(&key("Pencil")), &soft_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();

        assert_eq!(store.resolve(Some(&key("Brush X"))), hard_curve());
        assert_eq!(store.resolve(None), hard_curve());
        assert_eq!(store.resolve(Some(&key("Pencil"))), soft_curve());
    }

    #[test]
    fn test_reset_one_and_all() {
        let mut store = CurveStore::new();
        store.apply(None, &hard_curve(), ApplyScope::AllBrushes).unwrap();
        store
            .apply(Some(&key("Pencil")), &soft_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();

        assert!(store.reset_one(&key("Pencil")));
        assert!(!store.reset_one(&key("Pencil")));
        assert_eq!(store.resolve(Some(&key("Pencil"))), hard_curve());

        store.reset_all();
        assert_eq!(store.global_default(), None);
        assert_eq!(store.resolve(Some(&key("Pencil"))), Curve::identity());
    }

    #[test]
    fn test_stored_curves_are_copies() {
        let mut store = CurveStore::new();
        let mut curve = soft_curve();
        store
            .apply(Some(&key("Pencil")), &curve, ApplyScope::CurrentBrushOnly)
            .unwrap();
        curve = Curve::identity();

        assert_ne!(store.resolve(Some(&key("Pencil"))), curve);
    }

    #[test]
    fn test_event_listener() {
        let mut store = CurveStore::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        store.add_event_listener(move |event| {
            sink.lock().unwrap().push(event);
        });

        store
            .apply(Some(&key("Pencil")), &soft_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();
        store.set_enabled(false);
        // No change, no event
        store.set_enabled(false);
        store.reset_one(&key("Pencil"));
        store.reset_all();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            CurveStoreEvent::CurveApplied { brush: Some(b), scope: ApplyScope::CurrentBrushOnly, .. }
                if b.as_str() == "Pencil"
        ));
        assert_eq!(events[1], CurveStoreEvent::EnabledChanged { enabled: false });
        assert_eq!(events[2], CurveStoreEvent::BrushReset { brush: key("Pencil") });
        assert_eq!(events[3], CurveStoreEvent::AllReset);
    }

    #[test]
    fn test_disabled_store_still_resolves() {
        let mut store = CurveStore::new();
        store
            .apply(Some(&key("Pencil")), &soft_curve(), ApplyScope::CurrentBrushOnly)
            .unwrap();
        store.set_enabled(false);
        assert!(!store.is_enabled());
        assert_eq!(store.resolve(Some(&key("Pencil"))), soft_curve());
    }
}
