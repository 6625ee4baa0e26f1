//! Screen calibration against a physical credit card.
//!
//! The ratio scales real millimetres to on-screen size. It is clamped to
//! `[MIN_CALIBRATION_RATIO, MAX_CALIBRATION_RATIO]` and written to storage after
//! every change.

use crate::config::{
    CALIBRATION_STORAGE_KEY, CREDIT_CARD_HEIGHT_MM, DEFAULT_CALIBRATION_RATIO,
    MAX_CALIBRATION_RATIO, MIN_CALIBRATION_RATIO, PRECISION_STEP_MM, PX_PER_MM,
};
use crate::storage::KeyValueStore;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct CalibrationStore<S: KeyValueStore> {
    ratio: f64,
    store: S,
}

/// Clamp a ratio into the accepted range.
pub fn clamp_ratio(ratio: f64) -> f64 {
    ratio.clamp(MIN_CALIBRATION_RATIO, MAX_CALIBRATION_RATIO)
}

/// Ratio change for one precision step: 0.1 mm of real size on the reference card.
pub fn precision_step() -> f64 {
    PRECISION_STEP_MM / CREDIT_CARD_HEIGHT_MM
}

/// On-screen pixel height of the reference card at the given ratio.
pub fn reference_height_px(ratio: f64) -> f64 {
    CREDIT_CARD_HEIGHT_MM * ratio * PX_PER_MM
}

fn parse_stored_ratio(raw: Option<String>) -> Option<f64> {
    let value = raw?.trim().parse::<f64>().ok()?;
    value.is_finite().then(|| clamp_ratio(value))
}

impl<S: KeyValueStore> CalibrationStore<S> {
    /// Load the persisted ratio, falling back to the default when it is
    /// missing or unreadable.
    pub fn load(store: S) -> Self {
        let ratio = match parse_stored_ratio(store.get(CALIBRATION_STORAGE_KEY)) {
            Some(ratio) => {
                info!("Loaded calibration ratio {:.6}", ratio);
                ratio
            }
            None => {
                debug!("No usable stored calibration, using default");
                DEFAULT_CALIBRATION_RATIO
            }
        };
        CalibrationStore { ratio, store }
    }

    pub fn current(&self) -> f64 {
        self.ratio
    }

    /// Derive the ratio from a drag of the reference card.
    ///
    /// `start_height_px` is the card's on-screen height when the drag began and
    /// `delta_px` the vertical pointer travel since then.
    pub fn set_from_drag(&mut self, start_height_px: f64, delta_px: f64, reference_height_mm: f64) -> f64 {
        let ratio = (start_height_px + delta_px) / (reference_height_mm * PX_PER_MM);
        self.apply(ratio)
    }

    pub fn step(&mut self, direction: StepDirection) -> f64 {
        let ratio = match direction {
            StepDirection::Up => self.ratio + precision_step(),
            StepDirection::Down => self.ratio - precision_step(),
        };
        self.apply(ratio)
    }

    pub fn reset(&mut self) -> f64 {
        self.apply(DEFAULT_CALIBRATION_RATIO)
    }

    fn apply(&mut self, ratio: f64) -> f64 {
        if !ratio.is_finite() {
            warn!("Ignoring non-finite calibration ratio {}", ratio);
            return self.ratio;
        }
        self.ratio = clamp_ratio(ratio);
        self.persist();
        self.ratio
    }

    fn persist(&self) {
        if let Err(e) = self.store.set(CALIBRATION_STORAGE_KEY, &self.ratio.to_string()) {
            warn!("Could not persist calibration ratio: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn stored(store: &MemoryStore) -> Option<f64> {
        store.get(CALIBRATION_STORAGE_KEY).and_then(|v| v.parse().ok())
    }

    #[test]
    fn load_defaults_when_missing_or_corrupt() {
        assert_eq!(CalibrationStore::load(MemoryStore::new()).current(), 1.0);
        let corrupt = MemoryStore::with_entry(CALIBRATION_STORAGE_KEY, "abc");
        assert_eq!(CalibrationStore::load(corrupt).current(), 1.0);
        let nan = MemoryStore::with_entry(CALIBRATION_STORAGE_KEY, "NaN");
        assert_eq!(CalibrationStore::load(nan).current(), 1.0);
    }

    #[test]
    fn load_reads_and_clamps_stored_value() {
        let store = MemoryStore::with_entry(CALIBRATION_STORAGE_KEY, "1.25");
        assert_eq!(CalibrationStore::load(store).current(), 1.25);
        let store = MemoryStore::with_entry(CALIBRATION_STORAGE_KEY, "9");
        assert_eq!(CalibrationStore::load(store).current(), MAX_CALIBRATION_RATIO);
    }

    #[test]
    fn drag_without_movement_keeps_ratio() {
        let mut cal = CalibrationStore::load(MemoryStore::new());
        let start = reference_height_px(cal.current());
        let ratio = cal.set_from_drag(start, 0.0, CREDIT_CARD_HEIGHT_MM);
        assert!((ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn drag_scales_with_card_height() {
        let mut cal = CalibrationStore::load(MemoryStore::new());
        let start = reference_height_px(1.0);
        let ratio = cal.set_from_drag(start, start / 2.0, CREDIT_CARD_HEIGHT_MM);
        assert!((ratio - 1.5).abs() < 1e-9);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let store = MemoryStore::new();
        let mut cal = CalibrationStore::load(store.clone());
        let up = cal.step(StepDirection::Up);
        assert_eq!(stored(&store), Some(up));
        let dragged = cal.set_from_drag(200.0, 10.0, CREDIT_CARD_HEIGHT_MM);
        assert_eq!(stored(&store), Some(dragged));
        cal.reset();
        assert_eq!(stored(&store), Some(1.0));
    }

    #[test]
    fn step_is_a_tenth_of_a_millimetre_on_the_card() {
        let mut cal = CalibrationStore::load(MemoryStore::new());
        let ratio = cal.step(StepDirection::Up);
        assert!((ratio - (1.0 + 0.1 / 53.98)).abs() < 1e-12);
    }

    #[test]
    fn step_clamps_at_bounds() {
        let store = MemoryStore::with_entry(CALIBRATION_STORAGE_KEY, "3.0");
        let mut cal = CalibrationStore::load(store);
        assert_eq!(cal.step(StepDirection::Up), MAX_CALIBRATION_RATIO);
    }

    #[test]
    fn non_finite_drag_is_ignored() {
        let mut cal = CalibrationStore::load(MemoryStore::new());
        assert_eq!(cal.set_from_drag(100.0, 0.0, 0.0), 1.0);
    }

    proptest! {
        #[test]
        fn drag_never_leaves_range(delta in -1.0e6f64..1.0e6) {
            let mut cal = CalibrationStore::load(MemoryStore::new());
            let ratio = cal.set_from_drag(reference_height_px(1.0), delta, CREDIT_CARD_HEIGHT_MM);
            prop_assert!((MIN_CALIBRATION_RATIO..=MAX_CALIBRATION_RATIO).contains(&ratio));
        }

        #[test]
        fn step_up_then_down_restores_ratio(start in 0.51f64..2.99) {
            let store = MemoryStore::with_entry(CALIBRATION_STORAGE_KEY, &start.to_string());
            let mut cal = CalibrationStore::load(store);
            let original = cal.current();
            cal.step(StepDirection::Up);
            let back = cal.step(StepDirection::Down);
            prop_assert!((back - original).abs() < 1e-12);
        }
    }
}
