//! Drag and snap behaviour of the center stone on one side-stone slider.
//!
//! `Idle -> Dragging` on press, `Dragging -> Snapping | Idle` on release, and
//! `Snapping -> Idle` once the snap animation has finished. A dot click goes
//! straight from `Idle` to `Snapping`.

use crate::config::{INITIAL_TOP_OFFSET_PX, SNAP_THRESHOLD_PX, TITLE_HEIGHT_PX};
use crate::layout::{nearest_snap_target, snap_top, DragRange, SliderGeometry};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SliderPhase {
    Idle,
    Dragging { start_pointer_y: f64, start_top: f64 },
    Snapping { dot: usize },
}

/// Pointer input for one slider; `y` values are client coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SliderInput {
    Press { y: f64 },
    Move { y: f64 },
    Release,
    DotClick { dot: usize },
    SnapSettled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderMotion {
    phase: SliderPhase,
    top: f64,
    settled_on: Option<usize>,
    snap_serial: u32,
    dot_tops: Vec<f64>,
    dot_centers: Vec<f64>,
    element_height: f64,
    range: DragRange,
}

impl SliderMotion {
    pub fn new(geometry: &SliderGeometry, element_height: f64) -> Self {
        SliderMotion {
            phase: SliderPhase::Idle,
            top: TITLE_HEIGHT_PX + INITIAL_TOP_OFFSET_PX,
            settled_on: None,
            snap_serial: 0,
            dot_tops: geometry.dot_tops(),
            dot_centers: geometry.dot_centers(),
            element_height,
            range: DragRange::new(geometry.track_height_px, element_height, TITLE_HEIGHT_PX),
        }
    }

    /// Adopt new geometry (after a calibration change) keeping the current
    /// position, re-centred on the settled dot if there is one.
    pub fn relayout(&mut self, geometry: &SliderGeometry, element_height: f64) {
        self.dot_tops = geometry.dot_tops();
        self.dot_centers = geometry.dot_centers();
        self.element_height = element_height;
        self.range = DragRange::new(geometry.track_height_px, element_height, TITLE_HEIGHT_PX);
        self.top = match self.settled_on.and_then(|dot| self.dot_tops.get(dot)) {
            Some(&dot_top) => snap_top(dot_top, element_height, &self.range),
            None => self.range.constrain(self.top),
        };
    }

    pub fn phase(&self) -> SliderPhase {
        self.phase
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn settled_on(&self) -> Option<usize> {
        self.settled_on
    }

    /// Incremented every time a snap animation starts.
    pub fn snap_serial(&self) -> u32 {
        self.snap_serial
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, SliderPhase::Dragging { .. })
    }

    pub fn handle(&mut self, input: SliderInput) {
        match (self.phase, input) {
            (SliderPhase::Idle | SliderPhase::Snapping { .. }, SliderInput::Press { y }) => {
                self.settled_on = None;
                self.phase = SliderPhase::Dragging {
                    start_pointer_y: y,
                    start_top: self.top,
                };
            }
            (SliderPhase::Dragging { start_pointer_y, start_top }, SliderInput::Move { y }) => {
                self.top = self.range.constrain(start_top + (y - start_pointer_y));
            }
            (SliderPhase::Dragging { .. }, SliderInput::Release) => {
                let center = self.top + self.element_height / 2.0;
                match nearest_snap_target(center, &self.dot_centers, SNAP_THRESHOLD_PX) {
                    Some(target) => self.snap_to(target.index),
                    None => {
                        debug!("Released at {:.1}px with no dot in reach", self.top);
                        self.phase = SliderPhase::Idle;
                    }
                }
            }
            (SliderPhase::Idle | SliderPhase::Snapping { .. }, SliderInput::DotClick { dot }) => {
                if dot < self.dot_tops.len() {
                    self.snap_to(dot);
                }
            }
            (SliderPhase::Snapping { .. }, SliderInput::SnapSettled) => {
                self.phase = SliderPhase::Idle;
            }
            _ => {}
        }
    }

    fn snap_to(&mut self, dot: usize) {
        self.top = snap_top(self.dot_tops[dot], self.element_height, &self.range);
        self.settled_on = Some(dot);
        self.snap_serial = self.snap_serial.wrapping_add(1);
        self.phase = SliderPhase::Snapping { dot };
        debug!("Snapping to dot {} at {:.1}px", dot, self.top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_record, StoneCategory};
    use crate::layout::{slider_geometry, DotSpacing};

    fn motion() -> SliderMotion {
        let round = parse_record("Round: 4 | 4, 5", StoneCategory::Center).unwrap();
        let moon = parse_record("Moon: 4.15 | 6.86, 4, 4.3", StoneCategory::Side).unwrap();
        let geometry = slider_geometry(&moon, &round, 5.0, 1.0, 10.0, &DotSpacing::default());
        // dot tops: 105, 210, 315; track 445
        SliderMotion::new(&geometry, 20.0)
    }

    #[test]
    fn starts_idle_below_titles() {
        let m = motion();
        assert_eq!(m.phase(), SliderPhase::Idle);
        assert_eq!(m.top(), 45.0);
    }

    #[test]
    fn moves_before_press_are_ignored() {
        let mut m = motion();
        m.handle(SliderInput::Move { y: 500.0 });
        m.handle(SliderInput::Release);
        assert_eq!(m.top(), 45.0);
        assert_eq!(m.phase(), SliderPhase::Idle);
    }

    #[test]
    fn drag_is_clamped_to_track() {
        let mut m = motion();
        m.handle(SliderInput::Press { y: 100.0 });
        m.handle(SliderInput::Move { y: 0.0 });
        assert_eq!(m.top(), 35.0);
        m.handle(SliderInput::Move { y: 2000.0 });
        assert_eq!(m.top(), 445.0 - 20.0 + 20.0);
    }

    #[test]
    fn release_near_dot_snaps_then_settles() {
        let mut m = motion();
        m.handle(SliderInput::Press { y: 0.0 });
        // top 200 -> center 210, dot 1 center 216
        m.handle(SliderInput::Move { y: 155.0 });
        m.handle(SliderInput::Release);
        assert_eq!(m.phase(), SliderPhase::Snapping { dot: 1 });
        assert_eq!(m.top(), 210.0 - 10.0 + 6.0);
        assert_eq!(m.snap_serial(), 1);
        m.handle(SliderInput::SnapSettled);
        assert_eq!(m.phase(), SliderPhase::Idle);
        assert_eq!(m.settled_on(), Some(1));
    }

    #[test]
    fn release_far_from_dots_stays_put() {
        let mut m = motion();
        m.handle(SliderInput::Press { y: 0.0 });
        // top 260 -> center 270, nearest center 216 or 321
        m.handle(SliderInput::Move { y: 215.0 });
        m.handle(SliderInput::Release);
        assert_eq!(m.phase(), SliderPhase::Idle);
        assert_eq!(m.top(), 260.0);
        assert_eq!(m.settled_on(), None);
    }

    #[test]
    fn dot_click_snaps_without_drag() {
        let mut m = motion();
        m.handle(SliderInput::DotClick { dot: 2 });
        assert_eq!(m.phase(), SliderPhase::Snapping { dot: 2 });
        assert_eq!(m.top(), 315.0 - 10.0 + 6.0);
        m.handle(SliderInput::DotClick { dot: 9 });
        assert_eq!(m.phase(), SliderPhase::Snapping { dot: 2 });
    }

    #[test]
    fn press_during_snap_starts_new_drag() {
        let mut m = motion();
        m.handle(SliderInput::DotClick { dot: 0 });
        m.handle(SliderInput::Press { y: 10.0 });
        assert!(m.is_dragging());
        assert_eq!(m.settled_on(), None);
    }

    #[test]
    fn relayout_keeps_settled_dot() {
        let round = parse_record("Round: 4 | 4, 5", StoneCategory::Center).unwrap();
        let hexa = parse_record("Hexa: 3 | 20, 45", StoneCategory::Side).unwrap();
        let spacing = DotSpacing::default();
        let small = slider_geometry(&hexa, &round, 5.0, 0.5, 10.0, &spacing);
        let large = slider_geometry(&hexa, &round, 5.0, 2.0, 10.0, &spacing);
        let mut m = SliderMotion::new(&small, 10.0);
        m.handle(SliderInput::DotClick { dot: 1 });
        m.relayout(&large, 40.0);
        assert_eq!(m.top(), large.dots[1].offset_px - 20.0 + 6.0);
    }

    #[test]
    fn release_exactly_at_threshold_does_not_snap() {
        let mut m = motion();
        m.handle(SliderInput::Press { y: 0.0 });
        // top 246 -> center 256, dot 1 center 216
        m.handle(SliderInput::Move { y: 201.0 });
        m.handle(SliderInput::Release);
        assert_eq!(m.phase(), SliderPhase::Idle);
        assert_eq!(m.top(), 246.0);
    }

    #[test]
    fn release_after_relayout_snaps_to_new_dot_centers() {
        let round = parse_record("Round: 4 | 4, 5", StoneCategory::Center).unwrap();
        let hexa = parse_record("Hexa: 3 | 20, 45", StoneCategory::Side).unwrap();
        let spacing = DotSpacing::default();
        let small = slider_geometry(&hexa, &round, 5.0, 0.5, 10.0, &spacing);
        let large = slider_geometry(&hexa, &round, 5.0, 2.0, 10.0, &spacing);
        let mut m = SliderMotion::new(&small, 10.0);
        m.relayout(&large, 10.0);

        let target = large.dot_centers()[1];
        assert!((target - small.dot_centers()[1]).abs() > SNAP_THRESHOLD_PX);
        m.handle(SliderInput::Press { y: 0.0 });
        // element center lands 5px above the rescaled dot center
        m.handle(SliderInput::Move { y: target - 10.0 - 45.0 });
        m.handle(SliderInput::Release);
        assert_eq!(m.phase(), SliderPhase::Snapping { dot: 1 });
    }
}
