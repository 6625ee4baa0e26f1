//! Application state for one visualizer session.
//!
//! All mutations go through [`VisualizerAction`], so the yew app drives the
//! state from a single reducer and tests can drive it directly.

use crate::admin::AdminSession;
use crate::calibration::{reference_height_px, CalibrationStore, StepDirection};
use crate::catalog::{CatalogLoad, Stone};
use crate::config::CREDIT_CARD_HEIGHT_MM;
use crate::layout::{mm_to_px, slider_geometry, DotSpacing, SliderGeometry};
use crate::slider::{SliderInput, SliderMotion};
use crate::storage::KeyValueStore;
use log::{debug, info, warn};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Selection {
    pub center: Option<usize>,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub message: String,
}

/// In-progress drag of the calibration reference card.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CardDrag {
    start_pointer_y: f64,
    start_height_px: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualizerAction {
    SelectCenterStone(usize),
    SelectCenterSize(f64),
    TogglePanel,
    ClosePanel,
    StepCalibration(StepDirection),
    ResetCalibration,
    CardPress { y: f64 },
    /// Input aimed at a specific slider (press on its stone, dot click, snap end).
    Slider { slider: usize, input: SliderInput },
    /// Document-level pointer movement, routed to whatever is being dragged.
    PointerMove { y: f64 },
    PointerRelease,
    Notify(String),
    DismissNotice(u32),
    AdminUnlock(String),
    AdminLock,
    AdminChangePassword(String),
}

#[derive(Debug, Clone)]
pub struct VisualizerState<S: KeyValueStore> {
    center_stones: Rc<Vec<Stone>>,
    side_stones: Rc<Vec<Stone>>,
    side_title_widths_mm: Rc<Vec<f64>>,
    calibration: CalibrationStore<S>,
    spacing: DotSpacing,
    selection: Selection,
    geometries: Vec<SliderGeometry>,
    sliders: Vec<SliderMotion>,
    active_slider: Option<usize>,
    card_drag: Option<CardDrag>,
    panel_open: bool,
    notices: Vec<Notice>,
    next_notice_id: u32,
    admin: Option<AdminSession<S, S>>,
    admin_active: bool,
}

impl<S: KeyValueStore> VisualizerState<S> {
    pub fn new(
        center: CatalogLoad,
        side: CatalogLoad,
        side_title_widths_mm: Vec<f64>,
        calibration: CalibrationStore<S>,
    ) -> Self {
        let mut state = VisualizerState {
            center_stones: Rc::new(center.stones),
            side_stones: Rc::new(side.stones),
            side_title_widths_mm: Rc::new(side_title_widths_mm),
            calibration,
            spacing: DotSpacing::default(),
            selection: Selection::default(),
            geometries: Vec::new(),
            sliders: Vec::new(),
            active_slider: None,
            card_drag: None,
            panel_open: false,
            notices: Vec::new(),
            next_notice_id: 0,
            admin: None,
            admin_active: false,
        };
        let skipped = center.skipped.len() + side.skipped.len();
        if skipped > 0 {
            state.push_notice(format!("Skipped {} malformed stone catalog lines", skipped));
        }
        info!(
            "Visualizer ready: {} center stones, {} side stones, ratio {:.6}",
            state.center_stones.len(),
            state.side_stones.len(),
            state.calibration.current()
        );
        state
    }

    /// Attach the admin session, resuming one left open in this tab.
    pub fn with_admin(mut self, admin: AdminSession<S, S>) -> Self {
        self.admin_active = admin.check_existing_session();
        self.admin = Some(admin);
        self
    }

    pub fn center_stones(&self) -> &[Stone] {
        &self.center_stones
    }

    pub fn side_stones(&self) -> &[Stone] {
        &self.side_stones
    }

    pub fn calibration_ratio(&self) -> f64 {
        self.calibration.current()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_center_stone(&self) -> Option<&Stone> {
        self.selection.center.and_then(|i| self.center_stones.get(i))
    }

    pub fn geometries(&self) -> &[SliderGeometry] {
        &self.geometries
    }

    pub fn sliders(&self) -> &[SliderMotion] {
        &self.sliders
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn is_dragging_card(&self) -> bool {
        self.card_drag.is_some()
    }

    /// True while either the reference card or a slider stone is held.
    pub fn has_active_drag(&self) -> bool {
        self.card_drag.is_some() || self.active_slider.is_some()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn admin_active(&self) -> bool {
        self.admin_active
    }

    pub fn apply(&mut self, action: VisualizerAction) {
        match action {
            VisualizerAction::SelectCenterStone(index) => self.select_center_stone(index),
            VisualizerAction::SelectCenterSize(size) => self.select_center_size(size),
            VisualizerAction::TogglePanel => self.panel_open = !self.panel_open,
            VisualizerAction::ClosePanel => self.panel_open = false,
            VisualizerAction::StepCalibration(direction) => {
                self.calibration.step(direction);
                self.relayout();
            }
            VisualizerAction::ResetCalibration => {
                self.calibration.reset();
                self.relayout();
            }
            VisualizerAction::CardPress { y } => {
                self.card_drag = Some(CardDrag {
                    start_pointer_y: y,
                    start_height_px: reference_height_px(self.calibration.current()),
                });
            }
            VisualizerAction::Slider { slider, input } => self.slider_input(slider, input),
            VisualizerAction::PointerMove { y } => self.pointer_move(y),
            VisualizerAction::PointerRelease => self.pointer_release(),
            VisualizerAction::Notify(message) => self.push_notice(message),
            VisualizerAction::DismissNotice(id) => self.notices.retain(|n| n.id != id),
            VisualizerAction::AdminUnlock(password) => self.admin_unlock(&password),
            VisualizerAction::AdminLock => {
                if let Some(admin) = &self.admin {
                    admin.lock();
                }
                self.admin_active = false;
            }
            VisualizerAction::AdminChangePassword(password) => self.admin_change_password(&password),
        }
    }

    fn admin_unlock(&mut self, password: &str) {
        let Some(admin) = &self.admin else {
            return;
        };
        if admin.unlock(password) {
            self.admin_active = true;
        } else {
            self.push_notice("Incorrect admin password".to_string());
        }
    }

    fn admin_change_password(&mut self, password: &str) {
        let Some(admin) = &self.admin else {
            return;
        };
        match admin.change_password(password) {
            Ok(true) => info!("Admin password changed"),
            Ok(false) => self.push_notice("Admin password was not changed".to_string()),
            Err(e) => self.push_notice(format!("Could not save admin password: {}", e)),
        }
    }

    fn select_center_stone(&mut self, index: usize) {
        if index >= self.center_stones.len() {
            warn!("Ignoring selection of unknown center stone {}", index);
            return;
        }
        self.selection = Selection {
            center: Some(index),
            size: None,
        };
        self.geometries.clear();
        self.sliders.clear();
        self.active_slider = None;
    }

    fn select_center_size(&mut self, size: f64) {
        let Some(stone) = self.selected_center_stone() else {
            warn!("Size {}mm chosen before any center stone", size);
            return;
        };
        if !stone.sizes.contains(&size) {
            warn!("'{}' has no {}mm size", stone.title, size);
            return;
        }
        self.selection.size = Some(size);
        self.active_slider = None;
        self.rebuild_sliders();
    }

    fn element_height_px(&self, center_size: f64) -> f64 {
        mm_to_px(center_size, self.calibration.current())
    }

    fn compute_geometries(&self) -> Vec<SliderGeometry> {
        let (Some(center), Some(size)) = (self.selected_center_stone(), self.selection.size) else {
            return Vec::new();
        };
        let ratio = self.calibration.current();
        self.side_stones
            .iter()
            .enumerate()
            .map(|(i, side)| {
                let title_width = self.side_title_widths_mm.get(i).copied().unwrap_or(0.0);
                slider_geometry(side, center, size, ratio, title_width, &self.spacing)
            })
            .collect()
    }

    fn rebuild_sliders(&mut self) {
        self.geometries = self.compute_geometries();
        let element_height = self.selection.size.map_or(0.0, |s| self.element_height_px(s));
        self.sliders = self
            .geometries
            .iter()
            .map(|g| SliderMotion::new(g, element_height))
            .collect();
        debug!("Built {} sliders", self.sliders.len());
    }

    /// Recompute geometry after a calibration change, keeping slider positions.
    fn relayout(&mut self) {
        self.geometries = self.compute_geometries();
        let element_height = self.selection.size.map_or(0.0, |s| self.element_height_px(s));
        for (motion, geometry) in self.sliders.iter_mut().zip(&self.geometries) {
            motion.relayout(geometry, element_height);
        }
    }

    fn slider_input(&mut self, slider: usize, input: SliderInput) {
        let Some(motion) = self.sliders.get_mut(slider) else {
            return;
        };
        motion.handle(input);
        if motion.is_dragging() {
            self.active_slider = Some(slider);
        }
    }

    fn pointer_move(&mut self, y: f64) {
        if let Some(drag) = self.card_drag {
            self.calibration.set_from_drag(
                drag.start_height_px,
                y - drag.start_pointer_y,
                CREDIT_CARD_HEIGHT_MM,
            );
            self.relayout();
        } else if let Some(slider) = self.active_slider {
            if let Some(motion) = self.sliders.get_mut(slider) {
                motion.handle(SliderInput::Move { y });
            }
        }
    }

    fn pointer_release(&mut self) {
        if self.card_drag.take().is_some() {
            info!("Calibration set to {:.6}", self.calibration.current());
        }
        if let Some(slider) = self.active_slider.take() {
            if let Some(motion) = self.sliders.get_mut(slider) {
                motion.handle(SliderInput::Release);
            }
        }
    }

    fn push_notice(&mut self, message: String) {
        warn!("{}", message);
        self.notices.push(Notice {
            id: self.next_notice_id,
            message,
        });
        self.next_notice_id = self.next_notice_id.wrapping_add(1);
    }
}

impl<S: KeyValueStore + Clone + 'static> Reducible for VisualizerState<S> {
    type Action = VisualizerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}
