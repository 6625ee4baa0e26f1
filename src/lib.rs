//! Real-scale jewelry stone visualizer.
//!
//! The library holds everything that does not need a browser: catalog parsing,
//! calibration, slider geometry and the drag/snap state machine. The binary
//! renders it with yew.

use wasm_bindgen::prelude::*;

pub mod admin;
pub mod calibration;
pub mod catalog;
pub mod config;
pub mod images;
pub mod layout;
pub mod slider;
pub mod state;
pub mod storage;

pub use calibration::{CalibrationStore, StepDirection};
pub use catalog::{parse_catalog, CatalogError, CatalogLoad, Stone, StoneCategory};
pub use layout::{
    dot_offsets, nearest_snap_target, required_slider_width, slider_geometry, DotSpacing,
    SliderGeometry,
};
pub use state::{VisualizerAction, VisualizerState};

fn category_from_flag(is_center: bool) -> StoneCategory {
    if is_center {
        StoneCategory::Center
    } else {
        StoneCategory::Side
    }
}

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

/// Parse catalog text for plain JavaScript hosts.
///
/// Returns the parsed stones; malformed lines are skipped as in [`parse_catalog`].
#[wasm_bindgen(js_name = parseCatalog)]
pub fn parse_catalog_js(text: &str, is_center: bool) -> Result<JsValue, JsValue> {
    let load = parse_catalog(text, category_from_flag(is_center));
    serde_wasm_bindgen::to_value(&load.stones)
        .map_err(|e| js_error(format!("Failed to serialize stones: {}", e)))
}

/// Slider geometry for one side-stone line against a center-stone line.
#[wasm_bindgen(js_name = sliderGeometry)]
pub fn slider_geometry_js(
    side_line: &str,
    center_line: &str,
    center_size: f64,
    calibration_ratio: f64,
    title_width_mm: f64,
) -> Result<JsValue, JsValue> {
    let side = catalog::parse_record(side_line, StoneCategory::Side)
        .map_err(|e| js_error(format!("Invalid side stone: {}", e)))?;
    let center = catalog::parse_record(center_line, StoneCategory::Center)
        .map_err(|e| js_error(format!("Invalid center stone: {}", e)))?;
    let geometry = slider_geometry(
        &side,
        &center,
        center_size,
        calibration::clamp_ratio(calibration_ratio),
        title_width_mm,
        &DotSpacing::default(),
    );
    serde_wasm_bindgen::to_value(&geometry)
        .map_err(|e| js_error(format!("Failed to serialize geometry: {}", e)))
}
