//! Physical-unit layout for the center stone, side-stone sliders and their dots.
//!
//! Stone dimensions are in millimetres. Vertical slider positions are in CSS
//! pixels because labels and spacing constants are pixel sized; stone sizes
//! are converted with `px_per_mm = ratio * PX_PER_MM` before being mixed in.

use crate::catalog::Stone;
use crate::config::{
    DEFAULT_SPACING_PX, DOT_SIZE_PX, GAP_BUFFER_PX, MAX_TOP_OVERHANG_PX, MIN_TOP_BUFFER_PX,
    PX_PER_MM, SLIDER_PADDING_MM, TITLE_HEIGHT_PX, TITLE_SPACE_PX,
    TRACK_BOTTOM_PADDING_PX,
};
use serde::{Deserialize, Serialize};

/// Fixed spacing parameters for slider dots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotSpacing {
    pub default_spacing_px: f64,
    pub title_space_px: f64,
    pub gap_buffer_px: f64,
    pub title_height_px: f64,
    pub bottom_padding_px: f64,
}

impl Default for DotSpacing {
    fn default() -> Self {
        DotSpacing {
            default_spacing_px: DEFAULT_SPACING_PX,
            title_space_px: TITLE_SPACE_PX,
            gap_buffer_px: GAP_BUFFER_PX,
            title_height_px: TITLE_HEIGHT_PX,
            bottom_padding_px: TRACK_BOTTOM_PADDING_PX,
        }
    }
}

impl DotSpacing {
    /// Smallest distance between two adjacent dots.
    pub fn min_step(&self) -> f64 {
        self.default_spacing_px + self.title_height_px
    }
}

/// Unrotated width × height of a stone image, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Footprint {
    /// Footprint after a 90° rotation.
    pub fn rotated(self) -> Footprint {
        Footprint {
            width_mm: self.height_mm,
            height_mm: self.width_mm,
        }
    }
}

/// Center-stone sizes are heights.
pub fn center_footprint(stone: &Stone, size: f64) -> Footprint {
    Footprint {
        width_mm: size * stone.aspect_ratio,
        height_mm: size,
    }
}

/// Side-stone sizes are widths.
pub fn side_footprint(stone: &Stone, size: f64) -> Footprint {
    Footprint {
        width_mm: size,
        height_mm: size / stone.aspect_ratio,
    }
}

pub fn px_per_mm(calibration_ratio: f64) -> f64 {
    calibration_ratio * PX_PER_MM
}

/// Calibrated on-screen pixels for a real-world length.
pub fn mm_to_px(mm: f64, calibration_ratio: f64) -> f64 {
    mm * px_per_mm(calibration_ratio)
}

/// Uncalibrated conversion of measured CSS pixels to millimetres (96 dpi).
pub fn px_to_mm(px: f64) -> f64 {
    px / PX_PER_MM
}

/// Width a slider column needs so that the center stone, both rotated side
/// stones and the title all fit.
///
/// The result is in millimetres and does not depend on the calibration ratio,
/// so no ratio is taken; callers scale it with [`mm_to_px`] when rendering.
pub fn required_slider_width(
    side_stone: &Stone,
    center_stone: &Stone,
    center_size: f64,
    title_text_width_mm: f64,
) -> f64 {
    let center_width = center_footprint(center_stone, center_size).width_mm;
    // Side stones are drawn rotated, so their height becomes horizontal extent.
    let rotated_display_width = side_footprint(side_stone, side_stone.max_size()).height_mm;
    let gap = center_width / 2.0;
    let stone_layout_width = 2.0 * (gap + rotated_display_width) + center_width;
    stone_layout_width.max(title_text_width_mm) + SLIDER_PADDING_MM
}

/// Dot tops within the track plus the track height, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotLayout {
    pub offsets: Vec<f64>,
    pub track_height: f64,
}

/// Vertical dot positions. Adjacent dots are at least `min_step` apart and
/// further when half of both stones plus their label would otherwise overlap.
pub fn dot_offsets(sizes: &[f64], px_per_mm: f64, spacing: &DotSpacing) -> DotLayout {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut current = 0.0;

    for (i, &size) in sizes.iter().enumerate() {
        if i == 0 {
            current = spacing.min_step();
        } else {
            let prev_px = sizes[i - 1] * px_per_mm;
            let curr_px = size * px_per_mm;
            let required = prev_px / 2.0
                + curr_px / 2.0
                + spacing.title_space_px
                + spacing.gap_buffer_px
                + spacing.title_height_px;
            current += spacing.min_step().max(required);
        }
        offsets.push(current);
    }

    DotLayout {
        offsets,
        track_height: current + spacing.default_spacing_px + spacing.bottom_padding_px,
    }
}

/// The dot a released element should settle on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapTarget {
    pub index: usize,
    pub center: f64,
}

/// Closest dot center to `current_center_y`, if closer than `threshold`.
/// The earliest dot wins exact ties.
pub fn nearest_snap_target(current_center_y: f64, dot_centers: &[f64], threshold: f64) -> Option<SnapTarget> {
    let mut best: Option<(SnapTarget, f64)> = None;
    for (index, &center) in dot_centers.iter().enumerate() {
        let distance = (center - current_center_y).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((SnapTarget { index, center }, distance));
        }
    }
    best.filter(|&(_, d)| d < threshold).map(|(target, _)| target)
}

/// Allowed `top` values for the moving element inside a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragRange {
    pub min_top: f64,
    pub max_top: f64,
}

impl DragRange {
    pub fn new(track_height: f64, element_height: f64, title_height: f64) -> Self {
        DragRange {
            min_top: title_height + MIN_TOP_BUFFER_PX,
            max_top: track_height - element_height + MAX_TOP_OVERHANG_PX,
        }
    }

    /// The lower bound wins when the track is too short for the element.
    pub fn constrain(&self, top: f64) -> f64 {
        top.min(self.max_top).max(self.min_top)
    }
}

/// Element top that centers an element of `element_height` on a dot.
pub fn snap_top(dot_top: f64, element_height: f64, range: &DragRange) -> f64 {
    (dot_top - element_height / 2.0 + DOT_SIZE_PX / 2.0).max(range.min_top)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderDot {
    pub size: f64,
    pub offset_px: f64,
    pub footprint: Footprint,
}

impl SliderDot {
    pub fn center_px(&self) -> f64 {
        self.offset_px + DOT_SIZE_PX / 2.0
    }
}

/// Everything needed to draw one side-stone slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderGeometry {
    pub title: String,
    pub dots: Vec<SliderDot>,
    pub track_height_px: f64,
    pub container_width_mm: f64,
    /// Center-stone footprint shared by every dot.
    pub center: Footprint,
}

impl SliderGeometry {
    pub fn dot_tops(&self) -> Vec<f64> {
        self.dots.iter().map(|d| d.offset_px).collect()
    }

    pub fn dot_centers(&self) -> Vec<f64> {
        self.dots.iter().map(SliderDot::center_px).collect()
    }

    pub fn container_width_px(&self, calibration_ratio: f64) -> f64 {
        mm_to_px(self.container_width_mm, calibration_ratio)
    }

    /// Horizontal distance from the track center to each side-stone container.
    pub fn gap_mm(&self) -> f64 {
        self.center.width_mm / 2.0
    }
}

pub fn slider_geometry(
    side_stone: &Stone,
    center_stone: &Stone,
    center_size: f64,
    calibration_ratio: f64,
    title_text_width_mm: f64,
    spacing: &DotSpacing,
) -> SliderGeometry {
    let layout = dot_offsets(&side_stone.sizes, px_per_mm(calibration_ratio), spacing);
    let dots = side_stone
        .sizes
        .iter()
        .zip(layout.offsets)
        .map(|(&size, offset_px)| SliderDot {
            size,
            offset_px,
            footprint: side_footprint(side_stone, size),
        })
        .collect();

    SliderGeometry {
        title: side_stone.title.clone(),
        dots,
        track_height_px: layout.track_height,
        container_width_mm: required_slider_width(side_stone, center_stone, center_size, title_text_width_mm),
        center: center_footprint(center_stone, center_size),
    }
}
