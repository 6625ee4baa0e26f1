//! Application-level configuration constants.

use log::LevelFilter;

// Calibration
pub const DEFAULT_CALIBRATION_RATIO: f64 = 1.0;
pub const MIN_CALIBRATION_RATIO: f64 = 0.5;
pub const MAX_CALIBRATION_RATIO: f64 = 3.0;
pub const CALIBRATION_STORAGE_KEY: &str = "jewelry-visualizer-calibration";

/// CSS reference pixels per millimetre (96 dpi, 25.4 mm per inch).
pub const PX_PER_MM: f64 = 96.0 / 25.4;

// Credit card used as the physical reference object (ISO/IEC 7810 ID-1)
pub const CREDIT_CARD_WIDTH_MM: f64 = 85.6;
pub const CREDIT_CARD_HEIGHT_MM: f64 = 53.98;

/// Real-world size change produced by one precision button press.
pub const PRECISION_STEP_MM: f64 = 0.1;

// Slider geometry
pub const DEFAULT_SPACING_PX: f64 = 80.0;
pub const TITLE_SPACE_PX: f64 = 20.0;
pub const GAP_BUFFER_PX: f64 = 10.0;
pub const TITLE_HEIGHT_PX: f64 = 25.0;
pub const TRACK_BOTTOM_PADDING_PX: f64 = 50.0;
pub const SNAP_THRESHOLD_PX: f64 = 40.0;
pub const SLIDER_PADDING_MM: f64 = 2.0;
pub const DOT_SIZE_PX: f64 = 12.0;

// Moving element limits relative to the track
pub const MIN_TOP_BUFFER_PX: f64 = 10.0;
pub const MAX_TOP_OVERHANG_PX: f64 = 20.0;
pub const INITIAL_TOP_OFFSET_PX: f64 = 20.0;

// UI Behavior
pub const SNAP_ANIMATION_MS: u32 = 300;
pub const NOTICE_DURATION_MS: u32 = 5000;

// Admin
pub const DEFAULT_ADMIN_PASSWORD: &str = "secret";
pub const ADMIN_PASSWORD_STORAGE_KEY: &str = "jewelry-visualizer-admin-password";
pub const ADMIN_SESSION_STORAGE_KEY: &str = "jewelry-visualizer-admin-session";

// Embedded assets
pub const CENTER_STONE_CATALOG: &str = include_str!("center_stones.txt");
pub const SIDE_STONE_CATALOG: &str = include_str!("side_stones.txt");
pub const STONE_IMAGE_TABLE: &str = include_str!("stone_images.json");

#[cfg(debug_assertions)]
pub const LOG_LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(debug_assertions))]
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;
