//! Stone catalog parsing.
//!
//! A catalog is plain text with one stone per line:
//!
//! ```text
//! Title : baseDimension | size1, size2, ...
//! ```
//!
//! Center-stone lines carry the stone width followed by the available heights.
//! Side-stone lines carry the stone height followed by the available widths.
//! Both are normalized so that [`Stone::aspect_ratio`] is always width ÷ height.

use crate::images::ImageRegistry;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

static RECORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>[^:|,]*):(?P<base>[^|]*)\|(?P<sizes>.*)$")
        .expect("catalog record pattern is valid")
});

/// Which of the two catalogs a stone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoneCategory {
    Center,
    Side,
}

impl fmt::Display for StoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoneCategory::Center => write!(f, "center"),
            StoneCategory::Side => write!(f, "side"),
        }
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stone {
    pub title: String,
    pub category: StoneCategory,
    /// Width (mm) for center stones, height (mm) for side stones.
    pub base_dimension: f64,
    /// Heights (mm) for center stones, widths (mm) for side stones, in catalog order.
    pub sizes: Vec<f64>,
    /// Always width ÷ height.
    pub aspect_ratio: f64,
    pub image_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("malformed catalog record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// Outcome of parsing one catalog text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogLoad {
    pub stones: Vec<Stone>,
    pub skipped: Vec<CatalogError>,
}

impl Stone {
    /// Build a stone, deriving the aspect ratio from the category's convention.
    pub fn new(
        title: impl Into<String>,
        category: StoneCategory,
        base_dimension: f64,
        sizes: Vec<f64>,
    ) -> Result<Self, String> {
        let title = title.into();
        if title.is_empty() {
            return Err("missing title".to_string());
        }
        check_dimension(base_dimension)?;
        let first = *sizes.first().ok_or_else(|| "no sizes listed".to_string())?;
        for &size in &sizes {
            check_dimension(size)?;
        }

        let aspect_ratio = match category {
            StoneCategory::Center => base_dimension / first,
            StoneCategory::Side => first / base_dimension,
        };

        Ok(Stone {
            title,
            category,
            base_dimension,
            sizes,
            aspect_ratio,
            image_reference: None,
        })
    }

    pub fn with_image(mut self, image_reference: Option<String>) -> Self {
        self.image_reference = image_reference;
        self
    }

    /// Largest listed size, in catalog units (mm).
    pub fn max_size(&self) -> f64 {
        self.sizes.iter().copied().fold(f64::MIN, f64::max)
    }

    /// Serialize back to the catalog line format.
    pub fn to_catalog_line(&self) -> String {
        let sizes = self
            .sizes
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: {} | {}", self.title, self.base_dimension, sizes)
    }
}

fn check_dimension(value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("dimension {} must be a positive number", value))
    }
}

fn parse_dimension(token: &str) -> Result<f64, String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err("empty numeric field".to_string());
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", trimmed))
}

/// Parse a single non-blank catalog line.
pub fn parse_record(line: &str, category: StoneCategory) -> Result<Stone, String> {
    let captures = RECORD_REGEX
        .captures(line.trim())
        .ok_or_else(|| "expected `Title: dimension | size, ...`".to_string())?;

    let title = captures["title"].trim();
    let base_dimension = parse_dimension(&captures["base"])?;
    let sizes = captures["sizes"]
        .split(',')
        .map(parse_dimension)
        .collect::<Result<Vec<_>, _>>()?;

    Stone::new(title, category, base_dimension, sizes)
}

/// Parse a whole catalog. Malformed lines are skipped and reported, never fatal.
pub fn parse_catalog(text: &str, category: StoneCategory) -> CatalogLoad {
    let mut load = CatalogLoad::default();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line, category) {
            Ok(stone) => {
                debug!("Parsed {} stone '{}' ({} sizes)", category, stone.title, stone.sizes.len());
                load.stones.push(stone);
            }
            Err(reason) => {
                let err = CatalogError::MalformedRecord { line: i + 1, reason };
                warn!("Skipping {} catalog line: {}", category, err);
                load.skipped.push(err);
            }
        }
    }

    info!(
        "Loaded {} {} stones ({} lines skipped)",
        load.stones.len(),
        category,
        load.skipped.len()
    );
    load
}

impl CatalogLoad {
    /// Attach image references from the registry for this load's category.
    pub fn resolve_images(mut self, registry: &ImageRegistry) -> Self {
        self.stones = self
            .stones
            .into_iter()
            .map(|stone| {
                let image = registry.lookup(stone.category, &stone.title).map(str::to_string);
                if image.is_none() {
                    debug!("No image registered for {} stone '{}'", stone.category, stone.title);
                }
                stone.with_image(image)
            })
            .collect();
        self
    }
}
