//! Stone image registry.
//!
//! Titles repeat across categories ("Hexa", "Diamond" and "Diamond cut" exist as
//! both center and side stones), so lookups are always scoped by category.

use crate::catalog::StoneCategory;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageRegistry {
    #[serde(default)]
    center: HashMap<String, String>,
    #[serde(default)]
    side: HashMap<String, String>,
}

impl ImageRegistry {
    /// Parse the `{"center": {...}, "side": {...}}` URL table.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn lookup(&self, category: StoneCategory, title: &str) -> Option<&str> {
        self.table(category).get(title).map(String::as_str)
    }

    fn table(&self, category: StoneCategory) -> &HashMap<String, String> {
        match category {
            StoneCategory::Center => &self.center,
            StoneCategory::Side => &self.side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STONE_IMAGE_TABLE;

    #[test]
    fn shared_titles_resolve_per_category() {
        let registry = ImageRegistry::from_json(STONE_IMAGE_TABLE).unwrap();
        assert_eq!(
            registry.lookup(StoneCategory::Center, "Hexa"),
            Some("./assets/center-stones/Hexa.png")
        );
        assert_eq!(
            registry.lookup(StoneCategory::Side, "Hexa"),
            Some("./assets/side-stones/Hexa.png")
        );
        assert_eq!(registry.lookup(StoneCategory::Side, "Round"), None);
    }

    #[test]
    fn missing_category_table_is_empty() {
        let registry = ImageRegistry::from_json(r#"{"center": {"Oval": "oval.png"}}"#).unwrap();
        assert_eq!(registry.lookup(StoneCategory::Center, "Oval"), Some("oval.png"));
        assert_eq!(registry.lookup(StoneCategory::Side, "Oval"), None);
    }
}
