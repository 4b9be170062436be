//! The set of categories shown on the home screen.
//!
//! A built-in Makaton-style catalog ships with the binary; a TOML file can
//! replace it wholesale.
//!
//! # File format
//!
//! ```toml
//! [[categories]]
//! id = "food"
//! label = "Food"
//! color_tag = "food"
//!
//! [[categories.items]]
//! id = "apple"
//! label = "Apple"
//! source = { kind = "catalog", asset_id = 1234 }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{Category, ChoiceItem};

/// Ordered list of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Catalog {
    /// The built-in four-category catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let food = Category {
            id: "food".to_string(),
            label: "Food".to_string(),
            image_source: None,
            color_tag: "food".to_string(),
            items: Vec::new(),
        }
        .with_item("apple", "Apple")
        .with_item("biscuit", "Biscuit")
        .with_item("water", "Water")
        .with_item("bread", "Bread");

        let play = Category {
            id: "play".to_string(),
            label: "Play".to_string(),
            image_source: None,
            color_tag: "play".to_string(),
            items: Vec::new(),
        }
        .with_item("game", "Game")
        .with_item("blocks", "Blocks")
        .with_item("book", "Book")
        .with_item("music", "Music");

        let feelings = Category {
            id: "feelings".to_string(),
            label: "Feelings".to_string(),
            image_source: None,
            color_tag: "feelings".to_string(),
            items: Vec::new(),
        }
        .with_item("happy", "Happy")
        .with_item("sad", "Sad")
        .with_item("love", "Love")
        .with_item("good", "Good");

        let toilet = Category {
            id: "toilet".to_string(),
            label: "Toilet".to_string(),
            image_source: None,
            color_tag: "toilet".to_string(),
            items: Vec::new(),
        }
        .with_item("toilet", "Toilet")
        .with_item("wash", "Wash Hands")
        .with_item("help", "Help")
        .with_item("change", "Change");

        Self {
            categories: vec![food, play, feelings, toilet],
        }
    }

    /// Loads and validates a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        let catalog: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

        catalog
            .validate()
            .with_context(|| format!("Invalid catalog file: {}", path.display()))?;
        Ok(catalog)
    }

    /// Loads the catalog from `path` when given, otherwise the built-in one.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Checks every category and that category ids are unique.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            anyhow::bail!("Catalog must contain at least one category");
        }

        for (index, category) in self.categories.iter().enumerate() {
            category.validate()?;
            if self.categories[..index]
                .iter()
                .any(|other| other.id == category.id)
            {
                anyhow::bail!("Duplicate category id '{}'", category.id);
            }
        }

        Ok(())
    }

    /// Finds a category by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Finds an item by label in any category.
    #[must_use]
    pub fn find_item(&self, label: &str) -> Option<&ChoiceItem> {
        self.categories
            .iter()
            .find_map(|category| category.item(label))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true when there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemSource;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());

        let labels: Vec<&str> = catalog.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Food", "Play", "Feelings", "Toilet"]);
        assert!(catalog.categories.iter().all(|c| c.items.len() == 4));

        let toilet = catalog.find("toilet").unwrap();
        assert_eq!(toilet.item("Wash Hands").map(|i| i.id.as_str()), Some("wash"));
    }

    #[test]
    fn test_find_item_across_categories() {
        let catalog = Catalog::builtin();
        let bread = catalog.find_item("Bread").unwrap();
        assert_eq!(bread.color_tag, "food");
        assert!(catalog.find_item("Spaceship").is_none());
    }

    #[test]
    fn test_load_catalog_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
[[categories]]
id = "snack"
label = "Snack"
color_tag = "food"

[[categories.items]]
id = "crisps"
label = "Crisps"
color_tag = "food"
source = { kind = "catalog", asset_id = 77 }

[[categories.items]]
id = "yoghurt"
label = "Yoghurt"
"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let snack = catalog.find("snack").unwrap();
        assert_eq!(snack.items[0].source, ItemSource::Catalog { asset_id: Some(77) });
        assert_eq!(snack.items[1].asset_id(), None);
    }

    #[test]
    fn test_load_rejects_duplicate_categories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        fs::write(
            &path,
            "[[categories]]\nid = \"a\"\nlabel = \"A\"\n\n[[categories]]\nid = \"a\"\nlabel = \"B\"\n",
        )
        .unwrap();

        assert!(Catalog::load(&path).is_err());
    }

    #[test]
    fn test_load_rejects_empty_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.toml");
        fs::write(&path, "").unwrap();

        assert!(Catalog::load(&path).is_err());
    }

    #[test]
    fn test_load_or_builtin() {
        let catalog = Catalog::load_or_builtin(None).unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }
}
