//! Top-level categories that group choice items.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::ChoiceItem;

/// A category card and the items shown after drilling into it.
///
/// The board is exactly two levels deep: categories hold items, items hold
/// nothing.
///
/// # Validation
///
/// - ID format: kebab-case (lowercase, hyphens only, no spaces)
/// - Label must be non-empty, max 50 characters
/// - Item ids and labels must be unique within the category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier in kebab-case (e.g., "food", "toilet")
    pub id: String,
    /// Display label (e.g., "Food", "Toilet")
    pub label: String,
    /// Image for the category card itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
    /// Visual tag shared by the category and its items
    #[serde(default)]
    pub color_tag: String,
    /// Ordered sub-items
    #[serde(default)]
    pub items: Vec<ChoiceItem>,
}

impl Category {
    /// Creates a new Category with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - ID is empty or not in kebab-case format
    /// - Label is empty or exceeds 50 characters
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        color_tag: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let label = label.into();

        Self::validate_id(&id)?;
        Self::validate_label(&label)?;

        Ok(Self {
            id,
            label,
            image_source: None,
            color_tag: color_tag.into(),
            items: Vec::new(),
        })
    }

    /// Appends a catalog item that inherits the category's colour tag.
    pub fn with_item(mut self, id: &str, label: &str) -> Self {
        self.items
            .push(ChoiceItem::catalog(id, label, self.color_tag.clone()));
        self
    }

    /// Validates the category and all of its items.
    pub fn validate(&self) -> Result<()> {
        Self::validate_id(&self.id)?;
        Self::validate_label(&self.label)?;

        for (index, item) in self.items.iter().enumerate() {
            if item.id.trim().is_empty() {
                anyhow::bail!("Item {} in category '{}' has an empty id", index, self.id);
            }
            Self::validate_label(&item.label)?;

            let duplicate = self.items[..index]
                .iter()
                .find(|other| other.id == item.id || other.label == item.label);
            if let Some(other) = duplicate {
                anyhow::bail!(
                    "Category '{}' has duplicate items '{}' and '{}'",
                    self.id,
                    other.label,
                    item.label
                );
            }
        }

        Ok(())
    }

    /// Finds an item by label.
    #[must_use]
    pub fn item(&self, label: &str) -> Option<&ChoiceItem> {
        self.items.iter().find(|item| item.label == label)
    }

    /// Validates category ID format (kebab-case).
    fn validate_id(id: &str) -> Result<()> {
        if id.is_empty() {
            anyhow::bail!("Category ID cannot be empty");
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            anyhow::bail!(
                "Category ID '{id}' must be kebab-case (lowercase, hyphens, and digits only)"
            );
        }

        if id.starts_with('-') || id.ends_with('-') {
            anyhow::bail!("Category ID '{id}' cannot start or end with a hyphen");
        }

        Ok(())
    }

    /// Validates a display label.
    fn validate_label(label: &str) -> Result<()> {
        if label.trim().is_empty() {
            anyhow::bail!("Label cannot be empty");
        }

        if label.len() > 50 {
            anyhow::bail!(
                "Label '{}' exceeds maximum length of 50 characters (got {})",
                label,
                label.len()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let category = Category::new("food", "Food", "food").unwrap();

        assert_eq!(category.id, "food");
        assert_eq!(category.label, "Food");
        assert!(category.items.is_empty());
    }

    #[test]
    fn test_validate_id_valid() {
        assert!(Category::validate_id("food").is_ok());
        assert!(Category::validate_id("wash-hands").is_ok());
        assert!(Category::validate_id("room-1").is_ok());
    }

    #[test]
    fn test_validate_id_invalid() {
        assert!(Category::validate_id("").is_err());
        assert!(Category::validate_id("Food").is_err()); // uppercase
        assert!(Category::validate_id("wash hands").is_err()); // space
        assert!(Category::validate_id("wash_hands").is_err()); // underscore
        assert!(Category::validate_id("-food").is_err()); // starts with hyphen
        assert!(Category::validate_id("food-").is_err()); // ends with hyphen
    }

    #[test]
    fn test_validate_label() {
        assert!(Category::validate_label("Wash Hands").is_ok());
        assert!(Category::validate_label("").is_err());
        assert!(Category::validate_label("   ").is_err());
        assert!(Category::validate_label(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_items_inherit_color_tag() {
        let category = Category::new("play", "Play", "play")
            .unwrap()
            .with_item("game", "Game")
            .with_item("blocks", "Blocks");

        assert_eq!(category.items.len(), 2);
        assert!(category.items.iter().all(|item| item.color_tag == "play"));
        assert_eq!(category.item("Blocks").map(|i| i.id.as_str()), Some("blocks"));
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_labels() {
        let category = Category::new("food", "Food", "food")
            .unwrap()
            .with_item("apple", "Apple")
            .with_item("apple-2", "Apple");

        assert!(category.validate().is_err());
    }
}
