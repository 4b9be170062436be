//! Choice items shown on the board.

use serde::{Deserialize, Serialize};

/// Base of the public Makaton asset bank.
pub const MAKATON_ASSET_BANK: &str = "https://makaton.assetbank-server.com/assetbank-makaton";

/// Id prefix for items synthesized from the quick-choice row.
pub const QUICK_ID_PREFIX: &str = "quick-";

/// Id prefix for items synthesized by the predictor for a category.
pub const PREDICTED_ID_PREFIX: &str = "predicted-";

/// Where an item came from.
///
/// Every variant shares the common [`ChoiceItem`] shape; the variant only
/// changes how a reward context is built for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSource {
    /// Statically configured item, optionally linked to a Makaton asset
    Catalog {
        /// Asset bank identifier, when known
        #[serde(default)]
        asset_id: Option<u32>,
    },
    /// Tapped from the quick-choice row
    Quick,
    /// Produced by the predictor while resolving a category
    Predicted,
}

impl Default for ItemSource {
    fn default() -> Self {
        Self::Catalog { asset_id: None }
    }
}

impl ItemSource {
    /// Returns true for items synthesized at runtime.
    #[must_use]
    pub const fn is_synthesized(&self) -> bool {
        matches!(self, Self::Quick | Self::Predicted)
    }
}

/// A single tappable picture card.
///
/// Items are immutable once loaded. `label` doubles as the notification
/// payload and the image lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceItem {
    /// Unique within its list
    pub id: String,
    /// Human-readable label (e.g. "Wash Hands")
    pub label: String,
    /// Resolved image URI, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
    /// Visual tag for the card background (e.g. "food")
    #[serde(default)]
    pub color_tag: String,
    /// Origin of the item
    #[serde(default)]
    pub source: ItemSource,
}

impl ChoiceItem {
    /// Creates a catalog item.
    pub fn catalog(
        id: impl Into<String>,
        label: impl Into<String>,
        color_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            image_source: None,
            color_tag: color_tag.into(),
            source: ItemSource::Catalog { asset_id: None },
        }
    }

    /// Creates an item for the quick-choice row (`id = "quick-" + label`).
    pub fn quick(label: impl Into<String>, image_source: Option<String>) -> Self {
        let label = label.into();
        Self {
            id: format!("{QUICK_ID_PREFIX}{label}"),
            label,
            image_source,
            color_tag: "quick".to_string(),
            source: ItemSource::Quick,
        }
    }

    /// Creates a predictor-provided item for a category.
    pub fn predicted(
        label: impl Into<String>,
        image_source: Option<String>,
        color_tag: impl Into<String>,
    ) -> Self {
        let label = label.into();
        Self {
            id: format!("{PREDICTED_ID_PREFIX}{label}"),
            label,
            image_source,
            color_tag: color_tag.into(),
            source: ItemSource::Predicted,
        }
    }

    /// Attaches a Makaton asset id (catalog items only).
    pub fn with_asset_id(mut self, asset_id: u32) -> Self {
        if let ItemSource::Catalog { .. } = self.source {
            self.source = ItemSource::Catalog {
                asset_id: Some(asset_id),
            };
        }
        self
    }

    /// Sets the resolved image URI.
    pub fn with_image(mut self, image_source: impl Into<String>) -> Self {
        self.image_source = Some(image_source.into());
        self
    }

    /// Makaton asset id, if this is a linked catalog item.
    #[must_use]
    pub const fn asset_id(&self) -> Option<u32> {
        match self.source {
            ItemSource::Catalog { asset_id } => asset_id,
            _ => None,
        }
    }

    /// Public asset bank page for this item.
    #[must_use]
    pub fn asset_url(&self) -> Option<String> {
        self.asset_id().map(makaton_view_url)
    }

    /// True when the image comes from a remote generator rather than the
    /// local symbol set or the mirror.
    #[must_use]
    pub fn has_remote_image(&self) -> bool {
        self.image_source.as_deref().is_some_and(|src| {
            (src.starts_with("http://") || src.starts_with("https://"))
                && !src.contains("/symbols/")
        })
    }
}

/// Asset bank page for a Makaton sign.
#[must_use]
pub fn makaton_view_url(asset_id: u32) -> String {
    format!("{MAKATON_ASSET_BANK}/action/viewAsset?id={asset_id}")
}

/// Direct image URL for a Makaton sign.
#[must_use]
pub fn makaton_image_url(asset_id: u32) -> String {
    format!("{MAKATON_ASSET_BANK}/servlet/display?file={asset_id}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_item_id() {
        let item = ChoiceItem::quick("Water", None);
        assert_eq!(item.id, "quick-Water");
        assert_eq!(item.source, ItemSource::Quick);
        assert!(item.source.is_synthesized());
    }

    #[test]
    fn test_predicted_item_id() {
        let item = ChoiceItem::predicted("Juice", None, "food");
        assert_eq!(item.id, "predicted-Juice");
        assert_eq!(item.color_tag, "food");
    }

    #[test]
    fn test_asset_id_only_on_catalog() {
        let item = ChoiceItem::catalog("apple", "Apple", "food").with_asset_id(1234);
        assert_eq!(item.asset_id(), Some(1234));
        assert_eq!(
            item.asset_url().as_deref(),
            Some("https://makaton.assetbank-server.com/assetbank-makaton/action/viewAsset?id=1234")
        );

        let quick = ChoiceItem::quick("Apple", None).with_asset_id(1234);
        assert_eq!(quick.asset_id(), None);
    }

    #[test]
    fn test_makaton_image_url() {
        assert_eq!(
            makaton_image_url(42),
            "https://makaton.assetbank-server.com/assetbank-makaton/servlet/display?file=42.png"
        );
    }

    #[test]
    fn test_has_remote_image() {
        let local = ChoiceItem::quick("Apple", Some("/symbols/apple.png".to_string()));
        assert!(!local.has_remote_image());

        let mirror = ChoiceItem::quick(
            "Apple",
            Some("https://raw.githubusercontent.com/x/y/main/public/symbols/apple.png".to_string()),
        );
        assert!(!mirror.has_remote_image());

        let generated = ChoiceItem::quick("Apple", Some("https://cdn.example.com/gen/1.png".to_string()));
        assert!(generated.has_remote_image());

        assert!(!ChoiceItem::quick("Apple", None).has_remote_image());
    }

    #[test]
    fn test_item_toml_defaults_to_catalog() {
        let item: ChoiceItem = toml::from_str("id = \"apple\"\nlabel = \"Apple\"\n").unwrap();
        assert_eq!(item.source, ItemSource::Catalog { asset_id: None });
        assert!(item.color_tag.is_empty());
    }
}
