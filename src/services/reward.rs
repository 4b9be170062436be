//! Reward cadence and the context sent to the image generator.

use serde::{Deserialize, Serialize};

use crate::models::{ChoiceItem, ItemSource};

/// A reward is offered on every Nth accepted selection.
pub const REWARD_CADENCE: usize = 3;

/// Colour requested for catalog-item rewards.
pub const REWARD_COLOR: &str = "Electric Blue";

/// Maximum number of recent labels sent for synthesized items.
pub const REWARD_SELECTION_WINDOW: usize = 3;

/// Returns true when `count` is a positive multiple of the cadence.
#[must_use]
pub const fn crosses_reward_threshold(count: usize) -> bool {
    count > 0 && count % REWARD_CADENCE == 0
}

/// What the reward generator is told about the student's choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewardContext {
    /// A catalog sub-item with its full metadata
    Item {
        /// Makaton asset bank id
        #[serde(rename = "makatonId", default, skip_serializing_if = "Option::is_none")]
        makaton_id: Option<u32>,
        /// Makaton asset bank page
        #[serde(rename = "assetUrl", default, skip_serializing_if = "Option::is_none")]
        asset_url: Option<String>,
        /// Item label
        label: String,
        /// Requested colour
        color: String,
    },
    /// The most recent labels, for synthesized items
    Selections {
        /// Oldest first, 1 to 3 entries
        selections: Vec<String>,
    },
}

impl RewardContext {
    /// Builds the context for the selection that crossed the threshold.
    ///
    /// `history` already contains `item.label` as its last entry.
    pub fn for_selection(item: &ChoiceItem, history: &[String]) -> Self {
        match item.source {
            ItemSource::Catalog { asset_id } => Self::Item {
                makaton_id: asset_id,
                asset_url: item.asset_url(),
                label: item.label.clone(),
                color: REWARD_COLOR.to_string(),
            },
            ItemSource::Quick | ItemSource::Predicted => {
                let start = history.len().saturating_sub(REWARD_SELECTION_WINDOW);
                let mut selections = history[start..].to_vec();
                if selections.is_empty() {
                    selections.push(item.label.clone());
                }
                Self::Selections { selections }
            }
        }
    }

    /// Labels mentioned by this context.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Item { label, .. } => vec![label.as_str()],
            Self::Selections { selections } => selections.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_threshold() {
        assert!(!crosses_reward_threshold(0));
        assert!(!crosses_reward_threshold(1));
        assert!(!crosses_reward_threshold(2));
        assert!(crosses_reward_threshold(3));
        assert!(!crosses_reward_threshold(4));
        assert!(crosses_reward_threshold(6));
        assert!(crosses_reward_threshold(9));
    }

    #[test]
    fn test_catalog_item_context() {
        let item = ChoiceItem::catalog("bread", "Bread", "food").with_asset_id(512);
        let history = vec!["Apple".to_string(), "Water".to_string(), "Bread".to_string()];

        let context = RewardContext::for_selection(&item, &history);
        assert_eq!(context.labels(), vec!["Bread"]);

        let body = serde_json::to_value(&context).unwrap();
        assert_eq!(
            body,
            json!({
                "makatonId": 512,
                "assetUrl": "https://makaton.assetbank-server.com/assetbank-makaton/action/viewAsset?id=512",
                "label": "Bread",
                "color": "Electric Blue"
            })
        );
    }

    #[test]
    fn test_catalog_item_without_asset_omits_ids() {
        let item = ChoiceItem::catalog("bread", "Bread", "food");
        let body = serde_json::to_value(RewardContext::for_selection(&item, &[])).unwrap();
        assert_eq!(body, json!({"label": "Bread", "color": "Electric Blue"}));
    }

    #[test]
    fn test_quick_item_context_uses_recent_labels() {
        let item = ChoiceItem::quick("Juice", None);
        let history: Vec<String> = ["Apple", "Water", "Bread", "Juice"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let context = RewardContext::for_selection(&item, &history);
        assert_eq!(
            context,
            RewardContext::Selections {
                selections: vec!["Water".to_string(), "Bread".to_string(), "Juice".to_string()]
            }
        );
    }

    #[test]
    fn test_untagged_roundtrip_prefers_shape() {
        let parsed: RewardContext = serde_json::from_value(json!({"selections": ["A"]})).unwrap();
        assert_eq!(parsed.labels(), vec!["A"]);

        let parsed: RewardContext =
            serde_json::from_value(json!({"label": "Apple", "color": "Red"})).unwrap();
        assert!(matches!(parsed, RewardContext::Item { makaton_id: None, .. }));
    }
}
