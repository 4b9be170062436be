//! Quick-choice predictions and dynamic category items.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::backend::{Backend, PredictRequest, Prediction};
use super::images::{local_symbol_path, ImageProbe, ImageResolver};
use crate::models::{Category, ChoiceItem};

/// Number of quick choices shown above the board.
pub const QUICK_CHOICE_LIMIT: usize = 3;

/// Maximum predicted items for a category.
pub const CATEGORY_ITEM_LIMIT: usize = 6;

/// How many recent selections are sent to the predictor.
pub const RECENT_HISTORY_WINDOW: usize = 10;

/// Category sent when no category is active.
pub const GENERAL_CATEGORY: &str = "general";

/// Where the items for an opened category came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Enough catalog images resolved
    Catalog,
    /// The predictor supplied the items
    Predicted,
    /// Predictor failed or was empty; catalog items shown as-is
    Fallback,
}

/// Items for an opened category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResolution {
    /// Items to show
    pub items: Vec<ChoiceItem>,
    /// How they were chosen
    pub source: ResolutionSource,
}

/// Last `RECENT_HISTORY_WINDOW` labels, oldest first.
#[must_use]
pub fn recent_history(history: &[String]) -> Vec<String> {
    let start = history.len().saturating_sub(RECENT_HISTORY_WINDOW);
    history[start..].to_vec()
}

/// Builds the quick-choice request for the current state.
#[must_use]
pub fn quick_request(child_name: &str, category: Option<&str>, history: &[String]) -> PredictRequest {
    let recent = recent_history(history);
    let history_log = if recent.is_empty() {
        vec![GENERAL_CATEGORY.to_string()]
    } else {
        recent
    };

    PredictRequest {
        child_name: child_name.to_string(),
        category: category.unwrap_or(GENERAL_CATEGORY).to_string(),
        history_log,
        is_first_session: history.is_empty(),
    }
}

/// Calls the predictor and probes images for category items.
#[derive(Clone)]
pub struct PredictionFetcher {
    backend: Arc<dyn Backend>,
    probe: Arc<dyn ImageProbe>,
    resolver: ImageResolver,
}

impl PredictionFetcher {
    /// Creates a fetcher.
    pub fn new(backend: Arc<dyn Backend>, probe: Arc<dyn ImageProbe>, resolver: ImageResolver) -> Self {
        Self {
            backend,
            probe,
            resolver,
        }
    }

    /// Up to three quick choices. Any failure yields an empty list.
    ///
    /// Predictions without an image get the bundled symbol path.
    pub async fn quick_choices(
        &self,
        child_name: &str,
        category: Option<&str>,
        history: &[String],
    ) -> Vec<Prediction> {
        let request = quick_request(child_name, category, history);

        match self.backend.predict(&request, QUICK_CHOICE_LIMIT).await {
            Ok(predictions) => predictions
                .into_iter()
                .take(QUICK_CHOICE_LIMIT)
                .map(|p| {
                    let image = p
                        .image_source
                        .unwrap_or_else(|| local_symbol_path(&p.label));
                    Prediction {
                        image_source: Some(image),
                        label: p.label,
                    }
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Quick-choice prediction failed");
                Vec::new()
            }
        }
    }

    /// Items for an opened category.
    ///
    /// Every catalog image is probed concurrently (primary, then mirror). If
    /// at least half resolve the catalog items are used with their resolved
    /// URIs; otherwise the predictor is asked, and on failure the catalog
    /// items are shown unchanged.
    pub async fn resolve_category(
        &self,
        child_name: &str,
        category: &Category,
        history: &[String],
    ) -> CategoryResolution {
        let resolved = self.probe_items(&category.items).await;
        let resolved_count = resolved.iter().filter(|url| url.is_some()).count();

        if resolved_count * 2 >= category.items.len() {
            debug!(
                category = %category.id,
                resolved_count,
                total = category.items.len(),
                "Using catalog items"
            );
            let items = category
                .items
                .iter()
                .zip(resolved)
                .map(|(item, url)| match url {
                    Some(url) => item.clone().with_image(url),
                    None => item.clone(),
                })
                .collect();
            return CategoryResolution {
                items,
                source: ResolutionSource::Catalog,
            };
        }

        let request = PredictRequest {
            child_name: child_name.to_string(),
            category: category.label.clone(),
            history_log: recent_history(history),
            is_first_session: history.is_empty(),
        };

        match self.backend.predict(&request, CATEGORY_ITEM_LIMIT).await {
            Ok(predictions) if !predictions.is_empty() => CategoryResolution {
                items: unique_labels(predictions)
                    .into_iter()
                    .take(CATEGORY_ITEM_LIMIT)
                    .map(|p| ChoiceItem::predicted(p.label, p.image_source, category.color_tag.clone()))
                    .collect(),
                source: ResolutionSource::Predicted,
            },
            Ok(_) => {
                debug!(category = %category.id, "Predictor returned nothing, using catalog");
                CategoryResolution {
                    items: category.items.clone(),
                    source: ResolutionSource::Fallback,
                }
            }
            Err(e) => {
                warn!(category = %category.id, error = %e, "Category prediction failed");
                CategoryResolution {
                    items: category.items.clone(),
                    source: ResolutionSource::Fallback,
                }
            }
        }
    }

    /// Resolved URL per item, in item order.
    async fn probe_items(&self, items: &[ChoiceItem]) -> Vec<Option<String>> {
        let mut tasks = JoinSet::new();
        for (index, item) in items.iter().enumerate() {
            let probe = Arc::clone(&self.probe);
            let resolver = self.resolver.clone();
            let label = item.label.clone();
            let source = item.image_source.clone();
            tasks.spawn(async move {
                let url = resolver.resolve(probe.as_ref(), &label, source.as_deref()).await;
                (index, url)
            });
        }

        let mut resolved = vec![None; items.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, url)) => resolved[index] = url,
                Err(e) => warn!(error = %e, "Image probe task failed"),
            }
        }
        resolved
    }
}

/// Drops repeated labels (case-insensitive), keeping the first occurrence.
fn unique_labels(predictions: Vec<Prediction>) -> Vec<Prediction> {
    let mut seen = HashSet::new();
    predictions
        .into_iter()
        .filter(|p| seen.insert(p.label.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_labels_keeps_first() {
        let predictions = vec![
            Prediction::new("Pizza"),
            Prediction::new("pizza"),
            Prediction::new("Pasta"),
        ];
        let labels: Vec<String> = unique_labels(predictions).into_iter().map(|p| p.label).collect();
        assert_eq!(labels, ["Pizza", "Pasta"]);
    }

    #[test]
    fn test_quick_request_first_session() {
        let request = quick_request("Sam", None, &[]);
        assert_eq!(request.category, "general");
        assert_eq!(request.history_log, vec!["general".to_string()]);
        assert!(request.is_first_session);
    }

    #[test]
    fn test_quick_request_with_history() {
        let history: Vec<String> = (0..15).map(|i| format!("item-{i}")).collect();
        let request = quick_request("Sam", Some("Food"), &history);
        assert_eq!(request.category, "Food");
        assert_eq!(request.history_log.len(), RECENT_HISTORY_WINDOW);
        assert_eq!(request.history_log[0], "item-5");
        assert!(!request.is_first_session);
    }
}
