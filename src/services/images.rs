//! Label → image resolution with a local → mirror → placeholder fallback.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::ServiceConfig;

/// File-name slug for a label: lowercase, whitespace runs become `-`, and
/// anything outside `[a-z0-9-]` is dropped.
///
/// Shared with the relay so the mirror and saved symbols agree on names.
#[must_use]
pub fn symbol_slug(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// `{slug}.png`
#[must_use]
pub fn symbol_file_name(label: &str) -> String {
    format!("{}.png", symbol_slug(label))
}

/// Path of a bundled symbol: `/symbols/{label lowercased, whitespace collapsed}.png`.
#[must_use]
pub fn local_symbol_path(label: &str) -> String {
    let name = label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    format!("/symbols/{name}.png")
}

/// Single-letter stand-in shown when no image loads.
#[must_use]
pub fn placeholder_glyph(label: &str) -> char {
    label
        .trim()
        .chars()
        .next()
        .map_or('?', |c| c.to_uppercase().next().unwrap_or(c))
}

/// One step of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCandidate {
    /// Bundled or item-supplied image
    Primary(String),
    /// Shared symbol mirror, addressed by slug
    Mirror(String),
    /// Nothing loaded; show the first letter
    Placeholder(char),
}

impl ImageCandidate {
    /// URL to load, if this candidate has one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Primary(url) | Self::Mirror(url) => Some(url),
            Self::Placeholder(_) => None,
        }
    }
}

/// Ordered candidates for one label, advanced by load failures.
#[derive(Debug, Clone)]
pub struct ImageChain {
    candidates: Vec<ImageCandidate>,
    position: usize,
}

impl ImageChain {
    /// Current candidate.
    #[must_use]
    pub fn current(&self) -> &ImageCandidate {
        &self.candidates[self.position.min(self.candidates.len() - 1)]
    }

    /// Records a load failure of the current candidate and moves on.
    /// The placeholder is terminal.
    pub fn fail(&mut self) -> &ImageCandidate {
        if self.position + 1 < self.candidates.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Returns true once only the placeholder is left.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        matches!(self.current(), ImageCandidate::Placeholder(_))
    }
}

/// Builds candidate URLs for labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    symbols_base_url: String,
    mirror_base_url: String,
}

impl ImageResolver {
    /// Creates a resolver over the local symbol host and the mirror.
    pub fn new(symbols_base_url: impl Into<String>, mirror_base_url: impl Into<String>) -> Self {
        Self {
            symbols_base_url: symbols_base_url.into().trim_end_matches('/').to_string(),
            mirror_base_url: mirror_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolver for the configured hosts.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.symbols_base_url, &config.mirror_base_url)
    }

    /// Absolute URL for a possibly root-relative image source.
    #[must_use]
    pub fn absolute(&self, source: &str) -> String {
        if source.starts_with('/') {
            format!("{}{source}", self.symbols_base_url)
        } else {
            source.to_string()
        }
    }

    /// Primary image for a label: the item's own source, else the bundled symbol.
    #[must_use]
    pub fn primary_url(&self, label: &str, image_source: Option<&str>) -> String {
        match image_source {
            Some(source) if !source.trim().is_empty() => self.absolute(source),
            _ => self.absolute(&local_symbol_path(label)),
        }
    }

    /// Mirror image for a label.
    #[must_use]
    pub fn mirror_url(&self, label: &str) -> String {
        format!("{}/{}", self.mirror_base_url, symbol_file_name(label))
    }

    /// Full fallback chain for a label.
    #[must_use]
    pub fn chain(&self, label: &str, image_source: Option<&str>) -> ImageChain {
        let primary = self.primary_url(label, image_source);
        let mirror = self.mirror_url(label);

        let mut candidates = vec![ImageCandidate::Primary(primary.clone())];
        if mirror != primary {
            candidates.push(ImageCandidate::Mirror(mirror));
        }
        candidates.push(ImageCandidate::Placeholder(placeholder_glyph(label)));

        ImageChain {
            candidates,
            position: 0,
        }
    }

    /// Walks the chain with `probe` and returns the first URL that exists.
    pub async fn resolve(
        &self,
        probe: &dyn ImageProbe,
        label: &str,
        image_source: Option<&str>,
    ) -> Option<String> {
        let mut chain = self.chain(label, image_source);
        while let Some(url) = chain.current().url().map(str::to_string) {
            if probe.exists(&url).await {
                return Some(url);
            }
            debug!(label, %url, "Image candidate failed");
            chain.fail();
        }
        None
    }
}

/// Bounded existence check for an image URL.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    /// Returns true if the image can be loaded.
    async fn exists(&self, url: &str) -> bool;
}

/// Probe using HTTP HEAD with a hard timeout.
pub struct HttpImageProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpImageProbe {
    /// Creates a probe that gives up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn exists(&self, url: &str) -> bool {
        let request = self.client.head(url).send();
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response.status().is_success(),
            Ok(Err(e)) => {
                debug!(%url, error = %e, "Image probe failed");
                false
            }
            Err(_) => {
                debug!(%url, "Image probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new("http://localhost:8080/", "https://mirror.example.com/symbols")
    }

    #[test]
    fn test_symbol_slug() {
        assert_eq!(symbol_slug("Wash Hands"), "wash-hands");
        assert_eq!(symbol_slug("  Ice   Cream! "), "ice-cream");
        assert_eq!(symbol_slug("Café"), "caf");
        assert_eq!(symbol_file_name("Apple"), "apple.png");
    }

    #[test]
    fn test_local_symbol_path() {
        assert_eq!(local_symbol_path("Wash  Hands"), "/symbols/wash hands.png");
        assert_eq!(local_symbol_path("Apple"), "/symbols/apple.png");
    }

    #[test]
    fn test_placeholder_glyph() {
        assert_eq!(placeholder_glyph("apple"), 'A');
        assert_eq!(placeholder_glyph("  sad"), 'S');
        assert_eq!(placeholder_glyph(""), '?');
    }

    #[test]
    fn test_chain_order() {
        let mut chain = resolver().chain("Wash Hands", None);
        assert_eq!(
            chain.current(),
            &ImageCandidate::Primary("http://localhost:8080/symbols/wash hands.png".to_string())
        );
        assert_eq!(
            chain.fail(),
            &ImageCandidate::Mirror("https://mirror.example.com/symbols/wash-hands.png".to_string())
        );
        assert_eq!(chain.fail(), &ImageCandidate::Placeholder('W'));
        assert!(chain.exhausted());
        // Placeholder is terminal
        assert_eq!(chain.fail(), &ImageCandidate::Placeholder('W'));
    }

    #[test]
    fn test_chain_uses_item_source() {
        let chain = resolver().chain("Apple", Some("https://img.example.com/apple.png"));
        assert_eq!(
            chain.current().url(),
            Some("https://img.example.com/apple.png")
        );
    }

    struct OnlyMirror;

    #[async_trait]
    impl ImageProbe for OnlyMirror {
        async fn exists(&self, url: &str) -> bool {
            url.starts_with("https://mirror.example.com")
        }
    }

    struct Nothing;

    #[async_trait]
    impl ImageProbe for Nothing {
        async fn exists(&self, _url: &str) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_mirror() {
        let url = resolver().resolve(&OnlyMirror, "Apple", None).await;
        assert_eq!(url.as_deref(), Some("https://mirror.example.com/symbols/apple.png"));
    }

    #[tokio::test]
    async fn test_resolve_nothing_found() {
        assert_eq!(resolver().resolve(&Nothing, "Apple", None).await, None);
    }
}
