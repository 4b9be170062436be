//! Commits a generated symbol image into the shared symbol repository.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use super::config::RelayConfig;
use crate::services::images::symbol_slug;

/// User agent required by the GitHub API.
const USER_AGENT: &str = concat!("choiceboard-relay/", env!("CARGO_PKG_VERSION"));

/// Why a symbol could not be saved.
#[derive(Debug, thiserror::Error)]
pub enum SaveSymbolError {
    /// The source image could not be downloaded
    #[error("Failed to fetch source image")]
    FetchFailed(String),
    /// `GITHUB_TOKEN` is not configured
    #[error("Server config error: missing GITHUB_TOKEN")]
    MissingToken,
    /// GitHub rejected the commit
    #[error("GitHub commit failed")]
    CommitFailed(String),
    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// Location of the committed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedSymbol {
    /// Repository path
    pub path: Option<String>,
    /// Browser link
    pub html_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommitBody<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Repository path for a sign: `public/symbols/{slug}.png`.
#[must_use]
pub fn symbol_repo_path(sign_name: &str) -> String {
    format!("public/symbols/{}.png", symbol_slug(sign_name))
}

/// Downloads `image_url` and commits it as the symbol for `sign_name`,
/// updating the file if it already exists.
pub async fn commit_symbol(
    client: &reqwest::Client,
    config: &RelayConfig,
    image_url: &str,
    sign_name: &str,
) -> Result<CommittedSymbol, SaveSymbolError> {
    let path = symbol_repo_path(sign_name);

    let image = client
        .get(image_url)
        .send()
        .await
        .map_err(|e| SaveSymbolError::FetchFailed(e.to_string()))?;
    if !image.status().is_success() {
        return Err(SaveSymbolError::FetchFailed(format!(
            "HTTP {} from {image_url}",
            image.status()
        )));
    }
    let bytes = image
        .bytes()
        .await
        .map_err(|e| SaveSymbolError::FetchFailed(e.to_string()))?;
    debug!(%image_url, size = bytes.len(), "Fetched source image");

    let token = config
        .github_token
        .as_deref()
        .ok_or(SaveSymbolError::MissingToken)?;

    let contents_url = format!(
        "{}/repos/{}/{}/contents/{path}",
        config.github_api_url.trim_end_matches('/'),
        config.github_owner,
        config.github_repo
    );

    let sha = existing_sha(client, &contents_url, token).await;

    let body = CommitBody {
        message: format!("Add symbol: {sign_name}"),
        content: STANDARD.encode(&bytes),
        branch: &config.github_branch,
        sha,
    };

    let response = client
        .put(&contents_url)
        .bearer_auth(token)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .json(&body)
        .send()
        .await
        .map_err(|e| SaveSymbolError::Other(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let details = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), %details, "GitHub commit error");
        return Err(SaveSymbolError::CommitFailed(details));
    }

    let data: Value = response
        .json()
        .await
        .map_err(|e| SaveSymbolError::Other(e.to_string()))?;
    let content = data.get("content");
    let field = |name: &str| {
        content
            .and_then(|c| c.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let committed = CommittedSymbol {
        path: field("path"),
        html_url: field("html_url"),
    };
    info!(%sign_name, path = ?committed.path, "Symbol committed");
    Ok(committed)
}

/// SHA of the file at `contents_url`, if it exists.
async fn existing_sha(client: &reqwest::Client, contents_url: &str, token: &str) -> Option<String> {
    let response = client
        .get(contents_url)
        .bearer_auth(token)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        return None;
    }

    let existing: Value = response.json().await.ok()?;
    existing.get("sha").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_repo_path() {
        assert_eq!(symbol_repo_path("Wash Hands"), "public/symbols/wash-hands.png");
        assert_eq!(symbol_repo_path("Ice-Cream!"), "public/symbols/ice-cream.png");
    }

    #[test]
    fn test_commit_body_omits_missing_sha() {
        let body = CommitBody {
            message: "Add symbol: Apple".to_string(),
            content: STANDARD.encode(b"png"),
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "cG5n");
    }
}
