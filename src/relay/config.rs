//! Relay settings, read from the environment.

use std::env;

/// Default upstream for greetings.
pub const DEFAULT_GREETING_URL: &str = "https://runtime.codewords.ai/run/send_tip_generator_20466b84/";
/// Default upstream for notifications.
pub const DEFAULT_NOTIFIER_URL: &str =
    "https://runtime.codewords.ai/run/makaton_board_notifier_b9732208/";
/// Default upstream for predictions.
pub const DEFAULT_PREDICT_URL: &str =
    "https://runtime.codewords.ai/run/makaton_predictive_behavior_256b9d19/";
/// Default upstream for reward images.
pub const DEFAULT_REWARD_URL: &str =
    "https://runtime.codewords.ai/run/sensory_character_generator_af855bc9/";
/// Default GitHub REST API base.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Where upstream calls go and which credentials they carry.
///
/// Missing credentials are not an error at startup; the affected route
/// answers 500 until they are provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Bearer token for the generator runtime (`CODEWORDS_API_TOKEN`)
    pub upstream_token: Option<String>,
    /// Greeting upstream (`CHOICEBOARD_GREETING_URL`)
    pub greeting_url: String,
    /// Notifier upstream (`CHOICEBOARD_NOTIFIER_URL`)
    pub notifier_url: String,
    /// Predictor upstream (`CHOICEBOARD_PREDICT_URL`)
    pub predict_url: String,
    /// Reward upstream (`CHOICEBOARD_REWARD_URL`)
    pub reward_url: String,
    /// Token for committing symbols (`GITHUB_TOKEN`)
    pub github_token: Option<String>,
    /// GitHub API base (`GITHUB_API_URL`)
    pub github_api_url: String,
    /// Repository owner (`GITHUB_OWNER`)
    pub github_owner: String,
    /// Repository name (`GITHUB_REPO`)
    pub github_repo: String,
    /// Branch to commit to (`GITHUB_BRANCH`)
    pub github_branch: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            upstream_token: None,
            greeting_url: DEFAULT_GREETING_URL.to_string(),
            notifier_url: DEFAULT_NOTIFIER_URL.to_string(),
            predict_url: DEFAULT_PREDICT_URL.to_string(),
            reward_url: DEFAULT_REWARD_URL.to_string(),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_owner: "chaeyoonyunakim".to_string(),
            github_repo: "getting-started-with-mackathon".to_string(),
            github_branch: "main".to_string(),
        }
    }
}

/// Non-empty value of an environment variable.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl RelayConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(var)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            upstream_token: lookup("CODEWORDS_API_TOKEN"),
            greeting_url: lookup("CHOICEBOARD_GREETING_URL").unwrap_or(defaults.greeting_url),
            notifier_url: lookup("CHOICEBOARD_NOTIFIER_URL").unwrap_or(defaults.notifier_url),
            predict_url: lookup("CHOICEBOARD_PREDICT_URL").unwrap_or(defaults.predict_url),
            reward_url: lookup("CHOICEBOARD_REWARD_URL").unwrap_or(defaults.reward_url),
            github_token: lookup("GITHUB_TOKEN"),
            github_api_url: lookup("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            github_owner: lookup("GITHUB_OWNER").unwrap_or(defaults.github_owner),
            github_repo: lookup("GITHUB_REPO").unwrap_or(defaults.github_repo),
            github_branch: lookup("GITHUB_BRANCH").unwrap_or(defaults.github_branch),
        }
    }

    /// Points every generator upstream at one base URL (used by tests and
    /// local stubs): `{base}/greeting`, `{base}/notifier`, ...
    pub fn with_upstream_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.greeting_url = format!("{base}/greeting");
        self.notifier_url = format!("{base}/notifier");
        self.predict_url = format!("{base}/predict");
        self.reward_url = format!("{base}/reward");
        self
    }
}
