//! Best-effort teaching-assistant notification.

use tracing::{info, warn};

use super::backend::Backend;
use super::error::ServiceError;

/// How a notification settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The relay accepted it
    Delivered,
    /// The relay asked us to slow down
    RateLimited,
    /// Anything else went wrong
    Failed(String),
}

impl NotifyOutcome {
    /// Classifies a notifier result.
    pub fn from_result(result: Result<(), ServiceError>) -> Self {
        match result {
            Ok(()) => Self::Delivered,
            Err(e) if e.is_rate_limited() => Self::RateLimited,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Text shown to the user, if any. Delivery is only logged.
    #[must_use]
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Delivered => None,
            Self::RateLimited => Some("Too many messages. Please slow down and try again shortly."),
            Self::Failed(_) => Some("Couldn't reach the teaching assistant. Your choice is still shown."),
        }
    }
}

/// Sends one notification and classifies the result. Never fails.
pub async fn notify(backend: &dyn Backend, child_name: &str, selection: &str) -> NotifyOutcome {
    let outcome = NotifyOutcome::from_result(backend.notify(child_name, selection).await);
    match &outcome {
        NotifyOutcome::Delivered => info!(child_name, selection, "Teaching assistant notified"),
        NotifyOutcome::RateLimited => warn!(child_name, selection, "Notifier rate limited"),
        NotifyOutcome::Failed(reason) => {
            warn!(child_name, selection, %reason, "Notifier failed");
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        assert_eq!(NotifyOutcome::from_result(Ok(())), NotifyOutcome::Delivered);
        assert_eq!(
            NotifyOutcome::from_result(Err(ServiceError::from_status(429, "slow"))),
            NotifyOutcome::RateLimited
        );
        assert_eq!(
            NotifyOutcome::from_result(Err(ServiceError::Network("rate limit hit".to_string()))),
            NotifyOutcome::RateLimited
        );
        assert!(matches!(
            NotifyOutcome::from_result(Err(ServiceError::Network("refused".to_string()))),
            NotifyOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_user_messages() {
        assert!(NotifyOutcome::Delivered.user_message().is_none());
        assert!(NotifyOutcome::RateLimited
            .user_message()
            .is_some_and(|m| m.contains("slow down")));
        assert!(NotifyOutcome::Failed(String::new()).user_message().is_some());
    }
}
