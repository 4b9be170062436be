//! Transient, dismissible messages shown under the board.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// How long a notice stays visible.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(4);

/// At most this many notices are kept.
pub const MAX_NOTICES: usize = 5;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral information
    Info,
    /// Something worked
    Success,
    /// Cosmetic failure
    Warning,
    /// The relay asked us to slow down
    RateLimited,
    /// Something failed
    Error,
}

/// A single notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Text shown to the user
    pub text: String,
    /// When it disappears
    pub expires_at: Instant,
}

/// Queue of live notices, newest last.
#[derive(Debug, Clone)]
pub struct Notices {
    items: VecDeque<Notice>,
    lifetime: Duration,
}

impl Notices {
    /// Empty queue with the given lifetime.
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            lifetime,
        }
    }

    /// Adds a notice, dropping the oldest beyond [`MAX_NOTICES`].
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.items.push_back(Notice {
            kind,
            text: text.into(),
            expires_at: Instant::now() + self.lifetime,
        });
        while self.items.len() > MAX_NOTICES {
            self.items.pop_front();
        }
    }

    /// Drops expired notices. Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|notice| notice.expires_at > now);
        before - self.items.len()
    }

    /// Dismisses the newest notice.
    pub fn dismiss_latest(&mut self) -> Option<Notice> {
        self.items.pop_back()
    }

    /// Removes every notice.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Newest notice.
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    /// Live notices, oldest first.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Notice> {
        self.items.iter()
    }

    /// Number of live notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if any live notice has this kind.
    #[must_use]
    pub fn contains_kind(&self, kind: NoticeKind) -> bool {
        self.items.iter().any(|notice| notice.kind == kind)
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(NOTICE_LIFETIME)
    }
}
