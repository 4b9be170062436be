//! The board orchestrator.
//!
//! [`Board`] owns all session state: navigation, selection history, the
//! board lock, the reward flow and transient notices. It is driven from a
//! single UI thread. Service calls run as tasks on a tokio runtime and report
//! back through a channel of [`BoardEvent`]s that the UI drains with
//! [`Board::pump`] (or awaits with [`Board::next_event`]).
//!
//! # State machine
//!
//! Navigation is `Categories ⇄ InCategory`; independently the board is
//! `Unlocked ⇄ Locked`. An accepted sub-item tap locks the board until its
//! notification settles or the safety timer fires, whichever comes first.
//! Quick choices never take or wait for the lock.
//! Both release paths are keyed on the tap's token, so a late release for an
//! older tap never unlocks a newer one.

pub mod event;
pub mod notice;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub use event::BoardEvent;
pub use notice::{Notice, NoticeKind, Notices, NOTICE_LIFETIME};

use crate::config::ServiceConfig;
use crate::models::{Catalog, Category, ChoiceItem, ItemSource, StudentProfile};
use crate::services::notifier::{self, NotifyOutcome};
use crate::services::{
    crosses_reward_threshold, Backend, Greeting, ImageProbe, ImageResolver, Prediction,
    PredictionFetcher, ResolutionSource, RewardContext,
};

/// Timing and image settings for a board.
#[derive(Debug, Clone)]
pub struct BoardSettings {
    /// Safety timeout that always releases the board lock
    pub lock_timeout: Duration,
    /// How long notices stay visible
    pub notice_lifetime: Duration,
    /// Image candidate builder
    pub resolver: ImageResolver,
}

impl BoardSettings {
    /// Settings derived from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            lock_timeout: config.notify_lock_timeout(),
            notice_lifetime: NOTICE_LIFETIME,
            resolver: ImageResolver::from_config(config),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}

/// The collaborators a board talks to.
#[derive(Clone)]
pub struct BoardServices {
    /// Relay functions
    pub backend: Arc<dyn Backend>,
    /// Image existence checks
    pub probe: Arc<dyn ImageProbe>,
}

/// Which screen the board is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Category grid
    Categories,
    /// Items of one category
    InCategory,
}

/// Result of a sub-item or quick-choice tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The tap was recorded
    Accepted {
        /// Count after this tap
        selection_count: usize,
        /// Whether this tap opened the reward flow
        reward_opened: bool,
    },
    /// A previous tap is still settling; dropped
    Locked,
    /// No category is open
    NoCategory,
    /// No student is set; the board is inert
    NoStudent,
    /// No such item is on screen
    UnknownItem,
}

impl TapOutcome {
    /// Returns true if the tap was recorded.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Reward overlay state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardFlow {
    /// Nothing shown
    Closed,
    /// Waiting for the generator
    Loading {
        /// Reward generation this overlay belongs to
        generation: u64,
    },
    /// Showing a generated image
    Showing {
        /// Image URI
        image_url: String,
    },
}

impl RewardFlow {
    /// Returns true while the overlay is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// One accepted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRecord {
    /// Label sent to the teaching assistant
    pub label: String,
    /// Where the tapped item came from
    pub source: ItemSource,
    /// When it was tapped
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct BoardLock {
    token: u64,
    deadline: Instant,
}

/// Selection, reward and prediction state machine.
pub struct Board {
    runtime: Handle,
    backend: Arc<dyn Backend>,
    fetcher: PredictionFetcher,
    settings: BoardSettings,
    catalog: Catalog,
    student: StudentProfile,
    events_tx: UnboundedSender<BoardEvent>,
    events_rx: UnboundedReceiver<BoardEvent>,

    active: Option<usize>,
    category_items: Vec<ChoiceItem>,
    items_loading: bool,
    resolution_source: Option<ResolutionSource>,
    greeting: Option<Greeting>,
    nav_generation: u64,

    predictions: Vec<Prediction>,
    predictions_first_session: bool,
    prediction_generation: u64,

    history: Vec<String>,
    records: Vec<SelectionRecord>,
    lock: Option<BoardLock>,
    next_token: u64,

    reward: RewardFlow,
    reward_generation: u64,

    notices: Notices,
    session_generation: u64,
}

impl Board {
    /// Creates a board for `student` and requests the first quick choices.
    ///
    /// `runtime` runs every service call; the board itself stays on the
    /// caller's thread.
    pub fn new(
        runtime: Handle,
        catalog: Catalog,
        student: StudentProfile,
        services: BoardServices,
        settings: BoardSettings,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let fetcher = PredictionFetcher::new(
            Arc::clone(&services.backend),
            services.probe,
            settings.resolver.clone(),
        );

        let mut board = Self {
            runtime,
            backend: services.backend,
            fetcher,
            notices: Notices::new(settings.notice_lifetime),
            settings,
            catalog,
            student,
            events_tx,
            events_rx,
            active: None,
            category_items: Vec::new(),
            items_loading: false,
            resolution_source: None,
            greeting: None,
            nav_generation: 0,
            predictions: Vec::new(),
            predictions_first_session: true,
            prediction_generation: 0,
            history: Vec::new(),
            records: Vec::new(),
            lock: None,
            next_token: 0,
            reward: RewardFlow::Closed,
            reward_generation: 0,
            session_generation: 0,
        };
        board.refresh_predictions();
        board
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Opens a category by id.
    ///
    /// Only valid from the category grid with a student set. Shows the
    /// catalog items at once, then asks for a greeting, resolves the items'
    /// images (or predicted replacements) and refreshes quick choices.
    pub fn select_category(&mut self, id: &str) -> bool {
        if self.active.is_some() {
            debug!(id, "Category already open, ignoring");
            return false;
        }
        if !self.student.is_set() {
            debug!(id, "No student set, ignoring category tap");
            return false;
        }
        let Some(index) = self.catalog.categories.iter().position(|c| c.id == id) else {
            warn!(id, "Unknown category");
            return false;
        };

        let category = self.catalog.categories[index].clone();
        self.active = Some(index);
        self.nav_generation += 1;
        self.category_items = category.items.clone();
        self.items_loading = true;
        self.resolution_source = None;
        self.greeting = None;
        info!(category = %category.id, "Category opened");

        let generation = self.nav_generation;
        let child_name = self.student.name().to_string();

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let name = child_name.clone();
        let label = category.label.clone();
        self.runtime.spawn(async move {
            let result = backend.greeting(&name, &label).await;
            let _ = tx.send(BoardEvent::GreetingReady { generation, result });
        });

        let fetcher = self.fetcher.clone();
        let tx = self.events_tx.clone();
        let history = self.history.clone();
        self.runtime.spawn(async move {
            let resolution = fetcher
                .resolve_category(&child_name, &category, &history)
                .await;
            let _ = tx.send(BoardEvent::CategoryResolved {
                generation,
                resolution,
            });
        });

        self.refresh_predictions();
        true
    }

    /// Returns to the category grid, dropping category-scoped state.
    pub fn go_back(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.leave_category();
        self.refresh_predictions();
        true
    }

    fn leave_category(&mut self) {
        self.active = None;
        self.nav_generation += 1;
        self.category_items.clear();
        self.items_loading = false;
        self.resolution_source = None;
        self.greeting = None;
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Taps an item of the open category by id.
    pub fn select_sub_item(&mut self, item_id: &str) -> TapOutcome {
        if !self.student.is_set() {
            return TapOutcome::NoStudent;
        }
        if self.active.is_none() {
            return TapOutcome::NoCategory;
        }
        let Some(item) = self.category_items.iter().find(|i| i.id == item_id).cloned() else {
            return TapOutcome::UnknownItem;
        };
        self.expire_lock(Instant::now());
        if self.lock.is_some() {
            debug!(label = %item.label, "Board locked, tap dropped");
            return TapOutcome::Locked;
        }
        let token = self.take_lock();
        self.accept(item, token)
    }

    /// Taps a quick choice by label. Works on either screen and neither
    /// takes nor waits for the board lock.
    pub fn select_quick_choice(&mut self, label: &str) -> TapOutcome {
        if !self.student.is_set() {
            return TapOutcome::NoStudent;
        }
        let Some(prediction) = self.predictions.iter().find(|p| p.label == label) else {
            return TapOutcome::UnknownItem;
        };
        let item = ChoiceItem::quick(prediction.label.clone(), prediction.image_source.clone());
        self.next_token += 1;
        let token = self.next_token;
        self.accept(item, token)
    }

    /// Locks the board for a sub-item tap and starts its safety timer.
    fn take_lock(&mut self) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        let timeout = self.settings.lock_timeout;
        self.lock = Some(BoardLock {
            token,
            deadline: Instant::now() + timeout,
        });

        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(BoardEvent::LockExpired { token });
        });
        token
    }

    /// Records an accepted tap. `token` identifies it in the notifier's
    /// answer; it only releases the lock if this tap took it.
    fn accept(&mut self, item: ChoiceItem, token: u64) -> TapOutcome {
        self.history.push(item.label.clone());
        self.records.push(SelectionRecord {
            label: item.label.clone(),
            source: item.source,
            at: Utc::now(),
        });
        let selection_count = self.history.len();
        info!(label = %item.label, selection_count, "Selection accepted");

        // Optimistic: confirmed before the notifier answers.
        self.notices.push(
            NoticeKind::Success,
            format!("Sent \"{}\" to the teaching assistant", item.label),
        );

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let name = self.student.name().to_string();
        let label = item.label.clone();
        let session = self.session_generation;
        self.runtime.spawn(async move {
            let outcome = notifier::notify(backend.as_ref(), &name, &label).await;
            let _ = tx.send(BoardEvent::NotifySettled {
                session,
                token,
                label,
                outcome,
            });
        });

        let reward_opened = crosses_reward_threshold(selection_count);
        if reward_opened {
            self.open_reward(&item);
        }

        self.refresh_predictions();

        TapOutcome::Accepted {
            selection_count,
            reward_opened,
        }
    }

    fn open_reward(&mut self, item: &ChoiceItem) {
        self.reward_generation += 1;
        let generation = self.reward_generation;
        self.reward = RewardFlow::Loading { generation };

        let context = RewardContext::for_selection(item, &self.history);
        info!(labels = ?context.labels(), "Reward requested");

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let result = backend.reward(&context).await;
            let _ = tx.send(BoardEvent::RewardReady { generation, result });
        });
    }

    /// Closes the reward overlay. The selection count is not touched.
    pub fn dismiss_reward(&mut self) -> bool {
        if !self.reward.is_open() {
            return false;
        }
        self.reward = RewardFlow::Closed;
        true
    }

    /// Clears the session: history, count, lock, reward and notices.
    /// The student is kept.
    pub fn full_reset(&mut self) {
        self.leave_category();
        self.history.clear();
        self.records.clear();
        self.lock = None;
        self.reward = RewardFlow::Closed;
        self.reward_generation += 1;
        self.session_generation += 1;
        self.notices.clear();
        info!("Board reset");
        self.refresh_predictions();
    }

    // ========================================================================
    // Student identity
    // ========================================================================

    /// Sets or replaces the student. Blank names are rejected.
    pub fn set_student(&mut self, name: &str) -> bool {
        if !self.student.set(name) {
            return false;
        }
        info!(student = %self.student, "Student set");
        self.refresh_predictions();
        true
    }

    /// Forgets the student and resets the session. The board becomes inert.
    pub fn clear_student(&mut self) {
        self.student.clear();
        self.full_reset();
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    /// Asks the relay to persist the remotely generated image of `label`.
    ///
    /// Returns false when no on-screen item with that label has a remote
    /// image.
    pub fn save_symbol(&mut self, label: &str) -> bool {
        let image_url = self
            .category_items
            .iter()
            .cloned()
            .chain(
                self.predictions
                    .iter()
                    .map(|p| ChoiceItem::quick(p.label.clone(), p.image_source.clone())),
            )
            .find(|item| item.label == label && item.has_remote_image())
            .and_then(|item| item.image_source);

        let Some(image_url) = image_url else {
            return false;
        };

        self.notices
            .push(NoticeKind::Info, format!("Saving symbol for \"{label}\"..."));

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let label = label.to_string();
        self.runtime.spawn(async move {
            let result = backend.save_symbol(&image_url, &label).await;
            let _ = tx.send(BoardEvent::SymbolSaved { label, result });
        });
        true
    }

    // ========================================================================
    // Event handling
    // ========================================================================

    /// Applies every completed background result, releases an overdue lock
    /// and expires old notices. Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }

        let now = Instant::now();
        self.expire_lock(now);
        self.notices.expire(now);
        applied
    }

    /// Waits for the next background result, applies it and returns it.
    pub async fn next_event(&mut self) -> Option<BoardEvent> {
        let event = self.events_rx.recv().await?;
        self.apply(event.clone());
        Some(event)
    }

    fn apply(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::GreetingReady { generation, result } => {
                if generation != self.nav_generation || self.active.is_none() {
                    debug!(generation, "Stale greeting dropped");
                    return;
                }
                match result {
                    Ok(greeting) => self.greeting = Some(greeting),
                    Err(e) => warn!(error = %e, "Greeting unavailable"),
                }
            }
            BoardEvent::CategoryResolved {
                generation,
                resolution,
            } => {
                if generation != self.nav_generation || self.active.is_none() {
                    debug!(generation, "Stale category items dropped");
                    return;
                }
                debug!(source = ?resolution.source, count = resolution.items.len(), "Category resolved");
                self.category_items = resolution.items;
                self.resolution_source = Some(resolution.source);
                self.items_loading = false;
            }
            BoardEvent::PredictionsReady {
                generation,
                predictions,
                first_session,
            } => {
                if generation != self.prediction_generation {
                    debug!(generation, "Stale predictions dropped");
                    return;
                }
                self.predictions = predictions;
                self.predictions_first_session = first_session;
            }
            BoardEvent::NotifySettled {
                session,
                token,
                label,
                outcome,
            } => {
                self.release_lock(token);
                if session != self.session_generation {
                    debug!(%label, session, "Notification from before a reset ignored");
                    return;
                }
                let kind = match outcome {
                    NotifyOutcome::Delivered => None,
                    NotifyOutcome::RateLimited => Some(NoticeKind::RateLimited),
                    NotifyOutcome::Failed(_) => Some(NoticeKind::Error),
                };
                if let (Some(kind), Some(text)) = (kind, outcome.user_message()) {
                    self.notices.push(kind, text);
                }
                debug!(%label, token, "Notification settled");
            }
            BoardEvent::LockExpired { token } => {
                if self.release_lock(token) {
                    debug!(token, "Safety timer released the board lock");
                }
            }
            BoardEvent::RewardReady { generation, result } => {
                if self.reward != (RewardFlow::Loading { generation }) {
                    debug!(generation, "Reward result for a closed overlay dropped");
                    return;
                }
                match result {
                    Ok(image_url) => {
                        info!(%image_url, "Reward ready");
                        self.reward = RewardFlow::Showing { image_url };
                    }
                    Err(e) => {
                        warn!(error = %e, "Reward generation failed");
                        self.reward = RewardFlow::Closed;
                        if e.is_rate_limited() {
                            self.notices.push(
                                NoticeKind::RateLimited,
                                "Rewards are busy. Please slow down.",
                            );
                        } else {
                            self.notices.push(
                                NoticeKind::Warning,
                                "Couldn't make a reward picture this time.",
                            );
                        }
                    }
                }
            }
            BoardEvent::SymbolSaved { label, result } => match result {
                Ok(saved) => {
                    info!(%label, path = %saved.path, "Symbol saved");
                    self.notices
                        .push(NoticeKind::Success, format!("Saved symbol for \"{label}\""));
                }
                Err(e) => {
                    warn!(%label, error = %e, "Symbol save failed");
                    self.notices.push(
                        NoticeKind::Error,
                        format!("Couldn't save symbol for \"{label}\": {e}"),
                    );
                }
            },
        }
    }

    /// Releases the lock if `token` still holds it.
    fn release_lock(&mut self, token: u64) -> bool {
        if self.lock.is_some_and(|lock| lock.token == token) {
            self.lock = None;
            return true;
        }
        false
    }

    fn expire_lock(&mut self, now: Instant) {
        if self.lock.is_some_and(|lock| lock.deadline <= now) {
            debug!("Board lock deadline passed");
            self.lock = None;
        }
    }

    fn refresh_predictions(&mut self) {
        self.prediction_generation += 1;
        self.predictions.clear();
        self.predictions_first_session = self.history.is_empty();

        if !self.student.is_set() {
            return;
        }

        let generation = self.prediction_generation;
        let fetcher = self.fetcher.clone();
        let tx = self.events_tx.clone();
        let name = self.student.name().to_string();
        let category = self.active_category().map(|c| c.label.clone());
        let history = self.history.clone();
        self.runtime.spawn(async move {
            let first_session = history.is_empty();
            let predictions = fetcher
                .quick_choices(&name, category.as_deref(), &history)
                .await;
            let _ = tx.send(BoardEvent::PredictionsReady {
                generation,
                predictions,
                first_session,
            });
        });
    }

    /// Dismisses the newest notice.
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.dismiss_latest()
    }

    /// Shows a notice raised by the presentation layer.
    pub fn push_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notices.push(kind, text);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current screen.
    #[must_use]
    pub fn view(&self) -> View {
        if self.active.is_some() {
            View::InCategory
        } else {
            View::Categories
        }
    }

    /// The student using the board.
    #[must_use]
    pub fn student(&self) -> &StudentProfile {
        &self.student
    }

    /// All categories.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Open category, if any.
    #[must_use]
    pub fn active_category(&self) -> Option<&Category> {
        self.active.and_then(|index| self.catalog.categories.get(index))
    }

    /// Items of the open category (empty on the category grid).
    #[must_use]
    pub fn current_items(&self) -> &[ChoiceItem] {
        &self.category_items
    }

    /// True while the open category's items are still being resolved.
    #[must_use]
    pub fn items_loading(&self) -> bool {
        self.items_loading
    }

    /// How the open category's items were chosen, once resolved.
    #[must_use]
    pub fn resolution_source(&self) -> Option<ResolutionSource> {
        self.resolution_source
    }

    /// Greeting for the open category.
    #[must_use]
    pub fn greeting(&self) -> Option<&Greeting> {
        self.greeting.as_ref()
    }

    /// Current quick choices (at most three).
    #[must_use]
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    /// Heading for the quick-choice row.
    #[must_use]
    pub fn quick_choice_heading(&self) -> Option<String> {
        if !self.student.is_set() {
            return None;
        }
        let prefix = if self.predictions_first_session {
            "Essentials"
        } else {
            "Suggested"
        };
        Some(format!("{prefix} for {}", self.student))
    }

    /// Accepted labels, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Accepted selections with timestamps.
    #[must_use]
    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    /// Number of accepted selections.
    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.history.len()
    }

    /// True while a tap's notification is settling.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock
            .is_some_and(|lock| lock.deadline > Instant::now())
    }

    /// Reward overlay state.
    #[must_use]
    pub fn reward(&self) -> &RewardFlow {
        &self.reward
    }

    /// Live notices.
    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Image candidate builder.
    #[must_use]
    pub fn image_resolver(&self) -> &ImageResolver {
        &self.settings.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockBackend, MockProbe};

    fn board(student: &str) -> Board {
        Board::new(
            Handle::current(),
            Catalog::builtin(),
            StudentProfile::new(student),
            BoardServices {
                backend: Arc::new(MockBackend::new()),
                probe: Arc::new(MockProbe::all()),
            },
            BoardSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_initial_state() {
        let board = board("Sam");
        assert_eq!(board.view(), View::Categories);
        assert_eq!(board.selection_count(), 0);
        assert!(!board.is_locked());
        assert_eq!(board.reward(), &RewardFlow::Closed);
        assert_eq!(board.quick_choice_heading().as_deref(), Some("Essentials for Sam"));
    }

    #[tokio::test]
    async fn test_select_category_requires_grid() {
        let mut board = board("Sam");
        assert!(board.select_category("food"));
        assert_eq!(board.view(), View::InCategory);
        assert_eq!(board.current_items().len(), 4);
        assert!(board.items_loading());

        assert!(!board.select_category("play"));
        assert_eq!(board.active_category().map(|c| c.id.as_str()), Some("food"));
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let mut board = board("Sam");
        assert!(!board.select_category("spaceships"));
        assert_eq!(board.view(), View::Categories);
    }

    #[tokio::test]
    async fn test_go_back_requires_category() {
        let mut board = board("Sam");
        assert!(!board.go_back());
        board.select_category("food");
        assert!(board.go_back());
        assert_eq!(board.view(), View::Categories);
        assert!(board.current_items().is_empty());
        assert!(board.greeting().is_none());
    }

    #[tokio::test]
    async fn test_sub_item_requires_category() {
        let mut board = board("Sam");
        assert_eq!(board.select_sub_item("apple"), TapOutcome::NoCategory);
        assert_eq!(board.selection_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_student_is_inert() {
        let mut board = board("   ");
        assert!(!board.select_category("food"));
        assert_eq!(board.select_quick_choice("Apple"), TapOutcome::NoStudent);
        assert!(board.quick_choice_heading().is_none());
        assert!(board.predictions().is_empty());
    }

    #[tokio::test]
    async fn test_locked_tap_is_dropped() {
        let mut board = board("Sam");
        board.select_category("food");

        assert!(board.select_sub_item("apple").is_accepted());
        assert!(board.is_locked());
        assert_eq!(board.select_sub_item("water"), TapOutcome::Locked);
        assert_eq!(board.history(), &["Apple".to_string()]);
        assert_eq!(board.records().len(), 1);
    }

    #[tokio::test]
    async fn test_release_lock_ignores_old_token() {
        let mut board = board("Sam");
        board.select_category("food");
        board.select_sub_item("apple");

        assert!(!board.release_lock(99));
        assert!(board.is_locked());
        assert!(board.release_lock(1));
        assert!(!board.is_locked());
        assert!(!board.release_lock(1));
    }

    #[tokio::test]
    async fn test_dismiss_reward_keeps_count() {
        let mut board = board("Sam");
        board.select_category("food");
        for (token, id) in ["apple", "water", "bread"].iter().enumerate() {
            board.select_sub_item(id);
            board.release_lock(token as u64 + 1);
        }
        assert!(board.reward().is_open());
        assert!(board.dismiss_reward());
        assert!(!board.reward().is_open());
        assert!(!board.dismiss_reward());
        assert_eq!(board.selection_count(), 3);
    }

    #[tokio::test]
    async fn test_full_reset_keeps_student() {
        let mut board = board("Sam");
        board.select_category("food");
        board.select_sub_item("apple");

        board.full_reset();
        assert_eq!(board.selection_count(), 0);
        assert!(board.history().is_empty());
        assert!(!board.is_locked());
        assert!(board.notices().is_empty());
        assert_eq!(board.view(), View::Categories);
        assert_eq!(board.student().name(), "Sam");
    }

    #[tokio::test]
    async fn test_set_and_clear_student() {
        let mut board = board("");
        assert!(!board.set_student("  "));
        assert!(board.set_student(" Ada "));
        assert_eq!(board.student().name(), "Ada");
        assert!(board.select_category("play"));

        board.clear_student();
        assert!(!board.student().is_set());
        assert_eq!(board.view(), View::Categories);
    }

    #[tokio::test]
    async fn test_save_symbol_needs_remote_image() {
        let mut board = board("Sam");
        board.select_category("food");
        assert!(!board.save_symbol("Apple"));
    }
}
