//! Messages sent from background service tasks to the board.

use crate::services::{CategoryResolution, Greeting, NotifyOutcome, Prediction, SavedSymbol, ServiceError};

/// Completed background work, applied by [`super::Board::pump`].
///
/// Navigation and prediction results carry the generation they were started
/// for; the board drops any result whose generation has been superseded.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// Greeting for an opened category
    GreetingReady {
        /// Navigation generation
        generation: u64,
        /// Greeting or failure
        result: Result<Greeting, ServiceError>,
    },
    /// Items for an opened category
    CategoryResolved {
        /// Navigation generation
        generation: u64,
        /// Items and how they were chosen
        resolution: CategoryResolution,
    },
    /// Fresh quick choices
    PredictionsReady {
        /// Prediction generation
        generation: u64,
        /// Up to three predictions; empty on failure
        predictions: Vec<Prediction>,
        /// Whether the request was for a first session
        first_session: bool,
    },
    /// The notifier finished for the tap holding `token`
    NotifySettled {
        /// Session generation; bumped by a full reset
        session: u64,
        /// Token of the tap
        token: u64,
        /// Label that was sent
        label: String,
        /// Classified result
        outcome: NotifyOutcome,
    },
    /// The safety timer for the tap holding `token` fired
    LockExpired {
        /// Lock token of the tap
        token: u64,
    },
    /// The reward generator finished
    RewardReady {
        /// Reward generation
        generation: u64,
        /// Image URI or failure
        result: Result<String, ServiceError>,
    },
    /// The symbol saver finished
    SymbolSaved {
        /// Sign that was saved
        label: String,
        /// Where it landed, or why it failed
        result: Result<SavedSymbol, ServiceError>,
    },
}
