//! External collaborators of the board.
//!
//! This module contains the relay contract ([`Backend`]), its HTTP and mock
//! implementations, and the pure logic around each collaborator: image
//! fallback, notification classification, prediction and reward cadence.

pub mod backend;
pub mod error;
pub mod http;
pub mod images;
pub mod mock;
pub mod notifier;
pub mod predictor;
pub mod response;
pub mod reward;

// Re-export commonly used types and functions
pub use backend::{Backend, Greeting, PredictRequest, Prediction, SavedSymbol};
pub use error::ServiceError;
pub use http::HttpBackend;
pub use images::{HttpImageProbe, ImageCandidate, ImageChain, ImageProbe, ImageResolver};
pub use mock::{MockBackend, MockProbe, NotifyBehavior};
pub use notifier::NotifyOutcome;
pub use predictor::{CategoryResolution, PredictionFetcher, ResolutionSource};
pub use reward::{crosses_reward_threshold, RewardContext, REWARD_CADENCE, REWARD_COLOR};
