//! ChoiceBoard Library
//!
//! This library provides the core of a Makaton-style picture choice board:
//! the category catalog, the board orchestrator (navigation, selection
//! counter, board lock, reward cadence), the relay-backed services
//! (notifier, predictor, reward generator, symbol saver), the terminal
//! board and the relay server.

// Module declarations
pub mod board;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;

#[cfg(feature = "tui")]
pub mod shortcuts;
#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "relay")]
pub mod relay;
