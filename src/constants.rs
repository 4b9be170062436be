//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the fixed storage locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Makaton Board";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "choiceboard";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "ChoiceBoard";

/// Environment variable that overrides the config directory (used by tests and kiosks).
pub const CONFIG_DIR_ENV: &str = "CHOICEBOARD_CONFIG_DIR";
