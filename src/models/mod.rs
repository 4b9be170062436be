//! Data models for the board: items, categories, the catalog and the student.
//!
//! This module contains the core data structures used throughout the application.
//! Models are designed to be independent of UI and service logic.

pub mod catalog;
pub mod category;
pub mod item;
pub mod student;

// Re-export all model types
pub use catalog::Catalog;
pub use category::Category;
pub use item::{makaton_image_url, makaton_view_url, ChoiceItem, ItemSource};
pub use student::StudentProfile;
