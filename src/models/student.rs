//! The student currently using the board.

use std::fmt;

/// Identity of the single student using this board.
///
/// Created empty (board inert, setup shown), set from trimmed user input,
/// replaceable at any time, and only cleared by an explicit identity reset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentProfile {
    name: String,
}

impl StudentProfile {
    /// Creates a profile from a (possibly untrimmed) name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }

    /// An unset profile.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Trimmed student name; empty when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true once a non-empty name has been set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.name.is_empty()
    }

    /// Replaces the name. Blank input is rejected and leaves the profile
    /// unchanged; returns whether the name was accepted.
    pub fn set(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.name = trimmed.to_string();
        true
    }

    /// Forgets the student.
    pub fn clear(&mut self) {
        self.name.clear();
    }

    /// Uppercased first letter, used when a student has no avatar.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

impl fmt::Display for StudentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile() {
        let profile = StudentProfile::empty();
        assert!(!profile.is_set());
        assert_eq!(profile.name(), "");
        assert_eq!(profile.initial(), None);
    }

    #[test]
    fn test_new_trims() {
        let profile = StudentProfile::new("  Sam  ");
        assert!(profile.is_set());
        assert_eq!(profile.name(), "Sam");
        assert_eq!(profile.to_string(), "Sam");
    }

    #[test]
    fn test_set_rejects_blank() {
        let mut profile = StudentProfile::new("Sam");
        assert!(!profile.set("   "));
        assert_eq!(profile.name(), "Sam");

        assert!(profile.set(" Ada "));
        assert_eq!(profile.name(), "Ada");
        assert_eq!(profile.initial(), Some('A'));
    }

    #[test]
    fn test_clear() {
        let mut profile = StudentProfile::new("Sam");
        profile.clear();
        assert!(!profile.is_set());
    }
}
