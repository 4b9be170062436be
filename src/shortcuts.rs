//! Centralized shortcut and action system.
//!
//! This module maps keyboard shortcuts to board actions and supplies the
//! short hints shown in the status bar, so help text and event handling
//! never drift apart.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Shortcut contexts.
pub mod contexts {
    /// Category grid
    pub const CATEGORIES: &str = "categories";
    /// Inside a category
    pub const IN_CATEGORY: &str = "in_category";
    /// Reward overlay
    pub const REWARD: &str = "reward";
}

/// All possible actions on the board.
///
/// This enum represents every action a user can take. It serves as the
/// bridge between keyboard shortcuts and board behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === NAVIGATION ===
    /// Move the card cursor up
    NavigateUp,
    /// Move the card cursor down
    NavigateDown,
    /// Move the card cursor left
    NavigateLeft,
    /// Move the card cursor right
    NavigateRight,

    // === TAPS ===
    /// Open the highlighted category or send the highlighted item
    Activate,
    /// Tap one of the quick choices (0-based slot)
    QuickChoice(usize),

    // === BOARD ===
    /// Leave the current category
    GoBack,
    /// Clear history, counter and reward state
    Reset,
    /// Dismiss the reward picture
    DismissReward,
    /// Dismiss the newest notice
    DismissNotice,
    /// Persist the highlighted item's generated symbol
    SaveSymbol,

    // === SETTINGS ===
    /// Toggle high-contrast rendering
    ToggleContrast,
    /// Open the student switch dialog
    SwitchStudent,

    // === GENERAL ===
    /// Leave the application
    Quit,
}

impl Action {
    /// Short action name used in status bar hints.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::NavigateUp | Self::NavigateDown | Self::NavigateLeft | Self::NavigateRight => {
                "Move"
            }
            Self::Activate => "Choose",
            Self::QuickChoice(_) => "Quick choice",
            Self::GoBack => "Back",
            Self::Reset => "Reset",
            Self::DismissReward => "Close",
            Self::DismissNotice => "Dismiss",
            Self::SaveSymbol => "Save symbol",
            Self::ToggleContrast => "Contrast",
            Self::SwitchStudent => "Student",
            Self::Quit => "Quit",
        }
    }
}

/// A key binding (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    /// Key code
    pub code: KeyCode,
    /// Modifier keys
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key binding from a KeyEvent.
    ///
    /// Shift is dropped for character keys; the character already carries it.
    #[must_use]
    pub fn from_event(event: KeyEvent) -> Self {
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        Self {
            code: event.code,
            modifiers,
        }
    }
}

/// Shortcut registry that maps key events to actions for a given context.
///
/// This is the central source of truth for all keyboard shortcuts in the application.
pub struct ShortcutRegistry {
    /// Maps (context, key_binding) to Action
    bindings: HashMap<(String, KeyBinding), Action>,
    /// Hints per context, in display order
    hints: HashMap<String, Vec<(&'static str, Action)>>,
}

impl ShortcutRegistry {
    /// Create a new shortcut registry with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
            hints: HashMap::new(),
        };

        registry.register_board_shortcuts(contexts::CATEGORIES);
        registry.register_board_shortcuts(contexts::IN_CATEGORY);
        registry.register_category_shortcuts();
        registry.register_reward_shortcuts();
        registry.register_hints();
        registry
    }

    /// Shortcuts shared by both navigation states.
    fn register_board_shortcuts(&mut self, ctx: &str) {
        use KeyCode as K;
        use KeyModifiers as M;

        // === NAVIGATION ===
        self.register(ctx, K::Up, M::NONE, Action::NavigateUp);
        self.register(ctx, K::Down, M::NONE, Action::NavigateDown);
        self.register(ctx, K::Left, M::NONE, Action::NavigateLeft);
        self.register(ctx, K::Right, M::NONE, Action::NavigateRight);
        self.register(ctx, K::Char('k'), M::NONE, Action::NavigateUp);
        self.register(ctx, K::Char('j'), M::NONE, Action::NavigateDown);
        self.register(ctx, K::Char('h'), M::NONE, Action::NavigateLeft);
        self.register(ctx, K::Char('l'), M::NONE, Action::NavigateRight);

        // === TAPS ===
        self.register(ctx, K::Enter, M::NONE, Action::Activate);
        self.register(ctx, K::Char(' '), M::NONE, Action::Activate);
        self.register(ctx, K::Char('1'), M::NONE, Action::QuickChoice(0));
        self.register(ctx, K::Char('2'), M::NONE, Action::QuickChoice(1));
        self.register(ctx, K::Char('3'), M::NONE, Action::QuickChoice(2));

        // === BOARD ===
        self.register(ctx, K::Char('r'), M::NONE, Action::Reset);
        self.register(ctx, K::Char('x'), M::NONE, Action::DismissNotice);

        // === SETTINGS ===
        self.register(ctx, K::Char('c'), M::NONE, Action::ToggleContrast);
        self.register(ctx, K::Char('s'), M::NONE, Action::SwitchStudent);

        // === GENERAL ===
        self.register(ctx, K::Char('q'), M::NONE, Action::Quit);
        self.register(ctx, K::Char('c'), M::CONTROL, Action::Quit);
    }

    /// Extra shortcuts inside a category.
    fn register_category_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        let ctx = contexts::IN_CATEGORY;
        self.register(ctx, K::Esc, M::NONE, Action::GoBack);
        self.register(ctx, K::Backspace, M::NONE, Action::GoBack);
        self.register(ctx, K::Char('S'), M::NONE, Action::SaveSymbol);
    }

    /// The reward overlay swallows everything except closing.
    fn register_reward_shortcuts(&mut self) {
        use KeyCode as K;
        use KeyModifiers as M;

        let ctx = contexts::REWARD;
        self.register(ctx, K::Enter, M::NONE, Action::DismissReward);
        self.register(ctx, K::Esc, M::NONE, Action::DismissReward);
        self.register(ctx, K::Char(' '), M::NONE, Action::DismissReward);
        self.register(ctx, K::Char('c'), M::CONTROL, Action::Quit);
    }

    fn register_hints(&mut self) {
        self.hints.insert(
            contexts::CATEGORIES.to_string(),
            vec![
                ("←↑↓→", Action::NavigateUp),
                ("Enter", Action::Activate),
                ("1-3", Action::QuickChoice(0)),
                ("r", Action::Reset),
                ("s", Action::SwitchStudent),
                ("c", Action::ToggleContrast),
                ("q", Action::Quit),
            ],
        );
        self.hints.insert(
            contexts::IN_CATEGORY.to_string(),
            vec![
                ("Enter", Action::Activate),
                ("Esc", Action::GoBack),
                ("1-3", Action::QuickChoice(0)),
                ("S", Action::SaveSymbol),
                ("r", Action::Reset),
                ("c", Action::ToggleContrast),
                ("q", Action::Quit),
            ],
        );
        self.hints.insert(
            contexts::REWARD.to_string(),
            vec![("Enter/Esc", Action::DismissReward)],
        );
    }

    /// Register a shortcut binding.
    fn register(&mut self, context: &str, code: KeyCode, modifiers: KeyModifiers, action: Action) {
        let binding = KeyBinding::new(code, modifiers);
        self.bindings.insert((context.to_string(), binding), action);
    }

    /// Look up an action for a given context and key event.
    #[must_use]
    pub fn lookup(&self, context: &str, event: KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&(context.to_string(), binding)).copied()
    }

    /// Check if a key event matches a specific action in the given context.
    #[must_use]
    pub fn matches(&self, context: &str, event: KeyEvent, action: Action) -> bool {
        self.lookup(context, event) == Some(action)
    }

    /// Status bar hints for a context as (keys, label) pairs.
    #[must_use]
    pub fn hints(&self, context: &str) -> Vec<(&'static str, &'static str)> {
        self.hints
            .get(context)
            .map(|hints| hints.iter().map(|(keys, action)| (*keys, action.hint())).collect())
            .unwrap_or_default()
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}
