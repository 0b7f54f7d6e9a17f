//! Enumerations for TUI state management.

/// Which screen or overlay currently receives input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    AddTask,
    Help,
    Confirm,
}

/// Whether keystrokes edit text or drive navigation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    None,
    Text,
}
