use taskflow_core::ApiError;

use crate::effects::{Effect, Outcome};

/// Data-fetch status of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Not mounted yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// Fetch failed; the message is shown as a banner.
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A page: pure state transitions that emit effects.
pub trait Component {
    type Action;

    /// Starts the mount fetch.
    fn mount(&mut self) -> Vec<Effect>;

    /// Handles a user action.
    fn update(&mut self, action: Self::Action) -> Vec<Effect>;

    /// Applies an effect outcome. Outcomes of inactive tasks are ignored.
    fn apply(&mut self, outcome: Outcome) -> Vec<Effect>;

    /// Forgets in-flight tasks so their outcomes are dropped.
    fn unmount(&mut self);
}

/// Server message, or `fallback` when the server gave none.
pub(crate) fn describe(err: &ApiError, fallback: &str) -> String {
    if err.message.trim().is_empty() {
        fallback.to_string()
    } else {
        err.message.clone()
    }
}
