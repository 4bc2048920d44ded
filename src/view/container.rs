//! Replace-only content holder.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::view::state::ViewState;

/// A named surface whose content is replaced wholesale on every write.
#[derive(Debug, Clone)]
pub struct Container {
    name: Arc<str>,
    state: Arc<Mutex<ViewState>>,
}

impl Container {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            state: Arc::new(Mutex::new(ViewState::Idle)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the whole content.
    pub fn replace(&self, state: ViewState) {
        tracing::debug!(container = %self.name, state = state_label(&state), "Container updated");
        *self.lock() = state;
    }

    /// Copy of the current content.
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    /// Current content as markup.
    pub fn to_html(&self) -> String {
        self.lock().to_html()
    }
}

fn state_label(state: &ViewState) -> &'static str {
    match state {
        ViewState::Idle => "idle",
        ViewState::Loading(_) => "loading",
        ViewState::Empty(_) => "empty",
        ViewState::Failed(_) => "failed",
        ViewState::Results(_) => "results",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_overwrites() {
        let container = Container::new("results");
        container.replace(ViewState::Loading("Searching...".into()));
        container.replace(ViewState::Failed("Search failed. Try again.".into()));

        let state = container.snapshot();
        assert!(matches!(state, ViewState::Failed(_)));
        assert_eq!(state.message(), Some("Search failed. Try again."));
    }

    #[test]
    fn test_clones_share_content() {
        let container = Container::new("trending-results");
        let other = container.clone();
        other.replace(ViewState::Empty("No results found.".into()));
        assert_eq!(container.snapshot().message(), Some("No results found."));
        assert_eq!(container.name(), "trending-results");
    }
}
