//! Full-page navigation capability.

use std::sync::{Arc, RwLock};

/// Performs full-page navigations (not client-side route transitions).
pub trait Navigator: Send + Sync {
    /// Navigate the whole page to an absolute path.
    fn navigate(&self, path: &str);

    /// Path of the page currently shown.
    fn current_path(&self) -> String;
}

impl<N> Navigator for Arc<N>
where
    N: Navigator + ?Sized,
{
    fn navigate(&self, path: &str) {
        (**self).navigate(path)
    }

    fn current_path(&self) -> String {
        (**self).current_path()
    }
}

/// Navigator that only records where it was sent (tests, server-side use).
#[derive(Debug)]
pub struct RecordingNavigator {
    current: RwLock<String>,
    history: RwLock<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(start_path: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(start_path.into()),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Every path navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.read().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.history.read().ok()?.last().cloned()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigating");
        if let Ok(mut current) = self.current.write() {
            *current = path.to_string();
        }
        if let Ok(mut history) = self.history.write() {
            history.push(path.to_string());
        }
    }

    fn current_path(&self) -> String {
        self.current.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_navigation_and_moves_current_path() {
        let nav = RecordingNavigator::new("/reports");
        assert_eq!(nav.current_path(), "/reports");
        assert_eq!(nav.last(), None);

        nav.navigate("/login");
        nav.navigate("/dashboard");

        assert_eq!(nav.current_path(), "/dashboard");
        assert_eq!(nav.history(), vec!["/login", "/dashboard"]);
    }
}
