//! Evaluation context state machine.
//!
//! | Transition | Requires | Result |
//! |------------|----------|--------|
//! | `select_tab(id)` | id | ContentScript, tab = id |
//! | `select_page([id])` | id or a selected tab | Page, tab = id or unchanged |
//! | `clear()` | - | Extension, no tab |
//! | `switch_socket(id)` | id | ContentScript, no tab, socket = id |
//!
//! A transition missing its argument leaves the context untouched.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::identifiers::{SocketId, TabId};

use super::Strategy;

// ============================================================================
// Context
// ============================================================================

/// Which socket, tab and strategy the shell is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    socket_id: SocketId,
    tab_id: Option<TabId>,
    strategy: Strategy,
}

impl Context {
    /// Creates a context on `socket_id` in the extension strategy.
    #[inline]
    #[must_use]
    pub fn new(socket_id: SocketId) -> Self {
        Self {
            socket_id,
            tab_id: None,
            strategy: Strategy::Extension,
        }
    }

    /// Returns the active socket.
    #[inline]
    #[must_use]
    pub fn socket_id(&self) -> &SocketId {
        &self.socket_id
    }

    /// Returns the selected tab, if any.
    #[inline]
    #[must_use]
    pub fn tab_id(&self) -> Option<&TabId> {
        self.tab_id.as_ref()
    }

    /// Returns the active strategy.
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Builds the payload for `expression` with the active strategy.
    #[inline]
    #[must_use]
    pub fn build(&self, expression: &str) -> String {
        self.strategy.build(expression, self)
    }

    /// Binds the content-script strategy to tab `id`.
    ///
    /// Returns `false` without changes when `id` is `None`.
    pub fn select_tab(&mut self, id: Option<TabId>) -> bool {
        let Some(id) = id else {
            return false;
        };

        debug!(tab_id = %id, "Content script context selected");
        self.strategy = Strategy::ContentScript;
        self.tab_id = Some(id);
        true
    }

    /// Binds the page strategy to tab `id`, or to the selected tab.
    ///
    /// Returns `false` without changes when neither is available.
    pub fn select_page(&mut self, id: Option<TabId>) -> bool {
        let Some(id) = id.or_else(|| self.tab_id.clone()) else {
            return false;
        };

        debug!(tab_id = %id, "Page context selected");
        self.strategy = Strategy::Page;
        self.tab_id = Some(id);
        true
    }

    /// Returns to the extension strategy and forgets the tab.
    pub fn clear(&mut self) {
        debug!("Extension context selected");
        self.strategy = Strategy::Extension;
        self.tab_id = None;
    }

    /// Moves to socket `id`.
    ///
    /// The strategy becomes content-script with no tab, so expressions go
    /// to the active tab of the new browser until a tab is chosen.
    pub(crate) fn switch_socket(&mut self, id: SocketId) {
        debug!(socket_id = %id, "Socket context selected");
        self.strategy = Strategy::ContentScript;
        self.tab_id = None;
        self.socket_id = id;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str) -> Option<TabId> {
        Some(TabId::new(id).expect("valid tab id"))
    }

    #[test]
    fn test_default() {
        let context = Context::default();
        assert_eq!(context.socket_id().as_str(), "0");
        assert_eq!(context.tab_id(), None);
        assert_eq!(context.strategy(), Strategy::Extension);
    }

    #[test]
    fn test_tab_then_clear() {
        let mut context = Context::default();

        assert!(context.select_tab(tab("7")));
        assert_eq!(context.strategy(), Strategy::ContentScript);
        assert_eq!(context.tab_id().map(TabId::as_str), Some("7"));

        context.clear();
        assert_eq!(context, Context::default());
    }

    #[test]
    fn test_tab_without_id_is_noop() {
        let mut context = Context::default();
        assert!(!context.select_tab(None));
        assert_eq!(context, Context::default());
    }

    #[test]
    fn test_page_without_any_tab_is_noop() {
        let mut context = Context::default();
        assert!(!context.select_page(None));
        assert_eq!(context, Context::default());
    }

    #[test]
    fn test_page_reuses_selected_tab() {
        let mut context = Context::default();
        context.select_tab(tab("4"));

        assert!(context.select_page(None));
        assert_eq!(context.strategy(), Strategy::Page);
        assert_eq!(context.tab_id().map(TabId::as_str), Some("4"));
    }

    #[test]
    fn test_page_with_explicit_tab() {
        let mut context = Context::default();
        context.select_tab(tab("4"));

        assert!(context.select_page(tab("9")));
        assert_eq!(context.tab_id().map(TabId::as_str), Some("9"));
    }

    #[test]
    fn test_switch_socket() {
        let mut context = Context::default();
        context.select_page(tab("2"));

        context.switch_socket(SocketId::new("5").expect("valid socket id"));
        assert_eq!(context.socket_id().as_str(), "5");
        assert_eq!(context.tab_id(), None);
        assert_eq!(context.strategy(), Strategy::ContentScript);
    }

    #[test]
    fn test_build_uses_active_strategy() {
        let mut context = Context::default();
        assert_eq!(context.build("1+1"), "1+1");

        context.select_tab(tab("7"));
        assert!(context.build("1+1").contains("executeScript(7,"));
    }
}
