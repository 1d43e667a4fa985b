//! Evaluation strategies.
//!
//! A strategy turns the expression typed at the prompt into the source the
//! extension background page evaluates.
//!
//! | Strategy | Runs in | Backtick escaping |
//! |----------|---------|-------------------|
//! | [`Strategy::Extension`] | background page | none |
//! | [`Strategy::ContentScript`] | tab content script | one level |
//! | [`Strategy::Page`] | tab page (`window.eval`) | two levels |
//!
//! The wrapped strategies embed the expression in template literals. Each
//! literal boundary needs its own escape, so the page wrapper (a literal
//! inside a literal) emits `\\\`` where the content-script wrapper emits
//! `` \` ``.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use super::Context;

// ============================================================================
// Constants
// ============================================================================

/// Template literal nesting of the content-script wrapper.
const CONTENT_SCRIPT_DEPTH: u32 = 1;

/// Template literal nesting of the page wrapper.
const PAGE_DEPTH: u32 = 2;

/// Rendering of an unselected tab; the browser then targets the active tab.
const NO_TAB: &str = "null";

// ============================================================================
// Strategy
// ============================================================================

/// Where an expression is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// The extension's privileged background context.
    #[default]
    Extension,
    /// An injected content script in the selected tab.
    ContentScript,
    /// The selected tab's own page context.
    Page,
}

impl Strategy {
    /// Builds the payload that evaluates `expression` under this strategy.
    #[must_use]
    pub fn build(self, expression: &str, context: &Context) -> String {
        let tab = context.tab_id().map_or(NO_TAB, |tab| tab.as_str());

        match self {
            Self::Extension => expression.to_string(),

            Self::ContentScript => {
                let code = escape_backticks(expression.trim(), CONTENT_SCRIPT_DEPTH);
                format!(
                    "browser.tabs.executeScript({tab}, {{\n    \
                     code:`{code}`\n  \
                     }}).then(result=>result[0])"
                )
            }

            Self::Page => {
                let code = escape_backticks(expression.trim(), PAGE_DEPTH);
                format!(
                    "browser.tabs.executeScript({tab}, {{\n    \
                     code:`window.eval(\\`{code}\\`)`\n  \
                     }}).then(result=>result[0])"
                )
            }
        }
    }

    /// Returns the lowercase name shown to the user.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::ContentScript => "content-script",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escapes backticks for `depth` nested template literals.
///
/// Every level escapes the previous level's backslash as well as the
/// backtick, so a backtick is preceded by `2^depth - 1` backslashes.
/// Other characters, including existing backslashes, are left alone.
pub(crate) fn escape_backticks(expression: &str, depth: u32) -> String {
    let backslashes = (1usize << depth) - 1;
    let escaped = format!("{}`", "\\".repeat(backslashes));
    expression.replace('`', &escaped)
}

// ============================================================================
// Tests
// ============================================================================
