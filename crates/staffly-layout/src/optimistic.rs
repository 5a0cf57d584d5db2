//! Optimistic layout state
//!
//! The dashboard shows a reordered layout immediately and confirms it with
//! the server afterwards. [`OptimisticLayout`] keeps both values side by
//! side: `displayed` is what the user sees, `last_confirmed` is the last
//! value the server accepted. A failed save reverts `displayed`.

use crate::card::CardId;
use crate::layout::{reconcile, Layout};

/// Displayed layout paired with the last server-confirmed one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimisticLayout {
    displayed: Layout,
    last_confirmed: Layout,
}

impl OptimisticLayout {
    /// Start from a confirmed layout
    #[inline]
    #[must_use]
    pub fn new(confirmed: Layout) -> Self {
        Self {
            displayed: confirmed.clone(),
            last_confirmed: confirmed,
        }
    }

    /// What the user currently sees
    #[inline]
    #[must_use]
    pub fn displayed(&self) -> &Layout {
        &self.displayed
    }

    /// Last layout the server accepted
    #[inline]
    #[must_use]
    pub fn last_confirmed(&self) -> &Layout {
        &self.last_confirmed
    }

    /// True when the displayed layout has not been confirmed yet
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.displayed != self.last_confirmed
    }

    /// Mutable access to the displayed layout for live reordering
    #[inline]
    pub fn displayed_mut(&mut self) -> &mut Layout {
        &mut self.displayed
    }

    /// Record a server-confirmed layout.
    ///
    /// `sent` is the payload that was confirmed; the displayed layout only
    /// follows the confirmation if it has not moved on since.
    pub fn confirm(&mut self, sent: &Layout, confirmed: Layout) {
        if self.displayed == *sent {
            self.displayed = confirmed.clone();
        }
        self.last_confirmed = confirmed;
    }

    /// Drop unconfirmed changes
    #[inline]
    pub fn revert(&mut self) {
        self.displayed = self.last_confirmed.clone();
    }

    /// Reconcile both values against a new set of available cards
    pub fn reconcile_available(&mut self, available: &[CardId]) {
        self.displayed = reconcile(&self.displayed, available);
        self.last_confirmed = reconcile(&self.last_confirmed, available);
    }
}
