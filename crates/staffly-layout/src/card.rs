//! Dashboard card identifiers and their canonical order

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers of the cards the dashboard knows how to render
pub mod cards {
    /// Employee list and invitations
    pub const EMPLOYEES: &str = "employees";
    /// Announcements and inbox
    pub const ANNOUNCEMENTS: &str = "announcements";
    /// Contacts directory
    pub const CONTACTS: &str = "contacts";
    /// Anonymous letters
    pub const ANONYMOUS_LETTER: &str = "anonymous-letter";
    /// Personal schedule
    pub const SCHEDULE: &str = "schedule";
    /// Restaurant-wide schedule
    pub const MASTER_SCHEDULE: &str = "master-schedule";
    /// Training content
    pub const TRAINING: &str = "training";
    /// Tasks
    pub const TASKS: &str = "tasks";
    /// Checklists
    pub const CHECKLISTS: &str = "checklists";
    /// Reminders
    pub const REMINDERS: &str = "reminders";
}

/// Canonical order of every card, used as fallback and tie-break
pub const DEFAULT_ORDER: [&str; 10] = [
    cards::EMPLOYEES,
    cards::ANNOUNCEMENTS,
    cards::CONTACTS,
    cards::ANONYMOUS_LETTER,
    cards::SCHEDULE,
    cards::MASTER_SCHEDULE,
    cards::TRAINING,
    cards::TASKS,
    cards::CHECKLISTS,
    cards::REMINDERS,
];

/// Opaque dashboard card identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Wrap a raw identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Position in [`DEFAULT_ORDER`], if the card is a known one
    #[inline]
    #[must_use]
    pub fn default_rank(&self) -> Option<usize> {
        DEFAULT_ORDER.iter().position(|id| *id == self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Every card in canonical order
#[must_use]
pub fn default_order() -> Vec<CardId> {
    DEFAULT_ORDER.iter().copied().map(CardId::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rank_follows_canonical_order() {
        assert_eq!(CardId::from(cards::EMPLOYEES).default_rank(), Some(0));
        assert_eq!(CardId::from(cards::REMINDERS).default_rank(), Some(9));
        assert_eq!(CardId::from("payroll").default_rank(), None);
    }

    #[test]
    fn default_order_has_every_card_once() {
        let order = default_order();
        assert_eq!(order.len(), DEFAULT_ORDER.len());
        let unique: std::collections::HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), order.len());
    }
}
