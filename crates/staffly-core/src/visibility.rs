//! Which dashboard cards a caller may see

use staffly_access::{AccessLevel, AccessSummary};
use staffly_layout::card::cards;
use staffly_layout::{CardId, DEFAULT_ORDER};

/// Cards restricted to manager-like callers
pub const MANAGER_CARDS: [&str; 2] = [cards::EMPLOYEES, cards::MASTER_SCHEDULE];

/// Minimum access needed to see `card`
#[must_use]
pub fn required_level(card: &str) -> AccessLevel {
    if MANAGER_CARDS.contains(&card) {
        AccessLevel::Manager
    } else {
        AccessLevel::Member
    }
}

/// Cards available to `access`, in canonical order
#[must_use]
pub fn available_cards(access: &AccessSummary) -> Vec<CardId> {
    DEFAULT_ORDER
        .iter()
        .filter(|card| access.at_least(required_level(card)))
        .map(|card| CardId::new(*card))
        .collect()
}
