//! Ordered dashboard layouts
//!
//! A [`Layout`] is an ordered set of card ids: no duplicates, and insertion
//! order is display order. Two pure operations act on it:
//!
//! - [`reconcile`]: force any incoming order to contain exactly the
//!   available cards
//! - [`reorder`]: move one card onto another's slot, shifting the cards
//!   in between

use crate::card::CardId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, duplicate-free sequence of card ids
///
/// Equality is order-sensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    ids: IndexSet<CardId>,
}

impl Layout {
    /// Empty layout
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Card ids in display order
    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.ids.iter()
    }

    /// Display position of a card
    #[inline]
    #[must_use]
    pub fn position(&self, id: &CardId) -> Option<usize> {
        self.ids.get_index_of(id)
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.ids.contains(id)
    }

    /// Number of cards
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no card is shown
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Card ids as an owned vector
    #[must_use]
    pub fn to_vec(&self) -> Vec<CardId> {
        self.ids.iter().cloned().collect()
    }

    /// Move `active` onto the slot of `over`, shifting the range between.
    ///
    /// Returns `false` (and leaves the layout untouched) when the ids are
    /// equal or either one is absent.
    pub fn move_card(&mut self, active: &CardId, over: &CardId) -> bool {
        if active == over {
            return false;
        }
        match (self.position(active), self.position(over)) {
            (Some(from), Some(to)) => {
                self.ids.move_index(from, to);
                true
            }
            _ => false,
        }
    }
}

impl FromIterator<CardId> for Layout {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a CardId;
    type IntoIter = indexmap::set::Iter<'a, CardId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.ids.iter().eq(other.ids.iter())
    }
}

impl Eq for Layout {}

impl PartialEq<[&str]> for Layout {
    fn eq(&self, other: &[&str]) -> bool {
        self.ids.len() == other.len() && self.ids.iter().zip(other).all(|(a, b)| a.as_str() == *b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Layout {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

/// Normalize an incoming order against the cards currently available.
///
/// 1. Keep the incoming ids that are available, in incoming order, once each.
/// 2. Append the available ids still missing, in canonical default order.
///    Available ids outside the default order go last, in the order given.
///
/// The result contains every available id exactly once, and reconciling it
/// again yields the same layout.
pub fn reconcile<'a, I>(incoming: I, available: &[CardId]) -> Layout
where
    I: IntoIterator<Item = &'a CardId>,
{
    let allowed: HashSet<&CardId> = available.iter().collect();

    let mut ids: IndexSet<CardId> = incoming
        .into_iter()
        .filter(|id| allowed.contains(id))
        .cloned()
        .collect();

    let mut missing: Vec<&CardId> = available.iter().filter(|id| !ids.contains(*id)).collect();
    missing.sort_by_key(|id| id.default_rank().unwrap_or(usize::MAX));
    ids.extend(missing.into_iter().cloned());

    Layout { ids }
}

/// Move `active` onto the slot of `over` in a copy of `layout`.
///
/// A no-op copy when the ids are equal or either one is absent.
#[must_use]
pub fn reorder(layout: &Layout, active: &CardId, over: &CardId) -> Layout {
    let mut next = layout.clone();
    next.move_card(active, over);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{default_order, DEFAULT_ORDER};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ids(raw: &[&str]) -> Vec<CardId> {
        raw.iter().copied().map(CardId::from).collect()
    }

    fn layout(raw: &[&str]) -> Layout {
        ids(raw).into_iter().collect()
    }

    #[test]
    fn server_order_is_kept_and_rest_follows_default() {
        let available = default_order();
        let server = ids(&["schedule", "employees"]);

        let result = reconcile(&server, &available);

        assert_eq!(
            result.to_vec(),
            ids(&[
                "schedule",
                "employees",
                "announcements",
                "contacts",
                "anonymous-letter",
                "master-schedule",
                "training",
                "tasks",
                "checklists",
                "reminders",
            ])
        );
    }

    #[test]
    fn unknown_and_duplicate_server_ids_are_dropped() {
        let available = ids(&["tasks", "schedule", "employees"]);
        let server = ids(&["payroll", "tasks", "tasks", "employees"]);

        let result = reconcile(&server, &available);

        assert!(result == ["tasks", "employees", "schedule"]);
    }

    #[test]
    fn empty_server_layout_falls_back_to_default_order() {
        let available = ids(&["reminders", "employees", "training"]);
        let result = reconcile(&[], &available);
        assert!(result == ["employees", "training", "reminders"]);
    }

    #[test]
    fn non_default_cards_go_last_in_given_order() {
        let available = ids(&["zeta", "tasks", "alpha", "employees"]);
        let result = reconcile(&[], &available);
        assert!(result == ["employees", "tasks", "zeta", "alpha"]);
    }

    #[test]
    fn duplicate_available_ids_appear_once() {
        let available = ids(&["tasks", "tasks", "employees"]);
        let result = reconcile(&[], &available);
        assert!(result == ["employees", "tasks"]);
    }

    #[test]
    fn reorder_moves_forward_and_shifts() {
        let base = layout(&["a", "b", "c", "d"]);
        let moved = reorder(&base, &"a".into(), &"c".into());
        assert!(moved == ["b", "c", "a", "d"]);
    }

    #[test]
    fn reorder_moves_backward_and_shifts() {
        let base = layout(&["a", "b", "c", "d"]);
        let moved = reorder(&base, &"d".into(), &"b".into());
        assert!(moved == ["a", "d", "b", "c"]);
    }

    #[test]
    fn reorder_same_or_absent_is_noop() {
        let base = layout(&["a", "b", "c"]);
        assert_eq!(reorder(&base, &"b".into(), &"b".into()), base);
        assert_eq!(reorder(&base, &"x".into(), &"b".into()), base);
        assert_eq!(reorder(&base, &"a".into(), &"x".into()), base);
    }

    #[test]
    fn adjacent_swap_round_trips() {
        let base = layout(&["a", "b", "c"]);
        let there = reorder(&base, &"a".into(), &"b".into());
        assert!(there == ["b", "a", "c"]);
        let back = reorder(&there, &"b".into(), &"a".into());
        assert_eq!(back, base);
    }

    #[test]
    fn equality_depends_on_order() {
        assert_ne!(layout(&["a", "b"]), layout(&["b", "a"]));
        assert_eq!(layout(&["a", "b"]), layout(&["a", "b"]));
    }

    #[test]
    fn layout_serializes_as_plain_array() {
        let json = serde_json::to_string(&layout(&["tasks", "employees"])).unwrap();
        assert_eq!(json, r#"["tasks","employees"]"#);
    }

    fn available_subset() -> impl Strategy<Value = Vec<CardId>> {
        proptest::sample::subsequence(DEFAULT_ORDER.to_vec(), 0..=DEFAULT_ORDER.len())
            .prop_map(|raw| raw.into_iter().map(CardId::from).collect::<Vec<_>>())
            .prop_shuffle()
    }

    fn incoming_ids() -> impl Strategy<Value = Vec<CardId>> {
        proptest::collection::vec(
            prop_oneof![
                proptest::sample::select(DEFAULT_ORDER.to_vec()).prop_map(CardId::from),
                "[a-z]{1,6}".prop_map(CardId::from),
            ],
            0..14,
        )
    }

    proptest! {
        #[test]
        fn prop_reconcile_is_idempotent(incoming in incoming_ids(), available in available_subset()) {
            let once = reconcile(&incoming, &available);
            let twice = reconcile(&once, &available);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_reconcile_is_total(incoming in incoming_ids(), available in available_subset()) {
            let result = reconcile(&incoming, &available);
            let expected: HashSet<&CardId> = available.iter().collect();
            let actual: HashSet<&CardId> = result.iter().collect();
            prop_assert_eq!(result.len(), expected.len());
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_reorder_round_trip_restores_relative_order(
            available in available_subset().prop_filter("need two cards", |a| a.len() >= 2),
            picks in (0usize..10, 0usize..10),
        ) {
            let base = reconcile(&[], &available);
            let a = base.to_vec()[picks.0 % base.len()].clone();
            let b = base.to_vec()[picks.1 % base.len()].clone();

            let back = reorder(&reorder(&base, &a, &b), &b, &a);

            let before = base.position(&a).cmp(&base.position(&b));
            let after = back.position(&a).cmp(&back.position(&b));
            prop_assert_eq!(before, after);

            let others = |l: &Layout| l.iter().filter(|id| **id != a && **id != b).cloned().collect::<Vec<_>>();
            prop_assert_eq!(others(&base), others(&back));
        }
    }
}
