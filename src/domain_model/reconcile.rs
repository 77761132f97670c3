//! Desired-vs-current reconciliation for the owned collections of a card.
//!
//! Two shapes are covered. Keyed sets (tags) only ever gain or lose members,
//! so [`diff_keys`] yields additions and removals. Line items (examples,
//! translations) carry an optional persisted id, so [`plan_lines`] yields
//! inserts, in-place updates and deletes in one pass.
//!
//! Both planners are pure; applying a plan is the caller's job and happens
//! inside one storage transaction.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyDiff<K> {
    pub added: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> KeyDiff<K> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// `added = desired - current`, `removed = current - desired`, both sorted.
pub fn diff_keys<K: Ord + Clone>(
    desired: impl IntoIterator<Item = K>,
    current: impl IntoIterator<Item = K>,
) -> KeyDiff<K> {
    let desired: BTreeSet<K> = desired.into_iter().collect();
    let current: BTreeSet<K> = current.into_iter().collect();

    KeyDiff {
        added: desired.difference(&current).cloned().collect(),
        removed: current.difference(&desired).cloned().collect(),
    }
}

/// One desired line item. `id` is set for lines that are already persisted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Line<Id, T> {
    pub id: Option<Id>,
    pub body: T,
}

impl<Id, T> Line<Id, T> {
    pub fn new(body: T) -> Self {
        Self { id: None, body }
    }

    pub fn existing(id: Id, body: T) -> Self {
        Self { id: Some(id), body }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LinePlan<Id, T> {
    pub inserts: Vec<T>,
    pub updates: Vec<(Id, T)>,
    pub deletes: Vec<Id>,
}

impl<Id, T> LinePlan<Id, T> {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("line {0} does not belong to this card")]
    UnknownLine(String),
    #[error("line {0} is listed more than once")]
    DuplicateLine(String),
}

/// Plans the changes that turn `current` into `desired`.
///
/// Lines with an id are updated in place when their body differs. Lines
/// without an id first adopt an unclaimed current line with an equal body,
/// and are inserted only when none is left, so planning again against the
/// applied result is empty. Current lines nobody claimed are deleted.
pub fn plan_lines<Id, T>(
    desired: Vec<Line<Id, T>>,
    current: &[(Id, T)],
) -> Result<LinePlan<Id, T>, PlanError>
where
    Id: Copy + Eq + Hash + Display,
    T: PartialEq,
{
    let mut claimed: HashSet<Id> = HashSet::with_capacity(current.len());
    let mut updates = Vec::new();
    let mut fresh = Vec::new();

    for line in desired {
        let Some(id) = line.id else {
            fresh.push(line.body);
            continue;
        };
        let (_, body) = current
            .iter()
            .find(|(cid, _)| *cid == id)
            .ok_or_else(|| PlanError::UnknownLine(id.to_string()))?;
        if !claimed.insert(id) {
            return Err(PlanError::DuplicateLine(id.to_string()));
        }
        if *body != line.body {
            updates.push((id, line.body));
        }
    }

    let mut inserts = Vec::new();
    for body in fresh {
        match current
            .iter()
            .find(|(cid, b)| !claimed.contains(cid) && *b == body)
        {
            Some((cid, _)) => {
                claimed.insert(*cid);
            }
            None => inserts.push(body),
        }
    }

    let deletes = current
        .iter()
        .filter(|(cid, _)| !claimed.contains(cid))
        .map(|(cid, _)| *cid)
        .collect();

    Ok(LinePlan {
        inserts,
        updates,
        deletes,
    })
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct ChangeCount {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

impl ChangeCount {
    pub fn is_zero(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.updated == 0
    }
}

impl<K> From<&KeyDiff<K>> for ChangeCount {
    fn from(diff: &KeyDiff<K>) -> Self {
        ChangeCount {
            added: diff.added.len(),
            removed: diff.removed.len(),
            updated: 0,
        }
    }
}

impl<Id, T> From<&LinePlan<Id, T>> for ChangeCount {
    fn from(plan: &LinePlan<Id, T>) -> Self {
        ChangeCount {
            added: plan.inserts.len(),
            removed: plan.deletes.len(),
            updated: plan.updates.len(),
        }
    }
}

/// What a card write changed, per owned collection.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub fields_changed: bool,
    pub tags: ChangeCount,
    pub examples: ChangeCount,
    pub translations: ChangeCount,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        !self.fields_changed
            && self.tags.is_zero()
            && self.examples.is_zero()
            && self.translations.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_diff_splits_added_and_removed() {
        let diff = diff_keys(["a", "b", "c"], ["b", "c", "d"]);
        assert_eq!(diff.added, vec!["a"]);
        assert_eq!(diff.removed, vec!["d"]);
    }

    #[test]
    fn key_diff_of_equal_sets_is_empty() {
        let diff = diff_keys(["x", "y"], ["y", "x"]);
        assert!(diff.is_empty());
    }

    #[test]
    fn key_diff_collapses_duplicates() {
        let diff = diff_keys(["hello", "hello"], Vec::<&str>::new());
        assert_eq!(diff.added, vec!["hello"]);
    }

    #[test]
    fn lines_update_insert_and_delete_in_one_pass() {
        let current = vec![(1u32, "one"), (2, "two"), (3, "three")];
        let desired = vec![
            Line::existing(1, "uno"),
            Line::existing(2, "two"),
            Line::new("four"),
        ];

        let plan = plan_lines(desired, &current).unwrap();

        assert_eq!(plan.updates, vec![(1, "uno")]);
        assert_eq!(plan.inserts, vec!["four"]);
        assert_eq!(plan.deletes, vec![3]);
    }

    #[test]
    fn id_less_line_adopts_equal_current_line() {
        let current = vec![(7u32, "same")];
        let plan = plan_lines(vec![Line::new("same")], &current).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn adopted_line_is_not_claimed_twice() {
        let current = vec![(7u32, "same")];
        let plan = plan_lines(vec![Line::new("same"), Line::new("same")], &current).unwrap();
        assert_eq!(plan.inserts, vec!["same"]);
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn unknown_id_is_rejected() {
        let current = vec![(1u32, "one")];
        let err = plan_lines(vec![Line::existing(9, "nine")], &current).unwrap_err();
        assert_eq!(err, PlanError::UnknownLine("9".to_string()));
    }

    #[test]
    fn repeated_id_is_rejected() {
        let current = vec![(1u32, "one")];
        let err = plan_lines(
            vec![Line::existing(1, "a"), Line::existing(1, "b")],
            &current,
        )
        .unwrap_err();
        assert_eq!(err, PlanError::DuplicateLine("1".to_string()));
    }

    #[test]
    fn empty_desired_deletes_everything() {
        let current = vec![(1u32, "one"), (2, "two")];
        let plan = plan_lines(Vec::<Line<u32, &str>>::new(), &current).unwrap();
        assert_eq!(plan.deletes, vec![1, 2]);
        assert_eq!(ChangeCount::from(&plan).removed, 2);
    }
}
