//! Ordered sibling groups.
//!
//! Siblings (items sharing a `listID`, tasks sharing an `itemID`, columns
//! sharing a `boardID`) carry a 1-based `index` used for display order. A
//! separate `count` records collection-wide creation order and is never
//! reused.
//!
//! Deleting from the middle of a group leaves a gap. Gaps are tolerated:
//! appends skip past the highest index, and the next reorder renumbers the
//! whole group densely.

use crate::database::{BatchUpdate, Document};
use crate::error::{KanbanError, Result};
use crate::types::{Board, Column, Item, Record, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// An entity positioned within a sibling group
pub trait Ordered {
    /// 1-based display position
    fn index(&self) -> u64;

    fn set_index(&mut self, index: u64);

    /// Collection-wide creation sequence
    fn count(&self) -> u64;
}

macro_rules! impl_ordered {
    ($($ty:ty),*) => {
        $(
            impl Ordered for $ty {
                fn index(&self) -> u64 {
                    self.index
                }

                fn set_index(&mut self, index: u64) {
                    self.index = index;
                }

                fn count(&self) -> u64 {
                    self.count.max(self.key)
                }
            }
        )*
    };
}

impl_ordered!(Board, Column, Item, Task);

/// Index for an entity appended to `siblings`.
///
/// Starts from `len + 1` and bumps past the highest existing index, so a
/// group with gaps never hands out a duplicate.
pub fn next_index<T: Ordered>(siblings: &[T]) -> u64 {
    let candidate = siblings.len() as u64 + 1;
    let highest = siblings.iter().map(Ordered::index).max().unwrap_or(0);
    if highest >= candidate {
        highest + 1
    } else {
        candidate
    }
}

/// Creation sequence for an entity added anywhere in `collection`.
///
/// `high_water` is the highest count ever issued in the collection,
/// including counts of records since deleted. The result starts from
/// `len + 1` and bumps past both the highest surviving count (or index) and
/// `high_water`, so a count is never handed out twice.
pub fn next_count<T: Ordered>(collection: &[T], high_water: u64) -> u64 {
    let candidate = collection.len() as u64 + 1;
    let highest = collection
        .iter()
        .map(|e| e.count().max(e.index()))
        .max()
        .unwrap_or(0)
        .max(high_water);
    if highest >= candidate {
        highest + 1
    } else {
        candidate
    }
}

/// Stable sort by index
pub fn sort_by_index<T: Ordered>(siblings: &mut [T]) {
    siblings.sort_by_key(Ordered::index);
}

/// Move the element at `from` so it ends up at `to`. Elements in between
/// shift by one; this is an array move, not a swap.
pub fn move_element<T>(siblings: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = siblings.len();
    if from >= len {
        return Err(KanbanError::PositionOutOfRange {
            position: from,
            len,
        });
    }
    if to >= len {
        return Err(KanbanError::PositionOutOfRange { position: to, len });
    }
    let element = siblings.remove(from);
    siblings.insert(to, element);
    Ok(())
}

/// Assign `index = position + 1` to every sibling. Returns the positions
/// whose index changed.
pub fn renumber<T: Ordered>(siblings: &mut [T]) -> Vec<usize> {
    let mut changed = Vec::new();
    for (position, sibling) in siblings.iter_mut().enumerate() {
        let index = position as u64 + 1;
        if sibling.index() != index {
            sibling.set_index(index);
            changed.push(position);
        }
    }
    changed
}

/// Outcome of a reorder: the new order and which positions need persisting
#[derive(Debug, Clone)]
pub struct Reordered<T> {
    pub siblings: Vec<T>,
    pub changed: Vec<usize>,
}

impl<T> Reordered<T> {
    /// Siblings whose index changed
    pub fn changed(&self) -> impl Iterator<Item = &T> {
        self.changed.iter().filter_map(|&i| self.siblings.get(i))
    }
}

/// Move `from` to `to` within `siblings` (in displayed order) and renumber
/// the whole group densely.
pub fn reorder<T: Ordered>(mut siblings: Vec<T>, from: usize, to: usize) -> Result<Reordered<T>> {
    move_element(&mut siblings, from, to)?;
    let changed = renumber(&mut siblings);
    Ok(Reordered { siblings, changed })
}

/// Fail with [`KanbanError::StaleOrdering`] unless `current` holds exactly
/// the `expected` ids in the same order.
pub fn ensure_unchanged<T: Record>(parent: &str, current: &[T], expected: &[String]) -> Result<()> {
    let unchanged = current.len() == expected.len()
        && current
            .iter()
            .zip(expected)
            .all(|(sibling, id)| sibling.record_id() == id);
    if unchanged {
        Ok(())
    } else {
        Err(KanbanError::StaleOrdering {
            parent: parent.to_string(),
            expected: expected.len(),
            found: current.len(),
        })
    }
}

/// One `{index, updated}` partial update per changed sibling, ready for a
/// single atomic batch.
pub fn index_updates<T: Ordered + Record>(
    reordered: &Reordered<T>,
    now: DateTime<Utc>,
) -> Vec<BatchUpdate> {
    reordered
        .changed()
        .map(|sibling| {
            let mut fields = Document::new();
            fields.insert("index".into(), json!(sibling.index()));
            fields.insert("updated".into(), json!(now));
            BatchUpdate::new(T::COLLECTION, sibling.record_id(), fields)
        })
        .collect()
}

/// Direction of a swipe across parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Toward the previous parent
    Left,
    /// Toward the next parent
    Right,
}

impl SwipeDirection {
    pub fn step(&self) -> isize {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Position of the parent adjacent to `current`, wrapping past either end.
/// `None` when there are no parents.
pub fn cyclic_neighbor(current: usize, direction: SwipeDirection, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    let next = (current as isize + direction.step()).rem_euclid(len);
    Some(next as usize)
}
