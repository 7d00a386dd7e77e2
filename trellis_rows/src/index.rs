// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The row-interval index: rows → z-ordered entry lists.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::Span;

#[derive(Clone, Debug)]
struct RowEntry<K> {
    key: K,
    z: u64,
    span: Span,
}

#[derive(Clone, Debug)]
struct Tracked {
    // Occupied rows in insertion order (ascending for our callers).
    // Adjacent duplicates mark rows with several spans.
    rows: Vec<i32>,
}

/// Row-interval index keyed by widget handles.
///
/// Each row holds its entries sorted so higher stacking keys come first;
/// [`RowIndex::resolve`] therefore returns the topmost widget with a plain
/// front-to-back scan. The stacking key is an explicit monotonic value
/// issued by the owner (creation/insertion order) — deliberately not a
/// rendering-primitive identifier.
pub struct RowIndex<K> {
    rows: HashMap<i32, SmallVec<[RowEntry<K>; 4]>>,
    tracked: HashMap<K, Tracked>,
}

impl<K: Copy + Eq + Hash + Debug> Debug for RowIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RowIndex")
            .field("tracked_keys", &self.tracked.len())
            .field("occupied_rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for RowIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> RowIndex<K> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            tracked: HashMap::new(),
        }
    }

    /// Insert `key` with stacking key `z` at the given `(row, span)` pairs.
    ///
    /// Entries land in each row immediately before the first entry with a
    /// lower stacking key, keeping the scan order aligned with visual
    /// stacking. Spans with `end < start` are dropped. Inserting a key that
    /// is already tracked removes its old entries first, so optimistic
    /// callers cannot leave stale and fresh entries coexisting.
    pub fn insert<I: IntoIterator<Item = (i32, Span)>>(&mut self, key: K, z: u64, spans: I) {
        if self.tracked.contains_key(&key) {
            self.remove(key);
        }
        let mut occupied: Vec<i32> = Vec::new();
        for (row, span) in spans {
            if span.end < span.start {
                continue;
            }
            let list = self.rows.entry(row).or_default();
            let pos = list.iter().position(|e| e.z < z).unwrap_or(list.len());
            list.insert(pos, RowEntry { key, z, span });
            if occupied.last() != Some(&row) {
                occupied.push(row);
            }
        }
        log::trace!("row index: insert {key:?} (z={z}) across {} rows", occupied.len());
        self.tracked.insert(key, Tracked { rows: occupied });
    }

    /// Remove every entry for `key`.
    ///
    /// Silent no-op when the key is not tracked. Rows left without entries
    /// are dropped from the map, so an insert/remove pair restores the
    /// index to its prior shape.
    pub fn remove(&mut self, key: K) {
        let Some(tracked) = self.tracked.remove(&key) else {
            return;
        };
        let mut prev = None;
        for row in tracked.rows {
            if prev == Some(row) {
                continue;
            }
            prev = Some(row);
            if let Some(list) = self.rows.get_mut(&row) {
                list.retain(|e| e.key != key);
                if list.is_empty() {
                    self.rows.remove(&row);
                }
            }
        }
        log::trace!("row index: remove {key:?}");
    }

    /// Move `key` to a new set of spans: remove-then-insert, atomically
    /// from the caller's perspective — stale and fresh entries never
    /// coexist.
    pub fn replace<I: IntoIterator<Item = (i32, Span)>>(&mut self, key: K, z: u64, spans: I) {
        self.remove(key);
        self.insert(key, z, spans);
    }

    /// The topmost key whose span on row `y` contains `x`.
    ///
    /// This is the coarse box answer: for mask-bounded widgets the caller
    /// must refine with its precise per-widget test. Absent rows resolve to
    /// `None`.
    pub fn resolve(&self, x: i32, y: i32) -> Option<K> {
        self.rows
            .get(&y)?
            .iter()
            .find(|e| e.span.contains(x))
            .map(|e| e.key)
    }

    /// All keys whose span on row `y` contains `x`, topmost first.
    ///
    /// Callers refining with a precise test walk this until one candidate
    /// passes, so a transparent mask pixel falls through to the widget
    /// beneath.
    pub fn candidates(&self, x: i32, y: i32) -> impl Iterator<Item = K> + '_ {
        self.rows
            .get(&y)
            .into_iter()
            .flatten()
            .filter(move |e| e.span.contains(x))
            .map(|e| e.key)
    }

    /// Whether `key` currently has entries in the index.
    pub fn is_tracked(&self, key: K) -> bool {
        self.tracked.contains_key(&key)
    }

    /// Total number of entries referencing `key`.
    pub fn entry_count(&self, key: K) -> usize {
        let Some(tracked) = self.tracked.get(&key) else {
            return 0;
        };
        let mut count = 0;
        let mut prev = None;
        for &row in &tracked.rows {
            if prev == Some(row) {
                continue;
            }
            prev = Some(row);
            count += self
                .rows
                .get(&row)
                .map_or(0, |list| list.iter().filter(|e| e.key == key).count());
        }
        count
    }

    /// Number of entries stored on row `y`.
    pub fn row_entry_count(&self, y: i32) -> usize {
        self.rows.get(&y).map_or(0, SmallVec::len)
    }

    /// True when no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.tracked.clear();
    }
}
