// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Rows: a per-row interval index for widget hit testing.
//!
//! Trellis Rows maps absolute screen rows to the ordered list of widgets
//! occupying them, one inclusive horizontal [`Span`] per entry. It is the
//! broad phase of pointer resolution: one list scan per row answers "which
//! widget is topmost under this point", and callers with non-rectangular
//! widgets refine the winning candidate with their own mask test.
//!
//! - Insert, remove, and replace entries keyed by any small copyable
//!   handle (a widget id).
//! - Entries within a row stay sorted by an explicit monotonic stacking
//!   key, so a linear scan finds the topmost widget first.
//! - Removal is idempotent and lookups on absent rows are empty, never an
//!   error, so callers may update defensively without tracking prior
//!   state.
//!
//! # Example
//!
//! ```rust
//! use trellis_rows::{RowIndex, Span};
//!
//! let mut idx: RowIndex<u32> = RowIndex::new();
//! // Widget 1 occupies rows 0..4, columns 0..=9.
//! idx.insert(1, 1, (0..4).map(|row| (row, Span::new(0, 9))));
//! // Widget 2 stacks above it, shifted right and down.
//! idx.insert(2, 2, (2..6).map(|row| (row, Span::new(5, 14))));
//!
//! // In the overlap the later stacking key wins.
//! assert_eq!(idx.resolve(6, 3), Some(2));
//! // Outside widget 2's span, widget 1 shows through.
//! assert_eq!(idx.resolve(2, 3), Some(1));
//! // Absent rows are empty, not an error.
//! assert_eq!(idx.resolve(6, 100), None);
//!
//! idx.remove(2);
//! assert_eq!(idx.resolve(6, 3), Some(1));
//! ```

#![no_std]

extern crate alloc;

mod index;
mod types;

pub use index::RowIndex;
pub use types::Span;

#[cfg(test)]
mod tests {
    use super::*;

    fn box_spans(x: i32, y: i32, w: i32, h: i32) -> impl Iterator<Item = (i32, Span)> {
        (y..y + h).map(move |row| (row, Span::new(x, x + w - 1)))
    }

    #[test]
    fn overlapping_widgets_resolve_topmost_first() {
        let mut idx: RowIndex<u32> = RowIndex::new();
        idx.insert(10, 1, box_spans(0, 0, 20, 20));
        idx.insert(11, 2, box_spans(10, 10, 20, 20));

        // Overlap region: the later key stacks above.
        assert_eq!(idx.resolve(15, 15), Some(11));
        // Only the first widget.
        assert_eq!(idx.resolve(5, 5), Some(10));
        // Only the second widget.
        assert_eq!(idx.resolve(25, 25), Some(11));
        // Nobody.
        assert_eq!(idx.resolve(50, 50), None);
    }

    #[test]
    fn replace_leaves_no_stale_rows() {
        let mut idx: RowIndex<u32> = RowIndex::new();
        idx.insert(7, 1, box_spans(0, 0, 4, 4));
        idx.replace(7, 1, box_spans(100, 100, 4, 4));

        assert_eq!(idx.resolve(1, 1), None);
        assert_eq!(idx.resolve(101, 101), Some(7));
        assert_eq!(idx.entry_count(7), 4);
    }

    #[test]
    fn insert_then_remove_round_trips_to_empty() {
        let mut idx: RowIndex<u32> = RowIndex::new();
        idx.insert(3, 1, box_spans(2, 2, 8, 8));
        assert!(!idx.is_empty());
        idx.remove(3);
        assert!(idx.is_empty());
        assert_eq!(idx.entry_count(3), 0);
        assert_eq!(idx.row_entry_count(4), 0);
    }
}
