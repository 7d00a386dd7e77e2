// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Mask: per-row opacity masks for non-rectangular hit regions.
//!
//! A [`Mask`] maps a widget-local row index to an ordered list of opaque
//! horizontal [`Span`]s. Widgets whose hit region should follow an image's
//! silhouette (instead of their bounding box) build a mask once per image
//! assignment and consult it during narrow-phase hit testing.
//!
//! - [`from_alpha`] scans an [`AlphaSource`] row by row and collapses
//!   consecutive opaque pixels into spans; multiple runs per row are
//!   preserved as multiple spans.
//! - Rows with no opaque pixel are simply absent from the mask — never
//!   present as empty lists.
//! - Masks can also be authored by hand via [`Mask::from_rows`] for fully
//!   custom hit regions.
//!
//! # Opacity threshold and fallback
//!
//! A pixel counts as opaque when its alpha is at least
//! `round(tolerance * 255)`. If the whole image yields no span at the
//! requested tolerance, the generator retries with the threshold lowered by
//! 10 (on the 0–255 scale), down to and including 0. Zero-alpha pixels
//! never count as opaque, so a fully transparent image produces an empty
//! mask rather than a full one on the final step.
//!
//! ```rust
//! use trellis_mask::{from_alpha, AlphaSource, DEFAULT_TOLERANCE};
//!
//! /// 3×3 source with an opaque centre pixel only.
//! struct Dot;
//! impl AlphaSource for Dot {
//!     fn width(&self) -> u32 { 3 }
//!     fn height(&self) -> u32 { 3 }
//!     fn alpha(&self, x: u32, y: u32) -> u8 {
//!         if x == 1 && y == 1 { 255 } else { 0 }
//!     }
//! }
//!
//! let mask = from_alpha(&Dot, DEFAULT_TOLERANCE);
//! assert!(mask.contains(1, 1));
//! assert!(!mask.contains(0, 0));
//! assert_eq!(mask.row_count(), 1);
//! ```
//!
//! # Images
//!
//! With the `image_adapter` feature, [`AlphaSource`] is implemented for the
//! `image` crate's buffer types and [`from_image_bytes`] decodes and masks
//! in one step, reporting undecodable input as a [`MaskError`].

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::collections::BTreeMap;
use smallvec::SmallVec;

#[cfg(feature = "image_adapter")]
mod image_adapter;
#[cfg(feature = "image_adapter")]
pub use image_adapter::from_image_bytes;

/// Interval type shared with the row index; mask rows are lists of these.
pub use trellis_rows::Span;

/// Default opacity tolerance used by widgets that don't override it.
pub const DEFAULT_TOLERANCE: f32 = 0.75;

/// How far the threshold drops (0–255 scale) on each fallback retry.
const FALLBACK_STEP: i32 = 10;

/// Per-row opacity mask in widget-local coordinates.
///
/// Only rows with at least one span are stored. Span lists keep the order
/// they were produced in (left to right for generated masks).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mask {
    rows: BTreeMap<i32, SmallVec<[Span; 2]>>,
}

impl Mask {
    /// Create an empty mask (no opaque pixels anywhere).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mask from explicit `(row, span)` pairs.
    ///
    /// This is the "custom bounds" path: callers hand-author the hit
    /// region instead of deriving it from an image. Degenerate spans
    /// (`end < start`) are dropped.
    pub fn from_rows<I: IntoIterator<Item = (i32, Span)>>(rows: I) -> Self {
        let mut mask = Self::new();
        for (row, span) in rows {
            if span.end < span.start {
                continue;
            }
            mask.rows.entry(row).or_default().push(span);
        }
        mask
    }

    /// The spans of `row`, or `None` when the row has no opaque pixel.
    pub fn row(&self, row: i32) -> Option<&[Span]> {
        self.rows.get(&row).map(|spans| spans.as_slice())
    }

    /// Iterate rows in ascending order with their span lists.
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Span])> + '_ {
        self.rows.iter().map(|(row, spans)| (*row, spans.as_slice()))
    }

    /// Whether the point `(x, y)` (widget-local) is opaque.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.row(y)
            .is_some_and(|spans| spans.iter().any(|s| s.contains(x)))
    }

    /// True when no row holds a span.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows holding at least one span.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of spans across all rows.
    pub fn span_count(&self) -> usize {
        self.rows.values().map(SmallVec::len).sum()
    }
}

/// Decoded pixel access for mask generation.
///
/// This is the seam to the image/asset collaborator: the generator only
/// needs dimensions and a per-pixel alpha value. Sources without an alpha
/// channel report every pixel as fully opaque (255).
pub trait AlphaSource {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
    /// Alpha of the pixel at `(x, y)`; 255 for sources without alpha.
    fn alpha(&self, x: u32, y: u32) -> u8;
}

/// Errors from mask generation over decoded images.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// The image decoded to a zero-area buffer.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },
    /// The input bytes could not be decoded as an image.
    #[cfg(feature = "image_adapter")]
    #[error("undecodable image input")]
    Decode(#[from] image::ImageError),
}

/// Generate a mask from an alpha source at the given tolerance.
///
/// A pixel is opaque when its alpha is ≥ `round(tolerance * 255)`. If no
/// pixel in the whole image passes, the threshold walks down by 10 per
/// retry, to and including 0. Pixels with zero alpha never count, so a
/// fully transparent source yields an empty mask.
pub fn from_alpha<S: AlphaSource>(source: &S, tolerance: f32) -> Mask {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rounded product of a clamped tolerance and 255 fits i32"
    )]
    // Round half-up without `f64::round`, which needs std or libm.
    let mut threshold = (f64::from(tolerance).clamp(0.0, 1.0) * 255.0 + 0.5) as i32;

    loop {
        // A zero threshold would admit fully transparent pixels; floor the
        // effective cutoff at 1 so emptiness stays meaningful.
        #[allow(
            clippy::cast_possible_truncation,
            reason = "cutoff is clamped to 1..=255"
        )]
        let cutoff = threshold.max(1) as u8;
        let mask = scan(source, cutoff);
        if !mask.is_empty() || threshold == 0 {
            return mask;
        }
        threshold = (threshold - FALLBACK_STEP).max(0);
    }
}

/// One scan pass: collect opaque runs per row at a fixed cutoff.
fn scan<S: AlphaSource>(source: &S, cutoff: u8) -> Mask {
    let (width, height) = (source.width(), source.height());
    let mut mask = Mask::new();
    for y in 0..height {
        let mut spans: SmallVec<[Span; 2]> = SmallVec::new();
        let mut run_start: Option<u32> = None;
        for x in 0..width {
            if source.alpha(x, y) >= cutoff {
                run_start.get_or_insert(x);
            } else if let Some(start) = run_start.take() {
                spans.push(span_from_run(start, x - 1));
            }
        }
        if let Some(start) = run_start {
            spans.push(span_from_run(start, width - 1));
        }
        if !spans.is_empty() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "image rows fit widget-local i32 coordinates"
            )]
            mask.rows.insert(y as i32, spans);
        }
    }
    mask
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "image columns fit widget-local i32 coordinates"
)]
fn span_from_run(start: u32, end: u32) -> Span {
    Span::new(start as i32, end as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Test source backed by a row-major alpha buffer.
    struct Buf {
        width: u32,
        height: u32,
        data: Vec<u8>,
    }

    impl Buf {
        fn filled(width: u32, height: u32, alpha: u8) -> Self {
            Self {
                width,
                height,
                data: alloc::vec![alpha; (width * height) as usize],
            }
        }

        /// 5×5 fully opaque square with a 1-px transparent border.
        fn bordered_square() -> Self {
            let mut buf = Self::filled(5, 5, 0);
            for y in 1..4 {
                for x in 1..4 {
                    buf.data[(y * 5 + x) as usize] = 255;
                }
            }
            buf
        }
    }

    impl AlphaSource for Buf {
        fn width(&self) -> u32 {
            self.width
        }
        fn height(&self) -> u32 {
            self.height
        }
        fn alpha(&self, x: u32, y: u32) -> u8 {
            self.data[(y * self.width + x) as usize]
        }
    }

    #[test]
    fn bordered_square_masks_interior_only() {
        let mask = from_alpha(&Buf::bordered_square(), DEFAULT_TOLERANCE);
        assert_eq!(mask.row_count(), 3);
        for row in 1..=3 {
            assert_eq!(mask.row(row), Some(&[Span::new(1, 3)][..]));
        }
        assert!(mask.contains(2, 2));
        assert!(!mask.contains(0, 0));
        assert!(!mask.contains(4, 4));
    }

    #[test]
    fn transparent_rows_are_absent_not_empty() {
        let mask = from_alpha(&Buf::bordered_square(), DEFAULT_TOLERANCE);
        assert!(mask.row(0).is_none());
        assert!(mask.row(4).is_none());
        assert_eq!(mask.rows().count(), 3);
    }

    #[test]
    fn multiple_runs_per_row_are_preserved() {
        // Opaque, gap, opaque: two spans in one row.
        let buf = Buf {
            width: 7,
            height: 1,
            data: alloc::vec![255, 255, 0, 0, 255, 255, 255],
        };
        let mask = from_alpha(&buf, DEFAULT_TOLERANCE);
        assert_eq!(
            mask.row(0),
            Some(&[Span::new(0, 1), Span::new(4, 6)][..])
        );
        assert!(mask.contains(1, 0));
        assert!(!mask.contains(3, 0));
        assert!(mask.contains(5, 0));
    }

    #[test]
    fn threshold_walks_down_until_pixels_survive() {
        // Alpha 0xaa everywhere is below round(0.75 * 255) = 191; the
        // fallback walks 191 → 181 → 171 → 161 and then every pixel passes.
        let mask = from_alpha(&Buf::filled(5, 5, 0xaa), DEFAULT_TOLERANCE);
        assert_eq!(mask.row_count(), 5);
        for row in 0..5 {
            assert_eq!(mask.row(row), Some(&[Span::new(0, 4)][..]));
        }
    }

    #[test]
    fn low_tolerance_needs_no_fallback() {
        // round(0.2 * 255) = 51 ≤ 0xaa, so the first pass already succeeds.
        let mask = from_alpha(&Buf::filled(5, 5, 0xaa), 0.2);
        for row in 0..5 {
            assert_eq!(mask.row(row), Some(&[Span::new(0, 4)][..]));
        }
    }

    #[test]
    fn fully_transparent_image_yields_empty_mask() {
        let mask = from_alpha(&Buf::filled(4, 4, 0), DEFAULT_TOLERANCE);
        assert!(mask.is_empty());
        assert_eq!(mask.span_count(), 0);
    }

    #[test]
    fn no_alpha_source_is_fully_opaque() {
        struct Flat;
        impl AlphaSource for Flat {
            fn width(&self) -> u32 {
                3
            }
            fn height(&self) -> u32 {
                2
            }
            fn alpha(&self, _x: u32, _y: u32) -> u8 {
                255
            }
        }
        let mask = from_alpha(&Flat, DEFAULT_TOLERANCE);
        assert_eq!(mask.row_count(), 2);
        assert_eq!(mask.row(0), Some(&[Span::new(0, 2)][..]));
    }

    #[test]
    fn zero_area_source_yields_empty_mask() {
        let mask = from_alpha(&Buf::filled(0, 0, 255), DEFAULT_TOLERANCE);
        assert!(mask.is_empty());
    }

    #[test]
    fn custom_rows_build_a_mask() {
        let mask = Mask::from_rows([
            (0, Span::new(2, 4)),
            (0, Span::new(8, 9)),
            (5, Span::new(0, 0)),
            (7, Span::new(3, 1)), // degenerate, dropped
        ]);
        assert_eq!(mask.row_count(), 2);
        assert!(mask.contains(3, 0));
        assert!(mask.contains(9, 0));
        assert!(!mask.contains(6, 0));
        assert!(mask.contains(0, 5));
        assert!(mask.row(7).is_none());
    }

}
