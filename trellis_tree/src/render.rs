// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering backend seam.
//!
//! Trellis does not draw. The window calls through [`Renderer`] to create,
//! move, restyle, and delete primitives and to measure text; a real backend
//! wraps the native canvas, and [`RecordingRenderer`] stands in for it in
//! tests and demos. All calls are synchronous and return pixel integers.

use alloc::string::String;
use alloc::vec::Vec;

/// Handle to a backend primitive (rectangle, text, or image).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimId(pub u64);

/// Handle to a decoded image owned by the asset collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// Handle to a resolved font.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Font(pub u32);

/// What a primitive is painted with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// A solid RGBA color.
    Color([u8; 4]),
    /// A decoded image.
    Image(ImageId),
}

/// Vertical metrics for a font.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    /// Distance between baselines.
    pub linespace: i32,
    /// Height above the baseline.
    pub ascent: i32,
}

/// Primitive-level canvas operations provided by the native backend.
pub trait Renderer {
    /// Create a filled rectangle primitive.
    fn create_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Fill) -> PrimId;

    /// Create a text primitive.
    fn create_text(&mut self, x: i32, y: i32, font: Font, text: &str) -> PrimId;

    /// Create an image primitive.
    fn create_image(&mut self, x: i32, y: i32, image: ImageId) -> PrimId;

    /// Move a primitive to a new absolute position.
    fn move_prim(&mut self, prim: PrimId, x: i32, y: i32);

    /// Resize a rectangle primitive.
    fn resize_prim(&mut self, prim: PrimId, w: i32, h: i32);

    /// Swap a primitive's fill.
    fn set_fill(&mut self, prim: PrimId, fill: Fill);

    /// Show or hide a primitive without deleting it.
    fn set_prim_visible(&mut self, prim: PrimId, visible: bool);

    /// Delete a primitive.
    fn delete_prim(&mut self, prim: PrimId);

    /// Width of `text` in pixels when drawn with `font`.
    fn measure_text(&self, font: Font, text: &str) -> i32;

    /// Vertical metrics of `font`.
    fn font_metrics(&self, font: Font) -> FontMetrics;
}

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOp {
    /// `create_rect` happened.
    CreateRect {
        /// New primitive.
        prim: PrimId,
        /// Position.
        x: i32,
        /// Position.
        y: i32,
        /// Size.
        w: i32,
        /// Size.
        h: i32,
        /// Initial fill.
        fill: Fill,
    },
    /// `create_text` happened.
    CreateText {
        /// New primitive.
        prim: PrimId,
        /// Position.
        x: i32,
        /// Position.
        y: i32,
        /// Text content.
        text: String,
    },
    /// `create_image` happened.
    CreateImage {
        /// New primitive.
        prim: PrimId,
        /// Position.
        x: i32,
        /// Position.
        y: i32,
        /// Image painted.
        image: ImageId,
    },
    /// `move_prim` happened.
    Move {
        /// Moved primitive.
        prim: PrimId,
        /// New position.
        x: i32,
        /// New position.
        y: i32,
    },
    /// `resize_prim` happened.
    Resize {
        /// Resized primitive.
        prim: PrimId,
        /// New size.
        w: i32,
        /// New size.
        h: i32,
    },
    /// `set_fill` happened.
    SetFill {
        /// Restyled primitive.
        prim: PrimId,
        /// New fill.
        fill: Fill,
    },
    /// `set_prim_visible` happened.
    SetVisible {
        /// Affected primitive.
        prim: PrimId,
        /// New visibility.
        visible: bool,
    },
    /// `delete_prim` happened.
    Delete {
        /// Deleted primitive.
        prim: PrimId,
    },
}

/// Backend double that records every call.
///
/// Text measurement is monospace: every character is `char_width` pixels
/// wide. Useful for asserting on visual transitions and caret mapping
/// without a native canvas.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_prim: u64,
    /// Every call, in order.
    pub ops: Vec<RenderOp>,
    /// Monospace advance used by `measure_text`; 0 defaults to 8.
    pub char_width: i32,
}

impl RecordingRenderer {
    /// A recorder with the default 8-px monospace advance.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last fill applied to `prim`, if any.
    pub fn last_fill(&self, prim: PrimId) -> Option<Fill> {
        self.ops.iter().rev().find_map(|op| match op {
            RenderOp::SetFill { prim: p, fill } if *p == prim => Some(*fill),
            RenderOp::CreateRect { prim: p, fill, .. } if *p == prim => Some(*fill),
            _ => None,
        })
    }

    /// Whether a delete was recorded for `prim`.
    pub fn deleted(&self, prim: PrimId) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, RenderOp::Delete { prim: p } if *p == prim))
    }

    fn advance(&self) -> i32 {
        if self.char_width == 0 { 8 } else { self.char_width }
    }

    fn fresh(&mut self) -> PrimId {
        self.next_prim += 1;
        PrimId(self.next_prim)
    }
}

impl Renderer for RecordingRenderer {
    fn create_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Fill) -> PrimId {
        let prim = self.fresh();
        self.ops.push(RenderOp::CreateRect { prim, x, y, w, h, fill });
        prim
    }

    fn create_text(&mut self, x: i32, y: i32, _font: Font, text: &str) -> PrimId {
        let prim = self.fresh();
        self.ops.push(RenderOp::CreateText {
            prim,
            x,
            y,
            text: String::from(text),
        });
        prim
    }

    fn create_image(&mut self, x: i32, y: i32, image: ImageId) -> PrimId {
        let prim = self.fresh();
        self.ops.push(RenderOp::CreateImage { prim, x, y, image });
        prim
    }

    fn move_prim(&mut self, prim: PrimId, x: i32, y: i32) {
        self.ops.push(RenderOp::Move { prim, x, y });
    }

    fn resize_prim(&mut self, prim: PrimId, w: i32, h: i32) {
        self.ops.push(RenderOp::Resize { prim, w, h });
    }

    fn set_fill(&mut self, prim: PrimId, fill: Fill) {
        self.ops.push(RenderOp::SetFill { prim, fill });
    }

    fn set_prim_visible(&mut self, prim: PrimId, visible: bool) {
        self.ops.push(RenderOp::SetVisible { prim, visible });
    }

    fn delete_prim(&mut self, prim: PrimId) {
        self.ops.push(RenderOp::Delete { prim });
    }

    fn measure_text(&self, _font: Font, text: &str) -> i32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "test strings are far shorter than i32::MAX characters"
        )]
        let chars = text.chars().count() as i32;
        chars * self.advance()
    }

    fn font_metrics(&self, _font: Font) -> FontMetrics {
        FontMetrics {
            linespace: self.advance() * 2,
            ascent: self.advance() * 3 / 2,
        }
    }
}
