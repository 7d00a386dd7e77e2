// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, flags, kinds, bounds.

use alloc::string::String;

use trellis_mask::Mask;
use trellis_router::Capabilities;

use crate::render::{Fill, Font};

/// Identifier for a widget in a window (generational).
///
/// Stale identifiers (destroyed widgets, or reused slots) are rejected by
/// every window operation; holding one is harmless.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Widget flags controlling visibility and hit eligibility.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// Widget is visible (participates in indexing and painting).
        const VISIBLE   = 0b0000_0001;
        /// Widget is hit-testable and can take focus.
        const FOCUSABLE = 0b0000_0010;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// The widget variants.
///
/// One representation with behavior variants: the kind (together with
/// [`InteractMode`]) selects how the shared placement/index/interaction
/// machinery behaves, instead of a hierarchy of overriding subclasses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    /// Click/toggle control.
    Button,
    /// Static text or image; transparent to the pointer by default.
    Label,
    /// Single-line text input.
    Entry,
    /// Decorative grouping surface.
    Frame,
    /// Draggable value control with a handle.
    Slider,
    /// Invisible layout parent.
    Container,
}

impl WidgetKind {
    /// Default flags for this kind.
    pub fn default_flags(self) -> WidgetFlags {
        match self {
            Self::Button | Self::Entry | Self::Slider => {
                WidgetFlags::VISIBLE | WidgetFlags::FOCUSABLE
            }
            Self::Label | Self::Frame | Self::Container => WidgetFlags::VISIBLE,
        }
    }

    /// Default capability set for this kind.
    pub fn default_caps(self) -> Capabilities {
        match self {
            Self::Button => Capabilities::HOVER | Capabilities::CLICK,
            Self::Entry => Capabilities::all(),
            Self::Slider => Capabilities::HOVER | Capabilities::CLICK | Capabilities::DRAG,
            Self::Label | Self::Frame | Self::Container => Capabilities::empty(),
        }
    }
}

/// How press/release mutate a widget's persistent state and visuals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InteractMode {
    /// Press shows the press fill; release flips the persistent flag and
    /// restores the hover-or-base fill.
    #[default]
    Standard,
    /// Press flips the persistent flag immediately; release is a no-op.
    Toggle,
}

/// Hit-region shape of a widget.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HitBounds {
    /// The full placement rectangle.
    #[default]
    Box,
    /// Per-row opacity mask generated from the widget's image.
    Mask(Mask),
    /// Hand-authored per-row spans.
    Custom(Mask),
}

impl HitBounds {
    /// The mask, for the two mask-shaped variants.
    pub fn mask(&self) -> Option<&Mask> {
        match self {
            Self::Box => None,
            Self::Mask(m) | Self::Custom(m) => Some(m),
        }
    }
}

/// Fills for a widget's interaction states.
///
/// Absent entries fall back to `base`, making the corresponding swap a
/// no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Visuals {
    /// Resting fill.
    pub base: Fill,
    /// Fill while hovered (standard mode, or toggle mode disengaged).
    pub hover: Option<Fill>,
    /// Fill while pressed (standard mode).
    pub press: Option<Fill>,
    /// Fill while engaged (toggle mode).
    pub engaged: Option<Fill>,
    /// Fill while engaged and hovered (toggle mode).
    pub engaged_hover: Option<Fill>,
}

impl Visuals {
    /// A single-fill widget: every state shows `base`.
    pub const fn solid(base: Fill) -> Self {
        Self {
            base,
            hover: None,
            press: None,
            engaged: None,
            engaged_hover: None,
        }
    }
}

impl Default for Visuals {
    fn default() -> Self {
        Self::solid(Fill::Color([0, 0, 0, 0]))
    }
}

/// Construction data for a widget.
///
/// ```rust
/// use trellis_tree::{WidgetKind, WidgetSpec};
///
/// let spec = WidgetSpec {
///     size: (80, 24),
///     ..WidgetSpec::new(WidgetKind::Button)
/// };
/// assert_eq!(spec.kind, WidgetKind::Button);
/// ```
#[derive(Debug)]
pub struct WidgetSpec {
    /// Behavior variant.
    pub kind: WidgetKind,
    /// Size in pixels.
    pub size: (i32, i32),
    /// Press/release semantics.
    pub mode: InteractMode,
    /// Hit-region shape.
    pub bounds: HitBounds,
    /// State fills.
    pub visuals: Visuals,
    /// Optional caption drawn as a text primitive.
    pub text: Option<String>,
    /// Caption font.
    pub font: Font,
    /// Slider handle width in pixels.
    pub handle_width: i32,
    /// Override the kind's default flags.
    pub flags: Option<WidgetFlags>,
    /// Override the kind's default capability set.
    pub caps: Option<Capabilities>,
}

impl WidgetSpec {
    /// A spec with the kind's defaults and everything else empty.
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            size: (0, 0),
            mode: InteractMode::Standard,
            bounds: HitBounds::Box,
            visuals: Visuals::default(),
            text: None,
            font: Font(0),
            handle_width: 8,
            flags: None,
            caps: None,
        }
    }
}

impl Default for WidgetSpec {
    fn default() -> Self {
        Self::new(WidgetKind::Frame)
    }
}
