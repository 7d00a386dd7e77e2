// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Internal widget representation and its visual-state resolution.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use trellis_router::Capabilities;
use trellis_router::events::KeyEvent;

use crate::render::{Fill, Font, PrimId};
use crate::types::{HitBounds, InteractMode, Visuals, WidgetFlags, WidgetId, WidgetKind, WidgetSpec};

pub(crate) struct Widget {
    pub(crate) generation: u32,
    pub(crate) kind: WidgetKind,
    pub(crate) mode: InteractMode,
    pub(crate) flags: WidgetFlags,
    pub(crate) caps: Capabilities,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    /// Parent-relative position; `None` until first placement.
    pub(crate) pos: Option<(i32, i32)>,
    pub(crate) size: (i32, i32),
    pub(crate) bounds: HitBounds,
    /// Monotonic stacking key issued at creation; later keys stack above.
    pub(crate) z: u64,
    pub(crate) visuals: Visuals,
    pub(crate) text: Option<String>,
    pub(crate) font: Font,
    pub(crate) handle_width: i32,

    // Interaction state driven by the router callbacks.
    pub(crate) hover: bool,
    pub(crate) pressed: bool,
    pub(crate) engaged: bool,
    pub(crate) slider_pos: i32,

    // Backend primitives.
    pub(crate) surface: Option<PrimId>,
    pub(crate) caption: Option<PrimId>,
    pub(crate) handle: Option<PrimId>,
    /// Visibility last pushed to the backend, to keep show/hide edge-triggered.
    pub(crate) shown: bool,
    /// Fill last pushed to the backend, to keep restyles edge-triggered.
    pub(crate) applied: Option<Fill>,

    // Host callbacks.
    pub(crate) on_off: Option<Box<dyn FnMut()>>,
    pub(crate) on_key: Option<Box<dyn FnMut(&KeyEvent)>>,
    pub(crate) on_drag: Option<Box<dyn FnMut(i32, i32)>>,
}

impl Widget {
    pub(crate) fn new(generation: u32, parent: Option<WidgetId>, z: u64, spec: WidgetSpec) -> Self {
        let flags = spec.flags.unwrap_or_else(|| spec.kind.default_flags());
        let caps = spec.caps.unwrap_or_else(|| spec.kind.default_caps());
        Self {
            generation,
            kind: spec.kind,
            mode: spec.mode,
            flags,
            caps,
            parent,
            children: Vec::new(),
            pos: None,
            size: spec.size,
            bounds: spec.bounds,
            z,
            visuals: spec.visuals,
            text: spec.text,
            font: spec.font,
            handle_width: spec.handle_width,
            hover: false,
            pressed: false,
            engaged: false,
            slider_pos: 0,
            surface: None,
            caption: None,
            handle: None,
            shown: true,
            applied: None,
            on_off: None,
            on_key: None,
            on_drag: None,
        }
    }

    /// The fill matching the widget's current interaction state.
    ///
    /// Toggle mode swaps between the plain and engaged fill pair on hover;
    /// standard mode layers press over hover over base. Missing entries
    /// fall back toward `base`.
    pub(crate) fn current_fill(&self) -> Fill {
        let v = &self.visuals;
        match self.mode {
            InteractMode::Toggle => {
                if self.engaged {
                    let resting = v.engaged.unwrap_or(v.base);
                    if self.hover {
                        v.engaged_hover.unwrap_or(resting)
                    } else {
                        resting
                    }
                } else if self.hover {
                    v.hover.unwrap_or(v.base)
                } else {
                    v.base
                }
            }
            InteractMode::Standard => {
                if self.pressed {
                    v.press.unwrap_or(v.base)
                } else if self.hover {
                    v.hover.unwrap_or(v.base)
                } else {
                    v.base
                }
            }
        }
    }

    /// Every live primitive, for deletion on destroy.
    pub(crate) fn prims(&self) -> impl Iterator<Item = PrimId> {
        self.surface
            .into_iter()
            .chain(self.caption)
            .chain(self.handle)
    }
}

impl core::fmt::Debug for Widget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Widget")
            .field("kind", &self.kind)
            .field("mode", &self.mode)
            .field("flags", &self.flags)
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("z", &self.z)
            .field("engaged", &self.engaged)
            .finish_non_exhaustive()
    }
}
