// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Tree: the widget tree, placement lifecycle, and hit resolver.
//!
//! A [`Window`] owns a flat arena of widgets (buttons, labels, entries,
//! frames, sliders, containers) with parent-relative placement, a
//! row-interval index over their absolute extents, and the rendering
//! backend seam. It resolves pointer positions to the topmost interactive
//! widget — box- or mask-bounded — and implements the widget side of the
//! router's behavioral contract: hover/press visual swaps, toggle state,
//! slider drags, and caret mapping for entries.
//!
//! ## Lifecycle
//!
//! Widgets are created detached; the first [`Window::place`] links them
//! into the tree and the index. Placement, resize, and visibility changes
//! re-index atomically — the index always reflects current absolute
//! positions, never stale ones. [`Window::destroy`] removes a whole
//! subtree.
//!
//! ## Hit testing
//!
//! [`Window::resolve`] answers the coarse question (topmost span under the
//! point); [`Window::widget_at`] refines candidates with
//! [`Window::check_hit`], so transparent mask pixels fall through to the
//! widget beneath. Invisible, unplaced, and non-focusable widgets never
//! hit.
//!
//! ## Routing
//!
//! [`Window`] implements `trellis_router::EventTarget`, so a
//! `trellis_router::Router` can drive it directly:
//!
//! ```rust
//! use trellis_router::Router;
//! use trellis_tree::render::{Fill, RecordingRenderer};
//! use trellis_tree::{InteractMode, Visuals, WidgetKind, WidgetSpec, Window};
//!
//! let mut win = Window::new(RecordingRenderer::new());
//! let toggle = win.create(
//!     None,
//!     WidgetSpec {
//!         size: (40, 20),
//!         mode: InteractMode::Toggle,
//!         visuals: Visuals::solid(Fill::Color([80, 80, 80, 255])),
//!         ..WidgetSpec::new(WidgetKind::Button)
//!     },
//! );
//! win.place(toggle, 10, 10);
//!
//! let mut router = Router::new();
//! router.pointer_down(&mut win, 20, 20);
//! assert_eq!(win.is_engaged(toggle), Some(true));
//! router.pointer_up(&mut win);
//! assert_eq!(win.is_engaged(toggle), Some(true));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod render;
mod types;
mod widget;
mod window;

pub use render::{Fill, Font, FontMetrics, ImageId, PrimId, Renderer};
pub use types::{
    HitBounds, InteractMode, Visuals, WidgetFlags, WidgetId, WidgetKind, WidgetSpec,
};
pub use window::Window;
