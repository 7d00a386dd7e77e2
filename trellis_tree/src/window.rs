// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window: widget arena, placement lifecycle, and pointer resolution.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Point;
use trellis_hit::{clamp, point_in_rect, rect_corners};
use trellis_rows::{RowIndex, Span};
use trellis_router::events::KeyEvent;
use trellis_router::{Capabilities, EventTarget};

use crate::render::{Fill, Font, PrimId, Renderer};
use crate::types::{HitBounds, InteractMode, Visuals, WidgetFlags, WidgetId, WidgetKind, WidgetSpec};
use crate::widget::Widget;

/// One top-level window: the widget arena, its row-interval index, and the
/// rendering backend.
///
/// Widgets are created detached and enter the index (and their parent's
/// children list) on first [`Window::place`]. Every later placement,
/// resize, or visibility change re-indexes atomically: stale and fresh
/// entries never coexist. Stacking follows creation order — later widgets
/// stack above earlier ones and win hit tests in the overlap.
///
/// All widget and index mutation for a window must happen on that window's
/// own processing context; the underlying backend is not safe for
/// concurrent access, so cross-context callers marshal through a queue of
/// their own.
///
/// ## Example
///
/// ```rust
/// use trellis_tree::render::{Fill, RecordingRenderer};
/// use trellis_tree::{Window, WidgetKind, WidgetSpec, Visuals};
///
/// let mut win = Window::new(RecordingRenderer::new());
/// let button = win.create(
///     None,
///     WidgetSpec {
///         size: (80, 24),
///         visuals: Visuals::solid(Fill::Color([60, 60, 60, 255])),
///         ..WidgetSpec::new(WidgetKind::Button)
///     },
/// );
///
/// // Detached widgets are not hit-testable.
/// assert!(!win.check_hit(button, 10, 10));
///
/// win.place(button, 0, 0);
/// assert!(win.check_hit(button, 10, 10));
/// assert_eq!(win.widget_at(10, 10), Some(button));
/// ```
pub struct Window<R> {
    renderer: R,
    nodes: Vec<Option<Widget>>,
    /// Last generation per slot (persists across frees).
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Monotonic stacking counter; the next widget stacks above all before it.
    next_z: u64,
    index: RowIndex<WidgetId>,
}

impl<R> core::fmt::Debug for Window<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Window")
            .field("widgets_total", &total)
            .field("widgets_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> Window<R> {
    /// Create an empty window over a rendering backend.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            next_z: 0,
            index: RowIndex::new(),
        }
    }

    /// Borrow the rendering backend.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Borrow the rendering backend mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Create a widget, detached, as a child of `parent` (or at window
    /// level for `None`).
    ///
    /// The widget receives the next stacking key but enters the index and
    /// its parent's children list only on first [`Window::place`]. A stale
    /// `parent` is treated as `None`.
    pub fn create(&mut self, parent: Option<WidgetId>, spec: WidgetSpec) -> WidgetId {
        let parent = parent.filter(|p| self.is_alive(*p));
        self.next_z += 1;
        let z = self.next_z;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Widget::new(generation, parent, z, spec));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            self.nodes.push(Some(Widget::new(1, parent, z, spec)));
            self.generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, 1)
        };
        WidgetId::new(idx, generation)
    }

    /// Returns true if `id` refers to a live widget.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.widget(id).is_some()
    }

    fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|w| w.generation == id.1)
    }

    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|w| w.generation == id.1)
    }

    // --- read-side accessors ---

    /// The widget's kind, if live.
    pub fn kind(&self, id: WidgetId) -> Option<WidgetKind> {
        self.widget(id).map(|w| w.kind)
    }

    /// The widget's flags, if live.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.widget(id).map(|w| w.flags)
    }

    /// The widget's size, if live.
    pub fn size(&self, id: WidgetId) -> Option<(i32, i32)> {
        self.widget(id).map(|w| w.size)
    }

    /// Parent-relative position; `None` when unplaced or stale.
    pub fn position(&self, id: WidgetId) -> Option<(i32, i32)> {
        self.widget(id).and_then(|w| w.pos)
    }

    /// Parent of a live widget, or `None` for window-level widgets.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.widget(id).and_then(|w| w.parent)
    }

    /// Children of a live widget, in placement order.
    pub fn children_of(&self, id: WidgetId) -> Option<&[WidgetId]> {
        self.widget(id).map(|w| w.children.as_slice())
    }

    /// Persistent on/off state, if live.
    pub fn is_engaged(&self, id: WidgetId) -> Option<bool> {
        self.widget(id).map(|w| w.engaged)
    }

    /// Slider handle offset along the track, if live.
    pub fn slider_pos(&self, id: WidgetId) -> Option<i32> {
        self.widget(id).map(|w| w.slider_pos)
    }

    /// Number of index entries currently referencing `id`.
    ///
    /// For a placed, visible box widget this equals its height — one entry
    /// per occupied row. Exposed for ad hoc checks and test suites.
    pub fn index_entry_count(&self, id: WidgetId) -> usize {
        self.index.entry_count(id)
    }

    /// Whether the widget currently has any index entries.
    pub fn is_indexed(&self, id: WidgetId) -> bool {
        self.index.is_tracked(id)
    }

    /// Window-absolute position: the sum of the widget's own offset and
    /// every ancestor's, walking the parent chain to the window.
    ///
    /// `None` if the widget (or any ancestor) is unplaced or stale.
    pub fn absolute_pos(&self, id: WidgetId) -> Option<(i32, i32)> {
        let mut x = 0;
        let mut y = 0;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let w = self.widget(current)?;
            let (px, py) = w.pos?;
            x += px;
            y += py;
            cursor = w.parent;
        }
        Some((x, y))
    }

    /// Visible, counting ancestors: a widget inside a hidden container is
    /// not effectively visible even when its own flag is set.
    fn effectively_visible(&self, id: WidgetId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(w) = self.widget(current) else {
                return false;
            };
            if !w.flags.contains(WidgetFlags::VISIBLE) {
                return false;
            }
            cursor = w.parent;
        }
        true
    }

    // --- placement lifecycle ---

    /// Place (or move) a widget at a parent-relative position.
    ///
    /// The first placement links the widget into its parent's children
    /// list and inserts it into the index; later placements re-index. A
    /// container placement re-indexes its whole subtree, since descendant
    /// absolute positions changed with it.
    pub fn place(&mut self, id: WidgetId, x: i32, y: i32) {
        let Some(w) = self.widget_mut(id) else {
            return;
        };
        let first = w.pos.is_none();
        w.pos = Some((x, y));
        let parent = w.parent;
        if first {
            match parent {
                Some(p) if self.is_alive(p) => {
                    if let Some(pw) = self.widget_mut(p) {
                        pw.children.push(id);
                    }
                }
                Some(_) => {
                    if let Some(w) = self.widget_mut(id) {
                        w.parent = None;
                    }
                }
                None => {}
            }
        }
        log::debug!("place {id:?} at ({x}, {y})");
        self.refresh_subtree(id);
    }

    /// Resize a widget.
    ///
    /// Children keep their parent-relative offsets, so only the widget's
    /// own index rows change.
    pub fn resize(&mut self, id: WidgetId, w: i32, h: i32) {
        let Some(widget) = self.widget_mut(id) else {
            return;
        };
        widget.size = (w, h);
        let surface = widget.surface;
        if let Some(prim) = surface {
            self.renderer.resize_prim(prim, w, h);
        }
        self.refresh(id);
    }

    /// Hide a widget and its subtree, removing their index entries.
    pub fn hide(&mut self, id: WidgetId) {
        let Some(w) = self.widget_mut(id) else {
            return;
        };
        if !w.flags.contains(WidgetFlags::VISIBLE) {
            return;
        }
        w.flags.remove(WidgetFlags::VISIBLE);
        log::debug!("hide {id:?}");
        self.refresh_subtree(id);
    }

    /// Show a hidden widget; its subtree re-enters the index (descendants
    /// that are individually hidden stay out).
    pub fn show(&mut self, id: WidgetId) {
        let Some(w) = self.widget_mut(id) else {
            return;
        };
        if w.flags.contains(WidgetFlags::VISIBLE) {
            return;
        }
        w.flags.insert(WidgetFlags::VISIBLE);
        log::debug!("show {id:?}");
        self.refresh_subtree(id);
    }

    /// Destroy a widget and its subtree: index entries removed, backend
    /// primitives deleted, parent link severed, slot recycled.
    ///
    /// Stale ids are a silent no-op. Hosts holding a router should also
    /// call its `forget` so session slots stop pointing here.
    pub fn destroy(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        let children = self
            .widget(id)
            .map(|w| w.children.clone())
            .unwrap_or_default();
        for child in children {
            self.destroy(child);
        }
        self.index.remove(id);
        let Some(w) = self.nodes[id.idx()].take() else {
            return;
        };
        for prim in w.prims() {
            self.renderer.delete_prim(prim);
        }
        if let Some(parent) = w.parent
            && let Some(pw) = self.widget_mut(parent)
        {
            pw.children.retain(|c| *c != id);
        }
        self.free_list.push(id.idx());
        log::debug!("destroy {id:?}");
    }

    // --- property mutation ---

    /// Swap the widget's hit-region shape (e.g. after an image change) and
    /// re-index.
    pub fn set_hit_bounds(&mut self, id: WidgetId, bounds: HitBounds) {
        let Some(w) = self.widget_mut(id) else {
            return;
        };
        w.bounds = bounds;
        self.refresh(id);
    }

    /// Replace the widget's state fills and repaint the current state.
    pub fn set_visuals(&mut self, id: WidgetId, visuals: Visuals) {
        let Some(w) = self.widget_mut(id) else {
            return;
        };
        w.visuals = visuals;
        self.apply_visual(id);
    }

    /// Replace the widget's press/release semantics.
    pub fn set_mode(&mut self, id: WidgetId, mode: InteractMode) {
        if let Some(w) = self.widget_mut(id) {
            w.mode = mode;
        }
    }

    /// Replace the widget's capability set.
    pub fn set_caps(&mut self, id: WidgetId, caps: Capabilities) {
        if let Some(w) = self.widget_mut(id) {
            w.caps = caps;
        }
    }

    /// Replace the widget's flags and re-index (visibility may change).
    pub fn set_flags(&mut self, id: WidgetId, flags: WidgetFlags) {
        let Some(w) = self.widget_mut(id) else {
            return;
        };
        if w.flags == flags {
            return;
        }
        w.flags = flags;
        self.refresh_subtree(id);
    }

    /// Callback fired when a standard-mode widget transitions off on
    /// release.
    pub fn on_off(&mut self, id: WidgetId, callback: impl FnMut() + 'static) {
        if let Some(w) = self.widget_mut(id) {
            w.on_off = Some(Box::new(callback));
        }
    }

    /// Callback receiving raw key events while the widget holds focus.
    pub fn on_key(&mut self, id: WidgetId, callback: impl FnMut(&KeyEvent) + 'static) {
        if let Some(w) = self.widget_mut(id) {
            w.on_key = Some(Box::new(callback));
        }
    }

    /// Callback receiving widget-local drag positions (entries use this to
    /// extend a selection via [`Window::caret_index`]).
    pub fn on_drag(&mut self, id: WidgetId, callback: impl FnMut(i32, i32) + 'static) {
        if let Some(w) = self.widget_mut(id) {
            w.on_drag = Some(Box::new(callback));
        }
    }

    // --- hit testing ---

    /// Precise hit test against one widget.
    ///
    /// False for unplaced, invisible (self or ancestor), or
    /// non-focusable widgets. Otherwise the widget's absolute corner
    /// rectangle is tested first; box-bounded widgets hit anywhere inside
    /// it, mask-bounded widgets only where the mask row under the point
    /// has a span containing it.
    pub fn check_hit(&self, id: WidgetId, x: i32, y: i32) -> bool {
        let Some(w) = self.widget(id) else {
            return false;
        };
        if w.pos.is_none()
            || !w.flags.contains(WidgetFlags::FOCUSABLE)
            || !self.effectively_visible(id)
        {
            return false;
        }
        let (width, height) = w.size;
        if width <= 0 || height <= 0 {
            return false;
        }
        let Some((ax, ay)) = self.absolute_pos(id) else {
            return false;
        };
        let corners = rect_corners(ax, ay, width, height);
        if !point_in_rect(corners, Point::new(f64::from(x), f64::from(y))) {
            return false;
        }
        match w.bounds.mask() {
            None => true,
            Some(mask) => mask.contains(x - ax, y - ay),
        }
    }

    /// Coarse resolution: the topmost index entry whose span contains the
    /// point. Mask-bounded widgets match anywhere in their spans; callers
    /// needing mask-exact containment use [`Window::widget_at`].
    pub fn resolve(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.index.resolve(x, y)
    }

    /// Precise resolution: candidates on the row in stacking order, first
    /// one passing [`Window::check_hit`] wins. A transparent mask pixel
    /// falls through to the widget beneath it.
    pub fn widget_at(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.index
            .candidates(x, y)
            .find(|id| self.check_hit(*id, x, y))
    }

    /// Caret index under a widget-local x, for entry selection and click
    /// placement.
    ///
    /// Walks the text's characters summing advances from the backend's
    /// text measurement; a point past a character's midpoint places the
    /// caret after it.
    pub fn caret_index(&self, font: Font, text: &str, local_x: i32) -> usize {
        let mut acc = 0;
        for (i, ch) in text.chars().enumerate() {
            let mut buf = [0_u8; 4];
            let advance = self.renderer.measure_text(font, ch.encode_utf8(&mut buf));
            if acc + advance / 2 > local_x {
                return i;
            }
            acc += advance;
        }
        text.chars().count()
    }

    // --- internals ---

    /// Index spans for the widget at its current absolute position.
    fn spans_of(&self, id: WidgetId) -> Option<Vec<(i32, Span)>> {
        let w = self.widget(id)?;
        let (ax, ay) = self.absolute_pos(id)?;
        let (width, height) = w.size;
        match w.bounds.mask() {
            None => {
                if width <= 0 || height <= 0 {
                    return Some(Vec::new());
                }
                Some(
                    (ay..ay + height)
                        .map(|row| (row, Span::from_width(ax, width)))
                        .collect(),
                )
            }
            Some(mask) => Some(
                mask.rows()
                    .flat_map(|(row, spans)| {
                        spans
                            .iter()
                            .map(move |s| (ay + row, Span::new(ax + s.start, ax + s.end)))
                    })
                    .collect(),
            ),
        }
    }

    /// Re-sync one widget's index entries and primitive placement.
    fn refresh(&mut self, id: WidgetId) {
        let Some(w) = self.widget(id) else {
            return;
        };
        let placed = w.pos.is_some();
        let z = w.z;
        let visible = placed && self.effectively_visible(id);
        if visible {
            if let Some(spans) = self.spans_of(id) {
                self.index.replace(id, z, spans);
            }
        } else {
            self.index.remove(id);
        }

        let abs = self.absolute_pos(id);
        let mut moves: Vec<(PrimId, i32, i32)> = Vec::new();
        let mut visibility: Vec<PrimId> = Vec::new();
        if let Some(w) = self.widget(id) {
            if let Some((ax, ay)) = abs {
                if let Some(p) = w.surface {
                    moves.push((p, ax, ay));
                }
                if let Some(p) = w.caption {
                    moves.push((p, ax, ay + self.caption_dy(w)));
                }
                if let Some(p) = w.handle {
                    moves.push((p, ax + w.slider_pos, ay));
                }
            }
            if w.shown != visible {
                visibility.extend(w.prims());
            }
        }
        for (prim, x, y) in moves {
            self.renderer.move_prim(prim, x, y);
        }
        if !visibility.is_empty() {
            for prim in visibility {
                self.renderer.set_prim_visible(prim, visible);
            }
            if let Some(w) = self.widget_mut(id) {
                w.shown = visible;
            }
        }
    }

    /// Refresh a widget and every descendant (container moved, hid, or
    /// showed: their absolute geometry or effective visibility changed).
    fn refresh_subtree(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        // A child placed before its parent gets its primitives once the
        // ancestor chain resolves to an absolute position.
        self.ensure_prims(id);
        self.refresh(id);
        let children = self
            .widget(id)
            .map(|w| w.children.clone())
            .unwrap_or_default();
        for child in children {
            self.refresh_subtree(child);
        }
    }

    /// Create backend primitives on first placement.
    fn ensure_prims(&mut self, id: WidgetId) {
        let Some((ax, ay)) = self.absolute_pos(id) else {
            return;
        };
        let Some(w) = self.widget(id) else {
            return;
        };
        let (width, height) = w.size;
        let make_surface = w.surface.is_none();
        let base = w.visuals.base;
        let caption_text = if w.caption.is_none() { w.text.clone() } else { None };
        let font = w.font;
        let make_handle = w.kind == WidgetKind::Slider && w.handle.is_none();
        let handle_fill = w.visuals.press.unwrap_or(base);
        let handle_width = w.handle_width;
        let slider_pos = w.slider_pos;

        if make_surface {
            let prim = match base {
                Fill::Image(image) => self.renderer.create_image(ax, ay, image),
                fill => self.renderer.create_rect(ax, ay, width, height, fill),
            };
            if let Some(w) = self.widget_mut(id) {
                w.surface = Some(prim);
                w.applied = Some(base);
            }
        }
        if let Some(text) = caption_text {
            let dy = (height - self.renderer.font_metrics(font).linespace) / 2;
            let prim = self.renderer.create_text(ax, ay + dy, font, &text);
            if let Some(w) = self.widget_mut(id) {
                w.caption = Some(prim);
            }
        }
        if make_handle {
            let prim =
                self.renderer
                    .create_rect(ax + slider_pos, ay, handle_width, height, handle_fill);
            if let Some(w) = self.widget_mut(id) {
                w.handle = Some(prim);
            }
        }
    }

    /// Push the fill matching the widget's current interaction state, if
    /// it differs from what the backend last saw.
    fn apply_visual(&mut self, id: WidgetId) {
        let Some(w) = self.widget(id) else {
            return;
        };
        let Some(surface) = w.surface else {
            return;
        };
        let fill = w.current_fill();
        if w.applied == Some(fill) {
            return;
        }
        self.renderer.set_fill(surface, fill);
        if let Some(w) = self.widget_mut(id) {
            w.applied = Some(fill);
        }
    }

    /// Clamp a drag to the slider track and move the handle.
    fn slider_drag(&mut self, id: WidgetId, x: i32, _y: i32) {
        let Some((ax, ay)) = self.absolute_pos(id) else {
            return;
        };
        let Some(w) = self.widget(id) else {
            return;
        };
        let track = w.size.0 - w.handle_width;
        if track <= 0 {
            return;
        }
        let pos = clamp(x - ax - w.handle_width / 2, 0, track);
        if pos == w.slider_pos {
            return;
        }
        let handle = w.handle;
        if let Some(w) = self.widget_mut(id) {
            w.slider_pos = pos;
        }
        if let Some(prim) = handle {
            self.renderer.move_prim(prim, ax + pos, ay);
        }
    }

    /// Vertical caption offset centering the font's linespace in the
    /// widget.
    fn caption_dy(&self, w: &Widget) -> i32 {
        (w.size.1 - self.renderer.font_metrics(w.font).linespace) / 2
    }

    /// Take a callback out, run it, and put it back (callbacks never get
    /// access to the window itself).
    fn with_callback<C>(
        &mut self,
        id: WidgetId,
        take: impl Fn(&mut Widget) -> Option<C>,
        put: impl Fn(&mut Widget, C),
        run: impl FnOnce(&mut C),
    ) {
        let Some(mut cb) = self.widget_mut(id).and_then(|w| take(w)) else {
            return;
        };
        run(&mut cb);
        if let Some(w) = self.widget_mut(id) {
            put(w, cb);
        }
    }
}

impl<R: Renderer> EventTarget for Window<R> {
    type Key = WidgetId;

    fn hit(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.widget_at(x, y)
    }

    fn capabilities(&self, key: WidgetId) -> Capabilities {
        self.widget(key).map_or(Capabilities::empty(), |w| w.caps)
    }

    fn hovered(&mut self, key: WidgetId) {
        if let Some(w) = self.widget_mut(key) {
            w.hover = true;
        }
        self.apply_visual(key);
    }

    fn hover_end(&mut self, key: WidgetId) {
        if let Some(w) = self.widget_mut(key) {
            w.hover = false;
        }
        self.apply_visual(key);
    }

    fn clicked(&mut self, key: WidgetId) {
        let Some(w) = self.widget_mut(key) else {
            return;
        };
        match w.mode {
            // Toggle flips persistent state on press.
            InteractMode::Toggle => w.engaged = !w.engaged,
            // Standard only shows the press visual; state flips on release.
            InteractMode::Standard => w.pressed = true,
        }
        self.apply_visual(key);
    }

    fn released(&mut self, key: WidgetId) {
        let Some(w) = self.widget_mut(key) else {
            return;
        };
        if w.mode != InteractMode::Standard {
            return;
        }
        w.pressed = false;
        w.engaged = !w.engaged;
        let fire_off = !w.engaged;
        // The hover flag decides whether the hover or base fill comes back.
        self.apply_visual(key);
        if fire_off {
            self.with_callback(
                key,
                |w| w.on_off.take(),
                |w, cb| w.on_off = Some(cb),
                |cb| cb(),
            );
        }
    }

    fn dragging(&mut self, key: WidgetId, x: i32, y: i32) {
        match self.widget(key).map(|w| w.kind) {
            Some(WidgetKind::Slider) => self.slider_drag(key, x, y),
            Some(_) => {
                let Some((ax, ay)) = self.absolute_pos(key) else {
                    return;
                };
                self.with_callback(
                    key,
                    |w| w.on_drag.take(),
                    |w, cb| w.on_drag = Some(cb),
                    |cb| cb(x - ax, y - ay),
                );
            }
            None => {}
        }
    }

    fn typed(&mut self, key: WidgetId, event: &KeyEvent) {
        // The router forwards keys ungated; widgets that cannot type
        // no-op here.
        if !self
            .widget(key)
            .is_some_and(|w| w.caps.contains(Capabilities::TYPE))
        {
            return;
        }
        self.with_callback(
            key,
            |w| w.on_key.take(),
            |w, cb| w.on_key = Some(cb),
            |cb| cb(event),
        );
    }
}
