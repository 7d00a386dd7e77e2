// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session state, capability sets, and the routing seam to the widget tree.

use core::fmt::Debug;

use crate::events::KeyEvent;

bitflags::bitflags! {
    /// The interactions a widget implements.
    ///
    /// This is the explicit form of capability dispatch: the router checks
    /// membership here instead of probing for handlers at call time. A
    /// widget with an empty set still occupies session slots when resolved
    /// (it is under the pointer), it just receives no callbacks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Responds to hover enter/leave.
        const HOVER = 0b0000_0001;
        /// Responds to click press/release.
        const CLICK = 0b0000_0010;
        /// Accepts keyboard input while focused.
        const TYPE  = 0b0000_0100;
        /// Responds to press-drag movement.
        const DRAG  = 0b0000_1000;
    }
}

/// Per-window interaction session state.
///
/// Exactly one widget (or none) occupies each slot at any time. The state
/// is owned by the router and lives alongside the window instance — never
/// as process-wide globals. All mutation happens on the window's own
/// processing context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionState<K> {
    /// Currently pressed widget.
    pub down: Option<K>,
    /// Widget under the pointer.
    pub hovered: Option<K>,
    /// Keyboard-focused widget.
    pub active: Option<K>,
}

impl<K> InteractionState<K> {
    /// Fresh state with every slot empty.
    pub const fn new() -> Self {
        Self {
            down: None,
            hovered: None,
            active: None,
        }
    }

    /// True when no slot holds a widget.
    pub fn is_idle(&self) -> bool {
        self.down.is_none() && self.hovered.is_none() && self.active.is_none()
    }
}

impl<K> Default for InteractionState<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The seam between the router and the widget tree.
///
/// `hit` resolves a window-absolute point to the topmost interactive
/// widget (precise over masks, not just bounding boxes). The callback
/// methods are the per-widget behavioral contract; the router invokes them
/// edge-triggered and — for hover/click/drag — only when `capabilities`
/// reports the matching membership.
pub trait EventTarget {
    /// Widget handle type.
    type Key: Copy + Eq + Debug;

    /// Topmost widget at `(x, y)`, or `None` over empty space.
    fn hit(&self, x: i32, y: i32) -> Option<Self::Key>;

    /// The interactions `key` implements.
    fn capabilities(&self, key: Self::Key) -> Capabilities;

    /// The pointer entered `key`.
    fn hovered(&mut self, key: Self::Key);

    /// The pointer left `key`.
    fn hover_end(&mut self, key: Self::Key);

    /// `key` was pressed.
    fn clicked(&mut self, key: Self::Key);

    /// `key` was released (pointer up or an implicit leave release).
    fn released(&mut self, key: Self::Key);

    /// The pointer moved to `(x, y)` while `key` is held down.
    fn dragging(&mut self, key: Self::Key, x: i32, y: i32) {
        let _ = (key, x, y);
    }

    /// A raw key event arrived while `key` holds focus.
    ///
    /// Deliberately not capability-gated: widgets that cannot type treat
    /// this as a no-op themselves.
    fn typed(&mut self, key: Self::Key, event: &KeyEvent) {
        let _ = (key, event);
    }
}
