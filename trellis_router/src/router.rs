// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Maps raw pointer/key events onto the session slots and fires the
//! resulting widget transitions through an [`EventTarget`].
//!
//! ## Transition rules
//!
//! - Move: forward to the pressed widget's `dragging` first (press-drag),
//!   then apply the hover transition if the resolved widget changed.
//! - Down: the resolved widget takes focus (`active`) and the press slot
//!   (`down`), firing `clicked` once on the change.
//! - Up: `released` on the pressed widget, then the press slot clears.
//! - Leave: hover end + implicit release + blur; every slot clears.
//! - Key: forwarded raw to the focused widget.
//!
//! All transitions are edge-triggered; repeating an event that resolves to
//! the same widget fires nothing.

use core::fmt::Debug;

use crate::events::{InputEvent, KeyEvent, PointerEvent};
use crate::types::{Capabilities, EventTarget, InteractionState};

/// Per-window event router owning the interaction session state.
///
/// ## Usage
///
/// - Construct with [`Router::new`]; keep one router per window, on that
///   window's own processing context.
/// - Feed backend events into the five entry points (or [`Router::handle`]
///   with an [`InputEvent`]).
/// - Call [`Router::forget`] when a widget is destroyed so no slot keeps
///   routing to it.
#[derive(Clone, Debug)]
pub struct Router<K> {
    state: InteractionState<K>,
}

impl<K: Copy + Eq + Debug> Default for Router<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Debug> Router<K> {
    /// Create a router with an idle session.
    pub const fn new() -> Self {
        Self {
            state: InteractionState::new(),
        }
    }

    /// Read-only view of the session slots.
    pub fn state(&self) -> &InteractionState<K> {
        &self.state
    }

    /// Dispatch any input event to the matching entry point.
    pub fn handle<T: EventTarget<Key = K>>(&mut self, target: &mut T, event: &InputEvent) {
        match event {
            InputEvent::Pointer(PointerEvent::Move { x, y }) => self.pointer_move(target, *x, *y),
            InputEvent::Pointer(PointerEvent::Down { x, y }) => self.pointer_down(target, *x, *y),
            InputEvent::Pointer(PointerEvent::Up) => self.pointer_up(target),
            InputEvent::Pointer(PointerEvent::Leave) => self.pointer_leave(target),
            InputEvent::Key(key) => self.key_input(target, key),
        }
    }

    /// The pointer moved to `(x, y)`.
    ///
    /// While a press is held the movement is forwarded to the pressed
    /// widget's `dragging` — presence of `down` plus movement *is* the
    /// drag; there is no separate drag slot. The hover transition then
    /// fires only if the resolved widget changed.
    pub fn pointer_move<T: EventTarget<Key = K>>(&mut self, target: &mut T, x: i32, y: i32) {
        if let Some(down) = self.state.down
            && target.capabilities(down).contains(Capabilities::DRAG)
        {
            target.dragging(down, x, y);
        }

        let hit = target.hit(x, y);
        if hit != self.state.hovered {
            log::debug!("hover {:?} -> {:?}", self.state.hovered, hit);
            if let Some(old) = self.state.hovered
                && target.capabilities(old).contains(Capabilities::HOVER)
            {
                target.hover_end(old);
            }
            if let Some(new) = hit
                && target.capabilities(new).contains(Capabilities::HOVER)
            {
                target.hovered(new);
            }
            self.state.hovered = hit;
        }
    }

    /// The primary button was pressed at `(x, y)`.
    pub fn pointer_down<T: EventTarget<Key = K>>(&mut self, target: &mut T, x: i32, y: i32) {
        let hit = target.hit(x, y);
        if hit != self.state.active {
            log::debug!("focus {:?} -> {:?}", self.state.active, hit);
            self.state.active = hit;
        }
        if hit != self.state.down {
            self.state.down = hit;
            if let Some(key) = hit
                && target.capabilities(key).contains(Capabilities::CLICK)
            {
                target.clicked(key);
            }
        }
    }

    /// The primary button was released.
    pub fn pointer_up<T: EventTarget<Key = K>>(&mut self, target: &mut T) {
        if let Some(down) = self.state.down.take()
            && target.capabilities(down).contains(Capabilities::CLICK)
        {
            target.released(down);
        }
    }

    /// The pointer left the window's interactive surface.
    ///
    /// Simulates a full release and blur: hover ends, any held press is
    /// released, and all three slots clear.
    pub fn pointer_leave<T: EventTarget<Key = K>>(&mut self, target: &mut T) {
        if let Some(hovered) = self.state.hovered.take()
            && target.capabilities(hovered).contains(Capabilities::HOVER)
        {
            target.hover_end(hovered);
        }
        if let Some(down) = self.state.down.take()
            && target.capabilities(down).contains(Capabilities::CLICK)
        {
            target.released(down);
        }
        self.state.active = None;
    }

    /// A raw key event arrived.
    pub fn key_input<T: EventTarget<Key = K>>(&mut self, target: &mut T, event: &KeyEvent) {
        if let Some(active) = self.state.active {
            target.typed(active, event);
        }
    }

    /// Clear any slot currently routing to `key` (widget destruction).
    ///
    /// No callbacks fire: the widget is already gone.
    pub fn forget(&mut self, key: K) {
        if self.state.down == Some(key) {
            self.state.down = None;
        }
        if self.state.hovered == Some(key) {
            self.state.hovered = None;
        }
        if self.state.active == Some(key) {
            self.state.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec::Vec;

    use super::*;
    use crate::events::{Key, Modifiers};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Call {
        Hovered(u8),
        HoverEnd(u8),
        Clicked(u8),
        Released(u8),
        Dragging(u8, i32, i32),
        Typed(u8, Key),
    }

    struct Region {
        key: u8,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        caps: Capabilities,
    }

    /// Flat scene: later regions stack above earlier ones.
    struct Scene {
        regions: Vec<Region>,
        calls: Vec<Call>,
    }

    impl Scene {
        fn new(regions: Vec<Region>) -> Self {
            Self {
                regions,
                calls: Vec::new(),
            }
        }
    }

    impl EventTarget for Scene {
        type Key = u8;

        fn hit(&self, x: i32, y: i32) -> Option<u8> {
            self.regions
                .iter()
                .rev()
                .find(|r| x >= r.x && x < r.x + r.w && y >= r.y && y < r.y + r.h)
                .map(|r| r.key)
        }

        fn capabilities(&self, key: u8) -> Capabilities {
            self.regions
                .iter()
                .find(|r| r.key == key)
                .map_or(Capabilities::empty(), |r| r.caps)
        }

        fn hovered(&mut self, key: u8) {
            self.calls.push(Call::Hovered(key));
        }

        fn hover_end(&mut self, key: u8) {
            self.calls.push(Call::HoverEnd(key));
        }

        fn clicked(&mut self, key: u8) {
            self.calls.push(Call::Clicked(key));
        }

        fn released(&mut self, key: u8) {
            self.calls.push(Call::Released(key));
        }

        fn dragging(&mut self, key: u8, x: i32, y: i32) {
            self.calls.push(Call::Dragging(key, x, y));
        }

        fn typed(&mut self, key: u8, event: &KeyEvent) {
            self.calls.push(Call::Typed(key, event.key));
        }
    }

    fn interactive(key: u8, x: i32, y: i32, w: i32, h: i32) -> Region {
        Region {
            key,
            x,
            y,
            w,
            h,
            caps: Capabilities::all(),
        }
    }

    fn two_buttons() -> Scene {
        Scene::new(alloc::vec![
            interactive(1, 0, 0, 10, 10),
            interactive(2, 20, 0, 10, 10),
        ])
    }

    #[test]
    fn hover_fires_once_for_repeated_moves() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_move(&mut scene, 5, 5);
        router.pointer_move(&mut scene, 6, 5);
        router.pointer_move(&mut scene, 7, 5);

        assert_eq!(scene.calls, [Call::Hovered(1)]);
        assert_eq!(router.state().hovered, Some(1));
    }

    #[test]
    fn hover_transition_ends_old_before_entering_new() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_move(&mut scene, 5, 5);
        router.pointer_move(&mut scene, 25, 5);

        assert_eq!(
            scene.calls,
            [Call::Hovered(1), Call::HoverEnd(1), Call::Hovered(2)]
        );
        assert_eq!(router.state().hovered, Some(2));
    }

    #[test]
    fn moving_to_empty_space_only_ends_hover() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_move(&mut scene, 5, 5);
        router.pointer_move(&mut scene, 15, 5);

        assert_eq!(scene.calls, [Call::Hovered(1), Call::HoverEnd(1)]);
        assert_eq!(router.state().hovered, None);
    }

    #[test]
    fn non_hoverable_widget_occupies_slot_without_callbacks() {
        let mut scene = Scene::new(alloc::vec![Region {
            key: 9,
            x: 0,
            y: 0,
            w: 10,
            h: 10,
            caps: Capabilities::empty(),
        }]);
        let mut router: Router<u8> = Router::new();

        router.pointer_move(&mut scene, 5, 5);
        assert_eq!(router.state().hovered, Some(9));
        router.pointer_move(&mut scene, 50, 50);
        assert_eq!(router.state().hovered, None);

        assert!(scene.calls.is_empty());
    }

    #[test]
    fn down_takes_focus_and_fires_clicked_once() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        assert_eq!(scene.calls, [Call::Clicked(1)]);
        assert_eq!(router.state().down, Some(1));
        assert_eq!(router.state().active, Some(1));

        // A second press on the same widget without an intervening release
        // changes nothing.
        router.pointer_down(&mut scene, 6, 6);
        assert_eq!(scene.calls, [Call::Clicked(1)]);
    }

    #[test]
    fn down_on_empty_space_blurs_focus() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        router.pointer_up(&mut scene);
        router.pointer_down(&mut scene, 15, 5);

        assert_eq!(router.state().active, None);
        assert_eq!(router.state().down, None);
        assert_eq!(scene.calls, [Call::Clicked(1), Call::Released(1)]);
    }

    #[test]
    fn up_releases_and_clears_down() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        router.pointer_up(&mut scene);

        assert_eq!(scene.calls, [Call::Clicked(1), Call::Released(1)]);
        assert_eq!(router.state().down, None);
        // Focus survives the release.
        assert_eq!(router.state().active, Some(1));
    }

    #[test]
    fn up_without_press_is_a_no_op() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();
        router.pointer_up(&mut scene);
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn moves_while_pressed_forward_dragging() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        router.pointer_move(&mut scene, 7, 5);
        router.pointer_move(&mut scene, 9, 6);
        router.pointer_up(&mut scene);

        assert_eq!(
            scene.calls,
            [
                Call::Clicked(1),
                Call::Dragging(1, 7, 5),
                Call::Hovered(1),
                Call::Dragging(1, 9, 6),
                Call::Released(1),
            ]
        );
    }

    #[test]
    fn drag_without_capability_is_not_forwarded() {
        let mut scene = Scene::new(alloc::vec![Region {
            key: 1,
            x: 0,
            y: 0,
            w: 10,
            h: 10,
            caps: Capabilities::CLICK,
        }]);
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        router.pointer_move(&mut scene, 7, 5);

        assert_eq!(scene.calls, [Call::Clicked(1)]);
    }

    #[test]
    fn drag_keeps_following_outside_the_widget() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        router.pointer_move(&mut scene, 50, 50);

        // The drag follows the pressed widget even over empty space; hover
        // has moved on.
        assert_eq!(
            scene.calls,
            [Call::Clicked(1), Call::Dragging(1, 50, 50)]
        );
        assert_eq!(router.state().down, Some(1));
        assert_eq!(router.state().hovered, None);
    }

    #[test]
    fn leave_resets_all_session_state() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_move(&mut scene, 5, 5);
        router.pointer_down(&mut scene, 5, 5);
        router.pointer_leave(&mut scene);

        assert!(router.state().is_idle());
        assert_eq!(
            scene.calls,
            [
                Call::Hovered(1),
                Call::Clicked(1),
                Call::HoverEnd(1),
                Call::Released(1),
            ]
        );
    }

    #[test]
    fn leave_when_idle_is_a_no_op() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();
        router.pointer_leave(&mut scene);
        assert!(scene.calls.is_empty());
        assert!(router.state().is_idle());
    }

    #[test]
    fn keys_route_to_the_focused_widget_only() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        let ev = KeyEvent::new(Key::Char('a'));
        router.key_input(&mut scene, &ev);
        assert!(scene.calls.is_empty());

        router.pointer_down(&mut scene, 25, 5);
        router.pointer_up(&mut scene);
        router.key_input(&mut scene, &ev);

        assert_eq!(
            scene.calls,
            [
                Call::Clicked(2),
                Call::Released(2),
                Call::Typed(2, Key::Char('a')),
            ]
        );
    }

    #[test]
    fn keys_are_forwarded_without_type_capability() {
        // Capability gating for typing is the widget's responsibility.
        let mut scene = Scene::new(alloc::vec![Region {
            key: 1,
            x: 0,
            y: 0,
            w: 10,
            h: 10,
            caps: Capabilities::CLICK,
        }]);
        let mut router: Router<u8> = Router::new();

        router.pointer_down(&mut scene, 5, 5);
        router.pointer_up(&mut scene);
        router.key_input(&mut scene, &KeyEvent::new(Key::Enter));

        assert_eq!(
            scene.calls,
            [Call::Clicked(1), Call::Released(1), Call::Typed(1, Key::Enter)]
        );
    }

    #[test]
    fn shift_modifier_travels_with_the_event() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();
        router.pointer_down(&mut scene, 5, 5);

        let ev = KeyEvent::new(Key::Left).with_modifiers(Modifiers::SHIFT);
        router.key_input(&mut scene, &ev);
        assert_eq!(scene.calls.last(), Some(&Call::Typed(1, Key::Left)));
    }

    #[test]
    fn forget_clears_matching_slots_silently() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        router.pointer_move(&mut scene, 5, 5);
        router.pointer_down(&mut scene, 5, 5);
        let before = scene.calls.len();

        router.forget(1);
        assert!(router.state().is_idle());
        assert_eq!(scene.calls.len(), before);

        // Forgetting an unknown key changes nothing.
        router.forget(99);
        assert!(router.state().is_idle());
    }

    #[test]
    fn handle_dispatches_every_event_kind() {
        let mut scene = two_buttons();
        let mut router: Router<u8> = Router::new();

        for ev in [
            InputEvent::Pointer(PointerEvent::Move { x: 5, y: 5 }),
            InputEvent::Pointer(PointerEvent::Down { x: 5, y: 5 }),
            InputEvent::Pointer(PointerEvent::Up),
            InputEvent::Key(KeyEvent::new(Key::Char('x'))),
            InputEvent::Pointer(PointerEvent::Leave),
        ] {
            router.handle(&mut scene, &ev);
        }

        assert_eq!(
            scene.calls,
            [
                Call::Hovered(1),
                Call::Clicked(1),
                Call::Released(1),
                Call::Typed(1, Key::Char('x')),
                Call::HoverEnd(1),
            ]
        );
        assert!(router.state().is_idle());
    }
}
