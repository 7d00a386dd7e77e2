// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Router: per-window interaction state and event routing.
//!
//! ## Overview
//!
//! This crate turns raw pointer and keyboard events into edge-triggered
//! widget transitions. It does not perform hit testing itself; instead it
//! routes through an [`EventTarget`](types::EventTarget) — the seam to the
//! widget tree — which resolves points to widget keys and receives the
//! resulting lifecycle calls.
//!
//! ## Session state
//!
//! A [`Router`](router::Router) owns one
//! [`InteractionState`](types::InteractionState) per window:
//!
//! - `down` — the currently pressed widget, if any.
//! - `hovered` — the widget under the pointer, if any.
//! - `hovered`/`down`/`active` each hold at most one widget at a time.
//! - `active` — the keyboard-focused widget, if any.
//!
//! Transitions are edge-triggered: a widget's `hovered`/`hover_end`/
//! `clicked`/`released` callback fires only when the slot actually
//! changes, never on repeated events while already in that state.
//!
//! ## Capabilities
//!
//! Widgets declare which interactions they implement via
//! [`Capabilities`](types::Capabilities) (hover, click, type, drag). The
//! router checks capability membership before firing hover, click, and
//! drag callbacks. Key events are the exception: they are forwarded to the
//! focused widget unconditionally, and a widget that cannot type treats
//! the call as a no-op.
//!
//! ## Press-drag
//!
//! There is no separate dragging slot: while `down` is set, every pointer
//! move is forwarded to `down.dragging(x, y)`. Releasing the pointer (or
//! leaving the window) ends the drag via the ordinary release transition.
//!
//! ## Concurrency
//!
//! All state lives on the window's own processing context. Events are
//! delivered synchronously and handlers must complete quickly; callers on
//! other contexts marshal through their own queue rather than touching the
//! router directly.
//!
//! ## Example
//!
//! ```rust
//! use trellis_router::router::Router;
//! use trellis_router::types::{Capabilities, EventTarget};
//!
//! /// One 10×10 clickable widget at the origin.
//! struct One {
//!     clicks: u32,
//! }
//!
//! impl EventTarget for One {
//!     type Key = u8;
//!     fn hit(&self, x: i32, y: i32) -> Option<u8> {
//!         ((0..10).contains(&x) && (0..10).contains(&y)).then_some(1)
//!     }
//!     fn capabilities(&self, _key: u8) -> Capabilities {
//!         Capabilities::CLICK
//!     }
//!     fn clicked(&mut self, _key: u8) {
//!         self.clicks += 1;
//!     }
//!     fn released(&mut self, _key: u8) {}
//!     fn hovered(&mut self, _key: u8) {}
//!     fn hover_end(&mut self, _key: u8) {}
//! }
//!
//! let mut target = One { clicks: 0 };
//! let mut router: Router<u8> = Router::new();
//! router.pointer_down(&mut target, 5, 5);
//! router.pointer_up(&mut target);
//! assert_eq!(target.clicks, 1);
//! assert!(router.state().down.is_none());
//! ```

#![no_std]

pub mod events;
pub mod router;
pub mod types;

pub use router::Router;
pub use types::{Capabilities, EventTarget, InteractionState};
