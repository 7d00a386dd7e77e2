// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input event types delivered by the windowing backend.

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt.
        const ALT   = 0b0000_0100;
    }
}

/// A key identity, already translated by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Line start.
    Home,
    /// Line end.
    End,
    /// Enter/Return.
    Enter,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Any other backend keycode, passed through untranslated.
    Other(u32),
}

/// A keyboard event, forwarded raw to the focused widget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Modifiers held at event time.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key event with no modifiers.
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// Attach modifiers.
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A pointer event in window-absolute pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// The pointer moved (or is dragging while pressed).
    Move {
        /// Absolute x.
        x: i32,
        /// Absolute y.
        y: i32,
    },
    /// Primary button pressed.
    Down {
        /// Absolute x.
        x: i32,
        /// Absolute y.
        y: i32,
    },
    /// Primary button released.
    Up,
    /// The pointer left the window's interactive surface.
    Leave,
}

/// Any input event the router can dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer input.
    Pointer(PointerEvent),
    /// Keyboard input.
    Key(KeyEvent),
}
