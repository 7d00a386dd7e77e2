// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walkthrough: window + mask hit testing + event routing.
//!
//! Builds a small scene against the recording backend — a panel with a
//! toggle switch, a round (alpha-masked) button, a slider, and an entry —
//! then feeds a scripted pointer/key sequence through the router and
//! prints every resulting transition.
//!
//! Run:
//! - `cargo run -p trellis_demos --bin interaction_walkthrough`

use trellis_mask::{AlphaSource, DEFAULT_TOLERANCE, from_alpha};
use trellis_router::Router;
use trellis_router::events::{InputEvent, Key, KeyEvent, PointerEvent};
use trellis_tree::render::{Fill, RecordingRenderer};
use trellis_tree::{HitBounds, InteractMode, Visuals, WidgetKind, WidgetSpec, Window};

/// A filled disc: alpha 255 inside the circle, 0 outside. Masks generated
/// from it give a round button its round hit region.
struct Disc {
    size: u32,
}

impl AlphaSource for Disc {
    fn width(&self) -> u32 {
        self.size
    }

    fn height(&self) -> u32 {
        self.size
    }

    fn alpha(&self, x: u32, y: u32) -> u8 {
        let r = f64::from(self.size) / 2.0;
        let dx = f64::from(x) + 0.5 - r;
        let dy = f64::from(y) + 0.5 - r;
        if dx * dx + dy * dy <= r * r { 255 } else { 0 }
    }
}

fn main() {
    let mut win = Window::new(RecordingRenderer::new());

    let panel = win.create(
        None,
        WidgetSpec {
            size: (200, 120),
            visuals: Visuals::solid(Fill::Color([30, 30, 30, 255])),
            ..WidgetSpec::new(WidgetKind::Frame)
        },
    );
    win.place(panel, 20, 20);

    let switch = win.create(
        Some(panel),
        WidgetSpec {
            size: (40, 20),
            mode: InteractMode::Toggle,
            visuals: Visuals {
                base: Fill::Color([60, 60, 60, 255]),
                hover: Some(Fill::Color([80, 80, 80, 255])),
                press: None,
                engaged: Some(Fill::Color([90, 160, 90, 255])),
                engaged_hover: Some(Fill::Color([110, 180, 110, 255])),
            },
            ..WidgetSpec::new(WidgetKind::Button)
        },
    );
    win.place(switch, 10, 10);

    let round_mask = from_alpha(&Disc { size: 24 }, DEFAULT_TOLERANCE);
    println!(
        "round button mask: {} rows, {} spans",
        round_mask.row_count(),
        round_mask.span_count()
    );
    let round = win.create(
        Some(panel),
        WidgetSpec {
            size: (24, 24),
            bounds: HitBounds::Mask(round_mask),
            visuals: Visuals::solid(Fill::Color([170, 80, 80, 255])),
            ..WidgetSpec::new(WidgetKind::Button)
        },
    );
    win.place(round, 70, 8);
    win.on_off(round, || println!("   round button switched off"));

    let slider = win.create(
        Some(panel),
        WidgetSpec {
            size: (120, 12),
            handle_width: 12,
            visuals: Visuals::solid(Fill::Color([50, 50, 70, 255])),
            ..WidgetSpec::new(WidgetKind::Slider)
        },
    );
    win.place(slider, 10, 50);

    let entry = win.create(
        Some(panel),
        WidgetSpec {
            size: (140, 18),
            visuals: Visuals::solid(Fill::Color([240, 240, 240, 255])),
            ..WidgetSpec::new(WidgetKind::Entry)
        },
    );
    win.place(entry, 10, 80);
    win.on_key(entry, |ev| println!("   entry received key {:?}", ev.key));

    // The panel sits at (20, 20); children are parent-relative.
    // switch: (30, 30)..(70, 50)   round: (90, 28)..(114, 52)
    // slider: (30, 70)..(150, 82)  entry: (30, 100)..(170, 118)
    println!("switch abs pos: {:?}", win.absolute_pos(switch));

    // The round button's corners are transparent: the pointer falls
    // through to nothing (the panel is not focusable).
    println!("hit at round centre:  {:?}", win.widget_at(102, 40));
    println!("hit at round corner:  {:?}", win.widget_at(91, 29));

    let mut router = Router::new();
    let script = [
        InputEvent::Pointer(PointerEvent::Move { x: 40, y: 40 }),
        InputEvent::Pointer(PointerEvent::Down { x: 40, y: 40 }),
        InputEvent::Pointer(PointerEvent::Up),
        InputEvent::Pointer(PointerEvent::Move { x: 102, y: 40 }),
        InputEvent::Pointer(PointerEvent::Down { x: 102, y: 40 }),
        InputEvent::Pointer(PointerEvent::Up),
        InputEvent::Pointer(PointerEvent::Down { x: 102, y: 40 }),
        InputEvent::Pointer(PointerEvent::Up),
        InputEvent::Pointer(PointerEvent::Down { x: 40, y: 76 }),
        InputEvent::Pointer(PointerEvent::Move { x: 120, y: 76 }),
        InputEvent::Pointer(PointerEvent::Up),
        InputEvent::Pointer(PointerEvent::Down { x: 60, y: 108 }),
        InputEvent::Pointer(PointerEvent::Up),
        InputEvent::Key(KeyEvent::new(Key::Char('h'))),
        InputEvent::Key(KeyEvent::new(Key::Char('i'))),
        InputEvent::Pointer(PointerEvent::Leave),
    ];

    for event in script {
        println!("-> {event:?}");
        router.handle(&mut win, &event);
        let state = router.state();
        println!(
            "   down={:?} hovered={:?} active={:?}",
            state.down, state.hovered, state.active
        );
    }

    println!("switch engaged: {:?}", win.is_engaged(switch));
    println!("slider position: {:?}", win.slider_pos(slider));
    println!(
        "caret for \"hello world\" at x=43: {}",
        win.caret_index(trellis_tree::Font(0), "hello world", 43)
    );
    println!(
        "{} backend operations recorded",
        win.renderer().ops.len()
    );
}
