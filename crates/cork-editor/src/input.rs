//! Input abstraction layer.
//!
//! Normalizes browser pointer, wheel and keyboard events into a single
//! `InputEvent` enum consumed by the interaction controller. Pointer
//! coordinates are screen space (pixels relative to the canvas element).

use cork_core::id::CardId;
use cork_core::model::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// Scroll wheel / trackpad. Raw deltas as reported by the browser.
    Wheel {
        dx: f32,
        dy: f32,
        modifiers: Modifiers,
    },
    Key {
        /// `KeyboardEvent.key` value (e.g. `"ArrowRight"`, `"Escape"`).
        key: String,
        modifiers: Modifiers,
        /// Focus is inside a text input; canvas shortcuts are suppressed.
        in_text_input: bool,
    },
    /// Click on a card's link affordance.
    LinkClick { card: CardId },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerDown { x, y, modifiers }
    }

    pub fn pointer_move(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, modifiers: Modifiers, in_text_input: bool) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
            in_text_input,
        }
    }

    /// Screen position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}
