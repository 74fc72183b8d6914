//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and native tests share one table. Nothing
//! resolves while focus is inside a text input.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Navigation ──
    NavigateNext,
    NavigatePrev,

    // ── Linking ──
    CancelConnect,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomToFit,
}

impl ShortcutAction {
    /// Stable camelCase name handed to the browser side.
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::NavigateNext => "navigateNext",
            ShortcutAction::NavigatePrev => "navigatePrev",
            ShortcutAction::CancelConnect => "cancelConnect",
            ShortcutAction::ZoomIn => "zoomIn",
            ShortcutAction::ZoomOut => "zoomOut",
            ShortcutAction::ZoomToFit => "zoomToFit",
        }
    }
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value. Returns `None` if the combo
    /// has no binding or `in_text_input` is set.
    pub fn resolve(key: &str, modifiers: Modifiers, in_text_input: bool) -> Option<ShortcutAction> {
        if in_text_input {
            return None;
        }

        if modifiers.command() {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        match key {
            "ArrowRight" | "ArrowDown" => Some(ShortcutAction::NavigateNext),
            "ArrowLeft" | "ArrowUp" => Some(ShortcutAction::NavigatePrev),
            "Escape" => Some(ShortcutAction::CancelConnect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMD: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: true,
    };

    #[test]
    fn arrows_navigate() {
        for key in ["ArrowRight", "ArrowDown"] {
            assert_eq!(
                ShortcutMap::resolve(key, Modifiers::NONE, false),
                Some(ShortcutAction::NavigateNext)
            );
        }
        for key in ["ArrowLeft", "ArrowUp"] {
            assert_eq!(
                ShortcutMap::resolve(key, Modifiers::NONE, false),
                Some(ShortcutAction::NavigatePrev)
            );
        }
    }

    #[test]
    fn escape_cancels_connect() {
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE, false),
            Some(ShortcutAction::CancelConnect)
        );
    }

    #[test]
    fn text_inputs_swallow_everything() {
        for key in ["ArrowRight", "ArrowUp", "Escape", "="] {
            assert_eq!(ShortcutMap::resolve(key, Modifiers::NONE, true), None);
            assert_eq!(ShortcutMap::resolve(key, CMD, true), None);
        }
    }

    #[test]
    fn command_zoom() {
        assert_eq!(ShortcutMap::resolve("=", CMD, false), Some(ShortcutAction::ZoomIn));
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve("-", ctrl, false), Some(ShortcutAction::ZoomOut));
        assert_eq!(ShortcutMap::resolve("0", ctrl, false), Some(ShortcutAction::ZoomToFit));
        // Bare "=" is not bound.
        assert_eq!(ShortcutMap::resolve("=", Modifiers::NONE, false), None);
        // Cmd+Arrow is left to the browser.
        assert_eq!(ShortcutMap::resolve("ArrowRight", CMD, false), None);
    }
}
