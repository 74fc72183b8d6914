//! Interaction controller: turns input events into board mutations and
//! viewport changes.
//!
//! The controller owns the view state (pan/scale, selection, viewport size)
//! and a single `InteractionMode`. It only reads the board; card changes go
//! out as `BoardMutation`s for the caller to apply, in event order.
//!
//! ## Pointer-down dispatch
//!
//! | Hit \ Mode     | Idle                  | Connecting { source }      | Dragging / Panning |
//! |----------------|-----------------------|----------------------------|--------------------|
//! | Card           | start drag, select    | connect source → card      | ignored            |
//! | Link handle    | start connecting      | restart from this card     | ignored            |
//! | Background     | start panning         | cancel, start panning      | start panning      |

use crate::input::InputEvent;
use crate::navigator::{Direction, navigate};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use cork_core::config::CanvasConfig;
use cork_core::id::CardId;
use cork_core::model::Point;
use cork_core::store::{Board, BoardMutation};
use cork_core::viewport::{ScaleLimits, ViewportSize, ViewportTransform};
use cork_render::hit::{Hit, hit_test_screen};

/// What the pointer is currently doing. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging {
        card: CardId,
        /// Pointer position minus card origin, canvas space.
        grab_offset: Point,
    },
    Panning {
        /// Last pointer position, screen space.
        last_pointer: Point,
    },
    Connecting {
        source: CardId,
    },
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::Dragging { .. } => "dragging",
            InteractionMode::Panning { .. } => "panning",
            InteractionMode::Connecting { .. } => "connecting",
        }
    }

    /// A pointer gesture is in progress.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            InteractionMode::Dragging { .. } | InteractionMode::Panning { .. }
        )
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Board changes to apply, in order.
    pub mutations: Vec<BoardMutation>,
    /// Pan, scale, selection or mode changed (re-render needed).
    pub view_changed: bool,
    /// Shortcut resolved from a key event, if any.
    pub action: Option<ShortcutAction>,
}

impl Outcome {
    fn view() -> Self {
        Self {
            view_changed: true,
            ..Self::default()
        }
    }

    pub fn changed(&self) -> bool {
        self.view_changed || !self.mutations.is_empty()
    }
}

pub struct InteractionController {
    mode: InteractionMode,
    selected: Option<CardId>,
    transform: ViewportTransform,
    viewport: ViewportSize,
    config: CanvasConfig,
}

impl InteractionController {
    /// An invalid `config` is replaced by the defaults.
    pub fn new(viewport: ViewportSize, config: CanvasConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("invalid canvas config, using defaults: {e}");
                CanvasConfig::default()
            }
        };
        Self {
            mode: InteractionMode::Idle,
            selected: None,
            transform: ViewportTransform::new(ScaleLimits::from(&config)),
            viewport,
            config,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selected(&self) -> Option<CardId> {
        self.selected
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Swap the configuration. An invalid one is rejected and the current
    /// configuration stays.
    pub fn set_config(&mut self, config: CanvasConfig) -> Result<(), String> {
        config.validate()?;
        self.transform.set_limits(ScaleLimits::from(&config));
        self.config = config;
        Ok(())
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// Hit-test the event position against the board, then dispatch.
    pub fn handle(&mut self, event: &InputEvent, board: &Board) -> Outcome {
        let hit = match event {
            InputEvent::PointerDown { x, y, .. } => hit_test_screen(
                board,
                &self.transform,
                Point::new(*x, *y),
                self.config.link_handle_size,
            ),
            _ => Hit::Background,
        };
        self.handle_with_hit(event, hit, board)
    }

    /// Dispatch an event whose hit target is already known.
    pub fn handle_with_hit(&mut self, event: &InputEvent, hit: Hit, board: &Board) -> Outcome {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                self.pointer_down(Point::new(*x, *y), hit, board)
            }
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y), board),
            InputEvent::PointerUp { .. } => {
                if self.mode.is_gesture() {
                    self.mode = InteractionMode::Idle;
                    Outcome::view()
                } else {
                    Outcome::default()
                }
            }
            InputEvent::Wheel { dx, dy, modifiers } => {
                if modifiers.command() {
                    self.transform.zoom_by_wheel(*dy);
                } else {
                    self.transform.pan_by(-dx, -dy);
                }
                Outcome::view()
            }
            InputEvent::Key {
                key,
                modifiers,
                in_text_input,
            } => match ShortcutMap::resolve(key, *modifiers, *in_text_input) {
                Some(action) => Outcome {
                    view_changed: self.run_action(action, board),
                    action: Some(action),
                    ..Outcome::default()
                },
                None => Outcome::default(),
            },
            InputEvent::LinkClick { card } => {
                if self.start_connecting(*card, board) {
                    Outcome::view()
                } else {
                    Outcome::default()
                }
            }
        }
    }

    fn pointer_down(&mut self, pointer: Point, hit: Hit, board: &Board) -> Outcome {
        match hit {
            Hit::Background => {
                if let InteractionMode::Connecting { source } = self.mode {
                    log::debug!("connect from {source} cancelled by background click");
                }
                self.mode = InteractionMode::Panning {
                    last_pointer: pointer,
                };
                Outcome::view()
            }
            Hit::LinkHandle(card) => {
                if self.start_connecting(card, board) {
                    Outcome::view()
                } else {
                    Outcome::default()
                }
            }
            Hit::Card(card) => match self.mode {
                InteractionMode::Connecting { source } => {
                    self.mode = InteractionMode::Idle;
                    let mut outcome = Outcome::view();
                    if source != card && !board.connections.contains(source, card) {
                        outcome.mutations.push(BoardMutation::Connect {
                            source,
                            target: card,
                            label: None,
                        });
                    } else {
                        log::debug!("ignoring link {source} -> {card}");
                    }
                    outcome
                }
                InteractionMode::Idle => {
                    let Some(c) = board.cards.get(card) else {
                        return Outcome::default();
                    };
                    let grab_offset = self.transform.to_canvas(pointer) - c.position;
                    self.mode = InteractionMode::Dragging { card, grab_offset };
                    self.selected = Some(card);
                    Outcome::view()
                }
                InteractionMode::Dragging { .. } | InteractionMode::Panning { .. } => {
                    Outcome::default()
                }
            },
        }
    }

    fn pointer_move(&mut self, pointer: Point, board: &Board) -> Outcome {
        match self.mode {
            InteractionMode::Dragging { card, grab_offset } => {
                if !board.cards.contains(card) {
                    log::debug!("drag target {card} vanished");
                    self.mode = InteractionMode::Idle;
                    return Outcome::view();
                }
                let position = self.transform.to_canvas(pointer) - grab_offset;
                log::trace!("drag {card} to ({}, {})", position.x, position.y);
                Outcome {
                    mutations: vec![BoardMutation::MoveCard { id: card, position }],
                    ..Outcome::default()
                }
            }
            InteractionMode::Panning { last_pointer } => {
                let delta = pointer - last_pointer;
                self.transform.pan_by(delta.x, delta.y);
                self.mode = InteractionMode::Panning {
                    last_pointer: pointer,
                };
                Outcome::view()
            }
            InteractionMode::Idle | InteractionMode::Connecting { .. } => Outcome::default(),
        }
    }

    fn run_action(&mut self, action: ShortcutAction, board: &Board) -> bool {
        match action {
            ShortcutAction::NavigateNext => self.navigate(Direction::Next, board),
            ShortcutAction::NavigatePrev => self.navigate(Direction::Prev, board),
            ShortcutAction::CancelConnect => self.cancel_connecting(),
            ShortcutAction::ZoomIn => {
                self.zoom_in();
                true
            }
            ShortcutAction::ZoomOut => {
                self.zoom_out();
                true
            }
            ShortcutAction::ZoomToFit => self.zoom_to_fit(board),
        }
    }

    // ─── Direct operations (toolbar buttons, bridge calls) ───────────────

    /// Enter connecting mode from `card`. Refused mid-gesture or for an
    /// unknown card.
    pub fn start_connecting(&mut self, card: CardId, board: &Board) -> bool {
        if self.mode.is_gesture() || !board.cards.contains(card) {
            return false;
        }
        self.mode = InteractionMode::Connecting { source: card };
        true
    }

    pub fn cancel_connecting(&mut self) -> bool {
        if matches!(self.mode, InteractionMode::Connecting { .. }) {
            self.mode = InteractionMode::Idle;
            true
        } else {
            false
        }
    }

    pub fn select(&mut self, card: Option<CardId>) {
        self.selected = card;
    }

    /// Move the selection one step and re-center on the new card.
    pub fn navigate(&mut self, direction: Direction, board: &Board) -> bool {
        let Some(index) = navigate(&board.cards, self.selected, direction) else {
            return false;
        };
        let Some(card) = board.cards.at(index) else {
            return false;
        };
        self.selected = Some(card.id);
        self.transform.center_on(card.bounds(), self.viewport);
        true
    }

    pub fn center_on(&mut self, card: CardId, board: &Board) -> bool {
        let Some(card) = board.cards.get(card) else {
            return false;
        };
        self.transform.center_on(card.bounds(), self.viewport);
        true
    }

    pub fn zoom_in(&mut self) {
        self.transform.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.transform.zoom_out();
    }

    pub fn zoom_to_fit(&mut self, board: &Board) -> bool {
        let Some(bounds) = board.bounds() else {
            return false;
        };
        self.transform
            .zoom_to_fit(bounds, self.viewport, self.config.fit_padding);
        true
    }

    /// Drop references to cards that are no longer on the board.
    pub fn prune(&mut self, board: &Board) {
        if self.selected.is_some_and(|id| !board.cards.contains(id)) {
            self.selected = None;
        }
        let stale = match self.mode {
            InteractionMode::Dragging { card, .. } => !board.cards.contains(card),
            InteractionMode::Connecting { source } => !board.cards.contains(source),
            InteractionMode::Idle | InteractionMode::Panning { .. } => false,
        };
        if stale {
            self.mode = InteractionMode::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use cork_core::model::{Card, CardCategory, Size};
    use pretty_assertions::assert_eq;

    fn board() -> Board {
        let mut board = Board::new();
        for (name, x) in [("ia", 0.0), ("ib", 300.0)] {
            board
                .cards
                .insert(
                    Card::new(CardId::intern(name), name, "", CardCategory::Source)
                        .at(Point::new(x, 0.0))
                        .sized(Size::new(200.0, 100.0)),
                )
                .unwrap();
        }
        board
    }

    fn controller() -> InteractionController {
        InteractionController::new(ViewportSize::new(800.0, 600.0), CanvasConfig::default())
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let inverted = CanvasConfig {
            min_scale: 5.0,
            max_scale: 1.0,
            ..CanvasConfig::default()
        };
        let mut ctl = InteractionController::new(ViewportSize::new(800.0, 600.0), inverted.clone());
        assert_eq!(ctl.config(), &CanvasConfig::default());
        ctl.zoom_in();
        assert!(ctl.transform().scale() <= 4.0);

        assert!(ctl.set_config(inverted).is_err());
        assert_eq!(ctl.transform().limits().max, 4.0);
    }

    #[test]
    fn pointer_down_on_card_starts_drag_and_selects() {
        let board = board();
        let mut ctl = controller();
        let out = ctl.handle(&InputEvent::pointer_down(20.0, 30.0, Modifiers::NONE), &board);
        assert!(out.view_changed);
        assert_eq!(
            ctl.mode(),
            InteractionMode::Dragging {
                card: CardId::intern("ia"),
                grab_offset: Point::new(20.0, 30.0),
            }
        );
        assert_eq!(ctl.selected(), Some(CardId::intern("ia")));
    }

    #[test]
    fn background_down_pans_and_up_returns_idle() {
        let board = board();
        let mut ctl = controller();
        ctl.handle(&InputEvent::pointer_down(700.0, 500.0, Modifiers::NONE), &board);
        assert_eq!(
            ctl.mode(),
            InteractionMode::Panning {
                last_pointer: Point::new(700.0, 500.0)
            }
        );
        ctl.handle(&InputEvent::pointer_move(650.0, 520.0, Modifiers::NONE), &board);
        assert_eq!(ctl.transform().pan, Point::new(-50.0, 20.0));
        ctl.handle(&InputEvent::pointer_up(650.0, 520.0), &board);
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }

    #[test]
    fn wheel_pans_or_zooms() {
        let board = board();
        let mut ctl = controller();
        ctl.handle(
            &InputEvent::Wheel {
                dx: 10.0,
                dy: -40.0,
                modifiers: Modifiers::NONE,
            },
            &board,
        );
        assert_eq!(ctl.transform().pan, Point::new(-10.0, 40.0));
        assert_eq!(ctl.transform().scale(), 1.0);

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        ctl.handle(
            &InputEvent::Wheel {
                dx: 0.0,
                dy: -10_000.0,
                modifiers: ctrl,
            },
            &board,
        );
        assert_eq!(ctl.transform().scale(), 4.0);
        assert_eq!(ctl.transform().pan, Point::new(-10.0, 40.0));
    }

    #[test]
    fn link_click_ignored_mid_gesture() {
        let board = board();
        let mut ctl = controller();
        ctl.handle(&InputEvent::pointer_down(700.0, 500.0, Modifiers::NONE), &board);
        let out = ctl.handle(
            &InputEvent::LinkClick {
                card: CardId::intern("ia"),
            },
            &board,
        );
        assert!(!out.changed());
        assert!(matches!(ctl.mode(), InteractionMode::Panning { .. }));
    }

    #[test]
    fn escape_cancels_connecting_only() {
        let board = board();
        let mut ctl = controller();
        let esc = InputEvent::key("Escape", Modifiers::NONE, false);
        assert!(!ctl.handle(&esc, &board).view_changed);

        assert!(ctl.start_connecting(CardId::intern("ia"), &board));
        // Inside a text field Escape belongs to the field.
        ctl.handle(&InputEvent::key("Escape", Modifiers::NONE, true), &board);
        assert!(matches!(ctl.mode(), InteractionMode::Connecting { .. }));

        let out = ctl.handle(&esc, &board);
        assert_eq!(out.action, Some(ShortcutAction::CancelConnect));
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }

    #[test]
    fn prune_forgets_removed_cards() {
        let mut board = board();
        let mut ctl = controller();
        ctl.handle(&InputEvent::pointer_down(20.0, 30.0, Modifiers::NONE), &board);
        board.remove_card(CardId::intern("ia"));
        ctl.prune(&board);
        assert_eq!(ctl.selected(), None);
        assert_eq!(ctl.mode(), InteractionMode::Idle);
    }
}
