//! WASM bridge for Corkboard: exposes the board engine to the browser UI.
//!
//! Compiled via `wasm-pack build --target web`. JS owns rendering, file
//! reading and the calls to the extraction/generation services; everything
//! that changes the board or the view goes through [`CorkCanvas`].

mod console;
mod snapshot;

use cork_core::config::CanvasConfig;
use cork_core::id::CardId;
use cork_core::model::{Card, CardCategory, Color, Point, Size};
use cork_core::store::{Board, BoardMutation};
use cork_core::viewport::ViewportSize;
use cork_editor::input::{InputEvent, Modifiers};
use cork_editor::interaction::{InteractionController, Outcome};
use cork_import::{Section, board_context, insight_card, place_sections, summary_card};
use cork_render::hit::cards_at;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing board controller.
#[wasm_bindgen]
pub struct CorkCanvas {
    board: Board,
    controller: InteractionController,
}

#[wasm_bindgen]
impl CorkCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console::panic_hook_setup();
        Self {
            board: Board::new(),
            controller: InteractionController::new(
                viewport_size(width, height),
                CanvasConfig::default(),
            ),
        }
    }

    /// Replace the canvas configuration. Returns `false` (and keeps the
    /// current one) if the JSON is invalid.
    pub fn set_config(&mut self, json: &str) -> bool {
        match CanvasConfig::from_json(json).and_then(|c| self.controller.set_config(c)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("rejected canvas config: {e}");
                false
            }
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.controller.resize(viewport_size(width, height));
    }

    // ─── Pointer / wheel / keyboard ──────────────────────────────────────

    /// Returns `true` if the board or the view changed.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.dispatch(&InputEvent::pointer_down(x, y, mods)).changed()
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.dispatch(&InputEvent::pointer_move(x, y, mods)).changed()
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.dispatch(&InputEvent::pointer_up(x, y)).changed()
    }

    /// Ctrl/⌘ + wheel zooms, plain wheel pans.
    pub fn handle_wheel(&mut self, dx: f32, dy: f32, ctrl: bool, meta: bool) -> bool {
        let event = InputEvent::Wheel {
            dx,
            dy,
            modifiers: modifiers(false, ctrl, false, meta),
        };
        self.dispatch(&event).changed()
    }

    /// Handle a keyboard event. Returns the resolved action name
    /// (e.g. `"navigateNext"`), or an empty string if the key is unbound.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        in_text_input: bool,
    ) -> String {
        let mods = modifiers(shift, ctrl, alt, meta);
        let outcome = self.dispatch(&InputEvent::key(key, mods, in_text_input));
        outcome
            .action
            .map(|action| action.name().to_string())
            .unwrap_or_default()
    }

    /// The link affordance of a card was clicked.
    pub fn click_link(&mut self, card_id: &str) -> bool {
        let Some(card) = self.known_card(card_id) else {
            return false;
        };
        self.dispatch(&InputEvent::LinkClick { card }).changed()
    }

    pub fn cancel_connecting(&mut self) -> bool {
        self.controller.cancel_connecting()
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.controller.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.controller.zoom_out();
    }

    pub fn zoom_to_fit(&mut self) -> bool {
        self.controller.zoom_to_fit(&self.board)
    }

    pub fn center_on(&mut self, card_id: &str) -> bool {
        match self.known_card(card_id) {
            Some(card) => self.controller.center_on(card, &self.board),
            None => false,
        }
    }

    /// Select a card by id; an empty string clears the selection.
    pub fn select(&mut self, card_id: &str) -> bool {
        if card_id.is_empty() {
            self.controller.select(None);
            return true;
        }
        match self.known_card(card_id) {
            Some(card) => {
                self.controller.select(Some(card));
                true
            }
            None => false,
        }
    }

    pub fn get_selected_id(&self) -> String {
        self.controller
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Board edits ─────────────────────────────────────────────────────

    /// Add extracted (and possibly translated) sections as source cards.
    ///
    /// Input: `[{"document":"a.md","sections":[{"label":"..","text":".."}]}]`.
    /// Returns `{"ok":true,"cards":n,"connections":m}` or
    /// `{"ok":false,"error":"..."}`.
    pub fn add_sections(&mut self, json: &str) -> String {
        let batches: Vec<SectionBatch> = match serde_json::from_str(json) {
            Ok(b) => b,
            Err(e) => return error_json(&format!("invalid sections: {e}")),
        };
        let batches: Vec<(String, Vec<Section>)> = batches
            .into_iter()
            .map(|b| (b.document, b.sections))
            .collect();
        match place_sections(&mut self.board, &batches, self.controller.config()) {
            Ok(report) => serde_json::json!({
                "ok": true,
                "cards": report.cards.len(),
                "connections": report.connections,
            })
            .to_string(),
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Add one card. Missing fields get defaults: a generated id, the
    /// configured card size, and a position centered in the current view.
    /// Returns the new card's id, or an empty string on failure.
    pub fn add_card(&mut self, json: &str) -> String {
        let draft: CardDraft = match serde_json::from_str(json) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("invalid card: {e}");
                return String::new();
            }
        };
        let card = self.card_from_draft(draft);
        self.add(card)
    }

    /// Patch an existing card. Only fields present in the JSON change.
    pub fn update_card(&mut self, json: &str) -> bool {
        let draft: CardDraft = match serde_json::from_str(json) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("invalid card update: {e}");
                return false;
            }
        };
        let Some(id) = draft.id.as_deref().and_then(|id| self.known_card(id)) else {
            return false;
        };
        let Some(mut card) = self.board.cards.get(id).cloned() else {
            return false;
        };
        draft.patch(&mut card);
        self.board.apply(BoardMutation::UpdateCard {
            card: Box::new(card),
        })
    }

    /// Remove a card and its connections.
    pub fn remove_card(&mut self, card_id: &str) -> bool {
        let Some(id) = self.known_card(card_id) else {
            return false;
        };
        let removed = self.board.apply(BoardMutation::RemoveCard { id });
        self.controller.prune(&self.board);
        removed
    }

    // ─── Assistant ───────────────────────────────────────────────────────

    /// The board as a Markdown context document for the chat model,
    /// selected card first.
    pub fn board_context(&self) -> String {
        board_context(&self.board, self.controller.selected())
    }

    /// Turn an assistant reply into an AI-insight card centered in the
    /// current view. Returns the new card's id, or an empty string.
    pub fn promote_reply(&mut self, text: &str) -> String {
        let size = self.controller.config().card_size();
        let card = insight_card(text, self.centered_origin(size), self.controller.config());
        self.add(card)
    }

    /// Place a generated summary of `card_id` to its right and link the two.
    /// Returns the summary card's id, or an empty string.
    pub fn add_summary(&mut self, card_id: &str, text: &str) -> String {
        let Some(source) = self
            .known_card(card_id)
            .and_then(|id| self.board.cards.get(id))
        else {
            return String::new();
        };
        if text.trim().is_empty() {
            return String::new();
        }
        let source_id = source.id;
        let card = summary_card(source, text, self.controller.config());
        let id = self.add(card);
        if !id.is_empty() {
            let summary = CardId::intern(&id);
            self.board
                .connect(source_id, summary, Some("summary".to_string()));
        }
        id
    }

    /// Ids of every card under a screen point, topmost first, as a JSON array.
    pub fn cards_at(&self, x: f32, y: f32) -> String {
        let p = self.controller.transform().to_canvas(Point::new(x, y));
        let hits = cards_at(&self.board, p);
        let ids: Vec<&str> = hits.iter().map(|id| id.as_str()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Full board + view state as JSON for rendering.
    pub fn snapshot(&self) -> String {
        snapshot::snapshot(&self.board, &self.controller).to_string()
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl CorkCanvas {
    fn dispatch(&mut self, event: &InputEvent) -> Outcome {
        let outcome = self.controller.handle(event, &self.board);
        for mutation in outcome.mutations.iter().cloned() {
            self.board.apply(mutation);
        }
        outcome
    }

    fn add(&mut self, card: Card) -> String {
        let id = card.id;
        if self.board.apply(BoardMutation::AddCard {
            card: Box::new(card),
        }) {
            id.as_str().to_string()
        } else {
            String::new()
        }
    }

    /// Top-left corner that centers a card of `size` in the current view.
    fn centered_origin(&self, size: Size) -> Point {
        let center = self
            .controller
            .transform()
            .to_canvas(self.controller.viewport().center());
        Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
    }

    /// Look up an id without interning strings the board has never seen.
    fn known_card(&self, card_id: &str) -> Option<CardId> {
        self.board
            .cards
            .iter()
            .find(|c| c.id.as_str() == card_id)
            .map(|c| c.id)
    }

    fn card_from_draft(&self, draft: CardDraft) -> Card {
        let config = self.controller.config();
        let category = draft
            .category
            .as_deref()
            .and_then(CardCategory::from_name)
            .unwrap_or(CardCategory::Note);
        let id = match draft.id.as_deref() {
            Some(id) if !id.is_empty() => CardId::intern(id),
            _ => CardId::with_prefix(category.name()),
        };
        let size = config.card_size();
        let mut card = Card::new(id, "", "", category)
            .at(self.centered_origin(size))
            .sized(size);
        draft.patch(&mut card);
        card
    }
}

#[derive(Debug, Deserialize)]
struct SectionBatch {
    document: String,
    sections: Vec<Section>,
}

/// Card fields as sent by JS; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CardDraft {
    id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    category: Option<String>,
    color: Option<String>,
}

impl CardDraft {
    fn patch(&self, card: &mut Card) {
        if let Some(title) = &self.title {
            card.title = title.clone();
        }
        if let Some(content) = &self.content {
            card.content = content.clone();
        }
        card.position = Point::new(
            self.x.unwrap_or(card.position.x),
            self.y.unwrap_or(card.position.y),
        );
        card.size = Size::new(
            self.width.unwrap_or(card.size.width),
            self.height.unwrap_or(card.size.height),
        )
        .sanitized();
        if let Some(category) = self.category.as_deref().and_then(CardCategory::from_name) {
            card.category = category;
        }
        if let Some(color) = self.color.as_deref().and_then(Color::from_hex) {
            card.color = color;
        }
    }
}

fn viewport_size(width: f64, height: f64) -> ViewportSize {
    ViewportSize::new(width as f32, height as f32)
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

/// Route `log` output to the browser console at the given level
/// (`"trace"` … `"error"`, default `info`).
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    console::panic_hook_setup();
    console::install(console::parse_level(level));
}
