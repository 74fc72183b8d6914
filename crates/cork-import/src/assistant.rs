//! Chat assistant grounded in the board's content.
//!
//! The board is flattened into a Markdown context document and sent along
//! with the user's prompt. Generation failures never propagate: the reply
//! becomes [`GENERATION_FALLBACK`] and is marked as failed.

use crate::services::{TextGenerator, non_empty};
use cork_core::config::CanvasConfig;
use cork_core::id::CardId;
use cork_core::model::{Card, CardCategory, Point};
use cork_core::store::Board;
use serde::{Deserialize, Serialize};

/// Reply shown when the generation service fails.
pub const GENERATION_FALLBACK: &str =
    "Sorry, I couldn't generate a response right now. Please try again.";

const SUMMARY_PROMPT: &str = "Summarize this section in a few concise bullet points.";

/// Number of earlier turns replayed to the model.
const HISTORY_TURNS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// The assistant could not answer; `text` is the fallback.
    #[serde(default)]
    pub failed: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            failed: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            failed: false,
        }
    }
}

/// Flatten the board into a context document. The selected card, if any,
/// comes first and is marked as the focus.
pub fn board_context(board: &Board, selected: Option<CardId>) -> String {
    let mut out = String::new();
    let focus = selected.and_then(|id| board.cards.get(id));
    if let Some(card) = focus {
        out.push_str("# Focused card\n\n");
        push_card(&mut out, card);
    }
    let rest: Vec<&Card> = board
        .cards
        .iter()
        .filter(|c| Some(c.id) != focus.map(|f| f.id))
        .collect();
    if !rest.is_empty() {
        out.push_str("# Canvas\n\n");
        for card in rest {
            push_card(&mut out, card);
        }
    }
    out
}

fn push_card(out: &mut String, card: &Card) {
    out.push_str(&format!("## {} [{}]\n", card.title, card.category.name()));
    out.push_str(card.content.trim());
    out.push_str("\n\n");
}

pub struct Assistant<G> {
    generator: G,
    history: Vec<ChatMessage>,
}

impl<G: TextGenerator> Assistant<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Ask a question about the board. Records both turns and returns the reply.
    pub async fn ask(
        &mut self,
        board: &Board,
        selected: Option<CardId>,
        prompt: &str,
        thinking: bool,
    ) -> ChatMessage {
        let mut context = board_context(board, selected);
        let start = self.history.len().saturating_sub(HISTORY_TURNS);
        if start < self.history.len() {
            context.push_str("# Conversation so far\n\n");
            for msg in &self.history[start..] {
                let who = match msg.role {
                    Role::User => "User",
                    Role::Assistant => "Assistant",
                };
                context.push_str(&format!("{who}: {}\n", msg.text));
            }
        }

        self.history.push(ChatMessage::user(prompt));
        let reply = match non_empty(self.generator.generate(&context, prompt, thinking).await) {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => {
                log::warn!("assistant generation failed: {e}");
                ChatMessage {
                    failed: true,
                    ..ChatMessage::assistant(GENERATION_FALLBACK)
                }
            }
        };
        self.history.push(reply.clone());
        reply
    }

    /// Turn an assistant reply into an `AiResponse` card at `position`.
    pub fn promote(&self, message: &ChatMessage, position: Point, config: &CanvasConfig) -> Card {
        insight_card(&message.text, position, config)
    }

    /// Summarize one card into a new `Summary` card placed to its right.
    /// Returns `None` for an unknown card or a failed generation.
    pub async fn summarize(
        &self,
        board: &Board,
        card: CardId,
        config: &CanvasConfig,
    ) -> Option<Card> {
        let source = board.cards.get(card)?;
        let reply = self
            .generator
            .generate(&source.content, SUMMARY_PROMPT, false)
            .await;
        let summary = match non_empty(reply) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("summary of {card} failed: {e}");
                return None;
            }
        };
        Some(summary_card(source, summary, config))
    }
}

/// An `AiResponse` card holding `text`, titled by its first non-empty line.
pub fn insight_card(text: &str, position: Point, config: &CanvasConfig) -> Card {
    let title = text
        .lines()
        .map(|l| l.trim_start_matches('#').trim())
        .find(|l| !l.is_empty())
        .map(|l| truncate(l, 60))
        .unwrap_or_else(|| "AI insight".to_string());
    Card::new(
        CardId::with_prefix("insight"),
        title,
        text,
        CardCategory::AiResponse,
    )
    .at(position)
    .sized(config.card_size())
}

/// A `Summary` card for `source`, placed one gap to its right.
pub fn summary_card(source: &Card, text: impl Into<String>, config: &CanvasConfig) -> Card {
    let position = Point::new(source.bounds().right() + config.card_gap, source.position.y);
    Card::new(
        CardId::with_prefix("summary"),
        format!("Summary: {}", source.title),
        text,
        CardCategory::Summary,
    )
    .at(position)
    .sized(config.card_size())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cork_core::model::Size;
    use pretty_assertions::assert_eq;

    #[test]
    fn context_puts_focused_card_first() {
        let mut board = Board::new();
        for (name, body) in [("ctx_a", "alpha"), ("ctx_b", "beta")] {
            board
                .cards
                .insert(
                    Card::new(CardId::intern(name), name, body, CardCategory::Source)
                        .sized(Size::new(10.0, 10.0)),
                )
                .unwrap();
        }
        let ctx = board_context(&board, Some(CardId::intern("ctx_b")));
        assert_eq!(
            ctx,
            "# Focused card\n\n## ctx_b [source]\nbeta\n\n# Canvas\n\n## ctx_a [source]\nalpha\n\n"
        );
        let plain = board_context(&board, None);
        assert!(plain.starts_with("# Canvas"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
