//! Import pipeline: documents → sections → (translated) cards.
//!
//! 1. Classify each document by extension; unsupported ones are skipped.
//! 2. Extract sections (Markdown and plain text locally, PDF through the
//!    external extractor). Any extraction failure aborts the whole batch
//!    before the board is touched.
//! 3. Optionally translate each section; a failed translation keeps the
//!    original text.
//! 4. Lay the batch out, add one `Source` card per section, and chain the
//!    new cards with sequential connections (file order, then section order).

use crate::sections::{DocumentKind, Section, split_markdown, split_plain_text};
use crate::services::{ExtractError, TextExtractor, TextGenerator, non_empty};
use cork_core::config::CanvasConfig;
use cork_core::id::CardId;
use cork_core::layout::layout_batch;
use cork_core::model::{Card, CardCategory};
use cork_core::store::Board;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    Text(String),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    /// `None` when the extension is not supported.
    pub kind: Option<DocumentKind>,
    pub body: DocumentBody,
}

impl SourceDocument {
    /// A file, classified by its name.
    pub fn file(name: impl Into<String>, body: DocumentBody) -> Self {
        let name = name.into();
        let kind = DocumentKind::from_name(&name);
        Self { name, kind, body }
    }

    /// Text pasted straight into the app.
    pub fn pasted(text: impl Into<String>) -> Self {
        Self {
            name: "Pasted text".to_string(),
            kind: Some(DocumentKind::PlainText),
            body: DocumentBody::Text(text.into()),
        }
    }

    fn text(&self) -> Result<&str, ExtractError> {
        match &self.body {
            DocumentBody::Text(text) => Ok(text),
            DocumentBody::Bytes(bytes) => {
                std::str::from_utf8(bytes).map_err(|e| ExtractError::Malformed {
                    name: self.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Translate every section into this language (e.g. `"English"`).
    pub translate_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("no valid content found")]
    NoContent,

    #[error("could not add card: {0}")]
    Board(String),
}

/// What an import added to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// New cards in file-then-section order.
    pub cards: Vec<CardId>,
    /// Sequential connections created between them.
    pub connections: usize,
    /// Names of documents skipped as unsupported.
    pub skipped: Vec<String>,
}

pub struct Importer<E, G> {
    extractor: E,
    generator: G,
    config: CanvasConfig,
}

impl<E: TextExtractor, G: TextGenerator> Importer<E, G> {
    pub fn new(extractor: E, generator: G, config: CanvasConfig) -> Self {
        Self {
            extractor,
            generator,
            config,
        }
    }

    pub async fn import(
        &self,
        board: &mut Board,
        documents: &[SourceDocument],
        options: &ImportOptions,
    ) -> Result<ImportReport, ImportError> {
        let mut skipped = Vec::new();
        let mut batches: Vec<(String, Vec<Section>)> = Vec::new();

        for doc in documents {
            let Some(kind) = doc.kind else {
                log::warn!("skipping unsupported file {}", doc.name);
                skipped.push(doc.name.clone());
                continue;
            };
            let sections = match kind {
                DocumentKind::Markdown => split_markdown(&doc.name, doc.text()?),
                DocumentKind::PlainText => split_plain_text(&doc.name, doc.text()?),
                DocumentKind::Pdf => self.extractor.extract(doc).await?,
            };
            log::debug!("{}: {} section(s)", doc.name, sections.len());
            batches.push((doc.name.clone(), sections));
        }

        if let Some(language) = &options.translate_to {
            for (_, sections) in &mut batches {
                for section in sections.iter_mut() {
                    section.text = self.translate_or_keep(&section.text, language).await;
                }
            }
        }

        let mut report = place_sections(board, &batches, &self.config)?;
        report.skipped = skipped;
        Ok(report)
    }

    async fn translate_or_keep(&self, text: &str, language: &str) -> String {
        match non_empty(self.generator.translate(text, language).await) {
            Ok(translated) => translated,
            Err(e) => {
                log::warn!("translation to {language} failed, keeping original: {e}");
                text.to_string()
            }
        }
    }
}

/// Add already-extracted sections to the board as `Source` cards and chain
/// them. Shared by the async importer and the browser bridge, where
/// extraction and translation happen on the JS side.
///
/// # Errors
/// [`ImportError::NoContent`] when the batch holds no sections.
pub fn place_sections(
    board: &mut Board,
    batches: &[(String, Vec<Section>)],
    config: &CanvasConfig,
) -> Result<ImportReport, ImportError> {
    let batches: Vec<&(String, Vec<Section>)> =
        batches.iter().filter(|(_, s)| !s.is_empty()).collect();
    if batches.is_empty() {
        return Err(ImportError::NoContent);
    }

    let columns: Vec<usize> = batches.iter().map(|(_, s)| s.len()).collect();
    let positions = layout_batch(board.bounds(), &columns, config);

    let mut cards = Vec::new();
    for ((_, sections), column) in batches.iter().zip(&positions) {
        for (section, position) in sections.iter().zip(column) {
            cards.push(
                Card::new(
                    fresh_source_id(board),
                    section.label.clone(),
                    section.text.clone(),
                    CardCategory::Source,
                )
                .at(*position)
                .sized(config.card_size()),
            );
        }
    }

    let mut ids: Vec<CardId> = Vec::with_capacity(cards.len());
    for card in cards {
        let id = card.id;
        if let Err(e) = board.cards.insert(card) {
            for inserted in &ids {
                board.cards.remove(*inserted);
            }
            return Err(ImportError::Board(e));
        }
        ids.push(id);
    }

    let connections = board.sequence(&ids);
    log::info!(
        "imported {} card(s) from {} document(s), {connections} connection(s)",
        ids.len(),
        batches.len()
    );
    Ok(ImportReport {
        cards: ids,
        connections,
        skipped: Vec::new(),
    })
}

/// Generated ids skip any id a user card already took.
fn fresh_source_id(board: &Board) -> CardId {
    loop {
        let id = CardId::with_prefix("source");
        if !board.cards.contains(id) {
            return id;
        }
        log::debug!("generated id {id} already on the board, skipping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn place_sections_chains_cards_in_order() {
        let mut board = Board::new();
        let batches = vec![
            (
                "a.md".to_string(),
                vec![Section::new("A1", "one"), Section::new("A2", "two")],
            ),
            ("empty.md".to_string(), Vec::new()),
            ("b.md".to_string(), vec![Section::new("B1", "three")]),
        ];
        let report = place_sections(&mut board, &batches, &CanvasConfig::default()).unwrap();
        assert_eq!(report.cards.len(), 3);
        assert_eq!(report.connections, 2);
        let titles: Vec<&str> = board.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A1", "A2", "B1"]);
        // Second non-empty document gets the second column.
        let b1 = board.cards.get(report.cards[2]).unwrap();
        assert_eq!(b1.position.x, 480.0);
    }

    #[test]
    fn place_sections_skips_ids_taken_by_user_cards() {
        let mut board = Board::new();
        let peek = CardId::with_prefix("source");
        let next: u64 = peek
            .as_str()
            .trim_start_matches("source_")
            .parse()
            .unwrap();
        let taken: Vec<CardId> = (next + 1..=next + 64)
            .map(|n| CardId::intern(&format!("source_{n}")))
            .collect();
        for id in &taken {
            board
                .cards
                .insert(Card::new(*id, "mine", "user text", CardCategory::Note))
                .unwrap();
        }

        let batches = vec![(
            "a.md".to_string(),
            vec![
                Section::new("S1", "one"),
                Section::new("S2", "two"),
                Section::new("S3", "three"),
            ],
        )];
        let report = place_sections(&mut board, &batches, &CanvasConfig::default()).unwrap();
        assert_eq!(report.cards.len(), 3);
        assert_eq!(report.connections, 2);
        assert_eq!(board.cards.len(), taken.len() + 3);
        assert!(report.cards.iter().all(|id| !taken.contains(id)));
        assert!(taken.iter().all(|id| {
            board
                .cards
                .get(*id)
                .is_some_and(|c| c.content == "user text" && c.category == CardCategory::Note)
        }));
    }

    #[test]
    fn place_sections_without_content_fails() {
        let mut board = Board::new();
        let batches = vec![("blank.md".to_string(), Vec::new())];
        assert_eq!(
            place_sections(&mut board, &batches, &CanvasConfig::default()),
            Err(ImportError::NoContent)
        );
        assert!(board.cards.is_empty());
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let doc = SourceDocument::file("bad.md", DocumentBody::Bytes(vec![0xff, 0xfe]));
        assert!(matches!(doc.text(), Err(ExtractError::Malformed { .. })));
    }
}
