pub mod assistant;
pub mod import;
pub mod sections;
pub mod services;

pub use assistant::{
    Assistant, ChatMessage, GENERATION_FALLBACK, Role, board_context, insight_card, summary_card,
};
pub use import::{
    DocumentBody, ImportError, ImportOptions, ImportReport, Importer, SourceDocument,
    place_sections,
};
pub use sections::{DocumentKind, Section, split_markdown, split_plain_text};
pub use services::{ExtractError, NoExtractor, ServiceError, TextExtractor, TextGenerator};
