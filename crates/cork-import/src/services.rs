//! External collaborators: text extraction and text generation.
//!
//! Both are opaque services (a PDF engine, a hosted generative model). Each
//! call is issued once and resolves to a single terminal result; there is no
//! streaming, retry, or cancellation. Failures come back as explicit errors
//! and the caller decides the fallback value.

use crate::import::SourceDocument;
use crate::sections::Section;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The document could not be read (corrupt PDF, invalid UTF-8, ...).
    #[error("{name}: malformed document: {reason}")]
    Malformed { name: String, reason: String },

    /// No extractor can handle this document.
    #[error("{0}: no extractor available")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned an empty response")]
    EmptyResponse,

    #[error("rate limited")]
    RateLimited,
}

/// Turns a binary document (PDF) into ordered sections.
#[allow(async_fn_in_trait)]
pub trait TextExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<Section>, ExtractError>;
}

/// Translation and free-form generation.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError>;

    /// Answer `prompt` given `context`. `thinking` requests a
    /// higher-reasoning-effort response.
    async fn generate(
        &self,
        context: &str,
        prompt: &str,
        thinking: bool,
    ) -> Result<String, ServiceError>;
}

/// Extractor for deployments without PDF support: every call fails with
/// [`ExtractError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtractor;

impl TextExtractor for NoExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<Vec<Section>, ExtractError> {
        Err(ExtractError::Unavailable(document.name.clone()))
    }
}

/// Reject blank replies so callers see one failure shape.
pub(crate) fn non_empty(reply: Result<String, ServiceError>) -> Result<String, ServiceError> {
    match reply {
        Ok(text) if text.trim().is_empty() => Err(ServiceError::EmptyResponse),
        other => other,
    }
}
