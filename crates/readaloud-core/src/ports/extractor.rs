//! Content extractor port: pulls readable main text out of a tab.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TabId;

/// Readable content pulled from a page.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// The page's main prose, boilerplate stripped. Whitespace is raw; the
    /// orchestrator normalises it during segmentation.
    pub text: String,
    /// Best-effort language tag for the page; empty when detection failed.
    pub language: String,
}

/// Errors returned by a content extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page has no usable main text (empty frame, media-only page).
    #[error("no readable main text found on this page")]
    NoReadableContent,

    /// The extraction machinery itself failed (tab gone, script error,
    /// transport failure).
    #[error("content extraction failed: {0}")]
    Backend(#[source] anyhow::Error),
}

/// Pulls readable text from a tab. Invoked once per start request.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extract the main readable content of `tab`.
    async fn extract(&self, tab: TabId) -> Result<ExtractedContent, ExtractError>;
}
