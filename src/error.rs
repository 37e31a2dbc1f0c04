//! Error types for the attribution engine.

use thiserror::Error;

/// Result type alias for attribution operations
pub type Result<T> = std::result::Result<T, AttributionError>;

/// Errors that can occur while analysing a page.
///
/// A page without any copyright information is not an error; it yields an
/// [`AttributionResult`](crate::AttributionResult) with zero confidence.
#[derive(Error, Debug)]
pub enum AttributionError {
    /// Nothing to analyse (empty, whitespace-only or non UTF-8 input)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One extraction path could not process the document
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The attribute scan hit the configured element limit
    #[error("Maximum element limit exceeded: {0}")]
    MaxElementsExceeded(usize),

    /// A comment pattern added to the catalog failed to compile
    #[error("Invalid signal pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
