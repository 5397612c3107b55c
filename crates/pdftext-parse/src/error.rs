//! Error types for the engine and interpreter layers.
//!
//! Uses [`thiserror`] for error derivation. [`BackendError`] converts into
//! [`PdfError`] at the public API boundary.

use pdftext_core::PdfError;
use thiserror::Error;

/// Error type for document engine operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading a local locator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error fetching a remote locator.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// Malformed XMP metadata packet.
    #[error("XMP error: {0}")]
    Xmp(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Fetch(err.to_string())
    }
}

impl From<quick_xml::Error> for BackendError {
    fn from(err: quick_xml::Error) -> Self {
        BackendError::Xmp(err.to_string())
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Fetch(msg) => PdfError::FetchError(msg),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Xmp(msg) => PdfError::ParseError(format!("XMP: {msg}")),
            BackendError::Core(e) => e,
        }
    }
}
