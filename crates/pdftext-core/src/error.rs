//! Error types for pdftext.
//!
//! Provides [`PdfError`], the single error type that crosses the public API.
//! Only a failure to open a document reaches callers of the extraction
//! entry points; metadata and per-page failures are absorbed into empty
//! defaults and never surface as a [`PdfError`].

use std::fmt;

/// Fatal error types for PDF processing.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading PDF data from a local locator.
    IoError(String),
    /// Error fetching PDF data from a remote locator.
    FetchError(String),
    /// Error resolving font or encoding information.
    FontError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A requested page does not exist in the document.
    PageOutOfRange {
        /// The requested 1-based page number.
        page: usize,
        /// The number of pages in the document.
        page_count: usize,
    },
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// The PDF is encrypted and cannot be opened without a password.
    PasswordRequired,
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FetchError(msg) => write!(f, "fetch error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PageOutOfRange { page, page_count } => {
                write!(f, "page {page} out of range (document has {page_count} pages)")
            }
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}
