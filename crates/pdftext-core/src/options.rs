//! Configuration for opening documents and extracting text.

use std::time::Duration;

/// Options for one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractOptions {
    /// Upper bound on the number of pages processed (`None` = all pages).
    pub max_pages: Option<usize>,
    /// Whether to collect annotations. When `false` the result carries no
    /// annotation field at all.
    pub include_annotations: bool,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_annotations(mut self, include: bool) -> Self {
        self.include_annotations = include;
        self
    }

    /// Number of pages to process for a document with `total` pages.
    pub fn processed_page_count(&self, total: usize) -> usize {
        match self.max_pages {
            Some(max) => max.min(total),
            None => total,
        }
    }
}

/// How much engine diagnostic output is emitted while interpreting pages.
///
/// Diagnostics below the configured level are never produced, rather than
/// produced and filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verbosity {
    /// Only hard errors.
    #[default]
    Errors,
    /// Errors plus recoverable anomalies such as missing fonts.
    Warnings,
    /// Everything, including informational notes.
    Infos,
}

/// Options for opening a document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OpenOptions {
    pub verbosity: Verbosity,
    /// Maximum nesting depth of Form XObjects during interpretation.
    pub max_recursion_depth: usize,
    /// Reject inputs larger than this many bytes (`None` = unlimited).
    pub max_input_bytes: Option<usize>,
    /// Timeout applied to remote locator fetches.
    pub fetch_timeout: Duration,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Errors,
            max_recursion_depth: 10,
            max_input_bytes: None,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl OpenOptions {
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}
