//! PDF annotation types.
//!
//! [`PageAnnotation`] is what a document engine reports for one native
//! annotation object; [`Annotation`] is the flattened form that appears in
//! an extraction result.

/// Common PDF annotation subtypes.
///
/// Unknown or rare subtypes are represented as [`AnnotationType::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnotationType {
    /// Text annotation (sticky note).
    Text,
    /// Link annotation (hyperlink or internal navigation).
    Link,
    /// Free text annotation.
    FreeText,
    Highlight,
    Underline,
    StrikeOut,
    Stamp,
    Square,
    Circle,
    Ink,
    Popup,
    /// Widget annotation (form field).
    Widget,
    /// Other / unknown annotation subtype.
    Other(String),
}

impl AnnotationType {
    /// Parse an annotation type from a PDF /Subtype name.
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype {
            "Text" => Self::Text,
            "Link" => Self::Link,
            "FreeText" => Self::FreeText,
            "Highlight" => Self::Highlight,
            "Underline" => Self::Underline,
            "StrikeOut" => Self::StrikeOut,
            "Stamp" => Self::Stamp,
            "Square" => Self::Square,
            "Circle" => Self::Circle,
            "Ink" => Self::Ink,
            "Popup" => Self::Popup,
            "Widget" => Self::Widget,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One native annotation object as reported by a document engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageAnnotation {
    /// The annotation type (parsed from /Subtype).
    pub annot_type: AnnotationType,
    /// Raw /Subtype name as it appears in the PDF (empty if missing).
    pub raw_subtype: String,
    /// Target of a URI action, if the annotation carries one.
    pub url: Option<String>,
}

impl PageAnnotation {
    pub fn new(raw_subtype: impl Into<String>, url: Option<String>) -> Self {
        let raw_subtype = raw_subtype.into();
        Self {
            annot_type: AnnotationType::from_subtype(&raw_subtype),
            raw_subtype,
            url,
        }
    }
}

/// A flattened annotation entry in an extraction result.
///
/// Every native annotation produces one entry; `url` is `None` for
/// annotations that are not URI links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub url: Option<String>,
}

impl From<PageAnnotation> for Annotation {
    fn from(annot: PageAnnotation) -> Self {
        Self { url: annot.url }
    }
}
