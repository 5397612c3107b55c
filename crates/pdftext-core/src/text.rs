//! Positioned text fragments and baseline line reconstruction.

/// One positioned run of text on a page.
///
/// Carries the decoded string content and the text rendering matrix in
/// effect when the run was shown. The sixth coefficient of `transform` is
/// the baseline used to group fragments into visual lines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextFragment {
    /// Decoded Unicode text of the run.
    pub text: String,
    /// Text rendering matrix `[a b c d e f]` at the start of the run.
    pub transform: [f64; 6],
    /// Resource name of the font used to show the run (e.g. `F1`).
    pub font_name: Option<String>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, transform: [f64; 6]) -> Self {
        Self {
            text: text.into(),
            transform,
            font_name: None,
        }
    }

    /// Fragment positioned at `(x, baseline)` with an unscaled transform.
    pub fn at(text: impl Into<String>, x: f64, baseline: f64) -> Self {
        Self::new(text, [1.0, 0.0, 0.0, 1.0, x, baseline])
    }

    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Vertical baseline coordinate (`transform[5]`).
    pub fn baseline(&self) -> f64 {
        self.transform[5]
    }
}

/// Rebuild line-broken text from fragments in content-stream order.
///
/// Fragments whose baseline equals the previous fragment's baseline are
/// appended to the current line; any other baseline starts a new line with
/// a single `\n`. Equality is exact: there is no tolerance band, so
/// sub-point jitter in a baseline produces a line break.
pub fn reconstruct_lines<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a TextFragment>,
{
    let mut out = String::new();
    let mut last_baseline: Option<f64> = None;

    for fragment in fragments {
        let baseline = fragment.baseline();
        match last_baseline {
            Some(last) if last != baseline => {
                out.push('\n');
                out.push_str(&fragment.text);
            }
            _ => out.push_str(&fragment.text),
        }
        last_baseline = Some(baseline);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_baseline_concatenates() {
        let fragments = vec![TextFragment::at("foo", 0.0, 5.0), TextFragment::at("bar", 20.0, 5.0)];
        assert_eq!(reconstruct_lines(&fragments), "foobar");
    }

    #[test]
    fn different_baseline_inserts_one_newline() {
        let fragments = vec![TextFragment::at("foo", 0.0, 5.0), TextFragment::at("bar", 0.0, 3.0)];
        assert_eq!(reconstruct_lines(&fragments), "foo\nbar");
    }

    #[test]
    fn hello_world_two_lines() {
        let fragments = vec![
            TextFragment::at("Hello", 72.0, 10.0),
            TextFragment::at(" World", 100.0, 10.0),
            TextFragment::at("Line2", 72.0, 7.0),
        ];
        assert_eq!(reconstruct_lines(&fragments), "Hello World\nLine2");
    }

    #[test]
    fn empty_input_is_empty_string() {
        let fragments: Vec<TextFragment> = Vec::new();
        assert_eq!(reconstruct_lines(&fragments), "");
    }

    #[test]
    fn first_fragment_never_gets_newline() {
        let fragments = vec![TextFragment::at("only", 0.0, 700.0)];
        assert_eq!(reconstruct_lines(&fragments), "only");
    }

    #[test]
    fn zero_baseline_is_a_real_baseline() {
        let fragments = vec![
            TextFragment::at("a", 0.0, 0.0),
            TextFragment::at("b", 10.0, 0.0),
            TextFragment::at("c", 0.0, 12.0),
        ];
        assert_eq!(reconstruct_lines(&fragments), "ab\nc");
    }

    #[test]
    fn returning_to_earlier_baseline_breaks_again() {
        let fragments = vec![
            TextFragment::at("a", 0.0, 10.0),
            TextFragment::at("b", 0.0, 8.0),
            TextFragment::at("c", 0.0, 10.0),
        ];
        assert_eq!(reconstruct_lines(&fragments), "a\nb\nc");
    }

    #[test]
    fn sub_point_jitter_breaks_line() {
        let fragments = vec![TextFragment::at("a", 0.0, 10.0), TextFragment::at("b", 5.0, 10.001)];
        assert_eq!(reconstruct_lines(&fragments), "a\nb");
    }

    #[test]
    fn empty_fragment_still_updates_baseline() {
        let fragments = vec![
            TextFragment::at("a", 0.0, 10.0),
            TextFragment::at("", 0.0, 8.0),
            TextFragment::at("b", 0.0, 8.0),
        ];
        assert_eq!(reconstruct_lines(&fragments), "a\nb");
    }

    #[test]
    fn baseline_reads_sixth_coefficient() {
        let fragment = TextFragment::new("x", [12.0, 0.0, 0.0, 12.0, 72.0, 640.5]).with_font_name("F1");
        assert_eq!(fragment.baseline(), 640.5);
        assert_eq!(fragment.font_name.as_deref(), Some("F1"));
    }
}
