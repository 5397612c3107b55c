//! Content stream interpreter producing positioned text fragments.
//!
//! Tracks the graphics and text state operators that affect where text is
//! placed, and emits one [`TextFragment`] per text-showing operator
//! (`Tj`, `TJ`, `'`, `"`). Form XObjects invoked with `Do` are interpreted
//! recursively up to a configured depth. Path, color and image operators
//! are ignored.

use std::collections::HashMap;
use std::rc::Rc;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use pdftext_core::{Matrix, TextFragment, Verbosity};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::font::FontInfo;
use crate::objects::{get_dict, get_name, object_to_f64, resolve_inherited, resolve_object, stream_content};

/// A `TJ` adjustment at or below this value (thousandths of text space)
/// is treated as a word gap and shown as a space.
const TJ_SPACE_THRESHOLD: f64 = -250.0;

/// Interpreter settings derived from the open options.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InterpreterConfig {
    pub verbosity: Verbosity,
    pub max_recursion_depth: usize,
}

/// Text state parameters (PDF 32000-1, 9.3).
#[derive(Debug, Clone)]
struct TextState {
    font: Option<Rc<FontInfo>>,
    font_name: Option<String>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    /// `Tz / 100`.
    h_scale: f64,
    leading: f64,
    rise: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_name: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// Interpreter for the content streams of one page.
struct TextInterpreter<'a> {
    doc: &'a Document,
    config: InterpreterConfig,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    fragments: Vec<TextFragment>,
}

/// Extract the positioned text fragments of a page.
pub(crate) fn page_fragments(
    doc: &Document,
    page_id: ObjectId,
    config: InterpreterConfig,
) -> Result<Vec<TextFragment>, BackendError> {
    let content = page_content(doc, page_id)?;
    let empty = Dictionary::new();
    let resources = match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()))?,
        None => &empty,
    };

    let mut interpreter = TextInterpreter::new(doc, config);
    interpreter.run(&content, resources, 0)?;
    Ok(interpreter.fragments)
}

/// Concatenated, decoded bytes of a page's /Contents.
fn page_content(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, BackendError> {
    let page = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let contents = match page.get(b"Contents") {
        Ok(obj) => resolve_object(doc, obj),
        Err(_) => return Ok(Vec::new()),
    };

    let streams: Vec<&Object> = match contents {
        Object::Array(items) => items.iter().map(|o| resolve_object(doc, o)).collect(),
        other => vec![other],
    };

    let mut bytes = Vec::new();
    for obj in streams {
        let stream = obj
            .as_stream()
            .map_err(|e| BackendError::Parse(format!("/Contents entry is not a stream: {e}")))?;
        bytes.extend(stream_content(stream)?);
        // Streams are concatenated as if separated by whitespace.
        bytes.push(b'\n');
    }
    Ok(bytes)
}

impl<'a> TextInterpreter<'a> {
    fn new(doc: &'a Document, config: InterpreterConfig) -> Self {
        Self {
            doc,
            config,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text_matrix: Matrix::identity(),
            line_matrix: Matrix::identity(),
            fragments: Vec::new(),
        }
    }

    fn run(&mut self, content: &[u8], resources: &Dictionary, depth: usize) -> Result<(), BackendError> {
        if depth > self.config.max_recursion_depth {
            return Err(BackendError::Interpreter(format!(
                "Form XObject recursion depth {depth} exceeds limit {}",
                self.config.max_recursion_depth
            )));
        }

        let content = Content::decode(content)
            .map_err(|e| BackendError::Parse(format!("failed to decode content stream: {e}")))?;
        let mut fonts: HashMap<Vec<u8>, Rc<FontInfo>> = HashMap::new();

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => self.stack.push(self.state.clone()),
                "Q" => {
                    if let Some(saved) = self.stack.pop() {
                        self.state = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operands(operands) {
                        self.state.ctm = m.concat(&self.state.ctm);
                    }
                }

                "BT" => {
                    self.text_matrix = Matrix::identity();
                    self.line_matrix = Matrix::identity();
                }
                "ET" => {}
                "Tf" => {
                    if let (Some(Object::Name(name)), Some(size)) =
                        (operands.first(), number(operands, 1))
                    {
                        let font = self.load_font(&mut fonts, resources, name);
                        let text = &mut self.state.text;
                        text.font = Some(font);
                        text.font_name = Some(String::from_utf8_lossy(name).into_owned());
                        text.font_size = size;
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(operands) {
                        self.text_matrix = m;
                        self.line_matrix = m;
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                        self.move_text_position(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                        self.state.text.leading = -ty;
                        self.move_text_position(tx, ty);
                    }
                }
                "T*" => self.next_line(),
                "TL" => set_if_some(&mut self.state.text.leading, number(operands, 0)),
                "Tc" => set_if_some(&mut self.state.text.char_spacing, number(operands, 0)),
                "Tw" => set_if_some(&mut self.state.text.word_spacing, number(operands, 0)),
                "Tz" => set_if_some(&mut self.state.text.h_scale, number(operands, 0).map(|v| v / 100.0)),
                "Ts" => set_if_some(&mut self.state.text.rise, number(operands, 0)),

                "Tj" => {
                    if let Some(bytes) = operands.first().and_then(string_bytes) {
                        self.show(&[ShowItem::Text(bytes)]);
                    }
                }
                "'" => {
                    self.next_line();
                    if let Some(bytes) = operands.first().and_then(string_bytes) {
                        self.show(&[ShowItem::Text(bytes)]);
                    }
                }
                "\"" => {
                    set_if_some(&mut self.state.text.word_spacing, number(operands, 0));
                    set_if_some(&mut self.state.text.char_spacing, number(operands, 1));
                    self.next_line();
                    if let Some(bytes) = operands.get(2).and_then(string_bytes) {
                        self.show(&[ShowItem::Text(bytes)]);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        let items: Vec<ShowItem<'_>> = items
                            .iter()
                            .filter_map(|item| match item {
                                Object::String(bytes, _) => Some(ShowItem::Text(bytes.as_slice())),
                                other => object_to_f64(other).map(ShowItem::Adjust),
                            })
                            .collect();
                        self.show(&items);
                    }
                }

                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.invoke_xobject(resources, name, depth)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn load_font(
        &self,
        fonts: &mut HashMap<Vec<u8>, Rc<FontInfo>>,
        resources: &Dictionary,
        name: &[u8],
    ) -> Rc<FontInfo> {
        if let Some(font) = fonts.get(name) {
            return Rc::clone(font);
        }
        let font = match get_dict(self.doc, resources, b"Font").and_then(|f| get_dict(self.doc, f, name)) {
            Some(dict) => FontInfo::load(self.doc, dict),
            None => {
                if self.config.verbosity >= Verbosity::Warnings {
                    warn!(font = %String::from_utf8_lossy(name), "font resource not found, using default encoding");
                }
                FontInfo::default()
            }
        };
        let font = Rc::new(font);
        fonts.insert(name.to_vec(), Rc::clone(&font));
        font
    }

    fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Text rendering matrix: `[Tfs·Th 0 0 Tfs 0 Trise] × Tm × CTM`.
    fn rendering_matrix(&self) -> Matrix {
        let text = &self.state.text;
        Matrix::new(text.font_size * text.h_scale, 0.0, 0.0, text.font_size, 0.0, text.rise)
            .concat(&self.text_matrix)
            .concat(&self.state.ctm)
    }

    /// Show a sequence of strings and position adjustments as one fragment.
    fn show(&mut self, items: &[ShowItem<'_>]) {
        let transform = self.rendering_matrix().to_array();
        let font = match &self.state.text.font {
            Some(font) => Rc::clone(font),
            None => {
                if self.config.verbosity >= Verbosity::Warnings {
                    warn!("text shown without a font set");
                }
                Rc::new(FontInfo::default())
            }
        };

        let text_state = self.state.text.clone();
        let mut text = String::new();
        let mut tx = 0.0;

        for item in items {
            match item {
                ShowItem::Text(bytes) => {
                    for glyph in font.decode(bytes) {
                        text.push_str(&glyph.text);
                        let mut advance = glyph.width / 1000.0 * text_state.font_size + text_state.char_spacing;
                        if glyph.is_space {
                            advance += text_state.word_spacing;
                        }
                        tx += advance * text_state.h_scale;
                    }
                }
                ShowItem::Adjust(amount) => {
                    if *amount <= TJ_SPACE_THRESHOLD && !text.is_empty() && !text.ends_with(' ') {
                        text.push(' ');
                    }
                    tx -= amount / 1000.0 * text_state.font_size * text_state.h_scale;
                }
            }
        }

        self.text_matrix = Matrix::translation(tx, 0.0).concat(&self.text_matrix);

        if text.is_empty() {
            return;
        }
        let mut fragment = TextFragment::new(text, transform);
        fragment.font_name = text_state.font_name;
        self.fragments.push(fragment);
    }

    fn invoke_xobject(&mut self, resources: &Dictionary, name: &[u8], depth: usize) -> Result<(), BackendError> {
        let doc = self.doc;
        let Some(stream) = get_dict(doc, resources, b"XObject")
            .and_then(|x| x.get(name).ok())
            .and_then(|obj| resolve_object(doc, obj).as_stream().ok())
        else {
            if self.config.verbosity >= Verbosity::Infos {
                debug!(xobject = %String::from_utf8_lossy(name), "XObject not found");
            }
            return Ok(());
        };

        if get_name(doc, &stream.dict, b"Subtype") != Some(&b"Form"[..]) {
            return Ok(());
        }

        let content = stream_content(stream)?;
        let form_resources = get_dict(doc, &stream.dict, b"Resources").unwrap_or(resources);

        self.stack.push(self.state.clone());
        if let Some(m) = get_dict_matrix(doc, &stream.dict) {
            self.state.ctm = m.concat(&self.state.ctm);
        }
        let result = self.run(&content, form_resources, depth + 1);
        if let Some(saved) = self.stack.pop() {
            self.state = saved;
        }
        result
    }
}

/// One element of a text-showing operation.
enum ShowItem<'a> {
    Text(&'a [u8]),
    /// `TJ` position adjustment in thousandths of text space.
    Adjust(f64),
}

fn set_if_some(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn number(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(object_to_f64)
}

fn string_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes.as_slice()),
        _ => None,
    }
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = object_to_f64(obj)?;
    }
    Some(Matrix::from_array(m))
}

fn get_dict_matrix(doc: &Document, dict: &Dictionary) -> Option<Matrix> {
    let array = resolve_object(doc, dict.get(b"Matrix").ok()?).as_array().ok()?;
    matrix_operands(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    fn config() -> InterpreterConfig {
        InterpreterConfig {
            verbosity: Verbosity::Errors,
            max_recursion_depth: 10,
        }
    }

    /// Single-page document with Helvetica as /F1 and the given content.
    fn doc_with_content(content: &[u8]) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        });
        (doc, page_id)
    }

    fn fragments(content: &[u8]) -> Vec<TextFragment> {
        let (doc, page_id) = doc_with_content(content);
        page_fragments(&doc, page_id, config()).unwrap()
    }

    #[test]
    fn hello_world_baselines() {
        let frags = fragments(b"BT /F1 12 Tf 1 0 0 1 72 10 Tm (Hello) Tj ( World) Tj 1 0 0 1 72 7 Tm (Line2) Tj ET");
        let texts: Vec<&str> = frags.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", " World", "Line2"]);
        assert_eq!(frags[0].baseline(), 10.0);
        assert_eq!(frags[1].baseline(), 10.0);
        assert_eq!(frags[2].baseline(), 7.0);
        assert_eq!(frags[0].font_name.as_deref(), Some("F1"));
    }

    #[test]
    fn rendering_matrix_includes_font_size() {
        let frags = fragments(b"BT /F1 12 Tf 72 700 Td (A) Tj ET");
        assert_eq!(frags[0].transform, [12.0, 0.0, 0.0, 12.0, 72.0, 700.0]);
    }

    #[test]
    fn tj_advances_along_baseline() {
        let frags = fragments(b"BT /F1 10 Tf 0 0 Td (AB) Tj (C) Tj ET");
        // Two glyphs at the default 500 width: 2 * 0.5 * 10.
        assert_eq!(frags[1].transform[4], 10.0);
        assert_eq!(frags[1].baseline(), 0.0);
    }

    #[test]
    fn td_moves_relative_to_line_start() {
        let frags = fragments(b"BT /F1 12 Tf 72 700 Td (a) Tj 0 -14 Td (b) Tj ET");
        assert_eq!(frags[1].transform[4], 72.0);
        assert_eq!(frags[1].baseline(), 686.0);
    }

    #[test]
    fn t_star_and_quote_use_leading() {
        let frags = fragments(b"BT /F1 12 Tf 14 TL 0 100 Td (a) Tj T* (b) Tj (c) ' ET");
        let baselines: Vec<f64> = frags.iter().map(TextFragment::baseline).collect();
        assert_eq!(baselines, vec![100.0, 86.0, 72.0]);
    }

    #[test]
    fn capital_td_sets_leading() {
        let frags = fragments(b"BT /F1 12 Tf 0 100 Td (a) Tj 0 -20 TD (b) Tj T* (c) Tj ET");
        let baselines: Vec<f64> = frags.iter().map(TextFragment::baseline).collect();
        assert_eq!(baselines, vec![100.0, 80.0, 60.0]);
    }

    #[test]
    fn double_quote_sets_spacing_and_shows() {
        let frags = fragments(b"BT /F1 12 Tf 10 TL 0 50 Td 2 1 (x) \" ET");
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, "x");
        assert_eq!(frags[0].baseline(), 40.0);
    }

    #[test]
    fn tj_array_is_one_fragment_with_gap_space() {
        let frags = fragments(b"BT /F1 12 Tf [(Hel) -20 (lo) -300 (World)] TJ ET");
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, "Hello World");
    }

    #[test]
    fn rise_shifts_baseline() {
        let frags = fragments(b"BT /F1 10 Tf 0 100 Td (x) Tj 3 Ts (2) Tj ET");
        assert_eq!(frags[0].baseline(), 100.0);
        assert_eq!(frags[1].baseline(), 103.0);
    }

    #[test]
    fn ctm_applies_to_baseline() {
        let frags = fragments(b"q 1 0 0 1 0 50 cm BT /F1 12 Tf 0 10 Td (a) Tj ET Q BT /F1 12 Tf 0 10 Td (b) Tj ET");
        assert_eq!(frags[0].baseline(), 60.0);
        assert_eq!(frags[1].baseline(), 10.0);
    }

    #[test]
    fn empty_strings_produce_no_fragment() {
        let frags = fragments(b"BT /F1 12 Tf () Tj (a) Tj ET");
        assert_eq!(frags.len(), 1);
    }

    #[test]
    fn missing_font_still_decodes() {
        let frags = fragments(b"BT /F9 12 Tf (abc) Tj ET");
        assert_eq!(frags[0].text, "abc");
        assert_eq!(frags[0].font_name.as_deref(), Some("F9"));
    }

    #[test]
    fn page_without_contents_is_empty() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! { "Type" => "Page" });
        assert!(page_fragments(&doc, page_id, config()).unwrap().is_empty());
    }

    #[test]
    fn contents_array_is_concatenated() {
        let mut doc = Document::with_version("1.5");
        let a = doc.add_object(Stream::new(dictionary! {}, b"BT 0 10 Td (a) Tj".to_vec()));
        let b = doc.add_object(Stream::new(dictionary! {}, b"(b) Tj ET".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => vec![Object::Reference(a), Object::Reference(b)],
        });
        let frags = page_fragments(&doc, page_id, config()).unwrap();
        let texts: Vec<&str> = frags.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    fn form_resources(doc: &mut Document, form_content: &[u8], self_reference: bool) -> Dictionary {
        let form_id = doc.new_object_id();
        let mut form_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "Matrix" => [1, 0, 0, 1, 0, 20].map(Object::Integer).to_vec(),
        };
        if self_reference {
            form_dict.set(
                "Resources",
                dictionary! { "XObject" => dictionary! { "Fm1" => Object::Reference(form_id) } },
            );
        }
        doc.objects.insert(form_id, Object::Stream(Stream::new(form_dict, form_content.to_vec())));
        dictionary! { "XObject" => dictionary! { "Fm1" => Object::Reference(form_id) } }
    }

    #[test]
    fn form_xobject_text_is_included() {
        let mut doc = Document::with_version("1.5");
        let resources = form_resources(&mut doc, b"BT /F1 10 Tf 0 5 Td (inner) Tj ET", false);
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"/Fm1 Do".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        });
        let frags = page_fragments(&doc, page_id, config()).unwrap();
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, "inner");
        assert_eq!(frags[0].baseline(), 25.0);
    }

    #[test]
    fn recursive_form_hits_depth_limit() {
        let mut doc = Document::with_version("1.5");
        let resources = form_resources(&mut doc, b"/Fm1 Do", true);
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"/Fm1 Do".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        });
        let err = page_fragments(&doc, page_id, config()).unwrap_err();
        assert!(matches!(err, BackendError::Interpreter(ref m) if m.contains("recursion depth")));
    }
}
