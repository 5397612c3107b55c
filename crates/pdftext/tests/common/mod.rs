//! Mock document engine for orchestration tests.
//!
//! A mock document is described by JSON passed as the input bytes:
//!
//! ```json
//! {
//!   "pages": [
//!     { "fragments": [["Hello", 10], [" World", 10]], "annotations": ["https://a", null],
//!       "fail_page": false, "fail_text": false, "fail_annotations": false,
//!       "panic": false, "yields": 0 }
//!   ],
//!   "fail_open": false, "fail_metadata": false, "panic_metadata": false, "title": "Doc"
//! }
//! ```
//!
//! Every engine call is recorded in an event log so tests can check the
//! interleaving of page tasks.

#![allow(dead_code)]

use std::sync::Mutex;

use pdftext::pdftext_parse::BackendError;
use pdftext::{DocumentEngine, DocumentParams, OpenOptions, PdfError, TextFragment};
use pdftext::pdftext_core::{DocumentInfo, DocumentMetadata, PageAnnotation};
use serde_json::Value;

#[derive(Debug, Default)]
pub struct MockPageDesc {
    pub fragments: Vec<(String, f64)>,
    pub annotations: Vec<Option<String>>,
    pub fail_page: bool,
    pub fail_text: bool,
    pub fail_annotations: bool,
    pub panic: bool,
    pub yields: usize,
}

#[derive(Debug)]
pub struct MockDocument {
    pub pages: Vec<MockPageDesc>,
    pub fail_metadata: bool,
    pub panic_metadata: bool,
    pub title: Option<String>,
    pub events: Mutex<Vec<String>>,
}

impl MockDocument {
    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn page_desc(&self, number: usize) -> &MockPageDesc {
        &self.pages[number - 1]
    }
}

#[derive(Debug)]
pub struct MockPage {
    pub number: usize,
}

pub struct MockEngine;

fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn parse_page(value: &Value) -> MockPageDesc {
    let fragments = value
        .get("fragments")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|pair| {
                    let text = pair[0].as_str().unwrap_or_default().to_string();
                    let baseline = pair[1].as_f64().unwrap_or_default();
                    (text, baseline)
                })
                .collect()
        })
        .unwrap_or_default();
    let annotations = value
        .get("annotations")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();
    MockPageDesc {
        fragments,
        annotations,
        fail_page: flag(value, "fail_page"),
        fail_text: flag(value, "fail_text"),
        fail_annotations: flag(value, "fail_annotations"),
        panic: flag(value, "panic"),
        yields: value.get("yields").and_then(Value::as_u64).unwrap_or(0) as usize,
    }
}

async fn yield_times(n: usize) {
    for _ in 0..n {
        tokio::task::yield_now().await;
    }
}

impl DocumentEngine for MockEngine {
    type Document = MockDocument;
    type Page = MockPage;
    type Error = BackendError;

    async fn open(params: DocumentParams, _options: &OpenOptions) -> Result<MockDocument, BackendError> {
        let data = params
            .data
            .ok_or_else(|| BackendError::Fetch("mock engine needs in-memory data".to_string()))?;
        let desc: Value =
            serde_json::from_slice(&data).map_err(|e| BackendError::Parse(format!("bad mock document: {e}")))?;
        if flag(&desc, "fail_open") {
            return Err(BackendError::Parse("mock open failure".to_string()));
        }
        let pages = desc
            .get("pages")
            .and_then(Value::as_array)
            .map(|pages| pages.iter().map(parse_page).collect())
            .unwrap_or_default();
        Ok(MockDocument {
            pages,
            fail_metadata: flag(&desc, "fail_metadata"),
            panic_metadata: flag(&desc, "panic_metadata"),
            title: desc.get("title").and_then(Value::as_str).map(String::from),
            events: Mutex::new(Vec::new()),
        })
    }

    fn page_count(doc: &MockDocument) -> usize {
        doc.pages.len()
    }

    async fn document_metadata(doc: &MockDocument) -> Result<DocumentMetadata, BackendError> {
        tokio::task::yield_now().await;
        if doc.panic_metadata {
            panic!("mock metadata panic");
        }
        if doc.fail_metadata {
            return Err(BackendError::Parse("mock metadata failure".to_string()));
        }
        let mut info = DocumentInfo::new();
        info.insert("PDFFormatVersion", "1.7");
        if let Some(title) = &doc.title {
            info.insert("Title", title.as_str());
        }
        Ok(DocumentMetadata { info, metadata: None })
    }

    async fn get_page(doc: &MockDocument, page_number: usize) -> Result<MockPage, BackendError> {
        doc.record(format!("start:{page_number}"));
        if page_number == 0 || page_number > doc.pages.len() {
            return Err(BackendError::Core(PdfError::PageOutOfRange {
                page: page_number,
                page_count: doc.pages.len(),
            }));
        }
        yield_times(doc.page_desc(page_number).yields).await;
        if doc.page_desc(page_number).fail_page {
            return Err(BackendError::Parse(format!("mock page {page_number} unavailable")));
        }
        Ok(MockPage { number: page_number })
    }

    async fn text_content(doc: &MockDocument, page: &MockPage) -> Result<Vec<TextFragment>, BackendError> {
        let desc = doc.page_desc(page.number);
        tokio::task::yield_now().await;
        if desc.panic {
            panic!("mock text panic on page {}", page.number);
        }
        if desc.fail_text {
            return Err(BackendError::Interpreter("mock text failure".to_string()));
        }
        doc.record(format!("end:{}", page.number));
        Ok(desc
            .fragments
            .iter()
            .map(|(text, baseline)| TextFragment::at(text.clone(), 0.0, *baseline))
            .collect())
    }

    async fn page_annotations(doc: &MockDocument, page: &MockPage) -> Result<Vec<PageAnnotation>, BackendError> {
        let desc = doc.page_desc(page.number);
        if desc.fail_annotations {
            return Err(BackendError::Parse("mock annotation failure".to_string()));
        }
        Ok(desc
            .annotations
            .iter()
            .map(|url| {
                let subtype = if url.is_some() { "Link" } else { "Text" };
                PageAnnotation::new(subtype, url.clone())
            })
            .collect())
    }
}

/// Serialize a mock document description to input bytes.
pub fn mock_input(desc: Value) -> Vec<u8> {
    serde_json::to_vec(&desc).unwrap()
}

/// Pages with one fragment each, `"p1"`, `"p2"`, ...
pub fn simple_pages(count: usize) -> Value {
    let pages: Vec<Value> = (1..=count)
        .map(|n| serde_json::json!({ "fragments": [[format!("p{n}"), 10.0]] }))
        .collect();
    serde_json::json!({ "pages": pages })
}
