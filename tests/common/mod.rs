//! Test utilities for the html2pdf test suite
//!
//! `FakeRenderer` serves a scripted link graph and prints every document as
//! a one-page PDF whose page carries a `Label` entry naming the document, so
//! merged output can be checked for order without a browser.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use kodegen_tools_html2pdf::{PageRenderer, PdfLayout};
use lopdf::{Document, Object, dictionary};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Base URL all scripted documents live under
pub const BASE: &str = "file:///export/";

/// URL of the scripted document `name`
pub fn page(name: &str) -> String {
    format!("{BASE}{name}")
}

/// What the traversal asked the renderer to do, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(String),
    Capture(String),
    Close(String),
    Shutdown,
}

#[derive(Debug)]
pub struct FakePage {
    url: String,
}

/// Renderer that serves a scripted link graph
#[derive(Default)]
pub struct FakeRenderer {
    graph: HashMap<String, Vec<String>>,
    fail_open: HashSet<String>,
    fail_capture: HashSet<String>,
    capture_delay: Option<Duration>,
    pages_per_document: Option<usize>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the document `name` to link to `links`, in document order
    ///
    /// Links are resolved against [`BASE`] the way a browser resolves an
    /// anchor's `href`.
    pub fn document(mut self, name: &str, links: &[&str]) -> Self {
        let base = Url::parse(BASE).unwrap();
        let resolved = links
            .iter()
            .map(|l| base.join(l).unwrap().to_string())
            .collect();
        self.graph.insert(page(name), resolved);
        self
    }

    pub fn failing_open(mut self, name: &str) -> Self {
        self.fail_open.insert(page(name));
        self
    }

    pub fn failing_capture(mut self, name: &str) -> Self {
        self.fail_capture.insert(page(name));
        self
    }

    /// Make every capture sleep first
    pub fn slow_capture(mut self, delay: Duration) -> Self {
        self.capture_delay = Some(delay);
        self
    }

    /// Print every document as `pages` pages labelled `<name>#<n>`
    pub fn pages_per_document(mut self, pages: usize) -> Self {
        self.pages_per_document = Some(pages);
        self
    }

    /// Shared view of the event log, usable after the renderer is consumed
    pub fn events(&self) -> Arc<Mutex<Vec<Event>>> {
        Arc::clone(&self.events)
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Short name of a scripted URL (`file:///export/a.html` -> `a.html`)
pub fn short(url: &str) -> &str {
    url.strip_prefix(BASE).unwrap_or(url)
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    type Handle = FakePage;

    async fn open(&self, url: &str) -> Result<FakePage> {
        self.record(Event::Open(short(url).to_string()));
        if self.fail_open.contains(url) || !self.graph.contains_key(url) {
            return Err(anyhow!("net::ERR_FILE_NOT_FOUND"));
        }
        Ok(FakePage {
            url: url.to_string(),
        })
    }

    async fn wait_until_network_idle(&self, _handle: &mut FakePage) -> Result<()> {
        Ok(())
    }

    async fn extract_links(&self, handle: &mut FakePage) -> Result<Vec<String>> {
        Ok(self.graph.get(&handle.url).cloned().unwrap_or_default())
    }

    async fn capture_document(&self, handle: &mut FakePage, _layout: &PdfLayout) -> Result<Vec<u8>> {
        if let Some(delay) = self.capture_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Event::Capture(short(&handle.url).to_string()));
        if self.fail_capture.contains(&handle.url) {
            return Err(anyhow!("Page.printToPDF failed"));
        }
        let name = short(&handle.url);
        match self.pages_per_document {
            Some(pages) => {
                let labels: Vec<String> = (0..pages).map(|n| format!("{name}#{n}")).collect();
                let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
                Ok(sample_pdf(&labels))
            }
            None => Ok(sample_pdf(&[name])),
        }
    }

    async fn close(&self, handle: FakePage) -> Result<()> {
        self.record(Event::Close(short(&handle.url).to_string()));
        Ok(())
    }

    async fn shutdown(self) -> Result<()> {
        self.record(Event::Shutdown);
        Ok(())
    }
}

/// A PDF with one page per label, each page tagged with its label
pub fn sample_pdf(labels: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = labels
        .iter()
        .map(|label| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Label" => Object::string_literal(*label),
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => labels.len() as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Page labels of the PDF at `path`, in page order
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            let label = page.get(b"Label").unwrap().as_str().unwrap();
            String::from_utf8_lossy(label).into_owned()
        })
        .collect()
}

/// Names of the files in `dir`, sorted
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
