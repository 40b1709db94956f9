//! Page tree splicing for merged documents
//!
//! Each source document is renumbered into a shared id space, its page
//! objects are collected in their internal order and every other object is
//! carried over untouched. The source catalogs and page tree nodes are
//! dropped; [`PageTreeBuilder::finish`] writes a single flat tree in their
//! place.

use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Guards against malformed trees whose `Parent` links form a loop
const MAX_TREE_DEPTH: usize = 64;

/// Accumulates pages from several documents into one page tree
pub struct PageTreeBuilder {
    objects: std::collections::BTreeMap<ObjectId, Object>,
    pages: Vec<(ObjectId, Dictionary)>,
    next_id: u32,
}

impl Default for PageTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: std::collections::BTreeMap::new(),
            pages: Vec::new(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append every page of `document`, returns how many were added
    pub fn append(&mut self, mut document: Document) -> usize {
        document.renumber_objects_with(self.next_id);
        self.next_id = document.max_id + 1;

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        for &page_id in &page_ids {
            let Ok(page) = document.get_dictionary(page_id) else {
                continue;
            };
            let mut page = page.clone();
            for key in INHERITABLE {
                if !page.has(key)
                    && let Some(value) = inherited(&document, &page, key)
                {
                    page.set(key.to_vec(), value);
                }
            }
            self.pages.push((page_id, page));
        }

        for (id, object) in document.objects {
            if page_ids.contains(&id) || is_tree_structure(&object) {
                continue;
            }
            self.objects.insert(id, object);
        }

        page_ids.len()
    }

    /// Build the merged document
    ///
    /// With no pages appended this is a valid document with an empty tree.
    pub fn finish(self) -> Result<Document> {
        let mut merged = Document::with_version("1.5");
        merged.objects = self.objects;
        merged.max_id = self.next_id - 1;

        let pages_id = merged.new_object_id();
        let count = i64::try_from(self.pages.len()).context("Page count out of range")?;
        let mut kids = Vec::with_capacity(self.pages.len());
        for (page_id, mut page) in self.pages {
            page.set("Parent", pages_id);
            merged.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        merged.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        merged.trailer.set("Root", catalog_id);
        merged.compress();

        Ok(merged)
    }
}

/// Objects rebuilt by the merge: catalogs, page tree nodes and outlines
fn is_tree_structure(object: &Object) -> bool {
    let Object::Dictionary(dict) = object else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Catalog" | b"Pages" | b"Outlines" | b"Outline")
    )
}

fn inherited(document: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let node = document.get_dictionary(parent).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}
