//! Table-of-contents extraction.
//!
//! Walks the document catalog's outline tree (`/Outlines` -> `/First` ->
//! `/Next` siblings, `/First` children) and resolves each entry's destination
//! to a 1-based page number. Entries come back in the document's original
//! order with their nesting level.

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::error::{PluckError, PluckResult};

/// One outline entry: nesting level (0 = top), title, and the 1-based target
/// page when the destination resolves to a page in this document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u32,
    pub title: String,
    pub page: Option<u32>,
}

impl fmt::Display for TocEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.level as usize);
        match self.page {
            Some(page) => write!(f, "{indent}{} -> p.{page}", self.title),
            None => write!(f, "{indent}{} -> p.?", self.title),
        }
    }
}

/// Load a document and return its outline entries.
pub fn read_toc(path: &Path) -> PluckResult<Vec<TocEntry>> {
    let document = Document::load(path).map_err(|e| {
        PluckError::pdf_processing_with_source(
            format!("failed to open {} for outline traversal", path.display()),
            e,
        )
    })?;

    Ok(outline_entries(&document))
}

/// Collect every outline entry of an already-parsed document.
///
/// Documents without an outline yield an empty list; malformed entries are
/// dropped rather than failing the whole dump.
pub fn outline_entries(document: &Document) -> Vec<TocEntry> {
    let page_numbers: HashMap<ObjectId, u32> = document
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number))
        .collect();

    let first = document
        .catalog()
        .ok()
        .and_then(|catalog| catalog.get(b"Outlines").ok())
        .and_then(|outlines| resolve_dict(document, outlines))
        .and_then(|outlines| outlines.get(b"First").ok().cloned());

    let mut entries = Vec::new();
    if let Some(first) = first {
        let mut visited = HashSet::new();
        walk_outline(
            document,
            first,
            0,
            &page_numbers,
            &mut visited,
            &mut entries,
        );
    }

    entries
}

fn walk_outline(
    document: &Document,
    node: Object,
    level: u32,
    page_numbers: &HashMap<ObjectId, u32>,
    visited: &mut HashSet<ObjectId>,
    entries: &mut Vec<TocEntry>,
) {
    let mut current = node;
    loop {
        // Outline items are linked lists; a malformed document can close the
        // list into a cycle.
        if let Ok(id) = current.as_reference() {
            if !visited.insert(id) {
                break;
            }
        }

        let Some(dict) = resolve_dict(document, &current) else {
            break;
        };

        let title = dict
            .get(b"Title")
            .ok()
            .and_then(|t| resolve_string(document, t));
        let page = destination_page(document, dict, page_numbers);
        let child = dict.get(b"First").ok().cloned();
        let next = dict.get(b"Next").ok().cloned();

        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            entries.push(TocEntry { level, title, page });
        }

        if let Some(child) = child {
            walk_outline(document, child, level + 1, page_numbers, visited, entries);
        }

        match next {
            Some(next) => current = next,
            None => break,
        }
    }
}

fn resolve_dict<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn resolve_string(document: &Document, object: &Object) -> Option<String> {
    match object {
        Object::Reference(id) => document
            .get_object(*id)
            .ok()
            .and_then(|target| resolve_string(document, target)),
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when the BOM is present, otherwise
/// treated as a Latin-1-compatible byte string.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Resolve an outline item's target page from `/Dest`, or from a `/A` GoTo
/// action's `/D` entry. Named destinations are not resolved.
fn destination_page(
    document: &Document,
    item: &Dictionary,
    page_numbers: &HashMap<ObjectId, u32>,
) -> Option<u32> {
    let dest = if let Ok(dest) = item.get(b"Dest") {
        Some(dest.clone())
    } else if let Ok(action) = item.get(b"A") {
        resolve_dict(document, action).and_then(|action| action.get(b"D").ok().cloned())
    } else {
        None
    }?;

    dest_target_page(document, &dest, page_numbers, 0)
}

fn dest_target_page(
    document: &Document,
    dest: &Object,
    page_numbers: &HashMap<ObjectId, u32>,
    depth: u8,
) -> Option<u32> {
    if depth > 8 {
        return None;
    }

    match dest {
        Object::Reference(id) => {
            // Either a direct reference to the target page, or a reference to
            // the destination array itself.
            if let Some(&number) = page_numbers.get(id) {
                return Some(number);
            }
            dest_target_page(document, document.get_object(*id).ok()?, page_numbers, depth + 1)
        }
        Object::Array(items) => items
            .first()
            .and_then(|target| dest_target_page(document, target, page_numbers, depth + 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    fn utf16be(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        bytes
    }

    /// Three empty pages plus a two-level outline:
    ///   Thema 6 -> p.1
    ///     Wortschatz -> p.2 (UTF-16BE title, GoTo action destination)
    ///   Anhang -> p.3
    fn document_with_outline() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let page_ids: Vec<ObjectId> = (0..3)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                })
            })
            .collect();

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
            "Count" => 3,
            "MediaBox" => vec![0.into(), 0.into(), 300.into(), 400.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let outlines_id = doc.new_object_id();
        let item1_id = doc.new_object_id();
        let item2_id = doc.new_object_id();
        let sub_id = doc.new_object_id();

        doc.objects.insert(
            item1_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::String(b"Thema 6".to_vec(), StringFormat::Literal),
                "Parent" => outlines_id,
                "Dest" => vec![page_ids[0].into(), "Fit".into()],
                "First" => sub_id,
                "Last" => sub_id,
                "Next" => item2_id,
            }),
        );
        doc.objects.insert(
            sub_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::String(utf16be("Wortschatz: Traditionen"), StringFormat::Hexadecimal),
                "Parent" => item1_id,
                "A" => dictionary! {
                    "S" => "GoTo",
                    "D" => vec![page_ids[1].into(), "Fit".into()],
                },
            }),
        );
        doc.objects.insert(
            item2_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::String(b"Anhang".to_vec(), StringFormat::Literal),
                "Parent" => outlines_id,
                "Dest" => vec![page_ids[2].into(), "Fit".into()],
                "Prev" => item1_id,
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => item1_id,
                "Last" => item2_id,
                "Count" => 3,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Outlines" => outlines_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    #[test]
    fn entries_in_original_order_with_levels_and_pages() {
        let doc = document_with_outline();
        let entries = outline_entries(&doc);

        assert_eq!(
            entries,
            vec![
                TocEntry {
                    level: 0,
                    title: "Thema 6".to_string(),
                    page: Some(1),
                },
                TocEntry {
                    level: 1,
                    title: "Wortschatz: Traditionen".to_string(),
                    page: Some(2),
                },
                TocEntry {
                    level: 0,
                    title: "Anhang".to_string(),
                    page: Some(3),
                },
            ]
        );
    }

    #[test]
    fn document_without_outline_yields_no_entries() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        assert!(outline_entries(&doc).is_empty());
    }

    #[test]
    fn cyclic_sibling_chain_terminates() {
        let mut doc = document_with_outline();

        // Close the top-level sibling chain into a loop.
        let entries_before = outline_entries(&doc);
        let item2_id = doc
            .objects
            .iter()
            .find_map(|(&id, object)| {
                let dict = object.as_dict().ok()?;
                let title = dict.get(b"Title").ok()?.as_str().ok()?;
                (title == b"Anhang").then_some(id)
            })
            .unwrap();
        let item1_id = doc
            .objects
            .iter()
            .find_map(|(&id, object)| {
                let dict = object.as_dict().ok()?;
                let title = dict.get(b"Title").ok()?.as_str().ok()?;
                (title == b"Thema 6").then_some(id)
            })
            .unwrap();
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(item2_id) {
            dict.set("Next", item1_id);
        }

        let entries = outline_entries(&doc);
        assert_eq!(entries.len(), entries_before.len());
    }

    #[test]
    fn display_indents_by_level() {
        let entry = TocEntry {
            level: 2,
            title: "Dialog".to_string(),
            page: Some(64),
        };
        assert_eq!(entry.to_string(), "    Dialog -> p.64");

        let unresolved = TocEntry {
            level: 0,
            title: "Anhang".to_string(),
            page: None,
        };
        assert_eq!(unresolved.to_string(), "Anhang -> p.?");
    }

    #[test]
    fn decodes_utf16be_titles() {
        assert_eq!(decode_pdf_string(&utf16be("Übung für dich")), "Übung für dich");
        assert_eq!(decode_pdf_string(b"Anhang"), "Anhang");
    }
}
