use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};

/// One bookmark of the document outline.
///
/// `page` is a 0-based page index. It is signed and unchecked: destinations
/// written as bare integers can point anywhere, and callers decide what to do
/// with targets that fall outside the document. `None` means the destination
/// could not be resolved at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub page: Option<i64>,
    pub level: u32,
    pub children: Vec<OutlineEntry>,
}

/// Read the outline tree of a loaded document. Returns an empty list when the
/// document has no `/Outlines` or it is unreadable.
pub fn read_outline(doc: &Document) -> Vec<OutlineEntry> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };

    let Some(outlines) = catalog
        .get(b"Outlines")
        .ok()
        .and_then(|obj| deref_dict(doc, obj))
    else {
        return Vec::new();
    };

    let first = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Vec::new(),
    };

    let page_index: HashMap<ObjectId, i64> = doc
        .get_pages()
        .into_values()
        .enumerate()
        .map(|(index, id)| (id, index as i64))
        .collect();

    let mut walker = OutlineWalker {
        doc,
        page_index,
        visited: HashSet::new(),
    };
    walker.siblings(first, 0)
}

struct OutlineWalker<'a> {
    doc: &'a Document,
    page_index: HashMap<ObjectId, i64>,
    // Broken files can link /Next or /First back into the tree.
    visited: HashSet<ObjectId>,
}

impl OutlineWalker<'_> {
    fn siblings(&mut self, first: ObjectId, level: u32) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        let mut current = Some(first);

        while let Some(id) = current {
            if !self.visited.insert(id) {
                log::debug!("outline item {:?} visited twice, stopping", id);
                break;
            }
            let Ok(item) = self.doc.get_dictionary(id) else {
                break;
            };

            let title = match item.get(b"Title") {
                Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
                _ => "Untitled".to_string(),
            };
            let page = self.item_target(item);
            let children = match item.get(b"First") {
                Ok(Object::Reference(child)) => self.siblings(*child, level + 1),
                _ => Vec::new(),
            };

            entries.push(OutlineEntry {
                title,
                page,
                level,
                children,
            });

            current = match item.get(b"Next") {
                Ok(Object::Reference(r)) => Some(*r),
                _ => None,
            };
        }

        entries
    }

    fn item_target(&self, item: &Dictionary) -> Option<i64> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve(dest, 0);
        }

        // GoTo action, either inline or referenced
        let action = deref_dict(self.doc, item.get(b"A").ok()?)?;
        match action.get(b"S") {
            Ok(Object::Name(kind)) if kind == b"GoTo" => self.resolve(action.get(b"D").ok()?, 0),
            _ => None,
        }
    }

    fn resolve(&self, dest: &Object, depth: u8) -> Option<i64> {
        if depth > 8 {
            return None;
        }
        match dest {
            Object::Array(arr) => self.explicit_target(arr),
            Object::String(name, _) | Object::Name(name) => self.named_target(name, depth),
            Object::Reference(r) => self.resolve(self.doc.get_object(*r).ok()?, depth + 1),
            // Named-destination values may be wrapped as << /D [...] >>
            Object::Dictionary(dict) => self.resolve(dict.get(b"D").ok()?, depth + 1),
            _ => None,
        }
    }

    /// `[page /XYZ left top zoom]` and friends. The page is normally a
    /// reference, but some producers write a bare 0-based index.
    fn explicit_target(&self, arr: &[Object]) -> Option<i64> {
        match arr.first()? {
            Object::Reference(page_ref) => self.page_index.get(page_ref).copied(),
            Object::Integer(index) => Some(*index),
            _ => None,
        }
    }

    fn named_target(&self, name: &[u8], depth: u8) -> Option<i64> {
        let catalog = self.doc.catalog().ok()?;

        if let Some(dests_root) = catalog
            .get(b"Names")
            .ok()
            .and_then(|obj| deref_dict(self.doc, obj))
            .and_then(|names| names.get(b"Dests").ok())
        {
            if let Some(value) = self.search_name_tree(dests_root, name, 0) {
                return self.resolve(value, depth + 1);
            }
        }

        // PDF 1.1 style /Dests dictionary
        let dests = deref_dict(self.doc, catalog.get(b"Dests").ok()?)?;
        self.resolve(dests.get(name).ok()?, depth + 1)
    }

    fn search_name_tree<'d>(
        &'d self,
        node: &'d Object,
        name: &[u8],
        depth: u8,
    ) -> Option<&'d Object> {
        if depth > 32 {
            return None;
        }
        let node = deref_dict(self.doc, node)?;

        if let Ok(Object::Array(names)) = node.get(b"Names") {
            for pair in names.chunks_exact(2) {
                if let Object::String(key, _) = &pair[0] {
                    if key == name {
                        return Some(&pair[1]);
                    }
                }
            }
        }

        if let Ok(Object::Array(kids)) = node.get(b"Kids") {
            return kids
                .iter()
                .find_map(|kid| self.search_name_tree(kid, name, depth + 1));
        }

        None
    }
}

fn deref_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(r) => doc.get_dictionary(*r).ok(),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE or UTF-8 with a byte order mark,
/// otherwise PDFDocEncoding (treated as Latin-1).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Flatten the outline tree depth-first, keeping each entry's level.
pub fn flatten_outline(entries: &[OutlineEntry]) -> Vec<&OutlineEntry> {
    let mut flat = Vec::new();
    let mut stack: Vec<&OutlineEntry> = entries.iter().rev().collect();
    while let Some(entry) = stack.pop() {
        flat.push(entry);
        stack.extend(entry.children.iter().rev());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, Bookmark};

    #[test]
    fn reads_top_level_bookmarks() {
        let bookmarks = [Bookmark::at("Pièce 1", 0), Bookmark::at("Pièce 2", 4)];
        let bytes = test_support::build_pdf(6, &bookmarks);
        let doc = Document::load_mem(&bytes).unwrap();

        let outline = read_outline(&doc);
        let targets: Vec<_> = outline.iter().map(|e| (e.title.as_str(), e.page)).collect();
        assert_eq!(targets, vec![("Pièce 1", Some(0)), ("Pièce 2", Some(4))]);
        assert!(outline.iter().all(|e| e.level == 0));
    }

    #[test]
    fn no_outline_is_empty() {
        let bytes = test_support::build_pdf(3, &[]);
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(read_outline(&doc).is_empty());
    }

    #[test]
    fn bare_integer_destinations_are_kept_unchecked() {
        let bookmarks = [
            Bookmark::raw_index("ok", 1),
            Bookmark::raw_index("past end", 3),
            Bookmark::raw_index("negative", -2),
        ];
        let bytes = test_support::build_pdf(3, &bookmarks);
        let doc = Document::load_mem(&bytes).unwrap();

        let pages: Vec<_> = read_outline(&doc).iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![Some(1), Some(3), Some(-2)]);
    }

    #[test]
    fn resolves_goto_actions_and_named_destinations() {
        let bookmarks = [Bookmark::goto("action", 2), Bookmark::named("named", "dest-3", Some(3))];
        let bytes = test_support::build_pdf(5, &bookmarks);
        let doc = Document::load_mem(&bytes).unwrap();

        let pages: Vec<_> = read_outline(&doc).iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![Some(2), Some(3)]);
    }

    #[test]
    fn unresolvable_destination_is_none() {
        let bytes = test_support::build_pdf(2, &[Bookmark::named("missing", "nowhere", None)]);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(read_outline(&doc)[0].page, None);
    }

    #[test]
    fn decodes_utf16_titles() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Bulletin de salaire – mai".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_pdf_string(&bytes), "Bulletin de salaire – mai");
        assert_eq!(decode_pdf_string(b"Avis d'imp\xf4t"), "Avis d'impôt");
    }

    #[test]
    fn flatten_is_depth_first() {
        let leaf = |title: &str, level| OutlineEntry {
            title: title.to_string(),
            page: None,
            level,
            children: Vec::new(),
        };
        let tree = vec![
            OutlineEntry {
                children: vec![leaf("a.1", 1), leaf("a.2", 1)],
                ..leaf("a", 0)
            },
            leaf("b", 0),
        ];

        let titles: Vec<_> = flatten_outline(&tree).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "a.1", "a.2", "b"]);
    }
}
