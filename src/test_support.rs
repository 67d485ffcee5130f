//! In-memory PDF fixtures shaped like a DossierFacile export.

use lopdf::content::{Content, Operation};
use lopdf::{
    dictionary, Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId,
    Permissions, Stream, StringFormat,
};

pub enum Target {
    Page(usize),
    RawIndex(i64),
    GoTo(usize),
    Named(String, Option<usize>),
}

pub struct Bookmark {
    pub title: String,
    pub target: Target,
}

impl Bookmark {
    pub fn at(title: &str, page: usize) -> Self {
        Self::new(title, Target::Page(page))
    }

    pub fn raw_index(title: &str, index: i64) -> Self {
        Self::new(title, Target::RawIndex(index))
    }

    pub fn goto(title: &str, page: usize) -> Self {
        Self::new(title, Target::GoTo(page))
    }

    /// A named destination; `None` leaves the name undefined.
    pub fn named(title: &str, name: &str, page: Option<usize>) -> Self {
        Self::new(title, Target::Named(name.to_string(), page))
    }

    fn new(title: &str, target: Target) -> Self {
        Bookmark {
            title: title.to_string(),
            target,
        }
    }
}

/// Text drawn on page `index` of a fixture.
pub fn page_label(index: usize) -> String {
    format!("Page {}", index + 1)
}

/// Build a PDF with `page_count` pages and a flat outline.
///
/// The A4 media box lives on the page tree root and is inherited. Each page
/// gets `/Rotate` cycling through 0, 90, 180, 270 and a content stream
/// drawing [`page_label`].
pub fn build_pdf(page_count: usize, bookmarks: &[Bookmark]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(page_label(index))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Rotate" => ((index % 4) * 90) as i64,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !bookmarks.is_empty() {
        let (outlines_id, named) = add_outline(&mut doc, &page_ids, bookmarks);
        catalog.set("Outlines", outlines_id);
        catalog.set("PageMode", "UseOutlines");
        if !named.is_empty() {
            catalog.set("Names", dictionary! { "Dests" => dictionary! { "Names" => named } });
        }
    }
    if let Some(first) = page_ids.first() {
        catalog.set("OpenAction", vec![Object::Reference(*first), "Fit".into()]);
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Encrypt a fixture with RC4 128 (revision 3).
///
/// An empty `user_password` gives the common "owner password only" export
/// that opens without prompting.
pub fn encrypt_pdf(bytes: &[u8], owner_password: &str, user_password: &str) -> Vec<u8> {
    let mut doc = Document::load_mem(bytes).unwrap();
    let file_id = Object::String(b"dossiersplit-fixture".to_vec(), StringFormat::Literal);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password,
        user_password,
        key_length: 128,
        permissions: Permissions::default(),
    })
    .unwrap();
    doc.encrypt(&state).unwrap();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn add_outline(
    doc: &mut Document,
    page_ids: &[ObjectId],
    bookmarks: &[Bookmark],
) -> (ObjectId, Vec<Object>) {
    let outlines_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();
    let mut named = Vec::new();

    let fit = |page: usize| Object::Array(vec![Object::Reference(page_ids[page]), "Fit".into()]);

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => utf16_string(&bookmark.title),
            "Parent" => outlines_id,
        };
        match &bookmark.target {
            Target::Page(page) => item.set("Dest", fit(*page)),
            Target::RawIndex(index) => {
                item.set("Dest", vec![Object::Integer(*index), "Fit".into()])
            }
            Target::GoTo(page) => item.set("A", dictionary! { "S" => "GoTo", "D" => fit(*page) }),
            Target::Named(name, page) => {
                item.set("Dest", Object::string_literal(name.as_str()));
                if let Some(page) = page {
                    named.push(Object::string_literal(name.as_str()));
                    named.push(fit(*page));
                }
            }
        }
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", *next);
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let outlines: Dictionary = dictionary! {
        "Type" => "Outlines",
        "First" => item_ids[0],
        "Last" => item_ids[item_ids.len() - 1],
        "Count" => item_ids.len() as i64,
    };
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));
    (outlines_id, named)
}

fn utf16_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
