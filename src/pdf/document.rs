use crate::error::{ExtractError, LoadError};
use crate::pdf::outline::{read_outline, OutlineEntry};
use crate::pdf::text::extract_page_texts;
use crate::segment::DocumentRange;
use lopdf::{Document, Object, ObjectId};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Password for encrypted exports.
    pub password: Option<String>,
}

/// A loaded PDF, ready to be segmented and split.
pub struct SourceDocument {
    doc: Document,
    // Bytes handed to the text extractor. Decrypted copy when a password was used.
    text_source: Vec<u8>,
    page_ids: Vec<ObjectId>,
    outline: Vec<OutlineEntry>,
}

/// One page of a [`SourceDocument`].
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub index: usize,
    pub id: ObjectId,
    doc: &'a Document,
}

impl Page<'_> {
    /// Decoded content stream of the page.
    #[allow(dead_code)]
    pub fn content(&self) -> lopdf::Result<Vec<u8>> {
        self.doc.get_page_content(self.id)
    }
}

impl SourceDocument {
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, options)
    }

    pub fn from_bytes(bytes: Vec<u8>, options: &LoadOptions) -> Result<Self, LoadError> {
        let mut doc = Document::load_mem(&bytes).map_err(|e| {
            let message = e.to_string().to_lowercase();
            if message.contains("encrypt") || message.contains("password") {
                LoadError::Encrypted
            } else {
                LoadError::Malformed(e)
            }
        })?;

        let mut text_source = bytes;
        if doc.is_encrypted() {
            unlock(&mut doc, options.password.as_deref())?;
            match write_bytes(&mut doc) {
                Ok(plain) => text_source = plain,
                Err(e) => log::warn!("could not re-serialize decrypted PDF for text: {}", e),
            }
        }

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(LoadError::Empty);
        }

        let outline = read_outline(&doc);
        log::info!(
            "loaded PDF with {} pages and {} top-level bookmarks",
            page_ids.len(),
            outline.len()
        );

        Ok(SourceDocument {
            doc,
            text_source,
            page_ids,
            outline,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn pages(&self) -> impl Iterator<Item = Page<'_>> + '_ {
        self.page_ids.iter().enumerate().map(|(index, &id)| Page {
            index,
            id,
            doc: &self.doc,
        })
    }

    /// Top-level bookmarks with their nested children.
    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    /// Text of every page, in page order.
    pub fn page_texts(&self) -> Result<Vec<String>, LoadError> {
        extract_page_texts(&self.text_source, self.page_count())
    }

    /// Copy the pages of `range` into a standalone PDF.
    ///
    /// `index` is the 1-based position of the output in the split.
    pub fn extract(
        &self,
        index: usize,
        range: &DocumentRange,
    ) -> Result<OutputDocument, ExtractError> {
        let page_count = self.page_count();
        if range.start >= range.end || range.end > page_count {
            return Err(ExtractError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                page_count,
            });
        }

        // Deleting from a copy keeps the page tree, so inherited
        // /MediaBox, /Rotate and /Resources still apply to the kept pages.
        let mut doc = self.doc.clone();
        let unwanted: Vec<u32> = self
            .pages()
            .filter(|page| !range.contains(page.index))
            .map(|page| page.index as u32 + 1)
            .collect();
        if !unwanted.is_empty() {
            doc.delete_pages(&unwanted);
        }

        // Bookmarks and the open action point into other documents.
        if let Ok(root) = doc.trailer.get(b"Root").and_then(Object::as_reference) {
            if let Ok(catalog) = doc.get_dictionary_mut(root) {
                catalog.remove(b"Outlines");
                catalog.remove(b"OpenAction");
                catalog.remove(b"PageMode");
            }
        }
        doc.prune_objects();

        let actual = doc.get_pages().len();
        if actual != range.len() {
            return Err(ExtractError::PageCountMismatch {
                index,
                expected: range.len(),
                actual,
            });
        }

        let bytes =
            write_bytes(&mut doc).map_err(|source| ExtractError::Serialize { index, source })?;
        log::debug!(
            "extracted document {} (pages {}, {} bytes)",
            index,
            range.display_pages(),
            bytes.len()
        );

        Ok(OutputDocument {
            index,
            range: range.clone(),
            bytes,
        })
    }
}

/// A standalone PDF holding one supporting document.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    /// 1-based position in the split.
    pub index: usize,
    pub range: DocumentRange,
    pub bytes: Vec<u8>,
}

impl OutputDocument {
    pub fn page_count(&self) -> usize {
        self.range.len()
    }

    pub fn title(&self) -> Option<&str> {
        self.range.title.as_deref()
    }
}

/// Leave an encrypted document readable in the clear.
///
/// The reader decrypts documents whose user password is empty while loading
/// and records `encryption_state`. Those objects are already plain and must
/// not go through `decrypt` again.
fn unlock(doc: &mut Document, password: Option<&str>) -> Result<(), LoadError> {
    if doc.encryption_state.is_some() {
        if password.is_some() {
            log::debug!("PDF opens with an empty user password, ignoring the given password");
        }
        if let Some(Object::Reference(id)) = doc.trailer.remove(b"Encrypt") {
            doc.objects.remove(&id);
        }
        return Ok(());
    }

    let password = password.ok_or(LoadError::Encrypted)?;
    doc.decrypt(password).map_err(LoadError::Decrypt)?;
    // The reader skips every object it cannot decrypt with the empty password,
    // so a correct password can still leave no page tree behind.
    if doc.get_pages().is_empty() {
        return Err(LoadError::Locked);
    }
    Ok(())
}

fn write_bytes(doc: &mut Document) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).map_err(|e| io::Error::other(e.to_string()))?;
    Ok(buf)
}
