use crate::error::LoadError;

/// Title given to the first page of every export.
pub const COVER_PAGE_TITLE: &str = "Page de garde DossierFacile";

/// Title of a page whose text has no usable title line.
pub const UNKNOWN_TITLE: &str = "unknown";

// Export pages start with three header lines; the piece name comes next.
const TITLE_LINE: usize = 3;

/// Extract the text of every page, in page order.
///
/// The result always has `page_count` entries: pages the extractor did not
/// report come back empty.
pub fn extract_page_texts(pdf_bytes: &[u8], page_count: usize) -> Result<Vec<String>, LoadError> {
    let mut texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(LoadError::Text)?;

    if texts.len() != page_count {
        log::warn!(
            "text extraction returned {} pages, document has {}",
            texts.len(),
            page_count
        );
    }
    texts.resize(page_count, String::new());
    Ok(texts)
}

/// The title line of a page, or [`UNKNOWN_TITLE`].
pub fn page_title(text: &str) -> &str {
    text.split('\n')
        .nth(TITLE_LINE)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unwrap_or(UNKNOWN_TITLE)
}

/// Titles for every page. The first page is always the cover page.
pub fn page_titles(texts: &[String]) -> Vec<String> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            if index == 0 {
                COVER_PAGE_TITLE.to_string()
            } else {
                page_title(text).to_string()
            }
        })
        .collect()
}
