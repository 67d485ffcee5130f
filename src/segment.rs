use crate::pdf::OutlineEntry;

/// First page of a supporting document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub page: usize,
    pub title: Option<String>,
}

/// Half-open page interval `[start, end)` holding one supporting document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRange {
    pub start: usize,
    pub end: usize,
    pub title: Option<String>,
}

impl DocumentRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn contains(&self, page: usize) -> bool {
        (self.start..self.end).contains(&page)
    }

    /// 1-based inclusive page span, as shown to users ("5-9", "3").
    pub fn display_pages(&self) -> String {
        if self.len() == 1 {
            format!("{}", self.start + 1)
        } else {
            format!("{}-{}", self.start + 1, self.end)
        }
    }
}

/// How the caller wants the document cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SplitMode {
    /// One document per bookmark, or the whole file when there are none
    #[default]
    Auto,
    /// Group consecutive pages that share the same title line
    Titles,
    /// Keep the whole file as one document
    Single,
}

/// The segmentation actually applied to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    OutlineDriven(Vec<Boundary>),
    PageTitles(Vec<Boundary>),
    SingleRange,
}

impl Strategy {
    /// Use the outline when at least one entry points inside the document.
    pub fn from_outline(page_count: usize, outline: &[OutlineEntry]) -> Self {
        let boundaries = outline_boundaries(page_count, outline);
        if boundaries.is_empty() {
            Strategy::SingleRange
        } else {
            Strategy::OutlineDriven(boundaries)
        }
    }

    /// Cut wherever a page's title differs from the previous page's.
    pub fn from_page_titles(titles: &[String]) -> Self {
        let mut boundaries: Vec<Boundary> = Vec::new();
        for (page, title) in titles.iter().enumerate() {
            let same = boundaries
                .last()
                .is_some_and(|b| b.title.as_deref() == Some(title.as_str()));
            if !same {
                boundaries.push(Boundary {
                    page,
                    title: Some(title.clone()),
                });
            }
        }

        if boundaries.is_empty() {
            Strategy::SingleRange
        } else {
            Strategy::PageTitles(boundaries)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::OutlineDriven(_) => "outline",
            Strategy::PageTitles(_) => "page titles",
            Strategy::SingleRange => "single range",
        }
    }

    /// Ranges covering `[0, page_count)` in order.
    pub fn ranges(&self, page_count: usize) -> Vec<DocumentRange> {
        match self {
            Strategy::OutlineDriven(boundaries) | Strategy::PageTitles(boundaries) => {
                ranges_from_boundaries(page_count, boundaries.clone())
            }
            Strategy::SingleRange => ranges_from_boundaries(page_count, Vec::new()),
        }
    }
}

/// Valid top-level outline targets, in outline order. Entries that are
/// unresolved or fall outside `[0, page_count)` are dropped.
pub fn outline_boundaries(page_count: usize, outline: &[OutlineEntry]) -> Vec<Boundary> {
    outline
        .iter()
        .filter_map(|entry| {
            let page = entry
                .page
                .and_then(|p| usize::try_from(p).ok())
                .filter(|&p| p < page_count);
            if page.is_none() {
                log::debug!(
                    "discarding bookmark {:?}: target {:?} outside 0..{}",
                    entry.title,
                    entry.page,
                    page_count
                );
            }
            page.map(|page| Boundary {
                page,
                title: Some(entry.title.clone()),
            })
        })
        .collect()
}

/// Turn boundaries into a partition of `[0, page_count)`.
///
/// Boundaries are sorted, duplicates collapse onto the first one seen,
/// out-of-range pages are dropped and an untitled boundary at page 0 is
/// added when missing.
pub fn ranges_from_boundaries(
    page_count: usize,
    mut boundaries: Vec<Boundary>,
) -> Vec<DocumentRange> {
    if page_count == 0 {
        return Vec::new();
    }

    boundaries.retain(|b| b.page < page_count);
    boundaries.sort_by_key(|b| b.page);
    boundaries.dedup_by_key(|b| b.page);
    if boundaries.first().map(|b| b.page) != Some(0) {
        boundaries.insert(0, Boundary { page: 0, title: None });
    }

    let ends = boundaries
        .iter()
        .skip(1)
        .map(|b| b.page)
        .chain(std::iter::once(page_count));

    boundaries
        .iter()
        .zip(ends)
        .map(|(b, end)| DocumentRange {
            start: b.page,
            end,
            title: b.title.clone(),
        })
        .collect()
}
