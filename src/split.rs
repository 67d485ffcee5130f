use crate::error::{ExtractError, LoadError, SplitError};
use crate::pdf::text::page_titles;
use crate::pdf::{OutputDocument, SourceDocument};
use crate::segment::{DocumentRange, SplitMode, Strategy};

/// Where a document will be cut, before anything is extracted.
#[derive(Debug, Clone)]
pub struct Plan {
    pub strategy: Strategy,
    pub ranges: Vec<DocumentRange>,
}

pub fn plan(source: &SourceDocument, mode: SplitMode) -> Result<Plan, LoadError> {
    let page_count = source.page_count();
    let strategy = match mode {
        SplitMode::Auto => Strategy::from_outline(page_count, source.outline()),
        SplitMode::Titles => Strategy::from_page_titles(&page_titles(&source.page_texts()?)),
        SplitMode::Single => Strategy::SingleRange,
    };
    let ranges = strategy.ranges(page_count);

    log::info!(
        "segmented {} pages into {} documents using {}",
        page_count,
        ranges.len(),
        strategy.name()
    );
    Ok(Plan { strategy, ranges })
}

/// Extract every range in order. The first failing range aborts the split.
pub fn extract_all(
    source: &SourceDocument,
    ranges: &[DocumentRange],
) -> Result<Vec<OutputDocument>, ExtractError> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, range)| source.extract(i + 1, range))
        .collect()
}

pub fn split(source: &SourceDocument, mode: SplitMode) -> Result<Vec<OutputDocument>, SplitError> {
    let plan = plan(source, mode)?;
    Ok(extract_all(source, &plan.ranges)?)
}
