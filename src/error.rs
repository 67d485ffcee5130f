use std::path::PathBuf;

/// Failure to turn input bytes into a usable [`SourceDocument`](crate::pdf::SourceDocument).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read PDF: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a well-formed PDF: {0}")]
    Malformed(#[source] lopdf::Error),

    #[error("PDF is encrypted and no password was given (try --password)")]
    Encrypted,

    #[error("PDF is encrypted and could not be decrypted with the given password")]
    Decrypt(#[source] lopdf::Error),

    #[error("PDF needs a user password and its pages could not be decrypted")]
    Locked,

    #[error("PDF contains no pages")]
    Empty,

    #[error("Failed to extract page text")]
    Text(#[source] pdf_extract::OutputError),
}

/// Failure while copying one page range into its own document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Page range {start}..{end} is outside the document ({page_count} pages)")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        page_count: usize,
    },

    #[error("Page tree of document {index} has {actual} pages, expected {expected}")]
    PageCountMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to serialize document {index}")]
    Serialize {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a whole split operation.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
