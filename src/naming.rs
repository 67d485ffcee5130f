use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

const MAX_SLUG_LEN: usize = 80;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\-\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// File-name-safe form of a title: accents folded, lowercase, words joined
/// with `-`.
pub fn slugify(title: &str) -> String {
    let ascii: String = title
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase();
    let cleaned = UNSAFE_CHARS.replace_all(&ascii, "");
    let dashed = WHITESPACE.replace_all(&cleaned, "-");
    let mut slug = dashed.trim_matches('-').to_string();

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug.truncate(slug.trim_end_matches('-').len());
    }
    if slug.is_empty() {
        slug.push_str("document");
    }
    slug
}

/// `<stem>_<NN>.pdf`, or `<stem>_<NN>-<slug>.pdf` for titled documents.
pub fn output_file_name(stem: &str, index: usize, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{}_{:02}-{}.pdf", stem, index, slugify(title)),
        None => format!("{}_{:02}.pdf", stem, index),
    }
}

pub fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("dossier")
}

/// `<parent>/<stem>_extracted`, next to the source file.
pub fn default_output_dir(source: &Path) -> PathBuf {
    let parent = source.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}_extracted", file_stem(source)))
}

/// Directory of the source file, where its archive goes by default.
pub fn default_archive_dir(source: &Path) -> PathBuf {
    source.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// `<slug>_extracted.zip` for an archive holding the split of `stem`.
pub fn archive_file_name(stem: &str) -> String {
    format!("{}.zip", slugify(&format!("{}_extracted", stem)))
}
