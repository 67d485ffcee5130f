use crate::archive::build_zip;
use crate::naming::{
    archive_file_name, default_archive_dir, default_output_dir, file_stem, output_file_name,
};
use crate::pdf::{LoadOptions, OutputDocument, SourceDocument};
use crate::segment::SplitMode;
use crate::split::{plan, split};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct SplitOptions {
    pub output_dir: Option<PathBuf>,
    pub mode: SplitMode,
    pub password: Option<String>,
    pub dry_run: bool,
    /// Write one ZIP archive instead of a directory of PDFs.
    pub zip: bool,
}

/// A file written by [`run`]. Inside an archive, `path` is the entry name.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub pages: String,
    pub page_count: usize,
}

/// A ZIP archive written by [`write_zip`].
#[derive(Debug, Clone)]
pub struct WrittenArchive {
    pub path: PathBuf,
    pub entries: Vec<WrittenFile>,
}

pub fn run<P: AsRef<Path>>(input: P, options: &SplitOptions) -> Result<()> {
    let input = input.as_ref();
    let stem = file_stem(input);
    let output_dir = match (&options.output_dir, options.zip) {
        (Some(dir), _) => dir.clone(),
        (None, false) => default_output_dir(input),
        (None, true) => default_archive_dir(input),
    };
    let destination = if options.zip {
        output_dir.join(archive_file_name(stem))
    } else {
        output_dir.clone()
    };

    println!("Reading {}", input.display());
    let source = open(input, options.password.clone())?;
    println!("Pages: {}", source.page_count());

    if options.dry_run {
        let plan = plan(&source, options.mode)?;
        println!("Strategy: {}", plan.strategy.name());
        for (i, range) in plan.ranges.iter().enumerate() {
            println!(
                "  {:>2}. pages {} ({} page(s)){}",
                i + 1,
                range.display_pages(),
                range.len(),
                range.title.as_deref().map(|t| format!("  {}", t)).unwrap_or_default()
            );
        }
        println!("Would write {} file(s) to {}", plan.ranges.len(), destination.display());
        return Ok(());
    }

    let written = if options.zip {
        write_zip(&source, stem, &output_dir, options.mode)?.entries
    } else {
        write_split(&source, stem, &output_dir, options.mode)?
    };
    for file in &written {
        println!(
            "Created {} (pages {}, {} page(s))",
            file.path.file_name().unwrap_or_default().to_string_lossy(),
            file.pages,
            file.page_count
        );
    }
    println!("Split into {} file(s) in {}", written.len(), destination.display());

    Ok(())
}

pub fn open(input: &Path, password: Option<String>) -> Result<SourceDocument> {
    SourceDocument::open(input, &LoadOptions { password })
        .with_context(|| format!("Failed to open PDF: {}", input.display()))
}

/// Split `source` and write every document into `output_dir`.
pub fn write_split(
    source: &SourceDocument,
    stem: &str,
    output_dir: &Path,
    mode: SplitMode,
) -> Result<Vec<WrittenFile>> {
    let outputs = named_outputs(source, stem, mode)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(outputs.len());
    for (name, output) in outputs {
        let path = output_dir.join(name);
        std::fs::write(&path, &output.bytes)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
        written.push(written_file(path, &output));
    }

    Ok(written)
}

/// Split `source` and bundle every document into `<stem>_extracted.zip`
/// inside `output_dir`.
pub fn write_zip(
    source: &SourceDocument,
    stem: &str,
    output_dir: &Path,
    mode: SplitMode,
) -> Result<WrittenArchive> {
    let outputs = named_outputs(source, stem, mode)?;
    let bytes = build_zip(
        outputs
            .iter()
            .map(|(name, output)| (name.as_str(), output.bytes.as_slice())),
    )
    .context("Failed to build ZIP archive")?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    let path = output_dir.join(archive_file_name(stem));
    std::fs::write(&path, &bytes)
        .with_context(|| format!("Failed to save archive: {}", path.display()))?;
    log::info!("wrote {} documents to {}", outputs.len(), path.display());

    let entries = outputs
        .iter()
        .map(|(name, output)| written_file(PathBuf::from(name), output))
        .collect();
    Ok(WrittenArchive { path, entries })
}

fn named_outputs(
    source: &SourceDocument,
    stem: &str,
    mode: SplitMode,
) -> Result<Vec<(String, OutputDocument)>> {
    let outputs = split(source, mode)?;
    Ok(outputs
        .into_iter()
        .map(|output| (output_file_name(stem, output.index, output.title()), output))
        .collect())
}

fn written_file(path: PathBuf, output: &OutputDocument) -> WrittenFile {
    WrittenFile {
        path,
        pages: output.range.display_pages(),
        page_count: output.page_count(),
    }
}
