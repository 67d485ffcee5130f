use crate::commands::split::open;
use crate::pdf::outline::flatten_outline;
use crate::segment::outline_boundaries;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let source = open(path.as_ref(), None)?;
    let outline = source.outline();

    if outline.is_empty() {
        println!("No bookmarks found. The export would be kept as a single document.");
        return Ok(());
    }

    for entry in flatten_outline(outline) {
        let indent = "  ".repeat(entry.level as usize);
        let page_str = match entry.page {
            Some(p) if p >= 0 && (p as usize) < source.page_count() => format!(" (p. {})", p + 1),
            Some(p) => format!(" (invalid target {})", p),
            None => " (unresolved)".to_string(),
        };
        println!("{}{}{}", indent, entry.title, page_str);
    }

    let usable = outline_boundaries(source.page_count(), outline).len();
    println!(
        "\n{} of {} top-level bookmarks usable as document starts",
        usable,
        outline.len()
    );

    Ok(())
}
