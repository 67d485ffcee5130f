use crate::commands::split::open;
use crate::pdf::text::page_titles;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let source = open(path.as_ref(), None)?;
    let total = source.page_count();
    let titles = page_titles(&source.page_texts()?);

    println!("Pages: {}\n", total);
    for (i, title) in titles.iter().enumerate() {
        println!("--- Page {}/{} ---", i + 1, total);
        println!("{}", title);
    }

    Ok(())
}
