use crate::segment::SplitMode;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dossiersplit")]
#[command(about = "Split a DossierFacile PDF export into one PDF per supporting document")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides it.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split the export into one PDF per supporting document
    Split {
        /// DossierFacile PDF to split
        path: PathBuf,

        /// Output directory, created if missing [default: <pdf>_extracted, or beside it with --zip]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// How to find where each document starts
        #[arg(short, long, value_enum, default_value_t = SplitMode::Auto)]
        mode: SplitMode,

        /// Password of an encrypted export
        #[arg(short, long)]
        password: Option<String>,

        /// Show the planned documents without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Bundle the documents into one <pdf>_extracted.zip instead
        #[arg(short, long)]
        zip: bool,
    },

    /// Print the bookmarks of the export
    #[command(alias = "toc")]
    Outline {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Print the title detected on each page
    #[command(hide = true)]
    Titles {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Run as MCP server over stdio
    Mcp,
}
