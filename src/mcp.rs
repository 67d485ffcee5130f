use anyhow::Result;
use clap::ValueEnum;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::commands::split::{open, write_split, write_zip, WrittenFile};
use crate::naming::{default_archive_dir, default_output_dir, file_stem, output_file_name};
use crate::pdf::outline::flatten_outline;
use crate::segment::SplitMode;
use crate::split::plan;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the DossierFacile PDF export")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanRequest {
    #[schemars(description = "Path to the DossierFacile PDF export")]
    pub path: String,
    #[schemars(description = "Split mode: 'auto' (bookmarks, default), 'titles' (page title lines) or 'single'")]
    pub mode: Option<String>,
    #[schemars(description = "Password of an encrypted export")]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRequest {
    #[schemars(description = "Path to the DossierFacile PDF export")]
    pub path: String,
    #[schemars(description = "Directory for the split files (default: <pdf>_extracted next to the export)")]
    pub output_dir: Option<String>,
    #[schemars(description = "Split mode: 'auto' (bookmarks, default), 'titles' (page title lines) or 'single'")]
    pub mode: Option<String>,
    #[schemars(description = "Password of an encrypted export")]
    pub password: Option<String>,
    #[schemars(description = "Bundle the documents into one <pdf>_extracted.zip instead of separate files")]
    pub zip: Option<bool>,
}

fn parse_mode(mode: Option<&str>) -> Result<SplitMode, String> {
    match mode {
        Some(mode) => SplitMode::from_str(mode, true),
        None => Ok(SplitMode::Auto),
    }
}

#[derive(Debug, Clone)]
pub struct DossierServer {
    tool_router: ToolRouter<Self>,
}

impl DossierServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for DossierServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl DossierServer {
    #[tool(description = "List the bookmarks of a DossierFacile export. Pages are 1-indexed.")]
    fn dossier_outline(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        let source = match open(Path::new(&path), None) {
            Ok(s) => s,
            Err(e) => return format!("Error: {:#}", e),
        };
        let result: Vec<OutlineEntryResult> = flatten_outline(source.outline())
            .into_iter()
            .map(|e| OutlineEntryResult {
                title: e.title.clone(),
                page: e.page.map(|p| p + 1),
                level: e.level,
            })
            .collect();
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Show how a DossierFacile export would be split, without writing files")]
    fn dossier_plan(&self, Parameters(req): Parameters<PlanRequest>) -> String {
        let mode = match parse_mode(req.mode.as_deref()) {
            Ok(m) => m,
            Err(e) => return format!("Error: {}", e),
        };
        let source = match open(Path::new(&req.path), req.password) {
            Ok(s) => s,
            Err(e) => return format!("Error: {:#}", e),
        };
        let plan = match plan(&source, mode) {
            Ok(p) => p,
            Err(e) => return format!("Error: {}", e),
        };

        let stem = file_stem(Path::new(&req.path));
        let documents = plan
            .ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| PlannedDocumentResult {
                index: i + 1,
                pages: range.display_pages(),
                page_count: range.len(),
                file_name: output_file_name(stem, i + 1, range.title.as_deref()),
                title: range.title,
            })
            .collect();

        let result = PlanResult {
            page_count: source.page_count(),
            strategy: plan.strategy.name().to_string(),
            documents,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Split a DossierFacile export into one PDF per supporting document and write them to a directory or a ZIP archive")]
    fn dossier_split(&self, Parameters(req): Parameters<SplitRequest>) -> String {
        let mode = match parse_mode(req.mode.as_deref()) {
            Ok(m) => m,
            Err(e) => return format!("Error: {}", e),
        };
        let input = Path::new(&req.path);
        let source = match open(input, req.password) {
            Ok(s) => s,
            Err(e) => return format!("Error: {:#}", e),
        };

        let stem = file_stem(input);
        let json = if req.zip.unwrap_or(false) {
            let output_dir = req
                .output_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| default_archive_dir(input));
            write_zip(&source, stem, &output_dir, mode).map(|archive| {
                serde_json::to_string_pretty(&ArchiveResult {
                    archive_path: archive.path.display().to_string(),
                    entries: archive.entries.into_iter().map(file_result).collect(),
                })
            })
        } else {
            let output_dir = req
                .output_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| default_output_dir(input));
            write_split(&source, stem, &output_dir, mode).map(|written| {
                let result: Vec<WrittenFileResult> = written.into_iter().map(file_result).collect();
                serde_json::to_string_pretty(&result)
            })
        };

        match json {
            Ok(Ok(json)) => json,
            Ok(Err(e)) => format!("Error: {}", e),
            Err(e) => format!("Error: {:#}", e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OutlineEntryResult {
    pub title: String,
    pub page: Option<i64>,
    pub level: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlannedDocumentResult {
    pub index: usize,
    pub pages: String,
    pub page_count: usize,
    pub title: Option<String>,
    pub file_name: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PlanResult {
    pub page_count: usize,
    pub strategy: String,
    pub documents: Vec<PlannedDocumentResult>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WrittenFileResult {
    pub output_path: String,
    pub pages: String,
    pub page_count: usize,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ArchiveResult {
    pub archive_path: String,
    /// Documents in archive order; `output_path` is the entry name.
    pub entries: Vec<WrittenFileResult>,
}

fn file_result(file: WrittenFile) -> WrittenFileResult {
    WrittenFileResult {
        output_path: file.path.display().to_string(),
        pages: file.pages,
        page_count: file.page_count,
    }
}

#[tool_handler]
impl ServerHandler for DossierServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Split DossierFacile PDF exports into one PDF per supporting document. Use \
                 dossier_outline to list bookmarks, dossier_plan to preview the split, and \
                 dossier_split to write the files."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = DossierServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
