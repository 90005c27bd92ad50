//! Output directory with a record of every file written

use crate::report::ReportDocument;
use crate::{Error, Result};
use chartflow_aggregate::SummaryResult;
use chartflow_core::Table;
use chartflow_render::RenderedImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File name of the artifact manifest
pub const MANIFEST: &str = "manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Csv,
    Png,
    Html,
    Markdown,
    Json,
}

/// One written file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub kind: ArtifactKind,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Html,
    Markdown,
}

#[derive(Serialize)]
struct Manifest<'a> {
    run: Option<&'a str>,
    artifacts: &'a [Artifact],
}

/// Directory all artifacts of one run are written into
#[derive(Debug)]
pub struct OutputDir {
    root: PathBuf,
    artifacts: Vec<Artifact>,
}

impl OutputDir {
    /// Create the directory tree if needed
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        debug!(path = %root.display(), "output directory ready");
        Ok(Self {
            root,
            artifacts: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative artifact path
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Everything written so far, in write order
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Write raw bytes, creating parent directories; existing files are replaced
    pub fn write_bytes(&mut self, relative: &str, bytes: &[u8], kind: ArtifactKind) -> Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| Error::io(&path, e))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote {relative}");

        let record = Artifact {
            path: relative.replace('\\', "/"),
            kind,
            bytes: bytes.len() as u64,
        };
        // rewriting a path replaces its record
        match self.artifacts.iter_mut().find(|a| a.path == record.path) {
            Some(existing) => *existing = record,
            None => self.artifacts.push(record),
        }
        Ok(path)
    }

    /// Table with header in schema order, numbers at their declared precision
    #[instrument(skip(self, table), level = "debug")]
    pub fn write_table_csv(&mut self, relative: &str, table: &Table) -> Result<PathBuf> {
        let bytes = table.to_csv_bytes()?;
        self.write_bytes(relative, &bytes, ArtifactKind::Csv)
    }

    /// Summary at its fixed precision
    #[instrument(skip(self, summary), fields(kind = summary.kind()), level = "debug")]
    pub fn write_summary_csv(&mut self, relative: &str, summary: &SummaryResult) -> Result<PathBuf> {
        let table = summary.to_table()?;
        self.write_table_csv(relative, &table)
    }

    pub fn write_png(&mut self, relative: &str, image: &RenderedImage) -> Result<PathBuf> {
        let png = image.to_png()?;
        self.write_bytes(relative, &png, ArtifactKind::Png)
    }

    pub fn write_report(&mut self, relative: &str, report: &ReportDocument, format: ReportFormat) -> Result<PathBuf> {
        match format {
            ReportFormat::Html => self.write_bytes(relative, report.to_html().as_bytes(), ArtifactKind::Html),
            ReportFormat::Markdown => {
                self.write_bytes(relative, report.to_markdown().as_bytes(), ArtifactKind::Markdown)
            }
        }
    }

    /// Text written as-is, e.g. a rendered template
    pub fn write_text(&mut self, relative: &str, text: &str, kind: ArtifactKind) -> Result<PathBuf> {
        self.write_bytes(relative, text.as_bytes(), kind)
    }

    /// Pretty `manifest.json` listing every artifact written before it
    pub fn write_manifest(&mut self, run: Option<&str>) -> Result<PathBuf> {
        let manifest = Manifest {
            run,
            artifacts: &self.artifacts,
        };
        let json = serde_json::to_vec_pretty(&manifest)?;
        let path = self.write_bytes(MANIFEST, &json, ArtifactKind::Json)?;
        for artifact in &self.artifacts {
            info!("  {} ({} bytes)", artifact.path, artifact.bytes);
        }
        Ok(path)
    }
}
