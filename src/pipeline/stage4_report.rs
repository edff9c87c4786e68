use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::error::AffinityError;
use crate::model::report::CoupleReport;
use crate::report::json::{CouplesRecord, render_report_json};
use crate::report::text::render_report_text;

pub const JSON_REPORT_NAME: &str = "couples_report.json";
pub const TEXT_REPORT_NAME: &str = "couples_report.txt";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Affinity(#[from] AffinityError),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Both renderings of one report, produced before anything touches disk.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub record: CouplesRecord,
    pub json: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub text: PathBuf,
}

pub fn render_reports(report: &CoupleReport, labels: &[String]) -> Result<RenderedReport, ReportError> {
    let record = CouplesRecord::new(report, labels)?;
    let json = render_report_json(&record)?;
    let text = render_report_text(report, labels)?;
    Ok(RenderedReport { record, json, text })
}

pub fn write_reports(rendered: &RenderedReport, out_dir: &Path) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let json_path = out_dir.join(JSON_REPORT_NAME);
    write_text(&json_path, &rendered.json)?;
    let text_path = out_dir.join(TEXT_REPORT_NAME);
    write_text(&text_path, &format!("{}\n", rendered.text.trim_end()))?;

    tracing::info!(
        json = %json_path.display(),
        text = %text_path.display(),
        "wrote couples report"
    );
    Ok(ReportPaths {
        json: json_path,
        text: text_path,
    })
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
