use serde::{Deserialize, Serialize};

use crate::model::error::AffinityError;
use crate::model::report::CoupleReport;
use crate::report::check_labels;

/// Serialized form of a report: couple labels alongside the report fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplesRecord {
    pub couple_labels: Vec<String>,
    pub report: CoupleReport,
}

impl CouplesRecord {
    pub fn new(report: &CoupleReport, labels: &[String]) -> Result<Self, AffinityError> {
        check_labels(report, labels)?;
        Ok(Self {
            couple_labels: labels.to_vec(),
            report: report.clone(),
        })
    }
}

pub fn render_report_json(record: &CouplesRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

pub fn parse_report_json(json: &str) -> Result<CouplesRecord, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
