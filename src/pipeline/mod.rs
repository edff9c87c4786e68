pub mod stage1_aggregate;
pub mod stage2_distances;
pub mod stage3_montecarlo;
pub mod stage3_rank;
pub mod stage4_report;

use crate::model::couples::CoupleIndex;
use crate::model::matrix::IdentityMatrix;
use crate::model::report::CoupleReport;
use stage1_aggregate::run_stage1;
use stage3_rank::{RankingStrategy, run_stage3};
use stage4_report::{RenderedReport, ReportError, render_reports};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisParams {
    pub strategy: RankingStrategy,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub report: CoupleReport,
    pub rendered: RenderedReport,
}

/// Aggregates, ranks and renders in one pass; fails before producing any output.
pub fn run_analysis(
    identity: &IdentityMatrix,
    couples: &[CoupleIndex],
    labels: &[String],
    params: &AnalysisParams,
) -> Result<AnalysisOutput, ReportError> {
    let augmented = run_stage1(identity)?;
    let report = run_stage3(&augmented, couples, params.strategy)?;
    let rendered = render_reports(&report, labels)?;
    Ok(AnalysisOutput { report, rendered })
}
