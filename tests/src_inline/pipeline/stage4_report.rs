use super::*;
use crate::model::couples::CoupleIndex;
use crate::model::matrix::IdentityMatrix;
use crate::model::report::StrategyKind;
use crate::pipeline::{AnalysisParams, run_analysis};
use crate::report::json::parse_report_json;
use ndarray::array;

fn labels() -> Vec<String> {
    vec!["c1".to_string(), "c2".to_string()]
}

fn rendered() -> RenderedReport {
    let identity = IdentityMatrix::new(array![[0.1, 0.2], [0.9, 0.8], [0.15, 0.25], [0.85, 0.7]]);
    let couples = vec![CoupleIndex::new(0, 2), CoupleIndex::new(1, 3)];
    run_analysis(&identity, &couples, &labels(), &AnalysisParams::default())
        .unwrap()
        .rendered
}

#[test]
fn test_write_reports_creates_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("run");
    let paths = write_reports(&rendered(), &out).unwrap();

    assert_eq!(paths.json, out.join(JSON_REPORT_NAME));
    assert_eq!(paths.text, out.join(TEXT_REPORT_NAME));

    let json = std::fs::read_to_string(&paths.json).unwrap();
    let record = parse_report_json(&json).unwrap();
    assert_eq!(record.couple_labels, labels());
    assert_eq!(record.report.strategy, StrategyKind::Exact);

    let text = std::fs::read_to_string(&paths.text).unwrap();
    assert!(text.starts_with("Mean individual stddev:"));
    assert!(text.ends_with('\n'));
    assert!(!text.ends_with("\n\n"));
}

#[test]
fn test_render_rejects_label_mismatch() {
    let identity = IdentityMatrix::new(array![[0.1], [0.9], [0.15], [0.85]]);
    let couples = vec![CoupleIndex::new(0, 2)];
    let err = run_analysis(&identity, &couples, &labels(), &AnalysisParams::default()).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Affinity(AffinityError::InvalidInput { .. })
    ));
}

#[test]
fn test_invalid_scores_abort_before_rendering() {
    let identity = IdentityMatrix::new(array![[0.1], [1.5], [0.15], [0.85]]);
    let couples = vec![CoupleIndex::new(0, 2), CoupleIndex::new(1, 3)];
    let err = run_analysis(&identity, &couples, &labels(), &AnalysisParams::default()).unwrap_err();
    assert!(err.to_string().contains("1.5"));
}

#[test]
fn test_write_into_file_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let err = write_reports(&rendered(), &blocker).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}
