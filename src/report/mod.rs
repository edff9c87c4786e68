pub mod json;
pub mod text;

use std::cmp::Ordering;

use crate::model::error::AffinityError;
use crate::model::report::CoupleReport;

/// Median with the two middle values averaged for even lengths; 0.0 when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (no Bessel correction).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

pub fn min_max(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if values.is_empty() { (0.0, 0.0) } else { (lo, hi) }
}

pub fn percent_0(v: f64) -> String {
    format!("{:2.0}", v * 100.0)
}

pub fn multiplier_1(v: f64) -> String {
    format!("{:3.1}", v)
}

pub fn multiplier_2(v: f64) -> String {
    format!("{:3.2}", v)
}

/// `[agg agg|raw raw ...]` with aggregate columns split from raw samples.
pub fn format_columns(values: &[f64], aggregate_columns: usize, fmt: impl Fn(f64) -> String) -> String {
    let split = aggregate_columns.min(values.len());
    let head = values[..split].iter().map(|&v| fmt(v)).collect::<Vec<_>>();
    let tail = values[split..].iter().map(|&v| fmt(v)).collect::<Vec<_>>();
    format!("[{}|{}]", head.join(" "), tail.join(" "))
}

/// Labels must line up one-to-one with the report's couples.
pub fn check_labels(report: &CoupleReport, labels: &[String]) -> Result<(), AffinityError> {
    report.validate()?;
    if labels.len() != report.num_couples() {
        return Err(AffinityError::invalid_input(format!(
            "{} couple labels for {} couples",
            labels.len(),
            report.num_couples()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
