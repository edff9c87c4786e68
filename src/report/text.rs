use crate::model::error::AffinityError;
use crate::model::report::{CoupleReport, RandomBaseline};
use crate::report::{check_labels, format_columns, multiplier_1, multiplier_2, percent_0};

const HEADERS: [&str; 6] = [
    "Couple",
    "Median",
    "Dists",
    "Values",
    "Min, Median, Max",
    "Multipliers",
];
const RIGHT_ALIGNED: [bool; 6] = [false, true, false, false, false, false];

pub fn render_report_text(report: &CoupleReport, labels: &[String]) -> Result<String, AffinityError> {
    check_labels(report, labels)?;
    let agg = report.aggregate_columns;

    let mut out = String::new();
    out.push_str(&format!(
        "Mean individual stddev: {:.4}\n",
        report.mean_individual_stddev * 100.0
    ));
    out.push_str(&format!(
        "Average multipliers: {}\n",
        format_columns(&report.average_multipliers, agg, multiplier_2)
    ));
    if let Some(baseline) = &report.random_baseline {
        out.push_str(&baseline_line(baseline));
    }

    let mut rows = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let (values1, values2) = &report.user_values[i];
        let (mult1, mult2) = &report.user_multipliers[i];
        let (min1, min2) = report.minimum_values[i];
        let (med1, med2) = report.median_values[i];
        let (max1, max2) = report.maximum_values[i];
        rows.push([
            label.clone(),
            percent_0(report.median_distances[i]),
            format_columns(&report.all_distances[i], agg, percent_0),
            format!(
                "{}\n{}",
                format_columns(values1, agg, percent_0),
                format_columns(values2, agg, percent_0)
            ),
            format!("{}\n{}", range_cell(min1, med1, max1), range_cell(min2, med2, max2)),
            format!(
                "{}\n{}",
                format_columns(mult1, agg, multiplier_1),
                format_columns(mult2, agg, multiplier_1)
            ),
        ]);
    }
    out.push_str(&render_table(&rows));
    Ok(out)
}

fn baseline_line(baseline: &RandomBaseline) -> String {
    format!(
        "Random baseline ({} sets): distance delta {:.4} ({:.2}x), steps delta {:.2} ({:.2}x)\n",
        baseline.random_sets,
        baseline.absolute_distance_delta,
        baseline.relative_distance_delta,
        baseline.absolute_steps_delta,
        baseline.relative_steps_delta
    )
}

fn range_cell(min: f64, median: f64, max: f64) -> String {
    format!(
        "[{:<2.0} {:<2.0} {:<2.0}]",
        min * 100.0,
        median * 100.0,
        max * 100.0
    )
}

/// Plain fixed-width table; multi-line cells expand their row.
fn render_table(rows: &[[String; 6]]) -> String {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            for line in cell.lines() {
                widths[col] = widths[col].max(line.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    for row in rows {
        let cells = row.iter().map(|c| c.lines().collect::<Vec<_>>()).collect::<Vec<_>>();
        let height = cells.iter().map(Vec::len).max().unwrap_or(1);
        for line in 0..height {
            let parts = std::array::from_fn(|col| {
                cells[col].get(line).copied().unwrap_or("").to_string()
            });
            push_line(&mut out, &parts, &widths);
        }
    }
    out
}

fn push_line(out: &mut String, parts: &[String; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    for (col, part) in parts.iter().enumerate() {
        if col > 0 {
            line.push_str("  ");
        }
        let w = widths[col];
        if RIGHT_ALIGNED[col] {
            line.push_str(&format!("{part:>w$}"));
        } else {
            line.push_str(&format!("{part:<w$}"));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
