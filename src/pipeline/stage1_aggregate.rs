use ndarray::{Array2, s};

use crate::model::error::AffinityError;
use crate::model::matrix::{
    AGGREGATE_COLUMNS, AugmentedMatrix, IdentityMatrix, MEAN_COLUMN, MEDIAN_COLUMN,
    check_unit_range,
};
use crate::report::{mean, median};

/// Prepends each user's median and mean to their raw samples.
pub fn run_stage1(identity: &IdentityMatrix) -> Result<AugmentedMatrix, AffinityError> {
    let num_users = identity.num_users();
    let num_samples = identity.num_samples();
    if num_samples < 1 {
        return Err(AffinityError::invalid_input(format!(
            "at least one sample per user is required, got {num_samples}"
        )));
    }
    check_unit_range(identity.values())?;

    let mut out = Array2::<f64>::zeros((num_users, num_samples + AGGREGATE_COLUMNS));
    for (user, row) in identity.values().outer_iter().enumerate() {
        let samples = row.to_vec();
        out[[user, MEDIAN_COLUMN]] = median(&samples);
        out[[user, MEAN_COLUMN]] = mean(&samples);
        out.slice_mut(s![user, AGGREGATE_COLUMNS..]).assign(&row);
    }

    tracing::debug!(
        num_users,
        num_samples,
        num_columns = num_samples + AGGREGATE_COLUMNS,
        "aggregated identity scores"
    );
    AugmentedMatrix::from_parts(out, AGGREGATE_COLUMNS)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_aggregate.rs"]
mod tests;
