use ndarray::Axis;

use crate::model::matrix::{AugmentedMatrix, DistanceTensor};

/// `|m[a, c] - m[b, c]|` for every user pair and column.
pub fn run_stage2(matrix: &AugmentedMatrix) -> DistanceTensor {
    let values = matrix.values();
    let rows = values.insert_axis(Axis(1));
    let cols = values.insert_axis(Axis(0));
    let dists = (&rows - &cols).mapv_into(f64::abs);

    tracing::debug!(
        num_users = matrix.num_users(),
        num_columns = matrix.num_columns(),
        "built distance tensor"
    );
    DistanceTensor::from_array(dists)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_distances.rs"]
mod tests;
