use ndarray::{Array2, Array3, ArrayView1, ArrayView2, s};

use crate::model::error::AffinityError;

/// Summary columns prepended to every row: median first, mean second.
pub const AGGREGATE_COLUMNS: usize = 2;
pub const MEDIAN_COLUMN: usize = 0;
pub const MEAN_COLUMN: usize = 1;

/// Raw `num_users x num_samples` scores as produced by the scoring collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityMatrix {
    values: Array2<f64>,
}

impl IdentityMatrix {
    pub fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, AffinityError> {
        let num_samples = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * num_samples);
        for (user, row) in rows.iter().enumerate() {
            if row.len() != num_samples {
                return Err(AffinityError::invalid_input(format!(
                    "user {user} has {} samples, expected {num_samples}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        let values = Array2::from_shape_vec((rows.len(), num_samples), flat)
            .map_err(|e| AffinityError::invalid_input(e.to_string()))?;
        Ok(Self { values })
    }

    pub fn num_users(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_samples(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }
}

/// Identity scores with per-user aggregate columns in front of the raw samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    values: Array2<f64>,
    aggregate_columns: usize,
}

impl AugmentedMatrix {
    pub fn from_parts(values: Array2<f64>, aggregate_columns: usize) -> Result<Self, AffinityError> {
        if aggregate_columns > values.ncols() {
            return Err(AffinityError::invalid_input(format!(
                "{aggregate_columns} aggregate columns exceed {} total columns",
                values.ncols()
            )));
        }
        check_unit_range(values.view())?;
        Ok(Self {
            values,
            aggregate_columns,
        })
    }

    pub fn num_users(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn aggregate_columns(&self) -> usize {
        self.aggregate_columns
    }

    pub fn num_raw_columns(&self) -> usize {
        self.num_columns() - self.aggregate_columns
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn row(&self, user: usize) -> ArrayView1<'_, f64> {
        self.values.row(user)
    }

    pub fn raw_row(&self, user: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![user, self.aggregate_columns..])
    }

    pub fn get(&self, user: usize, column: usize) -> f64 {
        self.values[[user, column]]
    }
}

/// `num_users x num_users x num_columns` absolute differences, symmetric in the first two axes.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTensor {
    values: Array3<f64>,
}

impl DistanceTensor {
    pub(crate) fn from_array(values: Array3<f64>) -> Self {
        Self { values }
    }

    pub fn num_users(&self) -> usize {
        self.values.dim().0
    }

    pub fn num_columns(&self) -> usize {
        self.values.dim().2
    }

    pub fn get(&self, a: usize, b: usize, column: usize) -> f64 {
        self.values[[a, b, column]]
    }

    /// Distances from `user` to every member of the population in one column.
    pub fn lane(&self, user: usize, column: usize) -> ArrayView1<'_, f64> {
        self.values.slice(s![user, .., column])
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }
}

pub fn check_unit_range(values: ArrayView2<'_, f64>) -> Result<(), AffinityError> {
    for ((user, column), &v) in values.indexed_iter() {
        if !(0.0..=1.0).contains(&v) {
            return Err(AffinityError::invalid_input(format!(
                "value {v} at user {user}, column {column} is outside [0, 1]"
            )));
        }
    }
    Ok(())
}
