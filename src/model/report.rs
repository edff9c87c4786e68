use serde::{Deserialize, Serialize};

use crate::model::error::AffinityError;

/// One value per couple member, first member first.
pub type SidePair<T> = (T, T);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Exact,
    MonteCarlo,
}

/// Real couples compared with randomly resampled couples, averaged over raw-sample columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomBaseline {
    pub random_sets: usize,
    pub absolute_distance_delta: f64,
    pub relative_distance_delta: f64,
    pub absolute_steps_delta: f64,
    pub relative_steps_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleReport {
    pub strategy: StrategyKind,
    pub num_users: usize,
    pub aggregate_columns: usize,
    pub mean_individual_stddev: f64,
    pub average_multipliers: Vec<f64>,
    pub median_distances: Vec<f64>,
    pub all_distances: Vec<Vec<f64>>,
    pub user_values: Vec<SidePair<Vec<f64>>>,
    pub minimum_values: Vec<SidePair<f64>>,
    pub median_values: Vec<SidePair<f64>>,
    pub maximum_values: Vec<SidePair<f64>>,
    pub user_steps: Vec<SidePair<Vec<f64>>>,
    pub user_multipliers: Vec<SidePair<Vec<f64>>>,
    pub random_baseline: Option<RandomBaseline>,
}

impl CoupleReport {
    pub fn empty(strategy: StrategyKind, num_users: usize, aggregate_columns: usize) -> Self {
        Self {
            strategy,
            num_users,
            aggregate_columns,
            mean_individual_stddev: 0.0,
            average_multipliers: Vec::new(),
            median_distances: Vec::new(),
            all_distances: Vec::new(),
            user_values: Vec::new(),
            minimum_values: Vec::new(),
            median_values: Vec::new(),
            maximum_values: Vec::new(),
            user_steps: Vec::new(),
            user_multipliers: Vec::new(),
            random_baseline: None,
        }
    }

    pub fn num_couples(&self) -> usize {
        self.all_distances.len()
    }

    /// Every per-couple field must hold one entry per couple.
    pub fn validate(&self) -> Result<(), AffinityError> {
        let expected = self.num_couples();
        let fields = [
            ("median_distances", self.median_distances.len()),
            ("user_values", self.user_values.len()),
            ("minimum_values", self.minimum_values.len()),
            ("median_values", self.median_values.len()),
            ("maximum_values", self.maximum_values.len()),
            ("user_steps", self.user_steps.len()),
            ("user_multipliers", self.user_multipliers.len()),
        ];
        for (name, len) in fields {
            if len != expected {
                return Err(AffinityError::invalid_input(format!(
                    "{name} has {len} entries for {expected} couples"
                )));
            }
        }
        Ok(())
    }
}
