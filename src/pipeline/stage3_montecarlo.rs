use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

use crate::model::couples::CoupleIndex;
use crate::model::error::AffinityError;
use crate::model::matrix::AugmentedMatrix;
use crate::model::report::RandomBaseline;
use crate::pipeline::stage3_rank::RankedCouples;
use crate::report::mean;

const RELATIVE_EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloParams {
    pub random_sets: usize,
    pub seed: u64,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            random_sets: 1_000,
            seed: 45,
        }
    }
}

/// Ranks couples against resampled random couple sets without materializing
/// the full distance tensor. Steps come from binary searches over sorted columns.
pub(crate) fn run_montecarlo(
    matrix: &AugmentedMatrix,
    couples: &[CoupleIndex],
    params: &MonteCarloParams,
) -> Result<RankedCouples, AffinityError> {
    if params.random_sets == 0 {
        return Err(AffinityError::invalid_input(
            "monte-carlo ranking needs at least one random couple set",
        ));
    }
    let num_users = matrix.num_users();
    let num_columns = matrix.num_columns();
    let agg = matrix.aggregate_columns();
    let sorted = SortedColumns::new(matrix);

    let mut distances = Vec::with_capacity(couples.len());
    let mut steps = Vec::with_capacity(couples.len());
    for couple in couples {
        let dists = (0..num_columns)
            .map(|c| pair_distance(matrix, couple.first, couple.second, c))
            .collect::<Vec<_>>();
        let [first, second] = couple
            .sides()
            .map(|(side, _)| row_steps(matrix, &sorted, side, &dists));
        steps.push((first, second));
        distances.push(dists);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut random_dist = vec![0.0; num_columns];
    let mut random_steps = vec![0.0; num_columns];
    let mut sampled = 0usize;
    for _ in 0..params.random_sets {
        for (a, b) in random_couple_set(&mut rng, num_users, couples.len()) {
            for c in 0..num_columns {
                let d = pair_distance(matrix, a, b, c);
                random_dist[c] += d;
                random_steps[c] += sorted.steps(c, matrix.get(a, c), d);
                random_steps[c] += sorted.steps(c, matrix.get(b, c), d);
            }
            sampled += 1;
        }
    }
    for c in 0..num_columns {
        random_dist[c] /= sampled as f64;
        random_steps[c] /= (2 * sampled) as f64;
    }
    tracing::debug!(
        random_sets = params.random_sets,
        seed = params.seed,
        sampled_couples = sampled,
        "sampled random couple baseline"
    );

    let multipliers = steps
        .iter()
        .map(|(first, second)| {
            let scale = |s: &[f64]| {
                s.iter()
                    .zip(&random_steps)
                    .map(|(&own, &random)| random / own)
                    .collect::<Vec<_>>()
            };
            (scale(first), scale(second))
        })
        .collect();

    let raw = matrix.num_raw_columns();
    let mut abs_dist = Vec::with_capacity(raw);
    let mut rel_dist = Vec::with_capacity(raw);
    let mut abs_steps = Vec::with_capacity(raw);
    let mut rel_steps = Vec::with_capacity(raw);
    for c in agg..num_columns {
        let couple_dist = mean(&distances.iter().map(|d| d[c]).collect::<Vec<_>>());
        let couple_steps = mean(
            &steps
                .iter()
                .flat_map(|(first, second)| [first[c], second[c]])
                .collect::<Vec<_>>(),
        );
        abs_dist.push(random_dist[c] - couple_dist);
        rel_dist.push(random_dist[c] / (couple_dist + RELATIVE_EPSILON));
        abs_steps.push(random_steps[c] - couple_steps);
        rel_steps.push(random_steps[c] / (couple_steps + RELATIVE_EPSILON));
    }

    Ok(RankedCouples {
        distances,
        steps,
        multipliers,
        baseline: Some(RandomBaseline {
            random_sets: params.random_sets,
            absolute_distance_delta: mean(&abs_dist),
            relative_distance_delta: mean(&rel_dist),
            absolute_steps_delta: mean(&abs_steps),
            relative_steps_delta: mean(&rel_steps),
        }),
    })
}

fn pair_distance(matrix: &AugmentedMatrix, a: usize, b: usize, column: usize) -> f64 {
    (matrix.get(a, column) - matrix.get(b, column)).abs()
}

fn row_steps(
    matrix: &AugmentedMatrix,
    sorted: &SortedColumns,
    side: usize,
    couple_dists: &[f64],
) -> Vec<f64> {
    couple_dists
        .iter()
        .enumerate()
        .map(|(c, &d)| sorted.steps(c, matrix.get(side, c), d))
        .collect()
}

/// Each column's values in ascending order.
pub(crate) struct SortedColumns {
    columns: Vec<Vec<f64>>,
}

impl SortedColumns {
    pub(crate) fn new(matrix: &AugmentedMatrix) -> Self {
        let columns = matrix
            .values()
            .columns()
            .into_iter()
            .map(|col| {
                let mut values = col.to_vec();
                values.sort_by(f64::total_cmp);
                values
            })
            .collect();
        Self { columns }
    }

    /// Same count as `steps_to_partner` over the user's distance row, in O(log n).
    ///
    /// `value` must be the user's own entry in `column`, so exactly one zero
    /// distance belongs to the user and is dropped from the strict count.
    pub(crate) fn steps(&self, column: usize, value: f64, couple_dist: f64) -> f64 {
        let sorted = &self.columns[column];
        let strict = count_within(sorted, value, |dist| dist < couple_dist);
        let inclusive = count_within(sorted, value, |dist| dist <= couple_dist);
        let exclusive = strict - usize::from(couple_dist > 0.0);
        (exclusive + inclusive) as f64 / 2.0
    }
}

/// Users whose distance to `value` satisfies `within`, for a `within` that is
/// true on `[0, limit)` or `[0, limit]`. Rounded `|s - value|` is monotone on
/// each side of `value`, so both halves are answered by one `partition_point`.
fn count_within(sorted: &[f64], value: f64, within: impl Fn(f64) -> bool) -> usize {
    let (below, above) = sorted.split_at(sorted.partition_point(|&s| s < value));
    let below_in = below.len() - below.partition_point(|&s| !within((value - s).abs()));
    let above_in = above.partition_point(|&s| within((s - value).abs()));
    below_in + above_in
}

/// Disjoint pairs when the population allows it, otherwise independent pairs.
fn random_couple_set(rng: &mut StdRng, num_users: usize, num_couples: usize) -> Vec<(usize, usize)> {
    if 2 * num_couples <= num_users {
        let picks = index::sample(rng, num_users, 2 * num_couples).into_vec();
        picks.chunks_exact(2).map(|p| (p[0], p[1])).collect()
    } else {
        (0..num_couples)
            .map(|_| {
                let p = index::sample(rng, num_users, 2);
                (p.index(0), p.index(1))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_montecarlo.rs"]
mod tests;
