use crate::model::couples::{CoupleIndex, validate_couples};
use crate::model::error::AffinityError;
use crate::model::matrix::{AugmentedMatrix, DistanceTensor};
use crate::model::report::{CoupleReport, RandomBaseline, SidePair, StrategyKind};
use crate::pipeline::stage2_distances::run_stage2;
use crate::pipeline::stage3_montecarlo::{MonteCarloParams, run_montecarlo};
use crate::report::{mean, median, min_max, std_dev};

/// Below this, every candidate is either the user, the partner, or absent.
pub const MIN_POPULATION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingStrategy {
    #[default]
    Exact,
    MonteCarlo(MonteCarloParams),
}

impl RankingStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            RankingStrategy::Exact => StrategyKind::Exact,
            RankingStrategy::MonteCarlo(_) => StrategyKind::MonteCarlo,
        }
    }
}

/// Per-couple ranking results before reduction into a report.
#[derive(Debug, Clone)]
pub(crate) struct RankedCouples {
    pub distances: Vec<Vec<f64>>,
    pub steps: Vec<SidePair<Vec<f64>>>,
    pub multipliers: Vec<SidePair<Vec<f64>>>,
    pub baseline: Option<RandomBaseline>,
}

pub fn run_stage3(
    matrix: &AugmentedMatrix,
    couples: &[CoupleIndex],
    strategy: RankingStrategy,
) -> Result<CoupleReport, AffinityError> {
    let num_users = matrix.num_users();
    validate_couples(couples, num_users)?;
    if couples.is_empty() {
        tracing::warn!(num_users, "no couples to rank; producing an empty report");
        return Ok(CoupleReport::empty(
            strategy.kind(),
            num_users,
            matrix.aggregate_columns(),
        ));
    }
    if num_users < MIN_POPULATION {
        return Err(AffinityError::InsufficientPopulation {
            num_users,
            required: MIN_POPULATION,
        });
    }

    tracing::info!(
        num_users,
        num_couples = couples.len(),
        num_columns = matrix.num_columns(),
        strategy = ?strategy.kind(),
        "ranking couples"
    );
    let ranked = match strategy {
        RankingStrategy::Exact => rank_exact(matrix, couples),
        RankingStrategy::MonteCarlo(params) => run_montecarlo(matrix, couples, &params)?,
    };
    Ok(assemble_report(matrix, couples, strategy.kind(), ranked))
}

fn rank_exact(matrix: &AugmentedMatrix, couples: &[CoupleIndex]) -> RankedCouples {
    let tensor = run_stage2(matrix);
    let half = matrix.num_users() as f64 / 2.0;

    let mut distances = Vec::with_capacity(couples.len());
    let mut steps = Vec::with_capacity(couples.len());
    let mut multipliers = Vec::with_capacity(couples.len());
    for couple in couples {
        let dists = couple_distances(&tensor, couple);
        let [first, second] = couple
            .sides()
            .map(|(side, _)| side_steps(&tensor, side, &dists));
        let to_multipliers = |s: &[f64]| s.iter().map(|&v| half / v).collect::<Vec<_>>();
        multipliers.push((to_multipliers(&first), to_multipliers(&second)));
        steps.push((first, second));
        distances.push(dists);
    }

    RankedCouples {
        distances,
        steps,
        multipliers,
        baseline: None,
    }
}

fn couple_distances(tensor: &DistanceTensor, couple: &CoupleIndex) -> Vec<f64> {
    (0..tensor.num_columns())
        .map(|c| tensor.get(couple.first, couple.second, c))
        .collect()
}

fn side_steps(tensor: &DistanceTensor, side: usize, couple_dists: &[f64]) -> Vec<f64> {
    couple_dists
        .iter()
        .enumerate()
        .map(|(c, &d)| steps_to_partner(tensor.lane(side, c).iter().copied(), side, d))
        .collect()
}

/// Average of the strict and inclusive closeness counts.
///
/// The inclusive count covers every user at distance `<= couple_dist`, so it
/// always includes `side` itself and the partner. The strict count covers users
/// other than `side` at distance `< couple_dist`. The result is
/// `1 + closer + ties / 2` over third parties, never below 1.
pub(crate) fn steps_to_partner(
    dists: impl IntoIterator<Item = f64>,
    side: usize,
    couple_dist: f64,
) -> f64 {
    let mut exclusive = 0usize;
    let mut inclusive = 0usize;
    for (k, d) in dists.into_iter().enumerate() {
        if d <= couple_dist {
            inclusive += 1;
            if d < couple_dist && k != side {
                exclusive += 1;
            }
        }
    }
    debug_assert!(inclusive >= 2);
    (exclusive + inclusive) as f64 / 2.0
}

pub(crate) fn assemble_report(
    matrix: &AugmentedMatrix,
    couples: &[CoupleIndex],
    strategy: StrategyKind,
    ranked: RankedCouples,
) -> CoupleReport {
    let num_columns = matrix.num_columns();
    let agg = matrix.aggregate_columns();

    let mut user_values = Vec::with_capacity(couples.len());
    let mut minimum_values = Vec::with_capacity(couples.len());
    let mut median_values = Vec::with_capacity(couples.len());
    let mut maximum_values = Vec::with_capacity(couples.len());
    let mut stddevs = Vec::with_capacity(couples.len() * 2);
    for couple in couples {
        let first = matrix.row(couple.first).to_vec();
        let second = matrix.row(couple.second).to_vec();
        let (min1, max1) = min_max(&first);
        let (min2, max2) = min_max(&second);
        minimum_values.push((min1, min2));
        median_values.push((median(&first), median(&second)));
        maximum_values.push((max1, max2));
        stddevs.push(std_dev(&matrix.raw_row(couple.first).to_vec()));
        stddevs.push(std_dev(&matrix.raw_row(couple.second).to_vec()));
        user_values.push((first, second));
    }

    let mut average_multipliers = vec![0.0; num_columns];
    for (first, second) in &ranked.multipliers {
        for c in 0..num_columns {
            debug_assert!(first[c] > 0.0 && second[c] > 0.0);
            average_multipliers[c] += first[c] + second[c];
        }
    }
    let sides = (ranked.multipliers.len() * 2) as f64;
    for v in &mut average_multipliers {
        *v /= sides;
    }

    let median_distances = ranked
        .distances
        .iter()
        .map(|d| median(&d[agg..]))
        .collect();

    CoupleReport {
        strategy,
        num_users: matrix.num_users(),
        aggregate_columns: agg,
        mean_individual_stddev: mean(&stddevs),
        average_multipliers,
        median_distances,
        all_distances: ranked.distances,
        user_values,
        minimum_values,
        median_values,
        maximum_values,
        user_steps: ranked.steps,
        user_multipliers: ranked.multipliers,
        random_baseline: ranked.baseline,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_rank.rs"]
mod tests;
