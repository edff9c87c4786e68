use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use kira_affinity::input::{InputError, load_dataset, prepare_input};
use kira_affinity::logging::init_logging;
use kira_affinity::pipeline::stage4_report::{ReportError, write_reports};
use kira_affinity::{AnalysisParams, MonteCarloParams, RankingStrategy, run_analysis};

#[derive(Debug, Parser)]
#[command(
    name = "kira-affinity",
    version,
    about = "Ranks how alike couples are compared with the rest of the population."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a dataset and write couples_report.json / couples_report.txt.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Dataset JSON with per-user score samples and couples.
    #[arg(long)]
    input: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = StrategyArg::Exact)]
    strategy: StrategyArg,

    /// Random couple sets drawn by the monte-carlo strategy.
    #[arg(long, default_value_t = MonteCarloParams::default().random_sets)]
    random_sets: usize,

    #[arg(long, default_value_t = MonteCarloParams::default().seed)]
    seed: u64,

    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Exact,
    MonteCarlo,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = &cli.command;
    init_logging(args.verbose);
    if let Err(err) = run(args) {
        tracing::error!("{err}");
        eprintln!("{}", error_chain(&err));
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), CliError> {
    let dataset = load_dataset(&args.input)?;
    let prepared = prepare_input(&dataset)?;
    let params = analysis_params(args);

    let output = run_analysis(
        &prepared.identity,
        &prepared.couples,
        &prepared.labels,
        &params,
    )?;
    write_reports(&output.rendered, &args.out)?;
    Ok(())
}

fn analysis_params(args: &RunArgs) -> AnalysisParams {
    let strategy = match args.strategy {
        StrategyArg::Exact => RankingStrategy::Exact,
        StrategyArg::MonteCarlo => RankingStrategy::MonteCarlo(MonteCarloParams {
            random_sets: args.random_sets,
            seed: args.seed,
        }),
    };
    AnalysisParams { strategy }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !out.contains(&cause_text) {
            out.push_str(&format!(": {cause_text}"));
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
