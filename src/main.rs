use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use alder_io::{
    AnalysisReport, ClassScores, Dataset, DatasetReader, ExperimentName, ReportWriter,
    TrainTestSplit, TreeSummary, dispersion, filter, train_test_split,
};
use alder_search::SearchConfig;
use alder_tree::{ConfusionMatrix, DecisionTreeConfig, accuracy, recall_of};

#[derive(Parser)]
#[command(name = "alder")]
#[command(about = "Cost-complexity pruning analysis for labeled tabular data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for the train/test split and every tree fit
    #[arg(long, default_value_t = 1, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Report row counts and per-feature coefficient of variation
    Inspect {
        /// Path to the input CSV file (label in the last column)
        #[arg(long)]
        data: PathBuf,

        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },

    /// Fit, prune, and search a decision tree, writing a JSON report
    Analyze {
        /// Path to the input CSV file (label in the last column)
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Fraction of rows held out for testing
        #[arg(long, default_value_t = 0.3)]
        test_size: f64,

        /// Fixed pruning strength for the comparison tree
        #[arg(long, default_value_t = 0.002)]
        pruned_alpha: f64,

        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Log the rules of every fitted tree
        #[arg(long, default_value_t = false)]
        show_trees: bool,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct InspectOutput {
    data: String,
    n_rows_read: usize,
    n_rows_kept: usize,
    features: Vec<FeatureDispersion>,
}

#[derive(Serialize)]
struct FeatureDispersion {
    name: String,
    /// `None` when the value is not finite.
    coefficient_of_variation: Option<f64>,
}

#[derive(Serialize)]
struct AnalyzeOutput {
    experiment: String,
    report: PathBuf,
    initial_depth: usize,
    initial_accuracy: f64,
    optimal_ccp_alpha: f64,
    optimized_depth: usize,
    optimized_accuracy: f64,
    important_feature: Option<String>,
    single_feature_ccp_alpha: f64,
    two_feature_depth: usize,
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter must be a single ASCII character, got {delimiter:?}"))
}

/// Read the data file, logging and returning `None` when it does not exist.
fn load(data: &Path, delimiter: u8) -> Result<Option<Dataset>> {
    let dataset = DatasetReader::new(data)
        .with_delimiter(delimiter)
        .read()
        .context("failed to read input CSV")?;
    if dataset.is_none() {
        info!(path = %data.display(), "nothing to do");
    }
    Ok(dataset)
}

/// Fit at `ccp_alpha` and score the tree on the held-out rows.
fn fit_and_score(
    split: &TrainTestSplit,
    ccp_alpha: f64,
    seed: u64,
    label: &str,
    show_trees: bool,
) -> Result<TreeSummary> {
    let tree = DecisionTreeConfig::new()
        .with_ccp_alpha(ccp_alpha)
        .with_seed(seed)
        .fit(&split.x_train, &split.y_train)
        .with_context(|| format!("failed to fit {label} tree"))?;
    let predicted = tree.predict_batch(&split.x_test)?;
    let confusion = ConfusionMatrix::from_labels(&split.y_test, &predicted, split.classes.len())?;
    // No row labelled 1 means nothing to recall.
    let recall = match split.positive_class() {
        Some(positive) => recall_of(&split.y_test, &predicted, positive)?,
        None => 0.0,
    };
    let class_scores = confusion
        .class_metrics()
        .into_iter()
        .map(|m| ClassScores {
            label: split.classes[m.class],
            precision: m.precision,
            recall: m.recall,
            f1: m.f1,
            support: m.support,
        })
        .collect();
    let summary = TreeSummary {
        ccp_alpha,
        depth: tree.depth(),
        n_leaves: tree.n_leaves(),
        accuracy: accuracy(&split.y_test, &predicted)?,
        recall,
        confusion_matrix: confusion.as_rows().to_vec(),
        class_scores,
    };
    info!(
        tree = label,
        ccp_alpha,
        depth = summary.depth,
        accuracy = summary.accuracy,
        recall = summary.recall,
        "tree scored"
    );
    if show_trees {
        info!("{label} tree:\n{}", tree.render(&split.feature_names));
        info!("{label} test confusion matrix:\n{confusion}");
    }
    Ok(summary)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter_level = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter_level)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Inspect { data, delimiter } => {
            let Some(dataset) = load(&data, delimiter_byte(delimiter)?)? else {
                return Ok(());
            };
            let clean = filter(&dataset);
            let features = dataset
                .feature_names()
                .iter()
                .zip(dispersion(&dataset))
                .map(|(name, cv)| FeatureDispersion {
                    name: name.clone(),
                    coefficient_of_variation: cv.is_finite().then_some(cv),
                })
                .collect();

            let output = InspectOutput {
                data: data.display().to_string(),
                n_rows_read: dataset.n_rows(),
                n_rows_kept: clean.n_rows(),
                features,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Analyze {
            data,
            experiment,
            output_dir,
            test_size,
            pruned_alpha,
            delimiter,
            show_trees,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let Some(dataset) = load(&data, delimiter_byte(delimiter)?)? else {
                return Ok(());
            };
            let clean = filter(&dataset);
            info!(
                n_rows_read = dataset.n_rows(),
                n_rows_kept = clean.n_rows(),
                "sentinel rows removed"
            );

            let split = train_test_split(&clean, test_size, cli.seed)
                .context("failed to split dataset")?;
            let search = SearchConfig::new().with_seed(cli.seed);

            // Baseline, fixed-strength, and searched trees
            let initial_tree = fit_and_score(&split, 0.0, cli.seed, "initial", show_trees)?;
            let pruned_tree = fit_and_score(&split, pruned_alpha, cli.seed, "pruned", show_trees)?;

            let optimal_ccp_alpha = search
                .optimal_ccp_alpha(&split.x_train, &split.y_train, &split.x_test, &split.y_test)
                .context("pruning-threshold search failed")?;
            let optimized_tree =
                fit_and_score(&split, optimal_ccp_alpha, cli.seed, "optimized", show_trees)?;

            // Feature analyses
            let important_feature = search
                .important_feature(&split.x_train, &split.y_train, &split.feature_names)
                .context("root-feature extraction failed")?;
            let single_feature_ccp_alpha = search
                .optimal_ccp_alpha_single_feature(
                    &split.x_train,
                    &split.y_train,
                    &split.x_test,
                    &split.y_test,
                    &split.feature_names,
                )
                .context("single-feature search failed")?;
            let two_feature_depth = search
                .optimal_depth_two_features(
                    &split.x_train,
                    &split.y_train,
                    &split.x_test,
                    &split.y_test,
                    &split.feature_names,
                )
                .context("two-feature search failed")?;

            // Write JSON artifact
            let report = AnalysisReport {
                n_rows_read: dataset.n_rows(),
                n_rows_kept: clean.n_rows(),
                n_train: split.y_train.len(),
                n_test: split.y_test.len(),
                feature_names: split.feature_names.clone(),
                dispersion: dispersion(&dataset),
                initial_tree,
                pruned_tree,
                optimized_tree,
                optimal_ccp_alpha,
                important_feature,
                single_feature_ccp_alpha,
                two_feature_depth,
            };
            let writer = ReportWriter::new(&output_dir, experiment_name)?;
            let report_path = writer.write_report(&report)?;

            // Build and print stdout summary
            let output = AnalyzeOutput {
                experiment,
                report: report_path,
                initial_depth: report.initial_tree.depth,
                initial_accuracy: report.initial_tree.accuracy,
                optimal_ccp_alpha: report.optimal_ccp_alpha,
                optimized_depth: report.optimized_tree.depth,
                optimized_accuracy: report.optimized_tree.accuracy,
                important_feature: report.important_feature,
                single_feature_ccp_alpha: report.single_feature_ccp_alpha,
                two_feature_depth: report.two_feature_depth,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
