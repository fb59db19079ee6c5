//! JSON report writer for analysis outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes analysis reports to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Reports are named `{experiment}_report.json`.
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

/// Scores and shape of one fitted tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeSummary {
    /// Pruning strength the tree was fit with.
    pub ccp_alpha: f64,
    /// Edges from root to deepest leaf.
    pub depth: usize,
    /// Number of leaves.
    pub n_leaves: usize,
    /// Test-set accuracy.
    pub accuracy: f64,
    /// Test-set recall of the positive class.
    pub recall: f64,
    /// Test-set confusion matrix, `[true class][predicted class]` in class-id
    /// order.
    pub confusion_matrix: Vec<Vec<usize>>,
    /// Per-class test-set scores, in class-id order.
    pub class_scores: Vec<ClassScores>,
}

/// Precision, recall and F1 of one class on the test rows.
#[derive(Debug, Clone, Serialize)]
pub struct ClassScores {
    /// Label value as it appeared in the data.
    pub label: f64,
    /// TP / (TP + FP), 0 without predictions of this class.
    pub precision: f64,
    /// TP / (TP + FN), 0 without true rows of this class.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// True test rows of this class.
    pub support: usize,
}

/// Everything the `analyze` run reports, as plain values.
///
/// Holds primitives only so the writer has no dependency on the tree or
/// search crates.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Rows read from the data file.
    pub n_rows_read: usize,
    /// Rows left after sentinel filtering.
    pub n_rows_kept: usize,
    /// Rows in the training partition.
    pub n_train: usize,
    /// Rows in the test partition.
    pub n_test: usize,
    /// Feature names, parallel to `dispersion`.
    pub feature_names: Vec<String>,
    /// Coefficient of variation per feature.
    pub dispersion: Vec<f64>,
    /// Unpruned tree.
    pub initial_tree: TreeSummary,
    /// Tree pruned at a fixed strength.
    pub pruned_tree: TreeSummary,
    /// Tree refit at the searched optimal strength.
    pub optimized_tree: TreeSummary,
    /// Result of the pruning-threshold search.
    pub optimal_ccp_alpha: f64,
    /// Result of root-feature extraction.
    pub important_feature: Option<String>,
    /// Optimal strength using only the important feature.
    pub single_feature_ccp_alpha: f64,
    /// Depth of the optimized tree on the two dominant features.
    pub two_feature_depth: usize,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path [`ReportWriter::write_report`] writes to.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_report.json", self.experiment.as_str()))
    }

    /// Write an analysis report to `{experiment}_report.json`.
    ///
    /// Non-finite dispersion values (zero-mean or empty columns) are
    /// written as `null`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The report cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_report(&self, report: &AnalysisReport) -> Result<PathBuf, IoError> {
        let path = self.report_path();

        let dispersion: Vec<FeatureDispersion<'_>> = report
            .feature_names
            .iter()
            .zip(&report.dispersion)
            .map(|(name, &cv)| FeatureDispersion {
                name,
                coefficient_of_variation: cv.is_finite().then_some(cv),
            })
            .collect();

        let artifact = ReportArtifact {
            experiment: self.experiment.as_str(),
            rows: RowCounts {
                read: report.n_rows_read,
                kept: report.n_rows_kept,
                train: report.n_train,
                test: report.n_test,
            },
            dispersion,
            initial_tree: &report.initial_tree,
            pruned_tree: &report.pruned_tree,
            optimized_tree: &report.optimized_tree,
            optimal_ccp_alpha: report.optimal_ccp_alpha,
            important_feature: report.important_feature.as_deref(),
            single_feature_ccp_alpha: report.single_feature_ccp_alpha,
            two_feature_depth: report.two_feature_depth,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "report written");
        Ok(path)
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct ReportArtifact<'a> {
    experiment: &'a str,
    rows: RowCounts,
    dispersion: Vec<FeatureDispersion<'a>>,
    initial_tree: &'a TreeSummary,
    pruned_tree: &'a TreeSummary,
    optimized_tree: &'a TreeSummary,
    optimal_ccp_alpha: f64,
    important_feature: Option<&'a str>,
    single_feature_ccp_alpha: f64,
    two_feature_depth: usize,
}

/// One entry per feature column, in column order.
#[derive(Serialize)]
struct FeatureDispersion<'a> {
    name: &'a str,
    coefficient_of_variation: Option<f64>,
}

#[derive(Serialize)]
struct RowCounts {
    read: usize,
    kept: usize,
    train: usize,
    test: usize,
}
