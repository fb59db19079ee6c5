//! File I/O, dataset preparation, and report serialization for the alder pipeline.

mod domain;
mod error;
mod partition;
pub mod prepare;
mod reader;
mod writer;

pub use domain::{Dataset, ExperimentName};
pub use error::IoError;
pub use partition::{TrainTestSplit, train_test_split};
pub use prepare::{MISSING_SENTINEL, dispersion, filter};
pub use reader::DatasetReader;
pub use writer::{AnalysisReport, ClassScores, ReportWriter, TreeSummary};
