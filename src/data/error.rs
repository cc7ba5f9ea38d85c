use std::path::PathBuf;

use thiserror::Error;

/// Result alias for the data layer.
pub type DataResult<T> = Result<T, DataError>;

/// Errors surfaced by the accessor and the aggregation pipeline.
///
/// A failed derivation or aggregation is local to the call that raised it;
/// the cached [`SurveyDataset`](super::model::SurveyDataset) is never
/// touched by a failing call.
#[derive(Debug, Error)]
pub enum DataError {
    /// The survey table could not be read (missing, malformed, or empty).
    #[error("survey data unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// A categorical code outside its declared lookup domain.
    #[error("unmapped code {code} in column '{column}'")]
    UnmappedCode { column: &'static str, code: i64 },

    /// Respondent age below the survey floor (15) or not a number.
    #[error("age {0} outside the survey domain (respondents are 15 or older)")]
    AgeOutOfDomain(f64),

    /// A cohort with an empty denominator; reported instead of a NaN ratio.
    #[error("undefined ratio for cohort '{group}': empty denominator")]
    UndefinedRatio { group: String },
}
