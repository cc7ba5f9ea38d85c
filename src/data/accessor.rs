use std::path::{Path, PathBuf};

use super::error::{DataError, DataResult};
use super::loader;
use super::model::SurveyDataset;

/// The ten ASEAN economies, as named in the source table. Used for the
/// regional account-coverage comparison.
pub const SEA_ECONOMIES: &[&str] = &[
    "Philippines",
    "Brunei",
    "Cambodia",
    "Indonesia",
    "Lao PDR",
    "Malaysia",
    "Myanmar",
    "Singapore",
    "Thailand",
    "Vietnam",
];

// ---------------------------------------------------------------------------
// DatasetAccessor – the process-wide handle to the loaded table
// ---------------------------------------------------------------------------

/// Owns the survey table for the lifetime of the process.
///
/// The table is read exactly once, when the accessor is constructed;
/// consumers borrow it read-only and every derived artifact (filtered
/// subset, cohort table, aggregate) is a fresh value. Nothing ever writes
/// back into the cached table, so the same accessor can safely be shared
/// across any number of aggregation calls.
#[derive(Debug, Clone)]
pub struct DatasetAccessor {
    dataset: SurveyDataset,
    source: PathBuf,
}

impl DatasetAccessor {
    /// Read the table at `path`. A missing, malformed, or empty source is
    /// reported as [`DataError::DataUnavailable`]; there is no retry, the
    /// data is static.
    pub fn load(path: &Path) -> DataResult<Self> {
        let dataset = loader::load_file(path).map_err(|e| DataError::DataUnavailable {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

        if dataset.is_empty() {
            return Err(DataError::DataUnavailable {
                path: path.to_path_buf(),
                reason: "table contains no rows".to_string(),
            });
        }

        log::info!(
            "Loaded {} respondents across {} economies from {}",
            dataset.len(),
            dataset.economies.len(),
            path.display()
        );

        Ok(DatasetAccessor {
            dataset,
            source: path.to_path_buf(),
        })
    }

    /// The cached table.
    pub fn dataset(&self) -> &SurveyDataset {
        &self.dataset
    }

    /// Where the table was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Owned subset for one economy; empty for an unknown name.
    pub fn country(&self, name: &str) -> SurveyDataset {
        self.dataset.filter_by_country(name)
    }

    /// Owned subset for one World Bank region.
    pub fn region(&self, name: &str) -> SurveyDataset {
        self.dataset.filter_by_region(name)
    }

    /// Owned subset covering the ASEAN economies.
    pub fn southeast_asia(&self) -> SurveyDataset {
        self.dataset.filter_by_countries(SEA_ECONOMIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive_cohorts;

    const SAMPLE: &str = "\
economy,economycode,regionwb,wpid_random,female,age,educ,inc_q,account_fin,fin17a,fin24,fin2
Philippines,PHL,East Asia & Pacific,1,2,31,2,3,1,2,1,1
Philippines,PHL,East Asia & Pacific,2,1,19,1,1,2,2,2,2
Vietnam,VNM,East Asia & Pacific,3,2,44,3,5,1,1,1,1
";

    fn sample_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn loading_twice_yields_identical_tables() {
        let path = sample_path("findex_accessor_idem.csv");
        let a = DatasetAccessor::load(&path).unwrap();
        let b = DatasetAccessor::load(&path).unwrap();
        assert_eq!(a.dataset(), b.dataset());
    }

    #[test]
    fn derivation_does_not_leak_into_the_cached_table() {
        let path = sample_path("findex_accessor_leak.csv");
        let accessor = DatasetAccessor::load(&path).unwrap();
        let before = accessor.dataset().clone();

        let _cohorts = derive_cohorts(accessor.dataset()).unwrap();

        assert_eq!(accessor.dataset(), &before);
        let fresh = DatasetAccessor::load(&path).unwrap();
        assert_eq!(accessor.dataset(), fresh.dataset());
    }

    #[test]
    fn missing_source_is_data_unavailable() {
        let path = std::env::temp_dir().join("findex_accessor_nowhere.csv");
        let _ = std::fs::remove_file(&path);
        match DatasetAccessor::load(&path) {
            Err(DataError::DataUnavailable { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn empty_table_is_data_unavailable() {
        let path = std::env::temp_dir().join("findex_accessor_empty.csv");
        std::fs::write(
            &path,
            "economy,economycode,regionwb,wpid_random,female,age,educ,inc_q,account_fin,fin17a,fin24,fin2\n",
        )
        .unwrap();
        assert!(matches!(
            DatasetAccessor::load(&path),
            Err(DataError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn country_subset_comes_from_the_cache_without_mutating_it() {
        let path = sample_path("findex_accessor_subset.csv");
        let accessor = DatasetAccessor::load(&path).unwrap();
        let ph = accessor.country("Philippines");
        assert_eq!(ph.len(), 2);
        assert_eq!(accessor.dataset().len(), 3);
    }
}
