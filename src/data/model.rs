use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// CategoryValue – a grouping-key cell produced by the aggregation pipeline
// ---------------------------------------------------------------------------

/// A categorical cell used as a grouping key and chart label.
///
/// Grouping happens through `BTreeMap`, so the derived `Ord` doubles as the
/// deterministic output order: labels sort lexically, which matches the
/// natural order of every labelled cohort in this dataset ("15-24" < "25-34",
/// "A - poorest 20%" < "B - second 20%", ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryValue {
    Str(String),
    Bool(bool),
}

impl CategoryValue {
    pub fn str(s: impl Into<String>) -> Self {
        CategoryValue::Str(s.into())
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryValue::Str(s) => write!(f, "{s}"),
            CategoryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Respondent – one row of the source table
// ---------------------------------------------------------------------------

/// One survey respondent, raw codes as published.
///
/// Field names follow the source table header (Global Findex microdata), so
/// the CSV and JSON loaders can decode rows directly with serde. Codes stay
/// numeric here; `derive::derive_cohorts` owns the relabeling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Respondent {
    /// Economy (country) name.
    pub economy: String,
    /// ISO-like three-letter economy code.
    #[serde(rename = "economycode")]
    pub economy_code: String,
    /// World Bank region the economy belongs to.
    #[serde(rename = "regionwb")]
    pub region: String,
    /// Unique respondent identifier; used only as a counting key.
    #[serde(rename = "wpid_random")]
    pub respondent_id: i64,
    /// Gender flag: 1 is read as male, anything else as female.
    pub female: i64,
    /// Age in years.
    pub age: f64,
    /// Educational attainment code (1..=3).
    pub educ: i64,
    /// Within-economy income quintile code (1..=5).
    pub inc_q: i64,
    /// Has an account at a financial institution (yes/no code).
    pub account_fin: i64,
    /// Saved at a financial institution in the past year (yes/no code).
    pub fin17a: i64,
    /// Could come up with emergency funds (yes/no code).
    pub fin24: i64,
    /// Owns a debit card (yes/no code).
    pub fin2: i64,
}

// ---------------------------------------------------------------------------
// SurveyDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed survey table plus the unique-value indices the UI
/// selectors need. Immutable after construction: filters return new owned
/// subsets and derivations build their own tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyDataset {
    /// All respondents (rows).
    pub respondents: Vec<Respondent>,
    /// Sorted unique economy names.
    pub economies: Vec<String>,
    /// Sorted unique region names.
    pub regions: Vec<String>,
}

impl SurveyDataset {
    /// Build the unique-value indices from the loaded rows.
    pub fn from_respondents(respondents: Vec<Respondent>) -> Self {
        let mut economies: Vec<String> = respondents.iter().map(|r| r.economy.clone()).collect();
        economies.sort();
        economies.dedup();

        let mut regions: Vec<String> = respondents.iter().map(|r| r.region.clone()).collect();
        regions.sort();
        regions.dedup();

        SurveyDataset {
            respondents,
            economies,
            regions,
        }
    }

    /// Number of respondents.
    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    /// Rows whose economy equals `name`. An unknown economy yields an empty
    /// subset, not an error.
    pub fn filter_by_country(&self, name: &str) -> SurveyDataset {
        self.subset(|r| r.economy == name)
    }

    /// Rows whose economy is any of `names`.
    pub fn filter_by_countries(&self, names: &[&str]) -> SurveyDataset {
        self.subset(|r| names.iter().any(|n| r.economy == *n))
    }

    /// Rows whose region equals `region`.
    pub fn filter_by_region(&self, region: &str) -> SurveyDataset {
        self.subset(|r| r.region == region)
    }

    fn subset(&self, keep: impl Fn(&Respondent) -> bool) -> SurveyDataset {
        let rows: Vec<Respondent> = self
            .respondents
            .iter()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        SurveyDataset::from_respondents(rows)
    }
}
