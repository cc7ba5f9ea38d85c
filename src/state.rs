use std::path::Path;

use crate::data::accessor::DatasetAccessor;
use crate::data::aggregate::{
    aggregate_ratio, cohort_compare, overall_percentage, CohortPoint, GroupKey, Indicator,
    RatioRow,
};
use crate::data::derive::{derive_cohorts, CohortRow};
use crate::data::error::DataResult;
use crate::data::model::{CategoryValue, SurveyDataset};
use crate::ui::pages::Page;

/// Table the app tries to open at startup, from the working directory.
pub const DEFAULT_TABLE: &str = "micro_world.csv";

// ---------------------------------------------------------------------------
// Cohort dimension selector
// ---------------------------------------------------------------------------

/// Which cohort dimension the resilience comparison is split by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortDimension {
    Age,
    Income,
    Education,
}

impl CohortDimension {
    pub const ALL: [CohortDimension; 3] = [
        CohortDimension::Age,
        CohortDimension::Income,
        CohortDimension::Education,
    ];

    pub fn group_key(self) -> GroupKey {
        match self {
            CohortDimension::Age => GroupKey::AgeGroup,
            CohortDimension::Income => GroupKey::IncomeGroup,
            CohortDimension::Education => GroupKey::Education,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CohortDimension::Age => "By age group",
            CohortDimension::Income => "By income group",
            CohortDimension::Education => "By education",
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis – every table the pages render, recomputed as a whole
// ---------------------------------------------------------------------------

/// All pipeline outputs the dashboard pages consume. Rebuilt from the
/// accessor on every load or selector change; holds no references into the
/// cached table.
pub struct Analysis {
    /// Raw rows of the focus economy, for the data-preview table.
    pub focus_raw: SurveyDataset,
    /// % of the focus economy's respondents with a debit card.
    pub focus_debit_pct: Option<f64>,
    /// % with an account at a financial institution.
    pub focus_account_pct: Option<f64>,
    /// % of account holders who saved in their account in the past year.
    pub savers_among_account_holders_pct: Option<f64>,
    /// Debit-card ownership split by gender (focus economy).
    pub debit_by_gender: Vec<RatioRow>,
    /// Debit-card ownership per (economy, code, region), worldwide or
    /// scoped to the selected region.
    pub world_debit_ownership: Vec<RatioRow>,
    /// Account coverage per (economy, code) across the ASEAN economies.
    pub sea_account_share: Vec<RatioRow>,
    /// Emergency-funds probability per cohort, split by account ownership.
    pub resilience: Vec<CohortPoint>,
}

impl Analysis {
    fn compute(
        accessor: &DatasetAccessor,
        focus_economy: &str,
        dimension: CohortDimension,
        world_region: Option<&str>,
    ) -> DataResult<Analysis> {
        // Each chart works on its own filtered view and its own derived
        // cohort table; the cached table stays untouched.
        let world: Vec<CohortRow> = match world_region {
            Some(region) => derive_cohorts(&accessor.region(region))?,
            None => derive_cohorts(accessor.dataset())?,
        };
        let focus: Vec<CohortRow> = derive_cohorts(&accessor.country(focus_economy))?;
        let sea: Vec<CohortRow> = derive_cohorts(&accessor.southeast_asia())?;

        let saves_by_ownership =
            aggregate_ratio(&focus, &[GroupKey::HasAccount], Indicator::SavesInAccount);
        let savers_among_account_holders_pct = saves_by_ownership
            .iter()
            .find(|r| r.keys == [CategoryValue::Bool(true)])
            .and_then(|r| r.percentage);

        Ok(Analysis {
            focus_raw: accessor.country(focus_economy),
            focus_debit_pct: overall_percentage(&focus, Indicator::DebitCard),
            focus_account_pct: overall_percentage(&focus, Indicator::HasAccount),
            savers_among_account_holders_pct,
            debit_by_gender: aggregate_ratio(&focus, &[GroupKey::Gender], Indicator::DebitCard),
            world_debit_ownership: aggregate_ratio(
                &world,
                &[GroupKey::Economy, GroupKey::EconomyCode, GroupKey::Region],
                Indicator::DebitCard,
            ),
            sea_account_share: aggregate_ratio(
                &sea,
                &[GroupKey::Economy, GroupKey::EconomyCode],
                Indicator::HasAccount,
            ),
            resilience: cohort_compare(
                &focus,
                dimension.group_key(),
                Indicator::HasAccount,
                Indicator::EmergencyFunds,
            )?,
        })
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Read-once handle to the survey table (None until a file is loaded).
    pub accessor: Option<DatasetAccessor>,

    /// Page currently shown in the central panel.
    pub page: Page,

    /// Economy the narrative pages focus on.
    pub focus_economy: String,

    /// Cohort dimension for the resilience comparison.
    pub dimension: CohortDimension,

    /// Region scope for the worldwide chart (None = all regions).
    pub world_region: Option<String>,

    /// Computed tables for the current selections.
    pub analysis: Option<Analysis>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            accessor: None,
            page: Page::Background,
            focus_economy: "Philippines".to_string(),
            dimension: CohortDimension::Age,
            world_region: None,
            analysis: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Try the default table in the working directory; absence is fine.
    pub fn load_default_table(&mut self) {
        let path = Path::new(DEFAULT_TABLE);
        if path.exists() {
            self.load_dataset(path);
        } else {
            log::info!("No {DEFAULT_TABLE} in the working directory, waiting for File → Open");
        }
    }

    /// Read a survey table and recompute the analysis.
    pub fn load_dataset(&mut self, path: &Path) {
        match DatasetAccessor::load(path) {
            Ok(accessor) => {
                let economies = &accessor.dataset().economies;
                if !economies.iter().any(|e| *e == self.focus_economy) {
                    self.focus_economy = economies.first().cloned().unwrap_or_default();
                }
                self.accessor = Some(accessor);
                self.status_message = None;
                self.recompute();
            }
            Err(e) => {
                log::error!("Failed to load survey table: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch the focus economy and recompute.
    pub fn set_focus_economy(&mut self, name: String) {
        if self.focus_economy != name {
            self.focus_economy = name;
            self.recompute();
        }
    }

    /// Switch the resilience cohort dimension and recompute.
    pub fn set_dimension(&mut self, dimension: CohortDimension) {
        if self.dimension != dimension {
            self.dimension = dimension;
            self.recompute();
        }
    }

    /// Scope the worldwide chart to a region (None = all) and recompute.
    pub fn set_world_region(&mut self, region: Option<String>) {
        if self.world_region != region {
            self.world_region = region;
            self.recompute();
        }
    }

    /// Re-run the full aggregation pipeline for the current selections.
    /// A failing derivation clears the analysis but leaves the cached
    /// table as it was.
    pub fn recompute(&mut self) {
        let Some(accessor) = &self.accessor else {
            self.analysis = None;
            return;
        };
        match Analysis::compute(
            accessor,
            &self.focus_economy,
            self.dimension,
            self.world_region.as_deref(),
        ) {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Aggregation failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.analysis = None;
            }
        }
    }
}
