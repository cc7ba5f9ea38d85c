use std::fmt;

use super::error::{DataError, DataResult};
use super::model::{Respondent, SurveyDataset};

// ---------------------------------------------------------------------------
// Labelled categories
// ---------------------------------------------------------------------------

/// Gender, normalized from the `female` flag. Code 1 is read as male, any
/// other value as female (the convention the source table ships with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Age bracket, derived from the numeric age with left-closed bounds
/// {15, 25, 35, 45, 55, ∞}: 15 and 24.999 both fall in "15-24", 25 opens
/// "25-34". Ages below 15 (and NaN) are outside the survey domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeGroup {
    From15To24,
    From25To34,
    From35To44,
    From45To54,
    From55Up,
}

impl AgeGroup {
    pub fn from_age(age: f64) -> DataResult<Self> {
        // NaN fails the first comparison and is rejected alongside minors.
        if !(age >= 15.0) {
            return Err(DataError::AgeOutOfDomain(age));
        }
        Ok(if age < 25.0 {
            AgeGroup::From15To24
        } else if age < 35.0 {
            AgeGroup::From25To34
        } else if age < 45.0 {
            AgeGroup::From35To44
        } else if age < 55.0 {
            AgeGroup::From45To54
        } else {
            AgeGroup::From55Up
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::From15To24 => "15-24",
            AgeGroup::From25To34 => "25-34",
            AgeGroup::From35To44 => "35-44",
            AgeGroup::From45To54 => "45-54",
            AgeGroup::From55Up => "55 and older",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Educational attainment, mapped from codes 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Education {
    Primary,
    Secondary,
    Tertiary,
}

impl Education {
    pub fn from_code(code: i64) -> DataResult<Self> {
        match code {
            1 => Ok(Education::Primary),
            2 => Ok(Education::Secondary),
            3 => Ok(Education::Tertiary),
            other => Err(DataError::UnmappedCode {
                column: "educ",
                code: other,
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Education::Primary => "primary",
            Education::Secondary => "secondary",
            Education::Tertiary => "tertiary",
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Within-economy income quintile, mapped from codes 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncomeGroup {
    Poorest20,
    Second20,
    Middle20,
    Fourth20,
    Richest20,
}

impl IncomeGroup {
    pub fn from_code(code: i64) -> DataResult<Self> {
        match code {
            1 => Ok(IncomeGroup::Poorest20),
            2 => Ok(IncomeGroup::Second20),
            3 => Ok(IncomeGroup::Middle20),
            4 => Ok(IncomeGroup::Fourth20),
            5 => Ok(IncomeGroup::Richest20),
            other => Err(DataError::UnmappedCode {
                column: "inc_q",
                code: other,
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncomeGroup::Poorest20 => "A - poorest 20%",
            IncomeGroup::Second20 => "B - second 20%",
            IncomeGroup::Middle20 => "C - middle 20%",
            IncomeGroup::Fourth20 => "D - fourth 20%",
            IncomeGroup::Richest20 => "E - richest 20%",
        }
    }
}

impl fmt::Display for IncomeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a yes/no survey code. The observed domain is {0,1,2,3,4};
/// 1 means yes, the remaining codes are refusals / don't-know / no and all
/// read as false. Anything else is an unmapped code, not a silent false.
pub fn yes_no(column: &'static str, code: i64) -> DataResult<bool> {
    match code {
        1 => Ok(true),
        0 | 2 | 3 | 4 => Ok(false),
        other => Err(DataError::UnmappedCode {
            column,
            code: other,
        }),
    }
}

// ---------------------------------------------------------------------------
// CohortRow – one relabelled respondent
// ---------------------------------------------------------------------------

/// A respondent after relabeling: every categorical column carries its
/// human-readable label and every indicator is a plain bool. This is a
/// per-call derived table; building it never mutates the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRow {
    pub respondent_id: i64,
    pub economy: String,
    pub economy_code: String,
    pub region: String,
    pub gender: Gender,
    pub age_group: AgeGroup,
    pub education: Education,
    pub income_group: IncomeGroup,
    pub has_account: bool,
    pub saves_in_account: bool,
    pub can_raise_emergency_funds: bool,
    pub has_debit_card: bool,
}

impl CohortRow {
    fn from_respondent(r: &Respondent) -> DataResult<Self> {
        Ok(CohortRow {
            respondent_id: r.respondent_id,
            economy: r.economy.clone(),
            economy_code: r.economy_code.clone(),
            region: r.region.clone(),
            gender: Gender::from_code(r.female),
            age_group: AgeGroup::from_age(r.age)?,
            education: Education::from_code(r.educ)?,
            income_group: IncomeGroup::from_code(r.inc_q)?,
            has_account: yes_no("account_fin", r.account_fin)?,
            saves_in_account: yes_no("fin17a", r.fin17a)?,
            can_raise_emergency_funds: yes_no("fin24", r.fin24)?,
            has_debit_card: yes_no("fin2", r.fin2)?,
        })
    }
}

/// Relabel a dataset into a fresh cohort table.
///
/// The first out-of-domain code aborts the whole derivation; a partially
/// relabelled table is never returned.
pub fn derive_cohorts(dataset: &SurveyDataset) -> DataResult<Vec<CohortRow>> {
    dataset
        .respondents
        .iter()
        .map(CohortRow::from_respondent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::respondent;

    #[test]
    fn education_map_is_total_over_its_domain() {
        assert_eq!(Education::from_code(1).unwrap().label(), "primary");
        assert_eq!(Education::from_code(2).unwrap().label(), "secondary");
        assert_eq!(Education::from_code(3).unwrap().label(), "tertiary");
        match Education::from_code(4) {
            Err(DataError::UnmappedCode { column, code }) => {
                assert_eq!(column, "educ");
                assert_eq!(code, 4);
            }
            other => panic!("expected UnmappedCode, got {other:?}"),
        }
    }

    #[test]
    fn income_map_covers_all_five_quintiles() {
        let labels: Vec<&str> = (1..=5)
            .map(|c| IncomeGroup::from_code(c).unwrap().label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "A - poorest 20%",
                "B - second 20%",
                "C - middle 20%",
                "D - fourth 20%",
                "E - richest 20%",
            ]
        );
        assert!(IncomeGroup::from_code(0).is_err());
        assert!(IncomeGroup::from_code(6).is_err());
    }

    #[test]
    fn yes_no_reads_one_as_true_and_rest_of_domain_as_false() {
        assert!(yes_no("fin2", 1).unwrap());
        for code in [0, 2, 3, 4] {
            assert!(!yes_no("fin2", code).unwrap());
        }
        assert!(matches!(
            yes_no("fin2", 7),
            Err(DataError::UnmappedCode { column: "fin2", code: 7 })
        ));
    }

    #[test]
    fn age_brackets_are_left_closed() {
        assert_eq!(AgeGroup::from_age(15.0).unwrap().label(), "15-24");
        assert_eq!(AgeGroup::from_age(24.999).unwrap().label(), "15-24");
        assert_eq!(AgeGroup::from_age(25.0).unwrap().label(), "25-34");
        assert_eq!(AgeGroup::from_age(54.999).unwrap().label(), "45-54");
        assert_eq!(AgeGroup::from_age(55.0).unwrap().label(), "55 and older");
        assert_eq!(AgeGroup::from_age(90.0).unwrap().label(), "55 and older");
    }

    #[test]
    fn underage_and_nan_are_rejected() {
        assert!(matches!(
            AgeGroup::from_age(14.5),
            Err(DataError::AgeOutOfDomain(_))
        ));
        assert!(matches!(
            AgeGroup::from_age(f64::NAN),
            Err(DataError::AgeOutOfDomain(_))
        ));
    }

    #[test]
    fn gender_flag_is_binary_total() {
        assert_eq!(Gender::from_code(1), Gender::Male);
        assert_eq!(Gender::from_code(2), Gender::Female);
        assert_eq!(Gender::from_code(0), Gender::Female);
    }

    #[test]
    fn derivation_aborts_on_first_bad_code_and_leaves_source_intact() {
        let mut bad = respondent("Philippines", 2);
        bad.educ = 9;
        let ds = crate::data::model::SurveyDataset::from_respondents(vec![
            respondent("Philippines", 1),
            bad,
        ]);
        let before = ds.clone();
        assert!(derive_cohorts(&ds).is_err());
        assert_eq!(ds, before);
    }

    #[test]
    fn derived_rows_carry_labels_not_codes() {
        let ds = crate::data::model::SurveyDataset::from_respondents(vec![respondent(
            "Philippines",
            1,
        )]);
        let rows = derive_cohorts(&ds).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.age_group.label(), "25-34");
        assert_eq!(row.education.label(), "secondary");
        assert!(row.has_account);
        assert!(!row.saves_in_account);
        assert!(row.can_raise_emergency_funds);
        assert!(!row.has_debit_card);
    }
}
