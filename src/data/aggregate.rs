use std::collections::BTreeMap;

use super::derive::CohortRow;
use super::error::{DataError, DataResult};
use super::model::CategoryValue;

// ---------------------------------------------------------------------------
// Grouping keys and outcome indicators
// ---------------------------------------------------------------------------

/// A categorical column the pipeline can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Economy,
    EconomyCode,
    Region,
    Gender,
    AgeGroup,
    Education,
    IncomeGroup,
    HasAccount,
}

impl GroupKey {
    /// Project a cohort row onto this key.
    pub fn value(self, row: &CohortRow) -> CategoryValue {
        match self {
            GroupKey::Economy => CategoryValue::str(row.economy.clone()),
            GroupKey::EconomyCode => CategoryValue::str(row.economy_code.clone()),
            GroupKey::Region => CategoryValue::str(row.region.clone()),
            GroupKey::Gender => CategoryValue::str(row.gender.label()),
            GroupKey::AgeGroup => CategoryValue::str(row.age_group.label()),
            GroupKey::Education => CategoryValue::str(row.education.label()),
            GroupKey::IncomeGroup => CategoryValue::str(row.income_group.label()),
            GroupKey::HasAccount => CategoryValue::Bool(row.has_account),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GroupKey::Economy => "economy",
            GroupKey::EconomyCode => "economy code",
            GroupKey::Region => "region",
            GroupKey::Gender => "gender",
            GroupKey::AgeGroup => "age group",
            GroupKey::Education => "education",
            GroupKey::IncomeGroup => "income group",
            GroupKey::HasAccount => "has account",
        }
    }
}

/// A boolean survey outcome the pipeline can count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    HasAccount,
    SavesInAccount,
    EmergencyFunds,
    DebitCard,
}

impl Indicator {
    pub fn value(self, row: &CohortRow) -> bool {
        match self {
            Indicator::HasAccount => row.has_account,
            Indicator::SavesInAccount => row.saves_in_account,
            Indicator::EmergencyFunds => row.can_raise_emergency_funds,
            Indicator::DebitCard => row.has_debit_card,
        }
    }
}

// ---------------------------------------------------------------------------
// aggregate_ratio – percentage of an indicator per cohort
// ---------------------------------------------------------------------------

/// One cohort's share of an indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioRow {
    /// The group-key values, in the order the keys were given.
    pub keys: Vec<CategoryValue>,
    /// Rows in the cohort where the indicator holds.
    pub numerator: u64,
    /// Total rows in the cohort.
    pub denominator: u64,
    /// `numerator * 100 / denominator`; `None` marks an empty cohort
    /// ("no data") instead of a NaN.
    pub percentage: Option<f64>,
}

impl RatioRow {
    /// Joined display label for the cohort.
    pub fn label(&self) -> String {
        self.keys
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Group `rows` by `keys` and compute the percentage of each cohort for
/// which `indicator` holds.
///
/// Cohorts are seeded from the observed rows, so the denominator is normally
/// positive; an empty denominator is still represented explicitly as
/// `percentage: None` rather than dropped or divided through. Output is
/// ordered by percentage descending, undefined rows last, ties broken by
/// the group keys ascending.
pub fn aggregate_ratio(rows: &[CohortRow], keys: &[GroupKey], indicator: Indicator) -> Vec<RatioRow> {
    let mut cohorts: BTreeMap<Vec<CategoryValue>, (u64, u64)> = BTreeMap::new();

    for row in rows {
        let key: Vec<CategoryValue> = keys.iter().map(|k| k.value(row)).collect();
        let counts = cohorts.entry(key).or_insert((0, 0));
        if indicator.value(row) {
            counts.0 += 1;
        }
        counts.1 += 1;
    }

    let mut out: Vec<RatioRow> = cohorts
        .into_iter()
        .map(|(keys, (numerator, denominator))| RatioRow {
            percentage: (denominator > 0)
                .then(|| numerator as f64 * 100.0 / denominator as f64),
            keys,
            numerator,
            denominator,
        })
        .collect();

    out.sort_by(|a, b| match (a.percentage, b.percentage) {
        (Some(pa), Some(pb)) => pb.total_cmp(&pa).then_with(|| a.keys.cmp(&b.keys)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.keys.cmp(&b.keys),
    });
    out
}

/// Whole-table share of rows where `indicator` holds, in percent.
/// `None` on an empty table.
pub fn overall_percentage(rows: &[CohortRow], indicator: Indicator) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let hits = rows.iter().filter(|r| indicator.value(r)).count();
    Some(hits as f64 * 100.0 / rows.len() as f64)
}

// ---------------------------------------------------------------------------
// cohort_compare – conditional probability of an outcome per cohort
// ---------------------------------------------------------------------------

/// One `(group, account, outcome)` cell of a cohort comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortPoint {
    pub group: CategoryValue,
    pub has_account: bool,
    pub outcome: bool,
    /// Respondents in this exact cell.
    pub count: u64,
    /// `count` over the `(group, account)` pair total, ignoring the outcome.
    pub probability: f64,
}

/// Count rows per `(group, account, outcome)` triple and divide each count
/// by its `(group, account)` pair total.
///
/// The pair totals are looked up by key, so a cohort observed for only one
/// outcome value still meets its own denominator; nothing is aligned by
/// position. A missing pair total cannot happen for an observed triple but
/// is still reported as [`DataError::UndefinedRatio`] rather than producing
/// a NaN. Output is a flat sequence ordered by (group, account, outcome).
pub fn cohort_compare(
    rows: &[CohortRow],
    group: GroupKey,
    account: Indicator,
    outcome: Indicator,
) -> DataResult<Vec<CohortPoint>> {
    let mut triples: BTreeMap<(CategoryValue, bool, bool), u64> = BTreeMap::new();
    let mut pairs: BTreeMap<(CategoryValue, bool), u64> = BTreeMap::new();

    for row in rows {
        let g = group.value(row);
        let a = account.value(row);
        let o = outcome.value(row);
        *triples.entry((g.clone(), a, o)).or_default() += 1;
        *pairs.entry((g, a)).or_default() += 1;
    }

    triples
        .into_iter()
        .map(|((g, a, o), count)| {
            let pair_total = pairs.get(&(g.clone(), a)).copied().unwrap_or(0);
            if pair_total == 0 {
                return Err(DataError::UndefinedRatio {
                    group: format!("{} = {g}, account = {a}", group.name()),
                });
            }
            Ok(CohortPoint {
                group: g,
                has_account: a,
                outcome: o,
                count,
                probability: count as f64 / pair_total as f64,
            })
        })
        .collect()
}

/// Extract one chartable line from a cohort comparison: the probability of
/// a positive outcome per group, restricted to the requested account flag.
/// Points keep the group order of the comparison.
pub fn resilience_series(points: &[CohortPoint], with_account: bool) -> Vec<(CategoryValue, f64)> {
    points
        .iter()
        .filter(|p| p.outcome && p.has_account == with_account)
        .map(|p| (p.group.clone(), p.probability))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive_cohorts;
    use crate::data::model::tests::respondent;
    use crate::data::model::SurveyDataset;

    fn cohorts(rows: Vec<crate::data::model::Respondent>) -> Vec<CohortRow> {
        derive_cohorts(&SurveyDataset::from_respondents(rows)).unwrap()
    }

    #[test]
    fn philippine_debit_card_scenario_yields_two_thirds() {
        let mut rows = Vec::new();
        for (id, fin2) in [(1, 1), (2, 2), (3, 1)] {
            let mut r = respondent("Philippines", id);
            r.fin2 = fin2;
            rows.push(r);
        }
        let table = cohorts(rows);

        let result = aggregate_ratio(&table, &[GroupKey::Economy], Indicator::DebitCard);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].numerator, 2);
        assert_eq!(result[0].denominator, 3);
        let pct = result[0].percentage.unwrap();
        assert!((pct - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(result[0].label(), "Philippines");
    }

    #[test]
    fn percentages_stay_within_bounds_and_numerators_conserve() {
        let mut rows = Vec::new();
        for id in 0..40 {
            let mut r = respondent(if id % 3 == 0 { "Malaysia" } else { "Vietnam" }, id);
            r.inc_q = (id % 5) + 1;
            r.account_fin = if id % 4 == 0 { 1 } else { 2 };
            rows.push(r);
        }
        let table = cohorts(rows);

        let result = aggregate_ratio(
            &table,
            &[GroupKey::Economy, GroupKey::IncomeGroup],
            Indicator::HasAccount,
        );
        for row in &result {
            let pct = row.percentage.unwrap();
            assert!((0.0..=100.0).contains(&pct));
            assert!(row.numerator <= row.denominator);
        }
        let numerator_sum: u64 = result.iter().map(|r| r.numerator).sum();
        let table_hits = table.iter().filter(|r| r.has_account).count() as u64;
        assert_eq!(numerator_sum, table_hits);
    }

    #[test]
    fn output_is_sorted_by_percentage_then_label() {
        let mut rows = Vec::new();
        // Cambodia 0/2, Malaysia 1/2, Vietnam 1/2 → Malaysia ties Vietnam.
        for (id, economy, fin2) in [
            (1, "Cambodia", 2),
            (2, "Cambodia", 2),
            (3, "Vietnam", 1),
            (4, "Vietnam", 2),
            (5, "Malaysia", 1),
            (6, "Malaysia", 2),
        ] {
            let mut r = respondent(economy, id);
            r.fin2 = fin2;
            rows.push(r);
        }
        let result = aggregate_ratio(&cohorts(rows), &[GroupKey::Economy], Indicator::DebitCard);
        let labels: Vec<String> = result.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["Malaysia", "Vietnam", "Cambodia"]);
    }

    #[test]
    fn overall_percentage_matches_single_group_aggregate() {
        let mut rows = Vec::new();
        for id in 0..10 {
            let mut r = respondent("Philippines", id);
            r.account_fin = if id < 3 { 1 } else { 2 };
            rows.push(r);
        }
        let table = cohorts(rows);
        let overall = overall_percentage(&table, Indicator::HasAccount).unwrap();
        assert!((overall - 30.0).abs() < 1e-9);
        assert_eq!(overall_percentage(&[], Indicator::HasAccount), None);
    }

    #[test]
    fn cohort_compare_splits_evenly_for_balanced_outcomes() {
        // Two 25-34 respondents with accounts, one can raise emergency
        // funds and one cannot.
        let mut with_funds = respondent("Philippines", 1);
        with_funds.fin24 = 1;
        let mut without_funds = respondent("Philippines", 2);
        without_funds.fin24 = 2;

        let points = cohort_compare(
            &cohorts(vec![with_funds, without_funds]),
            GroupKey::AgeGroup,
            Indicator::HasAccount,
            Indicator::EmergencyFunds,
        )
        .unwrap();

        assert_eq!(points.len(), 2);
        for point in &points {
            assert_eq!(point.group, CategoryValue::str("25-34"));
            assert!(point.has_account);
            assert_eq!(point.count, 1);
            assert!((point.probability - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn probabilities_sum_to_one_per_pair() {
        let mut rows = Vec::new();
        for id in 0..60 {
            let mut r = respondent("Philippines", id);
            r.age = 15.0 + (id % 50) as f64;
            r.account_fin = if id % 3 == 0 { 1 } else { 2 };
            r.fin24 = if id % 2 == 0 { 1 } else { 2 };
            rows.push(r);
        }
        let points = cohort_compare(
            &cohorts(rows),
            GroupKey::AgeGroup,
            Indicator::HasAccount,
            Indicator::EmergencyFunds,
        )
        .unwrap();

        let mut sums: BTreeMap<(CategoryValue, bool), f64> = BTreeMap::new();
        for p in &points {
            *sums.entry((p.group.clone(), p.has_account)).or_default() += p.probability;
        }
        for (_, sum) in sums {
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn one_sided_cohort_keeps_its_own_denominator() {
        // Every account holder in "15-24" can raise funds; the cohort is
        // observed for only one outcome value and must still divide by its
        // own pair total, not a neighbour's.
        let mut rows = Vec::new();
        for id in 0..3 {
            let mut r = respondent("Philippines", id);
            r.age = 20.0;
            r.fin24 = 1;
            rows.push(r);
        }
        let mut older = respondent("Philippines", 10);
        older.age = 40.0;
        older.fin24 = 2;
        rows.push(older);

        let points = cohort_compare(
            &cohorts(rows),
            GroupKey::AgeGroup,
            Indicator::HasAccount,
            Indicator::EmergencyFunds,
        )
        .unwrap();

        let young: Vec<&CohortPoint> = points
            .iter()
            .filter(|p| p.group == CategoryValue::str("15-24"))
            .collect();
        assert_eq!(young.len(), 1);
        assert_eq!(young[0].count, 3);
        assert!((young[0].probability - 1.0).abs() < 1e-12);

        let old: Vec<&CohortPoint> = points
            .iter()
            .filter(|p| p.group == CategoryValue::str("35-44"))
            .collect();
        assert_eq!(old.len(), 1);
        assert!(!old[0].outcome);
        assert!((old[0].probability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn resilience_series_filters_and_keeps_group_order() {
        let mut rows = Vec::new();
        for (id, age, account_fin, fin24) in [
            (1, 20.0, 1, 1),
            (2, 20.0, 1, 2),
            (3, 30.0, 1, 1),
            (4, 20.0, 2, 1),
            (5, 30.0, 2, 2),
        ] {
            let mut r = respondent("Philippines", id);
            r.age = age;
            r.account_fin = account_fin;
            r.fin24 = fin24;
            rows.push(r);
        }
        let points = cohort_compare(
            &cohorts(rows),
            GroupKey::AgeGroup,
            Indicator::HasAccount,
            Indicator::EmergencyFunds,
        )
        .unwrap();

        let with = resilience_series(&points, true);
        assert_eq!(
            with.iter().map(|(g, _)| g.clone()).collect::<Vec<_>>(),
            vec![CategoryValue::str("15-24"), CategoryValue::str("25-34")]
        );
        assert!((with[0].1 - 0.5).abs() < 1e-12);
        assert!((with[1].1 - 1.0).abs() < 1e-12);

        let without = resilience_series(&points, false);
        assert_eq!(without.len(), 1);
        assert_eq!(without[0].0, CategoryValue::str("15-24"));
        assert!((without[0].1 - 1.0).abs() < 1e-12);
    }
}
