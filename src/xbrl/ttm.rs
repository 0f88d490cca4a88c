//! The Trailing-Twelve-Months Engine: stock-split detection and retrospective
//! adjustment, quarter derivation from YTD/FY aggregates, EPS derivation, and rolling
//! four-quarter TTM computation.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::xbrl::fact::{Fact, StatementType};
use crate::xbrl::period::FiscalPeriod;
use crate::xbrl::statement::StitchedStatement;

/// A later filing restating the same split more than this many days after the split's
/// own period end is a stale "historical echo", not a live detection.
pub const MAX_SPLIT_LAG_DAYS: i64 = 280;
/// A `StockSplitConversionRatio` fact whose duration exceeds this many days is an
/// aggregation over a comparative period, not the split event itself.
pub const MAX_SPLIT_DURATION_DAYS: i64 = 45;
/// Largest gap allowed between two adjacent quarters' period ends for a TTM calculation
/// to be considered gap-free.
pub const MAX_TTM_QUARTER_GAP_DAYS: i64 = 100;

/// A detected stock split: the date it took effect and its conversion ratio (2.0 for a
/// 2-for-1 split).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockSplit {
    pub date: NaiveDate,
    pub ratio: f64,
}

/// Scans `facts` for `StockSplitConversionRatio` facts, rejecting stale echoes and
/// comparative-period aggregations, deduplicating by `(year, ratio)`, and returning the
/// survivors sorted by date.
pub fn detect_splits(facts: &[Fact]) -> Vec<StockSplit> {
    let mut candidates: Vec<StockSplit> = Vec::new();
    let mut seen: Vec<(i32, u64)> = Vec::new();

    for fact in facts {
        if !fact.concept.to_ascii_lowercase().contains("stocksplitconversionratio") {
            continue;
        }
        let Some(ratio) = fact.numeric_value else { continue };
        if ratio <= 0.0 {
            continue;
        }
        let Some(period_end) = fact.period_end else { continue };

        if let Some(filing_date) = fact.filing_date {
            if (filing_date - period_end).num_days() > MAX_SPLIT_LAG_DAYS {
                continue;
            }
        }
        if let Some(period_start) = fact.period_start {
            if (period_end - period_start).num_days() > MAX_SPLIT_DURATION_DAYS {
                continue;
            }
        }

        let dedupe_key = (period_end.format("%Y").to_string().parse::<i32>().unwrap_or(0), ratio.to_bits());
        if seen.contains(&dedupe_key) {
            continue;
        }
        seen.push(dedupe_key);
        candidates.push(StockSplit { date: period_end, ratio });
    }

    candidates.sort_by_key(|s| s.date);
    candidates
}

/// Clones `facts`, dividing per-share values and multiplying share counts by the
/// cumulative ratio of every split that postdates the fact's period end and that the
/// fact (by filing date) predates — i.e. had not yet been restated for.
/// `apply_split_adjustments(facts, &[])` is a no-op: every fact's `numeric_value` is
/// preserved exactly.
pub fn apply_split_adjustments(facts: &[Fact], splits: &[StockSplit]) -> Vec<Fact> {
    facts
        .iter()
        .map(|fact| {
            if splits.is_empty() || !(fact.is_per_share() || fact.is_share_count()) {
                return fact.clone();
            }
            let Some(period_end) = fact.period_end else { return fact.clone() };

            let ratio: f64 = splits
                .iter()
                .filter(|s| s.date > period_end && fact.filing_date.map(|fd| fd <= s.date).unwrap_or(true))
                .map(|s| s.ratio)
                .product();

            if ratio <= 0.0 || (ratio - 1.0).abs() < f64::EPSILON {
                return fact.clone();
            }

            let Some(value) = fact.numeric_value else { return fact.clone() };
            let adjusted = if fact.is_per_share() { value / ratio } else { value * ratio };

            let mut clone = fact.clone();
            clone.numeric_value = Some(adjusted);
            clone.value = adjusted.to_string();
            clone.calculation_context = Some(format!("split_adj_ratio_{ratio:.2}"));
            clone
        })
        .collect()
}

/// One fiscal year's worth of duration facts for a single concept, bucketed by the
/// fiscal-period shape the quarterizer and EPS derivation both need.
#[derive(Debug, Clone, Default)]
struct FiscalYearGroup {
    q1: Option<Fact>,
    q2: Option<Fact>,
    q3: Option<Fact>,
    q4: Option<Fact>,
    ytd6: Option<Fact>,
    ytd9: Option<Fact>,
    fy: Option<Fact>,
}

fn group_by_fiscal_year(facts: &[Fact]) -> HashMap<i32, FiscalYearGroup> {
    let mut groups: HashMap<i32, FiscalYearGroup> = HashMap::new();
    for fact in facts {
        let Some(year) = fact.fiscal_year else { continue };
        let Some(fp) = fact.fiscal_period else { continue };
        let group = groups.entry(year).or_default();
        match fp {
            FiscalPeriod::Q1 => group.q1.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::Q2 => group.q2.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::Q3 => group.q3.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::Q4 => group.q4.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::Ytd(6) => group.ytd6.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::Ytd(9) => group.ytd9.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::FY => group.fy.get_or_insert_with(|| fact.clone()),
            FiscalPeriod::Ytd(_) => continue,
        };
    }
    groups
}

fn derived_fact(template: &Fact, value: f64, period_start: NaiveDate, period_end: NaiveDate, fiscal_period: FiscalPeriod, context: String) -> Fact {
    let mut f = template.clone();
    f.value = value.to_string();
    f.numeric_value = Some(value);
    f.period_start = Some(period_start);
    f.period_end = Some(period_end);
    f.fiscal_period = Some(fiscal_period);
    f.calculation_context = Some(context);
    f
}

/// Derives discrete quarterly facts for one concept from whatever mix of `Q1..Q4` and
/// YTD/FY duration facts is present. Quarters already reported discretely
/// pass through untouched; quarterizing an already-fully-quarterly set (no YTD/FY facts
/// present) returns that same set unchanged.
pub fn quarterize_concept(facts: &[Fact]) -> Vec<Fact> {
    let groups = group_by_fiscal_year(facts);
    let mut out = Vec::new();

    for (_, group) in groups {
        if let Some(q1) = &group.q1 {
            out.push(q1.clone());
        }

        match (&group.q2, &group.ytd6, &group.q1) {
            (Some(q2), _, _) => out.push(q2.clone()),
            (None, Some(ytd6), Some(q1)) => {
                if let (Some(v6), Some(v1), Some(end)) = (ytd6.numeric_value, q1.numeric_value, q1.period_end) {
                    out.push(derived_fact(
                        ytd6,
                        v6 - v1,
                        end + chrono::Duration::days(1),
                        ytd6.period_end.unwrap_or(end),
                        FiscalPeriod::Q2,
                        "derived_q2_from_ytd_6m_and_q1".to_string(),
                    ));
                }
            }
            _ => {}
        }

        match (&group.q3, &group.ytd9, &group.ytd6) {
            (Some(q3), _, _) => out.push(q3.clone()),
            (None, Some(ytd9), Some(ytd6)) => {
                if let (Some(v9), Some(v6), Some(end6)) = (ytd9.numeric_value, ytd6.numeric_value, ytd6.period_end) {
                    out.push(derived_fact(
                        ytd9,
                        v9 - v6,
                        end6 + chrono::Duration::days(1),
                        ytd9.period_end.unwrap_or(end6),
                        FiscalPeriod::Q3,
                        "derived_q3_from_ytd_9m_and_ytd_6m".to_string(),
                    ));
                }
            }
            _ => {}
        }

        match (&group.q4, &group.fy, &group.ytd9) {
            (Some(q4), _, _) => out.push(q4.clone()),
            (None, Some(fy), Some(ytd9)) => {
                if let (Some(vfy), Some(v9), Some(end9)) = (fy.numeric_value, ytd9.numeric_value, ytd9.period_end) {
                    out.push(derived_fact(
                        fy,
                        vfy - v9,
                        end9 + chrono::Duration::days(1),
                        fy.period_end.unwrap_or(end9),
                        FiscalPeriod::Q4,
                        "derived_q4_from_fy_and_ytd_9m".to_string(),
                    ));
                }
            }
            (None, Some(fy), None) => {
                if let (Some(vfy), Some(v1), Some(v2), Some(v3)) = (
                    fy.numeric_value,
                    group.q1.as_ref().and_then(|f| f.numeric_value),
                    group.q2.as_ref().and_then(|f| f.numeric_value),
                    group.q3.as_ref().and_then(|f| f.numeric_value),
                ) {
                    let start = group
                        .q3
                        .as_ref()
                        .and_then(|f| f.period_end)
                        .map(|d| d + chrono::Duration::days(1))
                        .unwrap_or(fy.period_end.unwrap_or_default());
                    out.push(derived_fact(
                        fy,
                        vfy - v1 - v2 - v3,
                        start,
                        fy.period_end.unwrap_or(start),
                        FiscalPeriod::Q4,
                        "derived_q4_from_fy_q1_q2_q3".to_string(),
                    ));
                }
            }
            _ => {}
        }
    }

    out
}

fn quarter_months(fp: FiscalPeriod) -> Option<(i64, i64)> {
    match fp {
        FiscalPeriod::Q1 => Some((3, 0)),
        FiscalPeriod::Q2 => Some((6, 3)),
        FiscalPeriod::Q3 => Some((9, 6)),
        FiscalPeriod::Q4 => Some((12, 9)),
        _ => None,
    }
}

/// Approximates each quarter's weighted-average share count from cumulative YTD/FY
/// averages using `Q_shares ≈ N·WA_YTD_N − P·WA_YTD_(N−1)`, a documented approximation,
/// not an exact reconstruction.
fn quarterly_weighted_shares(group: &FiscalYearGroup) -> HashMap<FiscalPeriod, f64> {
    let mut out = HashMap::new();
    if let Some(v) = group.q1.as_ref().and_then(|f| f.numeric_value) {
        out.insert(FiscalPeriod::Q1, v);
    }
    let cumulative = |fp: FiscalPeriod| -> Option<f64> {
        match fp {
            FiscalPeriod::Q1 => group.q1.as_ref().and_then(|f| f.numeric_value),
            FiscalPeriod::Q2 => group.ytd6.as_ref().and_then(|f| f.numeric_value),
            FiscalPeriod::Q3 => group.ytd9.as_ref().and_then(|f| f.numeric_value),
            FiscalPeriod::Q4 => group.fy.as_ref().and_then(|f| f.numeric_value),
            _ => None,
        }
    };
    for fp in [FiscalPeriod::Q2, FiscalPeriod::Q3, FiscalPeriod::Q4] {
        let Some((n, p)) = quarter_months(fp) else { continue };
        let prior_fp = match fp {
            FiscalPeriod::Q2 => FiscalPeriod::Q1,
            FiscalPeriod::Q3 => FiscalPeriod::Q2,
            FiscalPeriod::Q4 => FiscalPeriod::Q3,
            _ => continue,
        };
        if let (Some(cum_n), Some(cum_p)) = (cumulative(fp), cumulative(prior_fp)) {
            out.insert(fp, n as f64 * cum_n - p as f64 * cum_p);
        }
    }
    out
}

/// Derives missing quarterly EPS facts (basic and diluted) from quarterized net income
/// and approximated quarterly share counts, never overwriting an EPS fact that already
/// exists for a given `(period_end, fiscal_period)`.
pub fn derive_eps(
    net_income_facts: &[Fact],
    shares_basic_facts: &[Fact],
    shares_diluted_facts: &[Fact],
    existing_eps_basic: &[Fact],
    existing_eps_diluted: &[Fact],
) -> Vec<Fact> {
    let ni_groups = group_by_fiscal_year(net_income_facts);
    let basic_groups = group_by_fiscal_year(shares_basic_facts);
    let diluted_groups = group_by_fiscal_year(shares_diluted_facts);

    let has_existing = |existing: &[Fact], period_end: NaiveDate, fp: FiscalPeriod| {
        existing
            .iter()
            .any(|f| f.period_end == Some(period_end) && f.fiscal_period == Some(fp))
    };

    let mut out = Vec::new();
    for (year, ni_group) in &ni_groups {
        let quarterly_ni: HashMap<FiscalPeriod, Fact> = quarterize_concept(net_income_facts)
            .into_iter()
            .filter(|f| f.fiscal_year == Some(*year))
            .filter_map(|f| f.fiscal_period.map(|fp| (fp, f)))
            .collect();

        for (concept_label, unit, shares_groups, existing, is_diluted) in [
            ("us-gaap:EarningsPerShareBasic", "USD/shares", &basic_groups, existing_eps_basic, false),
            ("us-gaap:EarningsPerShareDiluted", "USD/shares", &diluted_groups, existing_eps_diluted, true),
        ] {
            let Some(shares_group) = shares_groups.get(year) else { continue };
            let weighted_shares = quarterly_weighted_shares(shares_group);

            for fp in [FiscalPeriod::Q1, FiscalPeriod::Q2, FiscalPeriod::Q3, FiscalPeriod::Q4] {
                let Some(ni_fact) = quarterly_ni.get(&fp) else { continue };
                let Some(period_end) = ni_fact.period_end else { continue };
                if has_existing(existing, period_end, fp) {
                    continue;
                }
                let shares = if fp == FiscalPeriod::Q1 {
                    shares_group.q1.as_ref().and_then(|f| f.numeric_value)
                } else {
                    weighted_shares.get(&fp).copied()
                };
                let (Some(ni), Some(shares)) = (ni_fact.numeric_value, shares) else { continue };
                if shares == 0.0 {
                    continue;
                }
                let eps = ni / shares;
                out.push(Fact {
                    concept: concept_label.to_string(),
                    taxonomy: "us-gaap".to_string(),
                    label: if is_diluted { "EPS (Diluted)" } else { "EPS (Basic)" }.to_string(),
                    value: eps.to_string(),
                    numeric_value: Some(eps),
                    unit: unit.to_string(),
                    period_start: ni_fact.period_start,
                    period_end: Some(period_end),
                    period_type: ni_fact.period_type,
                    fiscal_year: Some(*year),
                    fiscal_period: Some(fp),
                    filing_date: ni_fact.filing_date,
                    form_type: ni_fact.form_type.clone(),
                    accession: ni_fact.accession.clone(),
                    statement_type: Some(StatementType::IncomeStatement),
                    decimals: None,
                    calculation_context: Some(format!("derived_eps_{fp}_from_net_income_and_shares")),
                });
            }
        }
    }
    out
}

/// A trailing-twelve-months value computed from the most recent four quarters.
#[derive(Debug, Clone)]
pub struct TtmMetric {
    pub value: f64,
    pub periods: [Fact; 4],
    pub has_gaps: bool,
    pub as_of: NaiveDate,
}

fn latest_four_quarters(facts: &[Fact], as_of: Option<NaiveDate>) -> Option<Vec<Fact>> {
    let mut quarterly: Vec<Fact> = facts
        .iter()
        .filter(|f| f.fiscal_period.map(|fp| fp.is_quarter()).unwrap_or(false))
        .filter(|f| f.period_end.is_some())
        .filter(|f| as_of.map(|cutoff| f.period_end.unwrap() <= cutoff).unwrap_or(true))
        .cloned()
        .collect();
    quarterly.sort_by_key(|f| std::cmp::Reverse(f.period_end));
    quarterly.dedup_by_key(|f| f.period_end);
    if quarterly.len() < 4 {
        return None;
    }
    Some(quarterly.into_iter().take(4).collect())
}

/// Sums the most recent four quarters' values for one concept, as of `as_of` (or the
/// globally most recent quarter when `None`). Requires no gap larger than
/// [`MAX_TTM_QUARTER_GAP_DAYS`] between adjacent quarter ends.
pub fn calculate_ttm(facts: &[Fact], as_of: Option<NaiveDate>) -> Option<TtmMetric> {
    let quarters = latest_four_quarters(facts, as_of)?;
    let value: f64 = quarters.iter().filter_map(|f| f.numeric_value).sum();
    let has_gaps = quarters.windows(2).any(|w| {
        let a = w[0].period_end.unwrap();
        let b = w[1].period_end.unwrap();
        (a - b).num_days() > MAX_TTM_QUARTER_GAP_DAYS
    });
    let as_of_date = quarters[0].period_end.unwrap();
    let periods: [Fact; 4] = quarters.try_into().ok()?;
    Some(TtmMetric { value, periods, has_gaps, as_of: as_of_date })
}

/// EPS is not a sum: TTM net income divided by the average of the four quarters'
/// weighted-average share counts.
pub fn calculate_ttm_eps(quarterly_net_income: &[Fact], quarterly_shares: &[Fact], as_of: Option<NaiveDate>) -> Option<f64> {
    let ni_quarters = latest_four_quarters(quarterly_net_income, as_of)?;
    let ttm_ni: f64 = ni_quarters.iter().filter_map(|f| f.numeric_value).sum();
    let share_quarters = latest_four_quarters(quarterly_shares, as_of)?;
    let avg_shares: f64 =
        share_quarters.iter().filter_map(|f| f.numeric_value).sum::<f64>() / share_quarters.len() as f64;
    if avg_shares == 0.0 {
        return None;
    }
    Some(ttm_ni / avg_shares)
}

/// One point on a rolling TTM trend.
#[derive(Debug, Clone)]
pub struct TtmTrendPoint {
    pub as_of_quarter: String,
    pub ttm_value: f64,
    pub fiscal_year: i32,
    pub fiscal_period: FiscalPeriod,
    pub as_of_date: NaiveDate,
}

/// Rolling four-quarter sums at each quarter end, newest-first, going back up to
/// `periods` quarters.
pub fn calculate_ttm_trend(facts: &[Fact], periods: usize) -> Vec<TtmTrendPoint> {
    let mut quarterly: Vec<Fact> = facts
        .iter()
        .filter(|f| f.fiscal_period.map(|fp| fp.is_quarter()).unwrap_or(false))
        .filter(|f| f.period_end.is_some())
        .cloned()
        .collect();
    quarterly.sort_by_key(|f| std::cmp::Reverse(f.period_end));
    quarterly.dedup_by_key(|f| f.period_end);

    let mut out = Vec::new();
    for start in 0..quarterly.len() {
        if out.len() >= periods {
            break;
        }
        let Some(window) = quarterly.get(start..start + 4) else { break };
        if window.windows(2).any(|w| {
            (w[0].period_end.unwrap() - w[1].period_end.unwrap()).num_days() > MAX_TTM_QUARTER_GAP_DAYS
        }) {
            continue;
        }
        let value: f64 = window.iter().filter_map(|f| f.numeric_value).sum();
        let anchor = &window[0];
        out.push(TtmTrendPoint {
            as_of_quarter: format!("{}-{}", anchor.fiscal_year.unwrap_or_default(), anchor.fiscal_period.unwrap()),
            ttm_value: value,
            fiscal_year: anchor.fiscal_year.unwrap_or_default(),
            fiscal_period: anchor.fiscal_period.unwrap(),
            as_of_date: anchor.period_end.unwrap(),
        });
    }
    out
}

/// One line of a TTM statement: a rolling TTM trend keyed by the shared `as_of_quarter`
/// axis.
#[derive(Debug, Clone)]
pub struct TtmLineItem {
    pub label: String,
    pub concept: String,
    pub depth: u32,
    pub is_total: bool,
    pub values: HashMap<String, f64>,
}

/// A full rolling-TTM multi-line statement, aligned to one shared period axis.
#[derive(Debug, Clone)]
pub struct TtmStatement {
    pub statement_type: StatementType,
    pub as_of_date: NaiveDate,
    pub items: Vec<TtmLineItem>,
    pub periods: Vec<String>,
    pub company_name: Option<String>,
    pub cik: Option<String>,
}

const PREFERRED_BASE_CONCEPTS: &[&str] = &[
    "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax",
    "us-gaap:Revenues",
    "us-gaap:SalesRevenueNet",
    "us-gaap:NetIncomeLoss",
];

/// Builds a `TTMStatement` from a non-TTM multi-period statement and a per-concept
/// quarterized (and split-adjusted) fact map. Balance-sheet TTM is unsupported since
/// point-in-time values don't roll, and returns `None` in that case.
pub fn build_ttm_statement(
    statement: &StitchedStatement,
    statement_type: StatementType,
    facts_by_concept: &HashMap<String, Vec<Fact>>,
    as_of_date: NaiveDate,
    company_name: Option<String>,
    cik: Option<String>,
) -> Option<TtmStatement> {
    if statement_type == StatementType::BalanceSheet {
        return None;
    }

    let trend_for = |concept: &str| -> Vec<TtmTrendPoint> {
        facts_by_concept
            .get(concept)
            .map(|facts| calculate_ttm_trend(facts, usize::MAX))
            .unwrap_or_default()
    };

    let base_axis: Vec<(i32, FiscalPeriod)> = PREFERRED_BASE_CONCEPTS
        .iter()
        .find_map(|concept| {
            let trend = trend_for(concept);
            (!trend.is_empty()).then(|| trend.iter().map(|p| (p.fiscal_year, p.fiscal_period)).collect())
        })
        .or_else(|| {
            statement.statement_data.iter().find_map(|li| {
                let trend = trend_for(&li.concept);
                (!trend.is_empty()).then(|| trend.iter().map(|p| (p.fiscal_year, p.fiscal_period)).collect())
            })
        })
        .unwrap_or_default();

    if base_axis.is_empty() {
        return None;
    }

    let axis_labels: Vec<String> = base_axis.iter().map(|(y, fp)| format!("{y}-{fp}")).collect();

    let items = statement
        .statement_data
        .iter()
        .map(|li| {
            let trend = trend_for(&li.concept);
            let by_axis: HashMap<(i32, FiscalPeriod), f64> =
                trend.into_iter().map(|p| ((p.fiscal_year, p.fiscal_period), p.ttm_value)).collect();
            let values = base_axis
                .iter()
                .zip(axis_labels.iter())
                .filter_map(|(key, label)| by_axis.get(key).map(|v| (label.clone(), *v)))
                .collect();
            TtmLineItem {
                label: li.label.clone(),
                concept: li.concept.clone(),
                depth: li.level,
                is_total: li.is_total,
                values,
            }
        })
        .collect();

    Some(TtmStatement {
        statement_type,
        as_of_date,
        items,
        periods: axis_labels,
        company_name,
        cik,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbrl::period::PeriodType;

    fn fact(fiscal_year: i32, fp: FiscalPeriod, end: &str, value: f64) -> Fact {
        Fact {
            concept: "us-gaap:Revenues".into(),
            taxonomy: "us-gaap".into(),
            label: "Revenue".into(),
            value: value.to_string(),
            numeric_value: Some(value),
            unit: "USD".into(),
            period_start: None,
            period_end: Some(NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap()),
            period_type: PeriodType::Duration,
            fiscal_year: Some(fiscal_year),
            fiscal_period: Some(fp),
            filing_date: None,
            form_type: None,
            accession: None,
            statement_type: None,
            decimals: None,
            calculation_context: None,
        }
    }

    #[test]
    fn s1_quarterization_matches_spec_scenario() {
        let facts = vec![
            fact(2024, FiscalPeriod::Q1, "2024-03-31", 100.0),
            fact(2024, FiscalPeriod::Ytd(6), "2024-06-30", 210.0),
            fact(2024, FiscalPeriod::Ytd(9), "2024-09-30", 330.0),
            fact(2024, FiscalPeriod::FY, "2024-12-31", 460.0),
        ];
        let mut quarterized = quarterize_concept(&facts);
        quarterized.sort_by_key(|f| f.period_end);
        let values: Vec<f64> = quarterized.iter().filter_map(|f| f.numeric_value).collect();
        assert_eq!(values, vec![100.0, 110.0, 120.0, 130.0]);

        let ttm = calculate_ttm(&quarterized, None).unwrap();
        assert_eq!(ttm.value, 460.0);
    }

    #[test]
    fn quarterizing_already_quarterly_facts_is_a_no_op() {
        let facts = vec![
            fact(2024, FiscalPeriod::Q1, "2024-03-31", 100.0),
            fact(2024, FiscalPeriod::Q2, "2024-06-30", 110.0),
            fact(2024, FiscalPeriod::Q3, "2024-09-30", 120.0),
            fact(2024, FiscalPeriod::Q4, "2024-12-31", 130.0),
        ];
        let mut quarterized = quarterize_concept(&facts);
        quarterized.sort_by_key(|f| f.period_end);
        let values: Vec<f64> = quarterized.iter().filter_map(|f| f.numeric_value).collect();
        assert_eq!(values, vec![100.0, 110.0, 120.0, 130.0]);
    }

    #[test]
    fn s2_split_adjustment_halves_eps_and_doubles_shares() {
        let mut eps = fact(2023, FiscalPeriod::FY, "2023-12-31", 10.0);
        eps.concept = "us-gaap:EarningsPerShareBasic".into();
        eps.unit = "USD/shares".into();
        let mut shares = fact(2023, FiscalPeriod::FY, "2023-12-31", 100.0);
        shares.concept = "us-gaap:WeightedAverageNumberOfSharesOutstandingBasic".into();
        shares.unit = "shares".into();

        let splits = vec![StockSplit { date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), ratio: 2.0 }];
        let adjusted = apply_split_adjustments(&[eps, shares], &splits);

        assert_eq!(adjusted[0].numeric_value, Some(5.0));
        assert!(adjusted[0].calculation_context.as_ref().unwrap().contains("ratio_2.00"));
        assert_eq!(adjusted[1].numeric_value, Some(200.0));
    }

    #[test]
    fn split_adjustment_with_no_splits_preserves_values_exactly() {
        let facts = vec![fact(2024, FiscalPeriod::Q1, "2024-03-31", 100.0)];
        let adjusted = apply_split_adjustments(&facts, &[]);
        assert_eq!(adjusted[0].numeric_value, facts[0].numeric_value);
    }

    #[test]
    fn s3_stale_split_is_rejected() {
        let mut split_fact = fact(2020, FiscalPeriod::FY, "2020-01-31", 4.0);
        split_fact.concept = "us-gaap:StockSplitConversionRatio".into();
        split_fact.filing_date = Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        let splits = detect_splits(&[split_fact]);
        assert!(splits.is_empty());
    }

    #[test]
    fn fresh_split_within_lag_window_is_detected() {
        let mut split_fact = fact(2024, FiscalPeriod::FY, "2024-01-15", 2.0);
        split_fact.concept = "us-gaap:StockSplitConversionRatio".into();
        split_fact.filing_date = Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let splits = detect_splits(&[split_fact]);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].ratio, 2.0);
    }

    #[test]
    fn calculate_ttm_detects_gap() {
        let facts = vec![
            fact(2024, FiscalPeriod::Q1, "2024-03-31", 100.0),
            fact(2024, FiscalPeriod::Q2, "2024-06-30", 110.0),
            fact(2024, FiscalPeriod::Q3, "2024-09-30", 120.0),
            fact(2023, FiscalPeriod::Q1, "2023-03-31", 90.0),
        ];
        let ttm = calculate_ttm(&facts, None).unwrap();
        assert!(ttm.has_gaps);
    }
}
