//! Period selection: for each single-filing XBRL view, pick the
//! period(s) that best represent it for a given statement type, then deduplicate and
//! sort across filings.

use chrono::NaiveDate;

use crate::xbrl::fact::StatementType;
use crate::xbrl::period::{DayRange, FiscalPeriod, PeriodType};
use crate::xbrl::statement::{EntityInfo, PeriodMeta, XbrlFiling};

/// Named day-ranges used to classify a duration period's apparent span.
#[derive(Debug, Clone, Copy)]
pub struct PeriodSelectionConfig {
    pub annual: DayRange,
    pub quarterly: DayRange,
    pub q2_ytd: DayRange,
    pub q3_ytd: DayRange,
}

impl Default for PeriodSelectionConfig {
    fn default() -> Self {
        Self {
            annual: DayRange::new(350, 380, 365),
            quarterly: DayRange::new(80, 100, 90),
            q2_ytd: DayRange::new(175, 190, 180),
            q3_ytd: DayRange::new(260, 285, 270),
        }
    }
}

/// A period selected for inclusion in a stitched statement, enriched with display and
/// fiscal metadata.
#[derive(Debug, Clone)]
pub struct SelectedPeriod {
    pub xbrl_index: usize,
    pub period_key: String,
    pub period_label: String,
    pub period_type: PeriodType,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub display_date: NaiveDate,
    pub fiscal_period: Option<FiscalPeriod>,
    pub fiscal_year: Option<i32>,
}

impl SelectedPeriod {
    fn from_meta(xbrl_index: usize, key: &str, meta: &PeriodMeta, entity: &EntityInfo) -> Self {
        let period_label = build_period_label(meta, entity);
        SelectedPeriod {
            xbrl_index,
            period_key: key.to_string(),
            period_label,
            period_type: meta.period_type,
            start_date: meta.start_date,
            end_date: meta.end_date,
            display_date: meta.end_date,
            fiscal_period: entity.fiscal_period,
            fiscal_year: entity.fiscal_year,
        }
    }
}

fn build_period_label(meta: &PeriodMeta, entity: &EntityInfo) -> String {
    match (entity.fiscal_period, meta.period_type) {
        (Some(FiscalPeriod::FY), _) => format!("FY {}", meta.end_date.format("%Y")),
        (Some(fp @ (FiscalPeriod::Q1 | FiscalPeriod::Q2 | FiscalPeriod::Q3 | FiscalPeriod::Q4)), PeriodType::Duration) => {
            let days = meta
                .start_date
                .map(|s| (meta.end_date - s).num_days())
                .unwrap_or(0);
            if days > 100 {
                format!("{fp} YTD {}", meta.end_date.format("%Y-%m-%d"))
            } else {
                format!("{fp} {}", meta.end_date.format("%Y-%m-%d"))
            }
        }
        (_, PeriodType::Instant) => format!("As of {}", meta.end_date.format("%Y-%m-%d")),
        _ => format!("{}", meta.end_date.format("%Y-%m-%d")),
    }
}

/// Classifies a duration's span against the named ranges. Returns `None` when the span
/// fits none of them (the period is simply not a candidate for fuzzy/fallback selection).
fn duration_kind(days: i64, cfg: &PeriodSelectionConfig) -> Option<&'static str> {
    if cfg.annual.contains(days) {
        Some("annual")
    } else if cfg.q3_ytd.contains(days) {
        Some("q3_ytd")
    } else if cfg.q2_ytd.contains(days) {
        Some("q2_ytd")
    } else if cfg.quarterly.contains(days) {
        Some("quarterly")
    } else {
        None
    }
}

/// Selects the period(s) from one filing that best represent it for `statement_type`.
/// `xbrl_index` identifies the source filing in the caller's ordered filing list.
pub fn select_periods(
    statement_type: StatementType,
    xbrl_index: usize,
    filing: &XbrlFiling,
    cfg: &PeriodSelectionConfig,
) -> Vec<SelectedPeriod> {
    let Some(statement) = filing.statement(statement_type) else {
        return Vec::new();
    };
    let entity = &filing.entity_info;

    match statement_type {
        StatementType::BalanceSheet => select_instant(xbrl_index, statement, entity),
        _ => select_duration(xbrl_index, statement, entity, cfg),
    }
}

fn select_instant(
    xbrl_index: usize,
    statement: &crate::xbrl::statement::Statement,
    entity: &EntityInfo,
) -> Vec<SelectedPeriod> {
    let instants: Vec<(&str, &PeriodMeta)> = statement
        .periods
        .iter()
        .filter(|(_, m)| m.period_type == PeriodType::Instant)
        .collect();

    if let Some(target) = entity.document_period_end_date {
        // Exact match only; no fuzzy fallback crosses a fiscal-year boundary.
        return instants
            .into_iter()
            .find(|(_, m)| m.end_date == target)
            .map(|(k, m)| vec![SelectedPeriod::from_meta(xbrl_index, k, m, entity)])
            .unwrap_or_default();
    }

    instants
        .into_iter()
        .max_by_key(|(_, m)| m.end_date)
        .map(|(k, m)| vec![SelectedPeriod::from_meta(xbrl_index, k, m, entity)])
        .unwrap_or_default()
}

fn select_duration(
    xbrl_index: usize,
    statement: &crate::xbrl::statement::Statement,
    entity: &EntityInfo,
    cfg: &PeriodSelectionConfig,
) -> Vec<SelectedPeriod> {
    let durations: Vec<(&str, &PeriodMeta)> = statement
        .periods
        .iter()
        .filter(|(_, m)| m.period_type == PeriodType::Duration)
        .collect();

    if durations.is_empty() {
        return Vec::new();
    }

    let Some(target) = entity.document_period_end_date else {
        // Fallback: sort by end date descending, take the first matching-duration period.
        return durations
            .into_iter()
            .max_by_key(|(_, m)| m.end_date)
            .map(|(k, m)| vec![SelectedPeriod::from_meta(xbrl_index, k, m, entity)])
            .unwrap_or_default();
    };

    let matching: Vec<(&str, &PeriodMeta)> = durations
        .into_iter()
        .filter(|(_, m)| m.end_date == target)
        .collect();
    if matching.is_empty() {
        return Vec::new();
    }

    let chosen = match entity.fiscal_period {
        Some(FiscalPeriod::FY) | None => matching.into_iter().min_by_key(|(_, m)| {
            let days = m
                .start_date
                .map(|s| (m.end_date - s).num_days())
                .unwrap_or(0);
            cfg.annual.distance_from_target(days)
        }),
        Some(fp) if fp.is_quarter() => {
            // Prefer the YTD-range duration over the plain quarterly one when both exist.
            let ytd = matching.iter().find(|(_, m)| {
                let days = m
                    .start_date
                    .map(|s| (m.end_date - s).num_days())
                    .unwrap_or(0);
                matches!(duration_kind(days, cfg), Some("q2_ytd") | Some("q3_ytd") | Some("annual"))
                    && days > cfg.quarterly.max
            });
            ytd.copied().or_else(|| matching.into_iter().next())
        }
        _ => matching.into_iter().next(),
    };

    chosen
        .map(|(k, m)| vec![SelectedPeriod::from_meta(xbrl_index, k, m, entity)])
        .unwrap_or_default()
}

/// Deduplicates and sorts selected periods newest-first, truncating to `max_periods`.
/// Two periods are duplicates iff same type and same date(s): for
/// durations BOTH `start_date` and `end_date` must match.
pub fn dedupe_and_sort(mut periods: Vec<SelectedPeriod>, max_periods: usize) -> Vec<SelectedPeriod> {
    let mut seen: Vec<(PeriodType, Option<NaiveDate>, NaiveDate)> = Vec::new();
    periods.retain(|p| {
        let sig = (p.period_type, p.start_date, p.end_date);
        if seen.contains(&sig) {
            false
        } else {
            seen.push(sig);
            true
        }
    });
    periods.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    periods.truncate(max_periods);
    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbrl::statement::{OrderedMap, Statement};

    fn meta(period_type: PeriodType, start: Option<&str>, end: &str) -> PeriodMeta {
        PeriodMeta {
            period_type,
            start_date: start.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()),
            end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            label: String::new(),
        }
    }

    fn statement(statement_type: StatementType, periods: Vec<(&str, PeriodMeta)>) -> Statement {
        let mut map = OrderedMap::new();
        for (k, v) in periods {
            map.insert(k, v);
        }
        Statement {
            statement_type,
            role: String::new(),
            definition: String::new(),
            periods: map,
            data: Vec::new(),
        }
    }

    fn filing(entity: EntityInfo, statement: Statement) -> XbrlFiling {
        XbrlFiling {
            entity_info: entity,
            statements: vec![statement],
            facts: Vec::new(),
            form_type: "10-Q".into(),
            accession: "0000320193-24-000001".into(),
            filing_date: None,
        }
    }

    #[test]
    fn q2_prefers_ytd_over_quarterly_when_both_present() {
        let entity = EntityInfo {
            document_period_end_date: Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            fiscal_period: Some(FiscalPeriod::Q2),
            fiscal_year: Some(2024),
            ..Default::default()
        };
        let stmt = statement(
            StatementType::IncomeStatement,
            vec![
                ("quarterly", meta(PeriodType::Duration, Some("2024-04-01"), "2024-06-30")),
                ("ytd", meta(PeriodType::Duration, Some("2024-01-01"), "2024-06-30")),
            ],
        );
        let f = filing(entity, stmt);
        let cfg = PeriodSelectionConfig::default();
        let selected = select_periods(StatementType::IncomeStatement, 0, &f, &cfg);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].period_key, "ytd");
    }

    #[test]
    fn balance_sheet_requires_exact_instant_match_no_fuzzy_fallback() {
        let entity = EntityInfo {
            document_period_end_date: Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            ..Default::default()
        };
        let stmt = statement(
            StatementType::BalanceSheet,
            vec![("other", meta(PeriodType::Instant, None, "2024-03-31"))],
        );
        let f = filing(entity, stmt);
        let cfg = PeriodSelectionConfig::default();
        let selected = select_periods(StatementType::BalanceSheet, 0, &f, &cfg);
        assert!(selected.is_empty());
    }

    #[test]
    fn dedupe_keeps_distinct_quarterly_and_ytd_with_shared_end_date() {
        let a = SelectedPeriod {
            xbrl_index: 0,
            period_key: "duration_2024-04-01_2024-06-30".into(),
            period_label: String::new(),
            period_type: PeriodType::Duration,
            start_date: Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            display_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            fiscal_period: Some(FiscalPeriod::Q2),
            fiscal_year: Some(2024),
        };
        let mut b = a.clone();
        b.period_key = "duration_2024-01-01_2024-06-30".into();
        b.start_date = Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let deduped = dedupe_and_sort(vec![a, b], 8);
        assert_eq!(deduped.len(), 2);
    }
}
