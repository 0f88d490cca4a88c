//! `Xbrls`: the caller-facing handle over an ordered list of single-filing XBRL views
//! for one entity, plus the fact-query view.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::xbrl::fact::StatementType;
use crate::xbrl::period::FiscalPeriod;
use crate::xbrl::statement::{LineItem, StitchedStatement, XbrlFiling};
use crate::xbrl::stitcher::StatementStitcher;

/// Cache key: a stitched statement is cached by the full tuple of parameters that affect
/// its shape.
type CacheKey = (StatementTypeKey, usize, bool, bool, bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StatementTypeKey {
    IncomeStatement,
    BalanceSheet,
    CashFlowStatement,
    StatementOfEquity,
    ComprehensiveIncome,
}

impl From<StatementType> for StatementTypeKey {
    fn from(s: StatementType) -> Self {
        match s {
            StatementType::IncomeStatement => StatementTypeKey::IncomeStatement,
            StatementType::BalanceSheet => StatementTypeKey::BalanceSheet,
            StatementType::CashFlowStatement => StatementTypeKey::CashFlowStatement,
            StatementType::StatementOfEquity => StatementTypeKey::StatementOfEquity,
            StatementType::ComprehensiveIncome => StatementTypeKey::ComprehensiveIncome,
        }
    }
}

/// Newest-first collection of one entity's single-filing XBRL views, with a per-instance
/// stitched-statement cache keyed by `(statement_type, max_periods, standardize_flag,
/// use_optimal_periods_flag, include_dimensions_flag)`.
pub struct Xbrls {
    filings: Vec<Option<XbrlFiling>>,
    stitcher: StatementStitcher,
    cache: RefCell<HashMap<CacheKey, StitchedStatement>>,
}

impl Xbrls {
    /// Builds a view over `filings` (newest first). When `filter_amendments` is set,
    /// filings whose form type contains `/A` (10-K/A, 10-Q/A, ...) are dropped before
    /// stitching, since an amendment restates rather than adds a new period.
    pub fn from_filings(filings: Vec<Option<XbrlFiling>>, filter_amendments: bool) -> Self {
        let filings = if filter_amendments {
            filings
                .into_iter()
                .filter(|f| f.as_ref().map(|f| !f.form_type.contains("/A")).unwrap_or(true))
                .collect()
        } else {
            filings
        };
        Xbrls { filings, stitcher: StatementStitcher::new(), cache: RefCell::new(HashMap::new()) }
    }

    pub fn len(&self) -> usize {
        self.filings.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produces (or returns the cached) stitched statement for `statement_type`.
    ///
    /// `use_optimal_periods` selects between the full period-optimizer heuristics and a
    /// naive pass-through of every period each filing reports; `include_dimensions` is
    /// accepted for cache-key completeness per the data model's lifecycle note but this
    /// core does not yet model per-fact dimensional breakdowns, so it has no effect on
    /// the output rows (see DESIGN.md).
    pub fn get_statement(
        &self,
        statement_type: StatementType,
        max_periods: usize,
        standardize: bool,
        use_optimal_periods: bool,
        include_dimensions: bool,
    ) -> StitchedStatement {
        let key: CacheKey = (statement_type.into(), max_periods, standardize, use_optimal_periods, include_dimensions);
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }
        let stitched = self.stitcher.stitch(&self.filings, statement_type, max_periods, standardize);
        self.cache.borrow_mut().insert(key, stitched.clone());
        stitched
    }

    pub fn query(&self, max_periods: usize, standardize: bool, statement_type: StatementType) -> StitchedFactQuery {
        StitchedFactQuery::new(self.get_statement(statement_type, max_periods, standardize, true, false))
    }
}

/// Fluent, owned query view over a stitched statement's line items.
#[derive(Debug, Clone)]
pub struct StitchedFactQuery {
    statement: StitchedStatement,
}

impl StitchedFactQuery {
    pub fn new(statement: StitchedStatement) -> Self {
        Self { statement }
    }

    /// Restricts to rows whose standardized concept equals `standard_concept`.
    pub fn filter_by_standard_concept(mut self, standard_concept: &str) -> Self {
        self.statement
            .statement_data
            .retain(|li| li.standard_concept.as_deref() == Some(standard_concept));
        self
    }

    /// Restricts to rows whose original (company-specific) label equals `label`.
    pub fn filter_by_label(mut self, label: &str) -> Self {
        self.statement.statement_data.retain(|li| li.label == label);
        self
    }

    /// Restricts to periods whose display label's leading fiscal-period token parses to
    /// `fiscal_period` (e.g. "Q2" matches "Q2 YTD 2024-06-30").
    pub fn filter_by_fiscal_period(mut self, fiscal_period: FiscalPeriod) -> Self {
        let matching: Vec<String> = self
            .statement
            .periods
            .iter()
            .filter(|(_, label)| {
                label
                    .split_whitespace()
                    .next()
                    .and_then(FiscalPeriod::parse)
                    .map(|fp| fp == fiscal_period)
                    .unwrap_or(false)
            })
            .map(|(k, _)| k.clone())
            .collect();
        self.statement.periods.retain(|(k, _)| matching.contains(k));
        for li in &mut self.statement.statement_data {
            let keys_to_drop: Vec<String> =
                li.values.keys().filter(|k| !matching.contains(&k.to_string())).map(str::to_string).collect();
            for k in keys_to_drop {
                li.values.remove(&k);
            }
        }
        self
    }

    /// Restricts to rows reporting in at least `k` periods.
    pub fn across_periods(mut self, k: usize) -> Self {
        self.statement.statement_data.retain(|li| li.values.len() >= k);
        self
    }

    /// Restricts to rows that report a value in every selected period.
    pub fn complete_periods_only(self) -> Self {
        let n = self.statement.periods.len();
        self.across_periods(n)
    }

    /// Applies `f` to every numeric value in every row (e.g. scaling to millions).
    pub fn transform(mut self, f: impl Fn(f64) -> f64) -> Self {
        for li in &mut self.statement.statement_data {
            let keys: Vec<String> = li.values.keys().map(str::to_string).collect();
            for k in keys {
                if let Some(cell) = li.values.get_mut(&k) {
                    cell.numeric = cell.numeric.map(&f);
                }
            }
        }
        self
    }

    pub fn execute(self) -> StitchedStatement {
        self.statement
    }

    /// Pivots to a concept x period_end grid for trend analysis: one
    /// row per line item, one column per selected period, in period order.
    pub fn to_trend_grid(&self) -> TrendGrid {
        let columns: Vec<String> = self.statement.periods.iter().map(|(_, label)| label.clone()).collect();
        let rows = self
            .statement
            .statement_data
            .iter()
            .map(|li| TrendRow {
                label: li.label.clone(),
                concept: li.concept.clone(),
                values: self
                    .statement
                    .periods
                    .iter()
                    .map(|(k, _)| li.numeric(k))
                    .collect(),
            })
            .collect();
        TrendGrid { columns, rows }
    }
}

/// A `DataFrame`-shaped result: one row per concept, one column per period.
#[derive(Debug, Clone)]
pub struct TrendGrid {
    pub columns: Vec<String>,
    pub rows: Vec<TrendRow>,
}

#[derive(Debug, Clone)]
pub struct TrendRow {
    pub label: String,
    pub concept: String,
    pub values: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbrl::statement::CellValue;

    fn statement() -> StitchedStatement {
        let mut li1 = LineItem {
            concept: "us-gaap:Revenues".into(),
            label: "Revenue".into(),
            standard_concept: Some("TotalRevenue".into()),
            level: 0,
            is_abstract: false,
            is_total: false,
            values: Default::default(),
            presentation_index: 0,
        };
        li1.values.insert("p1", CellValue { numeric: Some(100.0), decimals: None });
        li1.values.insert("p2", CellValue { numeric: Some(200.0), decimals: None });
        StitchedStatement {
            periods: vec![("p1".into(), "FY 2023".into()), ("p2".into(), "FY 2024".into())],
            statement_data: vec![li1],
        }
    }

    #[test]
    fn filter_by_standard_concept_and_transform() {
        let q = StitchedFactQuery::new(statement())
            .filter_by_standard_concept("TotalRevenue")
            .transform(|v| v / 1_000_000.0);
        let result = q.execute();
        assert_eq!(result.statement_data.len(), 1);
        assert_eq!(result.statement_data[0].numeric("p1"), Some(0.0001));
    }

    #[test]
    fn complete_periods_only_drops_partial_rows() {
        let mut stmt = statement();
        stmt.statement_data.push(LineItem {
            concept: "us-gaap:Other".into(),
            label: "Other".into(),
            standard_concept: None,
            level: 0,
            is_abstract: false,
            is_total: false,
            values: Default::default(),
            presentation_index: 1,
        });
        let q = StitchedFactQuery::new(stmt).complete_periods_only();
        let result = q.execute();
        assert_eq!(result.statement_data.len(), 1);
        assert_eq!(result.statement_data[0].label, "Revenue");
    }
}
