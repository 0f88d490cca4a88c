//! The XBRL `Fact`: one reported value, and the closed set of statement types it can
//! belong to.

use chrono::NaiveDate;

use crate::xbrl::period::{FiscalPeriod, PeriodType};

/// Closed set of statement kinds the stitcher and TTM engine operate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    IncomeStatement,
    BalanceSheet,
    CashFlowStatement,
    StatementOfEquity,
    ComprehensiveIncome,
}

/// One reported XBRL fact, as emitted by a single filing's XBRL instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    /// Namespaced XBRL concept, e.g. `us-gaap:Revenues`.
    pub concept: String,
    pub taxonomy: String,
    pub label: String,
    /// Raw reported text of the value.
    pub value: String,
    pub numeric_value: Option<f64>,
    pub unit: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub period_type: PeriodType,
    pub fiscal_year: Option<i32>,
    pub fiscal_period: Option<FiscalPeriod>,
    pub filing_date: Option<NaiveDate>,
    pub form_type: Option<String>,
    pub accession: Option<String>,
    pub statement_type: Option<StatementType>,
    pub decimals: Option<i32>,
    /// Free-form provenance note, e.g. `split_adj_ratio_2.00` or
    /// `derived_q2_from_ytd_6m_q1`.
    pub calculation_context: Option<String>,
}

impl Fact {
    /// `true` when the unit denotes a per-share quantity (EPS, book value per share):
    /// the unit string contains `/share`, or (defensively) the concept name itself
    /// contains `earningspershare`.
    pub fn is_per_share(&self) -> bool {
        let unit = self.unit.to_ascii_lowercase();
        unit.contains("/share") || self.concept.to_ascii_lowercase().contains("earningspershare")
    }

    /// `true` when the unit denotes a raw share count (not per-share).
    pub fn is_share_count(&self) -> bool {
        let unit = self.unit.to_ascii_lowercase();
        unit.contains("shares") && !self.is_per_share()
    }

    /// Normalizes a concept identifier for cross-filing comparison: lowercase, `:` to
    /// `_`, and namespace aliasing so `us-gaap`, `usgaap`, and `gaap` compare equal
    ///.
    pub fn normalize_concept(concept: &str) -> String {
        normalize_concept(concept)
    }
}

/// Normalizes a concept identifier the same way for facts, templates, and the
/// presentation tree so all three sides of a comparison agree.
pub fn normalize_concept(concept: &str) -> String {
    let lower = concept.to_ascii_lowercase().replace(':', "_");
    for alias in ["us-gaap_", "usgaap_", "us_gaap_"] {
        if let Some(rest) = lower.strip_prefix(alias) {
            return format!("gaap_{rest}");
        }
    }
    lower
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_aliases_normalize_equal() {
        assert_eq!(normalize_concept("us-gaap:Revenues"), normalize_concept("usgaap:Revenues"));
        assert_eq!(normalize_concept("us-gaap:Revenues"), "gaap_revenues");
    }

    #[test]
    fn per_share_and_share_count_detection() {
        let mut f = Fact {
            concept: "us-gaap:EarningsPerShareBasic".into(),
            taxonomy: "us-gaap".into(),
            label: "EPS".into(),
            value: "1.0".into(),
            numeric_value: Some(1.0),
            unit: "USD/shares".into(),
            period_start: None,
            period_end: None,
            period_type: PeriodType::Duration,
            fiscal_year: None,
            fiscal_period: None,
            filing_date: None,
            form_type: None,
            accession: None,
            statement_type: None,
            decimals: None,
            calculation_context: None,
        };
        assert!(f.is_per_share());
        assert!(!f.is_share_count());
        f.unit = "shares".into();
        f.concept = "us-gaap:WeightedAverageNumberOfSharesOutstandingBasic".into();
        assert!(!f.is_per_share());
        assert!(f.is_share_count());
    }
}
