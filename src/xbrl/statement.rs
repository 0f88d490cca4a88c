//! Single-filing statements and the entity/filing context the stitcher consumes.

use chrono::NaiveDate;

use crate::xbrl::fact::{Fact, StatementType};
use crate::xbrl::period::FiscalPeriod;

/// An ordered key→value association, preserving insertion order. Both a `Statement`'s
/// period axis and a `LineItem`'s per-period values are small (single digits to a few
/// dozen entries) so linear lookup is simpler and just as fast as a hash map here, and it
/// keeps iteration order meaningful without a second sorted index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(existing) = self.get_mut(&key) {
            *existing = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A reported value and its reporting precision, keyed by period within a `LineItem`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellValue {
    pub numeric: Option<f64>,
    pub decimals: Option<i32>,
}

/// Minimal description of a period as it appears on a `Statement`'s period axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMeta {
    pub period_type: crate::xbrl::period::PeriodType,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub label: String,
}

/// One row of a financial statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub concept: String,
    pub label: String,
    pub standard_concept: Option<String>,
    pub level: u32,
    pub is_abstract: bool,
    pub is_total: bool,
    pub values: OrderedMap<CellValue>,
    /// Index within the filing's own presentation order; used as a reference-ordering
    /// fallback and by the presentation tree.
    pub presentation_index: usize,
}

impl LineItem {
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn numeric(&self, period_key: &str) -> Option<f64> {
        self.values.get(period_key).and_then(|v| v.numeric)
    }
}

/// One statement extracted from a single filing's XBRL.
#[derive(Debug, Clone)]
pub struct Statement {
    pub statement_type: StatementType,
    pub role: String,
    pub definition: String,
    pub periods: OrderedMap<PeriodMeta>,
    pub data: Vec<LineItem>,
}

/// Context carried alongside a filing's period list, used by the period optimizer to
/// pick the periods that best represent the filing.
#[derive(Debug, Clone, Default)]
pub struct EntityInfo {
    pub cik: Option<String>,
    pub entity_name: Option<String>,
    pub document_period_end_date: Option<NaiveDate>,
    pub fiscal_period: Option<FiscalPeriod>,
    pub fiscal_year: Option<i32>,
}

/// A single filing's XBRL view: the statements it carries plus the raw fact list the TTM
/// engine needs, and the filing-level context (entity info, form, accession, filing date)
/// the stitcher and period optimizer consume.
#[derive(Debug, Clone)]
pub struct XbrlFiling {
    pub entity_info: EntityInfo,
    pub statements: Vec<Statement>,
    pub facts: Vec<Fact>,
    pub form_type: String,
    pub accession: String,
    pub filing_date: Option<NaiveDate>,
}

impl XbrlFiling {
    pub fn statement(&self, statement_type: StatementType) -> Option<&Statement> {
        self.statements
            .iter()
            .find(|s| s.statement_type == statement_type)
    }
}

/// The output of stitching: a unified multi-period statement for one entity.
#[derive(Debug, Clone)]
pub struct StitchedStatement {
    /// `(period_key, display_label)`, newest first.
    pub periods: Vec<(String, String)>,
    pub statement_data: Vec<LineItem>,
}

impl StitchedStatement {
    /// No period key appears twice.
    pub fn has_duplicate_periods(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.periods.iter().any(|(k, _)| !seen.insert(k.clone()))
    }
}
