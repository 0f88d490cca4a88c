//! XBRL data model, multi-filing stitching, and trailing-twelve-months derivation.

mod fact;
mod ordering;
mod period;
mod period_optimizer;
mod statement;
mod stitcher;
mod templates;
#[cfg(feature = "ttm")]
mod ttm;
mod tree;
mod xbrls;

pub use fact::{normalize_concept, Fact, StatementType};
pub use period::{DayRange, FiscalPeriod, Period, PeriodType};
pub use period_optimizer::{PeriodSelectionConfig, SelectedPeriod};
pub use statement::{CellValue, EntityInfo, LineItem, OrderedMap, PeriodMeta, Statement, StitchedStatement, XbrlFiling};
pub use stitcher::StatementStitcher;
pub use templates::{
    template_for, ConceptMapper, OrderingTemplate, StandardMapping, TemplateSection, BALANCE_SHEET_TEMPLATE,
    CASH_FLOW_TEMPLATE, INCOME_STATEMENT_TEMPLATE,
};
#[cfg(feature = "ttm")]
pub use ttm::{
    apply_split_adjustments, build_ttm_statement, calculate_ttm, calculate_ttm_eps, calculate_ttm_trend,
    derive_eps, detect_splits, quarterize_concept, StockSplit, TtmLineItem, TtmMetric, TtmStatement, TtmTrendPoint,
    MAX_SPLIT_DURATION_DAYS, MAX_SPLIT_LAG_DAYS, MAX_TTM_QUARTER_GAP_DAYS,
};
pub use xbrls::{StitchedFactQuery, TrendGrid, TrendRow, Xbrls};
