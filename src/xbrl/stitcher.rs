//! The XBRL Stitcher: concept integration across an ordered list of single-filing XBRL
//! views, the standardization/merge pass, and final row ordering.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::xbrl::fact::{normalize_concept, StatementType};
use crate::xbrl::ordering::{self, ConceptEntry};
use crate::xbrl::period_optimizer::{self, PeriodSelectionConfig, SelectedPeriod};
use crate::xbrl::statement::{CellValue, LineItem, StitchedStatement, XbrlFiling};
use crate::xbrl::templates::{self, ConceptMapper};
use crate::xbrl::tree::{self, TreeInput};

const DIMENSION_SUFFIXES: &[&str] = &["[Axis]", "[Domain]", "[Member]", "[Line Items]", "[Table]", "[Abstract]"];

fn is_dimension_wrapper_label(label: &str) -> bool {
    let trimmed = label.trim_end();
    DIMENSION_SUFFIXES.iter().any(|s| trimmed.ends_with(s))
}

/// Per-concept bookkeeping the integration pass needs across filings: the display label
/// currently in use, whether it's been standardized, and enough recency/position context
/// to decide label migration and reference ordering.
#[derive(Debug, Clone)]
struct ConceptMetadata {
    concept: String,
    current_key: String,
    standard_concept: Option<String>,
    is_abstract: bool,
    is_total: bool,
    level: u32,
    latest_period_end: Option<NaiveDate>,
    reference_index: Option<usize>,
}

/// Stitches single-filing XBRL views for one entity into a unified multi-period
/// statement. Holds no mutable state of its own; every call is a pure function of its
/// inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementStitcher {
    period_config: PeriodSelectionConfig,
}

impl StatementStitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filings` must be newest-first. `None` entries (pre-XBRL era, or a filing whose
    /// XBRL failed to parse) are skipped defensively.
    pub fn stitch(
        &self,
        filings: &[Option<XbrlFiling>],
        statement_type: StatementType,
        max_periods: usize,
        standardize: bool,
    ) -> StitchedStatement {
        let mapper = ConceptMapper::new();
        let template = templates::template_for(statement_type);

        // Period selection across all filings, then dedupe/sort/truncate globally.
        let mut all_periods: Vec<SelectedPeriod> = Vec::new();
        for (idx, filing) in filings.iter().enumerate() {
            let Some(filing) = filing else { continue };
            all_periods.extend(period_optimizer::select_periods(statement_type, idx, filing, &self.period_config));
        }
        let selected = period_optimizer::dedupe_and_sort(all_periods, max_periods);
        let period_keys: Vec<String> = selected.iter().map(|p| p.period_key.clone()).collect();
        let period_key_set: std::collections::HashSet<&str> = period_keys.iter().map(String::as_str).collect();

        // Concept integration, newest filing first.
        let mut metadata: Vec<ConceptMetadata> = Vec::new();
        let mut data: HashMap<String, HashMap<String, CellValue>> = HashMap::new();

        let reference_filing_idx = filings.iter().position(Option::is_some);

        for (filing_idx, filing) in filings.iter().enumerate() {
            let Some(filing) = filing else { continue };
            let Some(statement) = filing.statement(statement_type) else { continue };

            for (pres_idx, item) in statement.data.iter().enumerate() {
                if is_dimension_wrapper_label(&item.label) {
                    continue;
                }
                if item.is_abstract && !has_child_below(&statement.data, pres_idx, item.level) {
                    continue;
                }

                let normalized = normalize_concept(&item.concept);
                let mapping = if standardize {
                    mapper.standardize(statement_type, &item.concept)
                } else {
                    None
                };

                let existing_pos = metadata.iter().position(|m| normalize_concept(&m.concept) == normalized);

                let item_periods_max_end = statement
                    .periods
                    .iter()
                    .filter(|(k, _)| period_key_set.contains(k))
                    .map(|(_, meta)| meta.end_date)
                    .max();

                let key = match existing_pos {
                    None => {
                        let label = mapping.as_ref().map(|m| m.label.clone()).unwrap_or_else(|| item.label.clone());
                        let reference_index = (Some(filing_idx) == reference_filing_idx).then_some(pres_idx);
                        metadata.push(ConceptMetadata {
                            concept: item.concept.clone(),
                            current_key: label.clone(),
                            standard_concept: mapping.as_ref().map(|m| m.standard_concept.clone()),
                            is_abstract: item.is_abstract,
                            is_total: item.is_total,
                            level: item.level,
                            latest_period_end: item_periods_max_end,
                            reference_index,
                        });
                        label
                    }
                    Some(i) => {
                        let entry = &mut metadata[i];
                        if let Some(m) = &mapping {
                            // A non-null standard_concept propagates even from an older
                            // filing.
                            entry.standard_concept = Some(m.standard_concept.clone());
                        }
                        let is_more_recent = match (item_periods_max_end, entry.latest_period_end) {
                            (Some(new), Some(old)) => new > old,
                            (Some(_), None) => true,
                            _ => false,
                        };
                        if is_more_recent && item.label != entry.current_key {
                            let old_key = entry.current_key.clone();
                            entry.current_key = item.label.clone();
                            if let Some(moved) = data.remove(&old_key) {
                                data.insert(entry.current_key.clone(), moved);
                            }
                        }
                        if is_more_recent {
                            entry.latest_period_end = item_periods_max_end;
                        }
                        if Some(filing_idx) == reference_filing_idx {
                            entry.reference_index.get_or_insert(pres_idx);
                        }
                        entry.current_key.clone()
                    }
                };

                let slot = data.entry(key).or_default();
                for (period_key, cell) in item.values.iter() {
                    if !period_key_set.contains(period_key) {
                        continue;
                    }
                    slot.entry(period_key.to_string()).or_insert(*cell);
                }
            }
        }

        let (metadata, data) = merge_by_standard_concept(metadata, data);

        let ordered_keys = self.order_concepts(&metadata, &data, template, &period_keys);

        let statement_data: Vec<LineItem> = ordered_keys
            .into_iter()
            .filter_map(|key| {
                let meta = metadata.iter().find(|m| m.current_key == key)?;
                let values = data.get(&key).cloned().unwrap_or_default();
                let mut ordered = crate::xbrl::statement::OrderedMap::new();
                for pk in &period_keys {
                    if let Some(v) = values.get(pk) {
                        ordered.insert(pk.clone(), *v);
                    }
                }
                Some(LineItem {
                    concept: meta.concept.clone(),
                    label: key.clone(),
                    standard_concept: meta.standard_concept.clone(),
                    level: meta.level,
                    is_abstract: meta.is_abstract,
                    is_total: meta.is_total,
                    values: ordered,
                    presentation_index: meta.reference_index.unwrap_or(usize::MAX),
                })
            })
            .collect();

        let periods = selected
            .into_iter()
            .map(|p| (p.period_key, p.period_label))
            .collect();

        StitchedStatement { periods, statement_data }
    }

    fn order_concepts(
        &self,
        metadata: &[ConceptMetadata],
        data: &HashMap<String, HashMap<String, CellValue>>,
        template: Option<&templates::OrderingTemplate>,
        period_keys: &[String],
    ) -> Vec<String> {
        let entries: Vec<ConceptEntry> = metadata
            .iter()
            .filter(|m| data.get(&m.current_key).map(|d| !d.is_empty()).unwrap_or(false) || !period_keys.is_empty())
            .map(|m| ConceptEntry {
                concept_key: m.current_key.clone(),
                concept: m.concept.clone(),
                label: m.current_key.clone(),
                reference_index: m.reference_index,
            })
            .collect();

        let positioned = ordering::compute_positions(&entries, template);
        let mut order: Vec<(String, f64)> = positioned.into_iter().map(|p| (p.concept_key, p.position)).collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let positions: HashMap<&str, f64> = order.iter().map(|(k, p)| (k.as_str(), *p)).collect();

        let mut reference_entries: Vec<(usize, &ConceptMetadata)> = metadata
            .iter()
            .filter_map(|m| m.reference_index.map(|idx| (idx, m)))
            .collect();
        reference_entries.sort_by_key(|(idx, _)| *idx);

        if !reference_entries.is_empty() {
            let tree_inputs: Vec<TreeInput> = reference_entries
                .iter()
                .enumerate()
                .map(|(original_index, (_, m))| TreeInput {
                    concept_key: m.current_key.clone(),
                    label: m.current_key.clone(),
                    level: m.level,
                    original_index,
                    position: positions.get(m.current_key.as_str()).copied(),
                })
                .collect();
            let tree_flat = tree::build_and_flatten(tree_inputs);

            let ref_keys: std::collections::HashSet<&str> =
                reference_entries.iter().map(|(_, m)| m.current_key.as_str()).collect();
            let slots: Vec<usize> = order
                .iter()
                .enumerate()
                .filter(|(_, (k, _))| ref_keys.contains(k.as_str()))
                .map(|(i, _)| i)
                .collect();
            for (slot, key) in slots.into_iter().zip(tree_flat.into_iter()) {
                order[slot].0 = key;
            }
        }

        order.into_iter().map(|(k, _)| k).collect()
    }
}

/// Merge pass: if two different concept_keys share a non-null `standard_concept` and
/// their period sets are disjoint, union them under one key (newest contributor's
/// label); overlapping periods are left as separate rows.
fn merge_by_standard_concept(
    mut metadata: Vec<ConceptMetadata>,
    mut data: HashMap<String, HashMap<String, CellValue>>,
) -> (Vec<ConceptMetadata>, HashMap<String, HashMap<String, CellValue>>) {
    let mut i = 0;
    while i < metadata.len() {
        let Some(std_i) = metadata[i].standard_concept.clone() else {
            i += 1;
            continue;
        };
        let mut j = i + 1;
        let mut merged_any = false;
        while j < metadata.len() {
            if metadata[j].standard_concept.as_deref() == Some(std_i.as_str()) {
                let periods_i: std::collections::HashSet<String> =
                    data.get(&metadata[i].current_key).map(|d| d.keys().cloned().collect()).unwrap_or_default();
                let periods_j: std::collections::HashSet<String> =
                    data.get(&metadata[j].current_key).map(|d| d.keys().cloned().collect()).unwrap_or_default();
                if periods_i.is_disjoint(&periods_j) {
                    if let Some(dj) = data.remove(&metadata[j].current_key) {
                        data.entry(metadata[i].current_key.clone()).or_default().extend(dj);
                    }
                    metadata.remove(j);
                    merged_any = true;
                    continue;
                }
            }
            j += 1;
        }
        if !merged_any {
            i += 1;
        }
    }
    (metadata, data)
}

/// Returns `true` when `items[idx]` (an abstract heading at `level`) is immediately
/// followed by at least one item at a deeper level before the next item at `level` or
/// shallower — i.e. it has children and should not be skipped.
fn has_child_below(items: &[LineItem], idx: usize, level: u32) -> bool {
    items[idx + 1..]
        .iter()
        .take_while(|it| it.level > level)
        .next()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbrl::statement::{EntityInfo, OrderedMap, PeriodMeta, Statement};
    use crate::xbrl::period::PeriodType;

    fn line(concept: &str, label: &str, level: u32, is_abstract: bool, values: &[(&str, f64)]) -> LineItem {
        let mut ordered = OrderedMap::new();
        for (k, v) in values {
            ordered.insert(*k, CellValue { numeric: Some(*v), decimals: None });
        }
        LineItem {
            concept: concept.to_string(),
            label: label.to_string(),
            standard_concept: None,
            level,
            is_abstract,
            is_total: false,
            values: ordered,
            presentation_index: 0,
        }
    }

    fn filing(accession: &str, end: &str, fiscal_year: i32, items: Vec<LineItem>) -> Option<XbrlFiling> {
        let end_date = NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap();
        let start_date = NaiveDate::from_ymd_opt(fiscal_year, 1, 1).unwrap();
        let mut periods = OrderedMap::new();
        periods.insert(
            format!("duration_{start_date}_{end_date}"),
            PeriodMeta { period_type: PeriodType::Duration, start_date: Some(start_date), end_date, label: String::new() },
        );
        Some(XbrlFiling {
            entity_info: EntityInfo {
                document_period_end_date: Some(end_date),
                fiscal_period: Some(crate::xbrl::period::FiscalPeriod::FY),
                fiscal_year: Some(fiscal_year),
                ..Default::default()
            },
            statements: vec![Statement {
                statement_type: StatementType::IncomeStatement,
                role: String::new(),
                definition: String::new(),
                periods,
                data: items,
            }],
            facts: Vec::new(),
            form_type: "10-K".into(),
            accession: accession.into(),
            filing_date: Some(end_date),
        })
    }

    #[test]
    fn stitching_is_idempotent() {
        let filings = vec![filing(
            "0000320193-24-000001",
            "2024-12-31",
            2024,
            vec![
                line("us-gaap:Revenues", "Revenue", 0, false, &[("duration_2024-01-01_2024-12-31", 1000.0)]),
                line("us-gaap:NetIncomeLoss", "Net Income", 0, false, &[("duration_2024-01-01_2024-12-31", 200.0)]),
            ],
        )];
        let stitcher = StatementStitcher::new();
        let a = stitcher.stitch(&filings, StatementType::IncomeStatement, 8, true);
        let b = stitcher.stitch(&filings, StatementType::IncomeStatement, 8, true);
        assert_eq!(a.periods, b.periods);
        let labels_a: Vec<&str> = a.statement_data.iter().map(|l| l.label.as_str()).collect();
        let labels_b: Vec<&str> = b.statement_data.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels_a, labels_b);
    }

    #[test]
    fn no_duplicate_periods_in_stitched_output() {
        let filings = vec![
            filing(
                "0000320193-24-000002",
                "2024-12-31",
                2024,
                vec![line("us-gaap:Revenues", "Revenue", 0, false, &[("duration_2024-01-01_2024-12-31", 1000.0)])],
            ),
            filing(
                "0000320193-23-000001",
                "2023-12-31",
                2023,
                vec![line("us-gaap:Revenues", "Revenue", 0, false, &[("duration_2023-01-01_2023-12-31", 900.0)])],
            ),
        ];
        let stitcher = StatementStitcher::new();
        let stitched = stitcher.stitch(&filings, StatementType::IncomeStatement, 8, true);
        assert!(!stitched.has_duplicate_periods());
        assert_eq!(stitched.periods.len(), 2);
    }

    #[test]
    fn skipped_none_entry_does_not_break_stitch() {
        let filings = vec![
            None,
            filing(
                "0000320193-24-000001",
                "2024-12-31",
                2024,
                vec![line("us-gaap:Revenues", "Revenue", 0, false, &[("duration_2024-01-01_2024-12-31", 1000.0)])],
            ),
        ];
        let stitcher = StatementStitcher::new();
        let stitched = stitcher.stitch(&filings, StatementType::IncomeStatement, 8, true);
        assert_eq!(stitched.periods.len(), 1);
        assert_eq!(stitched.statement_data.len(), 1);
    }
}
