//! The four-strategy concept ordering pipeline plus section consolidation: template
//! matching, reference ordering, semantic positioning, and a final pass that keeps
//! each template section's concepts contiguous.

use std::collections::HashMap;

use crate::xbrl::fact::normalize_concept;
use crate::xbrl::templates::OrderingTemplate;

/// Minimum token-overlap similarity for a template fuzzy-label match fallback.
pub const TEMPLATE_FUZZY_THRESHOLD: f64 = 0.7;
/// Minimum similarity for semantic "most-similar concept" placement (strategy 3).
pub const SEMANTIC_SIMILARITY_THRESHOLD: f64 = 0.5;

/// One concept awaiting a sort position, carrying everything the four strategies need.
#[derive(Debug, Clone)]
pub struct ConceptEntry {
    /// Display key used to identify this row in the output.
    pub concept_key: String,
    /// The underlying XBRL identifier, e.g. `us-gaap:Revenues`.
    pub concept: String,
    pub label: String,
    /// Index within the most-recent contributing filing's presentation order, when this
    /// concept appeared there.
    pub reference_index: Option<usize>,
}

/// Named section base positions independent of any one statement type's template, used
/// by semantic keyword classification so `StatementOfEquity`/`ComprehensiveIncome` (which
/// have no canonical template) still get coherent section buckets.
const SECTION_BASES: &[(&str, u32)] = &[
    ("revenue", 0),
    ("cost", 100),
    ("gross_profit", 200),
    ("operating_expenses", 300),
    ("operating_income", 400),
    ("non_operating", 500),
    ("pretax_income", 600),
    ("tax", 700),
    ("net_income", 800),
    ("per_share", 900),
    ("current_assets", 0),
    ("noncurrent_assets", 100),
    ("total_assets", 200),
    ("current_liabilities", 300),
    ("noncurrent_liabilities", 400),
    ("total_liabilities", 500),
    ("equity", 600),
    ("operating", 0),
    ("investing", 300),
    ("financing", 600),
    ("net_change", 900),
];

fn section_base(name: &str) -> Option<u32> {
    SECTION_BASES.iter().find(|(n, _)| *n == name).map(|(_, b)| *b)
}

/// Keyword classification of a concept name into a section ("revenue not preceded by
/// cost", "per share", etc).
fn classify_section(concept: &str) -> Option<&'static str> {
    let n = normalize_concept(concept);
    if n.contains("pershare") {
        return Some("per_share");
    }
    if n.contains("weightedaveragenumberof") && n.contains("shares") {
        return Some("per_share");
    }
    if n.contains("grossprofit") {
        return Some("gross_profit");
    }
    if (n.contains("researchanddevelopment")
        || n.contains("sellinggeneral")
        || n.contains("generalandadministrative")
        || n.contains("sellingandmarketing")
        || n.contains("operatingexpense"))
        && !n.contains("operatingincome")
    {
        return Some("operating_expenses");
    }
    if n.contains("operatingincome") {
        return Some("operating_income");
    }
    if n.contains("interest") || n.contains("nonoperating") {
        return Some("non_operating");
    }
    if n.contains("incometax") {
        return Some("tax");
    }
    if n.contains("netincome") || n.contains("profitloss") || n.contains("netearnings") {
        return Some("net_income");
    }
    if n.contains("revenue") || n.contains("sales") {
        if !n.contains("cost") {
            return Some("revenue");
        }
    }
    if n.contains("costof") || n.contains("costgoods") {
        return Some("cost");
    }
    if n.contains("totalassets") || (n.contains("asset") && n.contains("current")) {
        return Some("current_assets");
    }
    if n.contains("asset") && !n.contains("liab") {
        return Some(if n == "gaap_assets" { "total_assets" } else { "noncurrent_assets" });
    }
    if n.contains("liabilitiescurrent") {
        return Some("current_liabilities");
    }
    if n.contains("liabilit") {
        return Some(if n == "gaap_liabilities" { "total_liabilities" } else { "noncurrent_liabilities" });
    }
    if n.contains("stockholdersequity") || n.contains("commonstock") || n.contains("retainedearnings") {
        return Some("equity");
    }
    if n.contains("operatingactivities") {
        return Some("operating");
    }
    if n.contains("investingactivities") {
        return Some("investing");
    }
    if n.contains("financingactivities") {
        return Some("financing");
    }
    None
}

/// Token-set (word) Jaccard similarity over a normalized concept name, split on
/// underscores left by `normalize_concept`. Used both for the template fuzzy-match
/// fallback and the semantic "most similar concept" fallback, applied at two different
/// thresholds.
pub fn concept_similarity(a: &str, b: &str) -> f64 {
    let words = |s: &str| -> std::collections::HashSet<String> {
        normalize_concept(s)
            .split('_')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    };
    let wa = words(a);
    let wb = words(b);
    if wa.is_empty() || wb.is_empty() {
        return 0.0;
    }
    let intersection = wa.intersection(&wb).count();
    let union = wa.union(&wb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// `true` iff `a`'s word set is a (non-empty, proper-or-equal) subset of `b`'s — used for
/// parent-concept detection ("Assets" is a subset of "AssetsCurrent").
fn is_word_subset(a: &str, b: &str) -> bool {
    let words = |s: &str| -> std::collections::HashSet<String> {
        normalize_concept(s)
            .split('_')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    };
    let wa = words(a);
    let wb = words(b);
    !wa.is_empty() && wa.is_subset(&wb) && wa.len() < wb.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionSource {
    Template,
    Semantic,
    Reference,
    Fallback,
}

/// Final, consolidated position for one concept plus the section it was assigned to
/// (`None` for reference-ordered/fallback concepts with no section).
#[derive(Debug, Clone)]
pub struct PositionedConcept {
    pub concept_key: String,
    pub position: f64,
    pub section: Option<&'static str>,
}

/// Runs the full ordering pipeline: template match, reference order, semantic
/// positioning, then section consolidation. Returns positions in no particular order;
/// the caller sorts by `.position`.
pub fn compute_positions(entries: &[ConceptEntry], template: Option<&OrderingTemplate>) -> Vec<PositionedConcept> {
    let mut assigned: HashMap<String, (f64, PositionSource, Option<&'static str>)> = HashMap::new();
    let mut remaining: Vec<&ConceptEntry> = Vec::new();

    // Strategy 1: template matching, with fuzzy label fallback.
    for entry in entries {
        let normalized = normalize_concept(&entry.concept);
        if let Some(t) = template {
            if let Some(pos) = t.position_of(&normalized) {
                let section = t.section_for_position(pos).map(|s| s.name);
                assigned.insert(entry.concept_key.clone(), (pos as f64, PositionSource::Template, section));
                continue;
            }
            let fuzzy = t
                .all_concepts()
                .map(|(c, pos)| (concept_similarity(&entry.label, c), pos))
                .filter(|(sim, _)| *sim >= TEMPLATE_FUZZY_THRESHOLD)
                .max_by(|a, b| a.0.total_cmp(&b.0));
            if let Some((_, pos)) = fuzzy {
                let section = t.section_for_position(pos).map(|s| s.name);
                assigned.insert(entry.concept_key.clone(), (pos as f64, PositionSource::Template, section));
                continue;
            }
        }
        remaining.push(entry);
    }

    // Strategy 3 runs before "plain" reference ordering conceptually assigns a section
    // when possible, since a classified concept should join its section rather than be
    // stranded in pure presentation order; concepts with neither a section nor a
    // reference index fall through to the final 999 bucket.
    let mut still_remaining: Vec<&ConceptEntry> = Vec::new();
    for entry in remaining {
        if let Some(section) = classify_section(&entry.concept) {
            if let Some(base) = section_base(section) {
                // Position "at the end of" the section: offset 50 keeps room both below
                // (for template members) and above (for further semantic entries, ranked
                // by how many have already landed in this section).
                let already_in_section = assigned
                    .values()
                    .filter(|(_, _, s)| *s == Some(section))
                    .count() as f64;
                let pos = base as f64 + 50.0 + already_in_section;
                assigned.insert(entry.concept_key.clone(), (pos, PositionSource::Semantic, Some(section)));
                continue;
            }
        }
        still_remaining.push(entry);
    }

    // Strategy 2: reference ordering for anything left that appeared in the reference
    // filing's presentation order.
    let mut final_remaining: Vec<&ConceptEntry> = Vec::new();
    for entry in still_remaining {
        if let Some(idx) = entry.reference_index {
            assigned.insert(entry.concept_key.clone(), (1000.0 + idx as f64, PositionSource::Reference, None));
        } else {
            final_remaining.push(entry);
        }
    }

    // Strategy 3 (continued): parent-concept / most-similar-concept placement, else 999.
    for entry in final_remaining {
        let parent = assigned
            .iter()
            .find(|(key, _)| is_word_subset(key, &entry.concept))
            .map(|(_, (pos, _, section))| (*pos, *section));
        if let Some((pos, section)) = parent {
            assigned.insert(entry.concept_key.clone(), (pos + 0.5, PositionSource::Semantic, section));
            continue;
        }

        let most_similar = assigned
            .iter()
            .map(|(key, (pos, _, section))| (concept_similarity(key, &entry.concept), *pos, *section))
            .filter(|(sim, _, _)| *sim >= SEMANTIC_SIMILARITY_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((_, pos, section)) = most_similar {
            assigned.insert(entry.concept_key.clone(), (pos + 0.5, PositionSource::Semantic, section));
        } else {
            assigned.insert(entry.concept_key.clone(), (999.0, PositionSource::Fallback, None));
        }
    }

    consolidate_sections(assigned)
}

/// Strategy 4: re-derives dense, contiguous positions per section so that no
/// intervening concept (from another section, or an unsectioned reference/fallback
/// entry) can land between two concepts of the same section. `per_share` is a critical
/// section and is pinned at base 950 regardless of its nominal template base, so a
/// stray semantic placement elsewhere in the 900s can never fragment it.
fn consolidate_sections(
    assigned: HashMap<String, (f64, PositionSource, Option<&'static str>)>,
) -> Vec<PositionedConcept> {
    let mut by_section: HashMap<Option<&'static str>, Vec<(String, f64)>> = HashMap::new();
    for (key, (pos, _, section)) in &assigned {
        by_section.entry(*section).or_default().push((key.clone(), *pos));
    }

    let mut out = Vec::with_capacity(assigned.len());
    for (section, mut members) in by_section {
        members.sort_by(|a, b| a.1.total_cmp(&b.1));
        let base = match section {
            Some("per_share") => 950.0,
            Some(name) => section_base(name).unwrap_or(900) as f64,
            None => {
                // Unsectioned: keep original (reference/fallback) positions untouched so
                // their own relative order and 999-bucket semantics are preserved.
                for (key, pos) in members {
                    out.push(PositionedConcept { concept_key: key, position: pos, section: None });
                }
                continue;
            }
        };
        for (i, (key, _)) in members.into_iter().enumerate() {
            out.push(PositionedConcept {
                concept_key: key,
                position: base + i as f64 * 0.01,
                section,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbrl::templates::INCOME_STATEMENT_TEMPLATE;

    fn entry(key: &str, concept: &str, reference_index: Option<usize>) -> ConceptEntry {
        ConceptEntry {
            concept_key: key.to_string(),
            concept: concept.to_string(),
            label: key.to_string(),
            reference_index,
        }
    }

    #[test]
    fn per_share_rows_are_contiguous_and_after_net_income() {
        let entries = vec![
            entry("Revenue", "us-gaap:Revenues", None),
            entry("Net Income", "us-gaap:NetIncomeLoss", None),
            entry("EPS Basic", "us-gaap:EarningsPerShareBasic", None),
            entry("EPS Diluted", "us-gaap:EarningsPerShareDiluted", None),
            entry(
                "Shares Basic",
                "us-gaap:WeightedAverageNumberOfSharesOutstandingBasic",
                None,
            ),
            entry(
                "Shares Diluted",
                "us-gaap:WeightedAverageNumberOfDilutedSharesOutstanding",
                None,
            ),
        ];
        let mut positioned = compute_positions(&entries, Some(&INCOME_STATEMENT_TEMPLATE));
        positioned.sort_by(|a, b| a.position.total_cmp(&b.position));
        let order: Vec<&str> = positioned.iter().map(|p| p.concept_key.as_str()).collect();

        let rev_idx = order.iter().position(|&k| k == "Revenue").unwrap();
        let ni_idx = order.iter().position(|&k| k == "Net Income").unwrap();
        assert!(rev_idx < ni_idx);

        let per_share_positions: Vec<usize> = ["EPS Basic", "EPS Diluted", "Shares Basic", "Shares Diluted"]
            .iter()
            .map(|k| order.iter().position(|&o| o == *k).unwrap())
            .collect();
        let min = *per_share_positions.iter().min().unwrap();
        let max = *per_share_positions.iter().max().unwrap();
        assert_eq!(max - min, per_share_positions.len() - 1, "per-share rows must be contiguous");
        assert!(ni_idx < min, "net income must precede all per-share rows");
    }

    #[test]
    fn unclassified_concept_falls_back_to_end() {
        let entries = vec![entry("Mystery", "us-gaap:SomeTotallyObscureThing", None)];
        let positioned = compute_positions(&entries, Some(&INCOME_STATEMENT_TEMPLATE));
        assert_eq!(positioned[0].position, 999.0);
    }
}
