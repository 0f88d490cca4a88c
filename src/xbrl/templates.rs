//! Canonical per-statement-type ordering templates and the `ConceptMapper` that assigns
//! standardized labels.

use crate::xbrl::fact::{normalize_concept, StatementType};

/// One section of a statement template: a contiguous block of sort-key space starting at
/// `base_position`, and the concepts that belong to it in display order.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSection {
    pub name: &'static str,
    pub base_position: u32,
    pub concepts: &'static [&'static str],
}

/// A statement type's full canonical ordering.
#[derive(Debug, Clone, Copy)]
pub struct OrderingTemplate {
    pub sections: &'static [TemplateSection],
}

impl OrderingTemplate {
    /// Looks up a concept by exact normalized match, returning `base_position +
    /// index_in_section`.
    pub fn position_of(&self, normalized_concept: &str) -> Option<u32> {
        for section in self.sections {
            if let Some(idx) = section
                .concepts
                .iter()
                .position(|c| normalize_concept(c) == normalized_concept)
            {
                return Some(section.base_position + idx as u32);
            }
        }
        None
    }

    /// The section a given template position falls in, if any — used by section
    /// consolidation.
    pub fn section_for_position(&self, position: u32) -> Option<&'static TemplateSection> {
        self.sections
            .iter()
            .filter(|s| position >= s.base_position && position < s.base_position + 100)
            .max_by_key(|s| s.base_position)
    }

    pub fn section_named(&self, name: &str) -> Option<&'static TemplateSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// All concepts across all sections, for fuzzy label matching fallback.
    pub fn all_concepts(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.sections.iter().flat_map(|s| {
            s.concepts
                .iter()
                .enumerate()
                .map(move |(i, c)| (*c, s.base_position + i as u32))
        })
    }
}

const INCOME_STATEMENT_SECTIONS: &[TemplateSection] = &[
    TemplateSection {
        name: "revenue",
        base_position: 0,
        concepts: &[
            "us-gaap:Revenues",
            "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax",
            "us-gaap:RevenueFromContractWithCustomerIncludingAssessedTax",
            "us-gaap:SalesRevenueNet",
        ],
    },
    TemplateSection {
        name: "cost",
        base_position: 100,
        concepts: &[
            "us-gaap:CostOfRevenue",
            "us-gaap:CostOfGoodsAndServicesSold",
            "us-gaap:CostOfGoodsSold",
        ],
    },
    TemplateSection {
        name: "gross_profit",
        base_position: 200,
        concepts: &["us-gaap:GrossProfit"],
    },
    TemplateSection {
        name: "operating_expenses",
        base_position: 300,
        concepts: &[
            "us-gaap:ResearchAndDevelopmentExpense",
            "us-gaap:SellingGeneralAndAdministrativeExpense",
            "us-gaap:GeneralAndAdministrativeExpense",
            "us-gaap:SellingAndMarketingExpense",
            "us-gaap:OperatingExpenses",
        ],
    },
    TemplateSection {
        name: "operating_income",
        base_position: 400,
        concepts: &["us-gaap:OperatingIncomeLoss"],
    },
    TemplateSection {
        name: "non_operating",
        base_position: 500,
        concepts: &[
            "us-gaap:InterestExpense",
            "us-gaap:InterestIncomeExpenseNet",
            "us-gaap:NonoperatingIncomeExpense",
            "us-gaap:OtherNonoperatingIncomeExpense",
        ],
    },
    TemplateSection {
        name: "pretax_income",
        base_position: 600,
        concepts: &["us-gaap:IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest"],
    },
    TemplateSection {
        name: "tax",
        base_position: 700,
        concepts: &["us-gaap:IncomeTaxExpenseBenefit"],
    },
    TemplateSection {
        name: "net_income",
        base_position: 800,
        concepts: &["us-gaap:NetIncomeLoss", "us-gaap:ProfitLoss"],
    },
    TemplateSection {
        name: "per_share",
        base_position: 900,
        concepts: &[
            "us-gaap:EarningsPerShareBasic",
            "us-gaap:EarningsPerShareDiluted",
            "us-gaap:WeightedAverageNumberOfSharesOutstandingBasic",
            "us-gaap:WeightedAverageNumberOfDilutedSharesOutstanding",
        ],
    },
];

pub const INCOME_STATEMENT_TEMPLATE: OrderingTemplate = OrderingTemplate {
    sections: INCOME_STATEMENT_SECTIONS,
};

const BALANCE_SHEET_SECTIONS: &[TemplateSection] = &[
    TemplateSection {
        name: "current_assets",
        base_position: 0,
        concepts: &[
            "us-gaap:CashAndCashEquivalentsAtCarryingValue",
            "us-gaap:ShortTermInvestments",
            "us-gaap:AccountsReceivableNetCurrent",
            "us-gaap:InventoryNet",
            "us-gaap:AssetsCurrent",
        ],
    },
    TemplateSection {
        name: "noncurrent_assets",
        base_position: 100,
        concepts: &[
            "us-gaap:PropertyPlantAndEquipmentNet",
            "us-gaap:Goodwill",
            "us-gaap:IntangibleAssetsNetExcludingGoodwill",
        ],
    },
    TemplateSection {
        name: "total_assets",
        base_position: 200,
        concepts: &["us-gaap:Assets"],
    },
    TemplateSection {
        name: "current_liabilities",
        base_position: 300,
        concepts: &[
            "us-gaap:AccountsPayableCurrent",
            "us-gaap:LiabilitiesCurrent",
        ],
    },
    TemplateSection {
        name: "noncurrent_liabilities",
        base_position: 400,
        concepts: &["us-gaap:LongTermDebtNoncurrent"],
    },
    TemplateSection {
        name: "total_liabilities",
        base_position: 500,
        concepts: &["us-gaap:Liabilities"],
    },
    TemplateSection {
        name: "equity",
        base_position: 600,
        concepts: &[
            "us-gaap:CommonStockValue",
            "us-gaap:RetainedEarningsAccumulatedDeficit",
            "us-gaap:StockholdersEquity",
        ],
    },
];

pub const BALANCE_SHEET_TEMPLATE: OrderingTemplate = OrderingTemplate {
    sections: BALANCE_SHEET_SECTIONS,
};

const CASH_FLOW_SECTIONS: &[TemplateSection] = &[
    TemplateSection {
        name: "operating",
        base_position: 0,
        concepts: &[
            "us-gaap:NetIncomeLoss",
            "us-gaap:DepreciationDepletionAndAmortization",
            "us-gaap:NetCashProvidedByUsedInOperatingActivities",
        ],
    },
    TemplateSection {
        name: "investing",
        base_position: 300,
        concepts: &[
            "us-gaap:PaymentsToAcquirePropertyPlantAndEquipment",
            "us-gaap:NetCashProvidedByUsedInInvestingActivities",
        ],
    },
    TemplateSection {
        name: "financing",
        base_position: 600,
        concepts: &[
            "us-gaap:RepaymentsOfLongTermDebt",
            "us-gaap:PaymentsOfDividends",
            "us-gaap:NetCashProvidedByUsedInFinancingActivities",
        ],
    },
    TemplateSection {
        name: "net_change",
        base_position: 900,
        concepts: &["us-gaap:CashAndCashEquivalentsPeriodIncreaseDecrease"],
    },
];

pub const CASH_FLOW_TEMPLATE: OrderingTemplate = OrderingTemplate {
    sections: CASH_FLOW_SECTIONS,
};

/// Returns the canonical ordering template for a statement type, when one is defined.
/// `StatementOfEquity` and `ComprehensiveIncome` fall back to reference/semantic
/// ordering only since no canonical template is specified for them.
pub fn template_for(statement_type: StatementType) -> Option<&'static OrderingTemplate> {
    match statement_type {
        StatementType::IncomeStatement => Some(&INCOME_STATEMENT_TEMPLATE),
        StatementType::BalanceSheet => Some(&BALANCE_SHEET_TEMPLATE),
        StatementType::CashFlowStatement => Some(&CASH_FLOW_TEMPLATE),
        StatementType::StatementOfEquity | StatementType::ComprehensiveIncome => None,
    }
}

/// Assigns a canonical cross-company `standard_concept` and display label to a
/// `(statement_type, concept)` pair, when one of the seed mappings applies. This is
/// intentionally a small, data-driven table built from the same concept lists as the
/// ordering templates above, not a full taxonomy-mapping engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptMapper;

impl ConceptMapper {
    pub fn new() -> Self {
        ConceptMapper
    }

    pub fn standardize(&self, statement_type: StatementType, concept: &str) -> Option<StandardMapping> {
        let normalized = normalize_concept(concept);
        let table: &[(&[&str], &str, &str)] = match statement_type {
            StatementType::IncomeStatement => &[
                (
                    &[
                        "us-gaap:Revenues",
                        "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax",
                        "us-gaap:RevenueFromContractWithCustomerIncludingAssessedTax",
                        "us-gaap:SalesRevenueNet",
                    ],
                    "Total Revenue",
                    "TotalRevenue",
                ),
                (
                    &["us-gaap:NetIncomeLoss", "us-gaap:ProfitLoss"],
                    "Net Income",
                    "NetIncome",
                ),
                (
                    &["us-gaap:EarningsPerShareBasic"],
                    "EPS (Basic)",
                    "EarningsPerShareBasic",
                ),
                (
                    &["us-gaap:EarningsPerShareDiluted"],
                    "EPS (Diluted)",
                    "EarningsPerShareDiluted",
                ),
            ],
            StatementType::BalanceSheet => &[
                (&["us-gaap:Assets"], "Total Assets", "Assets"),
                (&["us-gaap:Liabilities"], "Total Liabilities", "Liabilities"),
                (
                    &["us-gaap:StockholdersEquity"],
                    "Total Stockholders' Equity",
                    "StockholdersEquity",
                ),
            ],
            StatementType::CashFlowStatement => &[
                (
                    &["us-gaap:NetCashProvidedByUsedInOperatingActivities"],
                    "Net Cash from Operating Activities",
                    "NetCashFromOperations",
                ),
                (
                    &["us-gaap:NetCashProvidedByUsedInInvestingActivities"],
                    "Net Cash from Investing Activities",
                    "NetCashFromInvesting",
                ),
                (
                    &["us-gaap:NetCashProvidedByUsedInFinancingActivities"],
                    "Net Cash from Financing Activities",
                    "NetCashFromFinancing",
                ),
            ],
            StatementType::StatementOfEquity | StatementType::ComprehensiveIncome => &[],
        };

        table
            .iter()
            .find(|(concepts, _, _)| concepts.iter().any(|c| normalize_concept(c) == normalized))
            .map(|(_, label, standard)| StandardMapping {
                label: label.to_string(),
                standard_concept: standard.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardMapping {
    pub label: String,
    pub standard_concept: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_statement_template_positions_revenue_before_net_income_before_per_share() {
        let t = &INCOME_STATEMENT_TEMPLATE;
        let rev = t.position_of(&normalize_concept("us-gaap:Revenues")).unwrap();
        let ni = t.position_of(&normalize_concept("us-gaap:NetIncomeLoss")).unwrap();
        let eps = t
            .position_of(&normalize_concept("us-gaap:EarningsPerShareBasic"))
            .unwrap();
        assert!(rev < ni);
        assert!(ni < eps);
    }

    #[test]
    fn concept_mapper_standardizes_revenue_family() {
        let mapper = ConceptMapper::new();
        let mapping = mapper
            .standardize(StatementType::IncomeStatement, "us-gaap:SalesRevenueNet")
            .unwrap();
        assert_eq!(mapping.standard_concept, "TotalRevenue");
    }

    #[test]
    fn unmapped_concept_returns_none() {
        let mapper = ConceptMapper::new();
        assert!(mapper
            .standardize(StatementType::IncomeStatement, "us-gaap:SomeObscureConcept")
            .is_none());
    }
}
