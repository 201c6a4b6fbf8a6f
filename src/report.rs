use std::collections::BTreeMap;

use crate::types::{
    AggregatedCut, CostSummary, CutRequirement, InvoiceResult, Pattern, Solution, StockUsage,
};

/// Pieces used per stock length, ascending.
pub fn stock_usage(patterns: &[Pattern]) -> Vec<StockUsage> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for p in patterns {
        *counts.entry(p.stock_length).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(stock_length, quantity)| StockUsage {
            stock_length,
            quantity,
        })
        .collect()
}

/// Total pieces wanted per cut length, longest first, regardless of which
/// stock piece they end up on.
pub fn aggregate_cuts(requirements: &[CutRequirement]) -> Vec<AggregatedCut> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for r in requirements {
        *counts.entry(r.length).or_insert(0) += r.quantity;
    }
    counts
        .into_iter()
        .rev()
        .map(|(length, quantity)| AggregatedCut { length, quantity })
        .collect()
}

pub fn invoice(
    requirements: &[CutRequirement],
    solution: Solution,
    costs: Option<CostSummary>,
) -> InvoiceResult {
    InvoiceResult {
        stock_usage: stock_usage(&solution.patterns),
        total_cuts: solution.cut_count(),
        total_stock_pieces: solution.piece_count(),
        aggregated_cuts: aggregate_cuts(requirements),
        total_waste: solution.total_waste(),
        waste_percent: solution.total_waste_percent(),
        patterns: solution.patterns,
        costs,
    }
}
