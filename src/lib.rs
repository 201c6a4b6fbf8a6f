//! One-dimensional cutting stock optimizer.
//!
//! Given required cut lengths and a catalogue of standard stock lengths,
//! [`optimize`] decides which stock pieces to buy, which cuts come from each
//! piece, and (optionally) what the job costs. Allocation is a greedy
//! first-fit-decreasing pass, fast enough for quoting but not guaranteed to
//! minimise waste.

pub mod catalogue;
pub mod cost;
pub mod error;
pub mod price_sheet;
pub mod render;
pub mod report;
pub mod solver;
pub mod stock_bin;
pub mod types;

pub use catalogue::StockCatalogue;
pub use error::{Infeasibility, OptimizeError, Result};
pub use solver::Solver;
pub use types::{
    AggregatedCut, CostByLength, CostConfig, CostSummary, CutRequirement, InvoiceResult, Pattern,
    PriceEntry, StockQuantity, StockUsage,
};

/// Plans and prices one cutting job.
///
/// `kerf_width` is the blade width lost between consecutive cuts on a piece.
/// Passing a `cost_config` enables the cost breakdown and applies its
/// `available_stock` caps.
pub fn optimize(
    requirements: &[CutRequirement],
    standard_lengths: &[u32],
    kerf_width: u32,
    cost_config: Option<&CostConfig>,
) -> Result<InvoiceResult> {
    let available_stock = cost_config
        .map(|c| c.available_stock.as_slice())
        .unwrap_or(&[]);
    let catalogue = StockCatalogue::new(standard_lengths, available_stock)?;
    if let Some(config) = cost_config {
        cost::validate(config)?;
    }

    let solver = Solver::new(catalogue, kerf_width, requirements.to_vec());
    let solution = solver.solve()?;
    let costs = cost_config.map(|config| cost::calculate(&solution.patterns, config));

    tracing::info!(
        cuts = solution.cut_count(),
        pieces = solution.piece_count(),
        waste_percent = solution.total_waste_percent(),
        "cutting plan ready"
    );

    Ok(report::invoice(requirements, solution, costs))
}
