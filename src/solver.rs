use std::collections::BTreeMap;

use crate::catalogue::StockCatalogue;
use crate::error::{OptimizeError, Result};
use crate::stock_bin::StockBin;
use crate::types::{CutRequirement, Solution};

/// First-fit-decreasing allocator for one-dimensional stock.
///
/// Cuts are placed longest first. Each cut goes into the earliest opened piece
/// with room for it; otherwise a new piece of the shortest standard length that
/// can hold it (and still has availability) is opened. This is a single greedy
/// pass with no improvement phase, so the result is not guaranteed to be the
/// least wasteful plan.
pub struct Solver {
    catalogue: StockCatalogue,
    kerf: u32,
    demands: Vec<CutRequirement>,
}

impl Solver {
    pub fn new(catalogue: StockCatalogue, kerf: u32, demands: Vec<CutRequirement>) -> Self {
        Self {
            catalogue,
            kerf,
            demands,
        }
    }

    pub fn solve(&self) -> Result<Solution> {
        let cuts = self.expand_demands()?;
        if cuts.is_empty() {
            return Ok(Solution { patterns: vec![] });
        }

        let bins = self.greedy_solve(&cuts)?;
        Ok(Self::bins_to_solution(bins))
    }

    fn expand_demands(&self) -> Result<Vec<u32>> {
        let mut cuts = Vec::new();
        for d in &self.demands {
            if d.length == 0 {
                return Err(OptimizeError::InvalidInput(
                    "cut lengths must be non-zero".to_string(),
                ));
            }
            if d.quantity == 0 {
                return Err(OptimizeError::InvalidInput(format!(
                    "quantity must be non-zero for cut of length {}",
                    d.length
                )));
            }
            cuts.extend(std::iter::repeat_n(d.length, d.quantity as usize));
        }
        // Longest first: the most constraining cuts claim space while pieces are empty
        cuts.sort_by(|a, b| b.cmp(a));
        Ok(cuts)
    }

    fn greedy_solve(&self, cuts: &[u32]) -> Result<Vec<StockBin>> {
        let mut bins: Vec<StockBin> = Vec::new();
        let mut opened: BTreeMap<u32, u32> = BTreeMap::new();

        for &cut in cuts {
            if let Some(bin) = bins.iter_mut().find(|b| b.fits(cut)) {
                bin.place(cut);
                continue;
            }

            let stock_length = self.catalogue.select(cut, &opened)?;
            *opened.entry(stock_length).or_insert(0) += 1;
            tracing::debug!(cut, stock_length, piece = bins.len() + 1, "opened stock piece");
            bins.push(StockBin::open(stock_length, self.kerf, cut));
        }

        Ok(bins)
    }

    fn bins_to_solution(bins: Vec<StockBin>) -> Solution {
        Solution {
            patterns: bins.into_iter().map(StockBin::into_pattern).collect(),
        }
    }
}
