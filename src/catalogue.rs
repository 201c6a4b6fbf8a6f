use std::collections::BTreeMap;

use crate::error::{Infeasibility, OptimizeError, Result};
use crate::types::StockQuantity;

/// Standard stock lengths, ascending and deduplicated, with optional caps on
/// how many pieces of each may be opened.
#[derive(Debug, Clone)]
pub struct StockCatalogue {
    lengths: Vec<u32>,
    availability: BTreeMap<u32, u32>,
}

impl StockCatalogue {
    /// Caps for lengths outside the catalogue are dropped. When a length is
    /// capped twice the later entry wins.
    pub fn new(standard_lengths: &[u32], available_stock: &[StockQuantity]) -> Result<Self> {
        if standard_lengths.is_empty() {
            return Err(OptimizeError::InvalidInput(
                "standard length list is empty".to_string(),
            ));
        }
        if standard_lengths.contains(&0) {
            return Err(OptimizeError::InvalidInput(
                "standard lengths must be non-zero".to_string(),
            ));
        }

        let mut lengths = standard_lengths.to_vec();
        lengths.sort_unstable();
        lengths.dedup();

        let availability = available_stock
            .iter()
            .filter(|s| lengths.binary_search(&s.stock_length).is_ok())
            .map(|s| (s.stock_length, s.quantity))
            .collect();

        Ok(Self {
            lengths,
            availability,
        })
    }

    #[cfg(test)]
    fn lengths(&self) -> &[u32] {
        &self.lengths
    }

    #[cfg(test)]
    fn contains(&self, length: u32) -> bool {
        self.lengths.binary_search(&length).is_ok()
    }

    /// `None` means unlimited.
    pub fn availability(&self, length: u32) -> Option<u32> {
        self.availability.get(&length).copied()
    }

    /// Shortest standard length that can hold `cut` and still has pieces left,
    /// given how many pieces of each length are already opened.
    pub fn select(&self, cut: u32, opened: &BTreeMap<u32, u32>) -> Result<u32> {
        let start = self.lengths.partition_point(|&s| s < cut);
        if start == self.lengths.len() {
            return Err(OptimizeError::NoFeasibleStock {
                length: cut,
                reason: Infeasibility::TooLong,
            });
        }

        self.lengths[start..]
            .iter()
            .copied()
            .find(|s| match self.availability(*s) {
                Some(cap) => opened.get(s).copied().unwrap_or(0) < cap,
                None => true,
            })
            .ok_or(OptimizeError::NoFeasibleStock {
                length: cut,
                reason: Infeasibility::OutOfStock,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(stock_length: u32, quantity: u32) -> StockQuantity {
        StockQuantity {
            stock_length,
            quantity,
        }
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        let err = StockCatalogue::new(&[], &[]).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = StockCatalogue::new(&[1000, 0], &[]).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInput(_)));
    }

    #[test]
    fn test_lengths_sorted_and_deduplicated() {
        let cat = StockCatalogue::new(&[3050, 500, 1000, 500, 1500], &[]).unwrap();
        assert_eq!(cat.lengths(), &[500, 1000, 1500, 3050]);
        assert!(cat.contains(1500));
        assert!(!cat.contains(2000));
    }

    #[test]
    fn test_unknown_length_caps_ignored() {
        let cat = StockCatalogue::new(&[1000], &[cap(2000, 1), cap(1000, 3)]).unwrap();
        assert_eq!(cat.availability(2000), None);
        assert_eq!(cat.availability(1000), Some(3));
    }

    #[test]
    fn test_repeated_cap_last_wins() {
        let cat = StockCatalogue::new(&[1000], &[cap(1000, 1), cap(1000, 3)]).unwrap();
        assert_eq!(cat.availability(1000), Some(3));

        let cat = StockCatalogue::new(&[1000], &[cap(1000, 3), cap(1000, 1)]).unwrap();
        assert_eq!(cat.availability(1000), Some(1));
    }

    #[test]
    fn test_select_shortest_sufficient() {
        let cat = StockCatalogue::new(&[500, 1000, 1500, 3050], &[]).unwrap();
        let opened = BTreeMap::new();
        assert_eq!(cat.select(500, &opened).unwrap(), 500);
        assert_eq!(cat.select(501, &opened).unwrap(), 1000);
        assert_eq!(cat.select(3050, &opened).unwrap(), 3050);
    }

    #[test]
    fn test_select_too_long() {
        let cat = StockCatalogue::new(&[500, 1000, 1500, 3050], &[]).unwrap();
        let err = cat.select(4000, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            OptimizeError::NoFeasibleStock {
                length: 4000,
                reason: Infeasibility::TooLong
            }
        );
    }

    #[test]
    fn test_select_skips_exhausted_lengths() {
        let cat = StockCatalogue::new(&[1000, 1500], &[cap(1000, 1), cap(1500, 1)]).unwrap();
        let mut opened = BTreeMap::new();
        opened.insert(1000, 1);
        assert_eq!(cat.select(800, &opened).unwrap(), 1500);

        opened.insert(1500, 1);
        let err = cat.select(800, &opened).unwrap_err();
        assert_eq!(
            err,
            OptimizeError::NoFeasibleStock {
                length: 800,
                reason: Infeasibility::OutOfStock
            }
        );
    }

    #[test]
    fn test_zero_cap_never_selected() {
        let cat = StockCatalogue::new(&[1000, 3050], &[cap(1000, 0)]).unwrap();
        assert_eq!(cat.select(600, &BTreeMap::new()).unwrap(), 3050);
    }
}
