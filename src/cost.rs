use std::collections::BTreeMap;

use crate::error::{OptimizeError, Result};
use crate::types::{CostByLength, CostConfig, CostSummary, Pattern};

/// Rejects negative or non-finite fees and prices.
pub fn validate(config: &CostConfig) -> Result<()> {
    check_amount("setup fee per length", config.setup_fee_per_length)?;
    check_amount("per-cut fee", config.per_cut_fee)?;
    for entry in config.price_list.iter().flatten() {
        check_amount(&format!("price for length {}", entry.stock_length), entry.price)?;
    }
    Ok(())
}

fn check_amount(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(OptimizeError::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Setup fee once per distinct stock length, cutting fee per cut, material
/// per piece. Rows come out ascending by stock length.
pub fn calculate(patterns: &[Pattern], config: &CostConfig) -> CostSummary {
    // stock length -> (pieces, cuts)
    let mut per_length: BTreeMap<u32, (u32, u32)> = BTreeMap::new();
    for p in patterns {
        let entry = per_length.entry(p.stock_length).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += p.cuts.len() as u32;
    }

    let prices: Option<BTreeMap<u32, f64>> = config
        .price_list
        .as_ref()
        .map(|list| list.iter().map(|e| (e.stock_length, e.price)).collect());

    let cost_by_length: Vec<CostByLength> = per_length
        .into_iter()
        .map(|(stock_length, (quantity, total_cuts))| {
            let setup_fee = config.setup_fee_per_length;
            let cutting_cost = config.per_cut_fee * total_cuts as f64;
            let material_cost = prices
                .as_ref()
                .map(|p| p.get(&stock_length).copied().unwrap_or(0.0) * quantity as f64);
            CostByLength {
                stock_length,
                quantity,
                setup_fee,
                total_cuts,
                cutting_cost,
                material_cost,
                total_cost: setup_fee + cutting_cost + material_cost.unwrap_or(0.0),
            }
        })
        .collect();

    let total_setup_fees: f64 = cost_by_length.iter().map(|c| c.setup_fee).sum();
    let total_cutting_costs: f64 = cost_by_length.iter().map(|c| c.cutting_cost).sum();
    let total_material_costs: f64 = cost_by_length
        .iter()
        .filter_map(|c| c.material_cost)
        .sum();
    let total_cost: f64 = cost_by_length.iter().map(|c| c.total_cost).sum();

    CostSummary {
        cost_by_length,
        total_setup_fees,
        total_cutting_costs,
        total_material_costs,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceEntry;

    fn pattern(stock_length: u32, cuts: &[u32]) -> Pattern {
        Pattern {
            stock_length,
            cuts: cuts.to_vec(),
            waste: 0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_setup_fee_charged_once_per_length() {
        let patterns = vec![
            pattern(1000, &[1000]),
            pattern(1000, &[1000]),
            pattern(500, &[500]),
        ];
        let config = CostConfig {
            setup_fee_per_length: 3.0,
            per_cut_fee: 2.0,
            ..Default::default()
        };
        let summary = calculate(&patterns, &config);

        assert_eq!(summary.cost_by_length.len(), 2);
        assert_eq!(summary.cost_by_length[0].stock_length, 500);
        assert_eq!(summary.cost_by_length[1].stock_length, 1000);
        assert_eq!(summary.cost_by_length[1].quantity, 2);
        assert_eq!(summary.cost_by_length[1].total_cuts, 2);
        assert!(close(summary.total_setup_fees, 6.0));
        assert!(close(summary.total_cutting_costs, 6.0));
        assert!(close(summary.total_material_costs, 0.0));
        assert!(close(summary.total_cost, 12.0));
        assert!(summary.cost_by_length.iter().all(|c| c.material_cost.is_none()));
    }

    #[test]
    fn test_material_cost_from_price_list() {
        let patterns = vec![
            pattern(3050, &[1000, 1000, 500]),
            pattern(3050, &[2000]),
            pattern(1000, &[900]),
        ];
        let config = CostConfig {
            setup_fee_per_length: 5.0,
            per_cut_fee: 1.5,
            available_stock: vec![],
            price_list: Some(vec![PriceEntry {
                stock_length: 3050,
                price: 12.25,
            }]),
        };
        let summary = calculate(&patterns, &config);

        let short = &summary.cost_by_length[0];
        assert_eq!(short.stock_length, 1000);
        // Missing price counts as zero
        assert_eq!(short.material_cost, Some(0.0));
        assert!(close(short.total_cost, 5.0 + 1.5));

        let long = &summary.cost_by_length[1];
        assert_eq!(long.quantity, 2);
        assert_eq!(long.total_cuts, 4);
        assert!(close(long.cutting_cost, 6.0));
        assert!(close(long.material_cost.unwrap(), 24.5));
        assert!(close(long.total_cost, 5.0 + 6.0 + 24.5));

        assert!(close(summary.total_material_costs, 24.5));
        assert!(close(summary.total_cost, 6.5 + 35.5));
    }

    #[test]
    fn test_no_patterns_costs_nothing() {
        let config = CostConfig {
            setup_fee_per_length: 3.0,
            per_cut_fee: 2.0,
            ..Default::default()
        };
        let summary = calculate(&[], &config);
        assert!(summary.cost_by_length.is_empty());
        assert!(close(summary.total_cost, 0.0));
    }

    #[test]
    fn test_validate_rejects_negative_fee() {
        let config = CostConfig {
            per_cut_fee: -1.0,
            ..Default::default()
        };
        assert!(matches!(validate(&config), Err(OptimizeError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_nan_price() {
        let config = CostConfig {
            price_list: Some(vec![PriceEntry {
                stock_length: 1000,
                price: f64::NAN,
            }]),
            ..Default::default()
        };
        assert!(matches!(validate(&config), Err(OptimizeError::InvalidInput(_))));
    }
}
