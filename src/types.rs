use serde::{Deserialize, Deserializer, Serialize};

/// Accepts any JSON number with no fractional part (`1000` or `1000.0`).
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    number_to_u32(value).map_err(serde::de::Error::custom)
}

pub fn deserialize_u32_vec_from_numbers<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<f64>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(number_to_u32)
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

fn number_to_u32(value: f64) -> Result<u32, String> {
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(format!("expected a whole non-negative number, got {}", value));
    }
    Ok(value as u32)
}

/// A required cut length and how many pieces of it are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutRequirement {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl CutRequirement {
    pub fn new(length: u32, quantity: u32) -> Self {
        Self { length, quantity }
    }
}

impl std::fmt::Display for CutRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.length, self.quantity)
    }
}

/// Cap on how many pieces of one standard length may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuantity {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub stock_length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub stock_length: u32,
    pub price: f64,
}

/// Fee and price configuration. Supplying one turns on the cost breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    #[serde(default)]
    pub setup_fee_per_length: f64,
    #[serde(default)]
    pub per_cut_fee: f64,
    #[serde(default)]
    pub available_stock: Vec<StockQuantity>,
    /// Material cost is only reported when a price list is given.
    #[serde(default)]
    pub price_list: Option<Vec<PriceEntry>>,
}

/// One stock piece and the cuts taken from it, in placement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub stock_length: u32,
    pub cuts: Vec<u32>,
    /// Material left over, kerf included.
    pub waste: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub patterns: Vec<Pattern>,
}

impl Solution {
    pub fn piece_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn cut_count(&self) -> usize {
        self.patterns.iter().map(|p| p.cuts.len()).sum()
    }

    pub fn total_waste(&self) -> u64 {
        self.patterns.iter().map(|p| p.waste as u64).sum()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total_stock: u64 = self.patterns.iter().map(|p| p.stock_length as u64).sum();
        if total_stock == 0 {
            return 0.0;
        }
        self.total_waste() as f64 / total_stock as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockUsage {
    pub stock_length: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregatedCut {
    pub length: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostByLength {
    pub stock_length: u32,
    pub quantity: u32,
    pub setup_fee: f64,
    pub total_cuts: u32,
    pub cutting_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_cost: Option<f64>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub cost_by_length: Vec<CostByLength>,
    pub total_setup_fees: f64,
    pub total_cutting_costs: f64,
    pub total_material_costs: f64,
    pub total_cost: f64,
}

/// Everything a caller needs to buy, cut and quote one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceResult {
    pub patterns: Vec<Pattern>,
    pub stock_usage: Vec<StockUsage>,
    pub total_cuts: usize,
    pub total_stock_pieces: usize,
    pub aggregated_cuts: Vec<AggregatedCut>,
    pub total_waste: u64,
    pub waste_percent: f64,
    #[serde(flatten)]
    pub costs: Option<CostSummary>,
}
