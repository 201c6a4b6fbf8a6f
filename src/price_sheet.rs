//! Extrusion price sheet.
//!
//! Rows are plain comma separated: `id,description,SKU,...,price,cost`, where
//! the SKU is `<PROFILE>-<LENGTH>`. Only the stocked lengths are kept and
//! tapped variants (`TAP1`/`TAP2`) are skipped. A length with no price takes
//! the profile's per-millimetre rate from its 1000 mm row, or from its 1500 mm
//! row when there is no 1000 mm price. Every profile gets a 3050 mm length,
//! unpriced unless the sheet lists it.

use std::collections::BTreeSet;

use crate::types::PriceEntry;

pub const STOCKED_LENGTHS: [u32; 4] = [500, 1000, 1500, 3050];

/// Length every profile is stocked in, listed or not.
const FULL_BAR_LENGTH: u32 = 3050;

const SKU_COLUMN: usize = 2;
const PRICE_COLUMN: usize = 5;
const COST_COLUMN: usize = 6;

/// Which money column to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceColumn {
    /// Selling price.
    #[default]
    Sale,
    /// Purchase cost.
    Cost,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub profile: String,
    pub length: u32,
    pub price: Option<f64>,
    pub cost: Option<f64>,
}

impl SheetRow {
    fn amount(&self, column: PriceColumn) -> Option<f64> {
        match column {
            PriceColumn::Sale => self.price,
            PriceColumn::Cost => self.cost,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PriceSheet {
    rows: Vec<SheetRow>,
}

impl PriceSheet {
    /// Rows that are too short, tapped, or not a stocked length are skipped.
    /// The first row wins when a SKU repeats.
    pub fn parse(text: &str) -> Self {
        let mut rows: Vec<SheetRow> = Vec::new();
        let mut seen: BTreeSet<(String, u32)> = BTreeSet::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            let Some(sku) = parts.get(SKU_COLUMN) else {
                continue;
            };
            if sku.contains("TAP1") || sku.contains("TAP2") {
                continue;
            }
            let Some((profile, length)) = split_sku(sku) else {
                continue;
            };
            if !STOCKED_LENGTHS.contains(&length) {
                continue;
            }
            if !seen.insert((profile.to_string(), length)) {
                continue;
            }
            rows.push(SheetRow {
                profile: profile.to_string(),
                length,
                price: parts.get(PRICE_COLUMN).and_then(|s| parse_amount(s)),
                cost: parts.get(COST_COLUMN).and_then(|s| parse_amount(s)),
            });
        }

        let missing_full_bar: BTreeSet<String> = rows
            .iter()
            .filter(|r| !seen.contains(&(r.profile.clone(), FULL_BAR_LENGTH)))
            .map(|r| r.profile.clone())
            .collect();
        for profile in missing_full_bar {
            rows.push(SheetRow {
                profile,
                length: FULL_BAR_LENGTH,
                price: None,
                cost: None,
            });
        }

        tracing::debug!(rows = rows.len(), "parsed price sheet");
        Self { rows }
    }

    #[cfg(test)]
    fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    pub fn profiles(&self) -> Vec<&str> {
        let profiles: BTreeSet<&str> = self.rows.iter().map(|r| r.profile.as_str()).collect();
        profiles.into_iter().collect()
    }

    /// Lengths listed for `profile`, ascending.
    pub fn standard_lengths(&self, profile: &str) -> Vec<u32> {
        let lengths: BTreeSet<u32> = self
            .rows
            .iter()
            .filter(|r| r.profile == profile)
            .map(|r| r.length)
            .collect();
        lengths.into_iter().collect()
    }

    fn rate_per_mm(&self, profile: &str, column: PriceColumn) -> Option<f64> {
        [1000, 1500].into_iter().find_map(|base| {
            self.rows
                .iter()
                .find(|r| r.profile == profile && r.length == base)
                .and_then(|r| r.amount(column))
                .map(|amount| amount / base as f64)
        })
    }

    /// Prices per stock length for `profile`. Lengths with neither a listed
    /// nor a derivable price are left out.
    pub fn price_list(&self, profile: &str, column: PriceColumn) -> Vec<PriceEntry> {
        let rate = self.rate_per_mm(profile, column);
        let mut entries: Vec<PriceEntry> = self
            .rows
            .iter()
            .filter(|r| r.profile == profile)
            .filter_map(|r| {
                let price = r
                    .amount(column)
                    .or_else(|| rate.map(|rate| round_cents(rate * r.length as f64)))?;
                Some(PriceEntry {
                    stock_length: r.length,
                    price,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.stock_length);
        entries
    }
}

fn split_sku(sku: &str) -> Option<(&str, u32)> {
    let (profile, length) = sku.rsplit_once('-')?;
    if profile.is_empty() {
        return None;
    }
    Some((profile, length.parse().ok()?))
}

fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
