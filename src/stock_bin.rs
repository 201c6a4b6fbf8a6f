use crate::types::Pattern;

/// One stock piece being filled during allocation.
#[derive(Debug, Clone)]
pub struct StockBin {
    stock_length: u32,
    kerf: u32,
    pub cuts: Vec<u32>,
    used_length: u32,
}

impl StockBin {
    /// Opens a piece holding `first_cut`. The caller guarantees the cut fits.
    pub fn open(stock_length: u32, kerf: u32, first_cut: u32) -> Self {
        debug_assert!(first_cut <= stock_length);
        Self {
            stock_length,
            kerf,
            cuts: vec![first_cut],
            used_length: first_cut,
        }
    }

    #[cfg(test)]
    fn used_length(&self) -> u32 {
        self.used_length
    }

    pub fn remaining(&self) -> u32 {
        self.stock_length - self.used_length
    }

    /// Length consumed by adding `cut`: every cut after the first also takes
    /// one blade width.
    pub fn space_needed(&self, cut: u32) -> u32 {
        if self.cuts.is_empty() {
            cut
        } else {
            cut.saturating_add(self.kerf)
        }
    }

    pub fn fits(&self, cut: u32) -> bool {
        self.remaining() >= self.space_needed(cut)
    }

    /// Returns false and leaves the bin untouched if `cut` does not fit.
    pub fn place(&mut self, cut: u32) -> bool {
        if !self.fits(cut) {
            return false;
        }
        self.used_length += self.space_needed(cut);
        self.cuts.push(cut);
        true
    }

    pub fn into_pattern(self) -> Pattern {
        Pattern {
            waste: self.remaining(),
            stock_length: self.stock_length,
            cuts: self.cuts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_bin() {
        let bin = StockBin::open(1000, 3, 400);
        assert_eq!(bin.used_length(), 400);
        assert_eq!(bin.remaining(), 600);
        assert_eq!(bin.cuts, vec![400]);
    }

    #[test]
    fn test_second_cut_pays_kerf() {
        let mut bin = StockBin::open(1000, 3, 400);
        assert_eq!(bin.space_needed(200), 203);
        assert!(bin.place(200));
        assert_eq!(bin.used_length(), 603);
        assert_eq!(bin.remaining(), 397);
    }

    #[test]
    fn test_exact_fit_with_kerf() {
        let mut bin = StockBin::open(1000, 10, 495);
        assert!(bin.fits(495));
        assert!(bin.place(495));
        assert_eq!(bin.remaining(), 0);
        assert!(!bin.fits(1));
    }

    #[test]
    fn test_rejected_cut_leaves_bin_unchanged() {
        let mut bin = StockBin::open(1000, 10, 500);
        assert!(!bin.place(500));
        assert_eq!(bin.cuts, vec![500]);
        assert_eq!(bin.used_length(), 500);
    }

    #[test]
    fn test_into_pattern_reports_waste() {
        let mut bin = StockBin::open(3050, 3, 1000);
        bin.place(1000);
        bin.place(500);
        let pattern = bin.into_pattern();
        assert_eq!(pattern.stock_length, 3050);
        assert_eq!(pattern.cuts, vec![1000, 1000, 500]);
        assert_eq!(pattern.waste, 3050 - 2506);
    }
}
