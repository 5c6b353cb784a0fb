//! Scan-centric vs bin-centric query planning (§5 "Query plan for m/z-range
//! spectra").

/// Which physical layout a query should read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPlan {
    /// Walk `Frame_Scans`, decoding one blob per `(frame, scan)` in range.
    ScanCentric,
    /// Walk `Bin_Intensities`, decoding one blob per bin in range.
    BinCentric,
}

/// Pick the layout that scans fewer rows, following §5: compare
/// `num_frames * num_scans` against `num_bins`, and never choose
/// bin-centric when the index hasn't been built.
pub fn choose_plan(num_frames: u64, num_scans_per_frame: u64, num_bins_in_range: u64, bin_centric_available: bool) -> QueryPlan {
    if !bin_centric_available {
        return QueryPlan::ScanCentric;
    }
    let scan_centric_rows = num_frames.saturating_mul(num_scans_per_frame);
    if num_bins_in_range < scan_centric_rows {
        QueryPlan::BinCentric
    } else {
        QueryPlan::ScanCentric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_bin_centric_when_fewer_bins_than_scan_rows() {
        let plan = choose_plan(1000, 200, 3, true);
        assert_eq!(plan, QueryPlan::BinCentric);
    }

    #[test]
    fn prefers_scan_centric_when_more_bins_than_scan_rows() {
        let plan = choose_plan(2, 2, 50_000, true);
        assert_eq!(plan, QueryPlan::ScanCentric);
    }

    #[test]
    fn falls_back_to_scan_centric_without_the_index() {
        let plan = choose_plan(1000, 200, 3, false);
        assert_eq!(plan, QueryPlan::ScanCentric);
    }
}
