use super::error::HistogramError;

/// Upper bound on the number of bins along one axis
pub const MAX_BINS_PER_AXIS: usize = 1_000_000;
/// Upper bound on the number of cells in a 2D histogram
pub const MAX_BINS_2D: usize = 4_000_000;

/// A fixed-width binning of one axis.
///
/// The first bin starts at the smallest value. There are `floor((max - min) / width) + 1`
/// bins, so the largest value always falls inside the last bin. Bins are half open,
/// `[low, low + width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub bin_width: f64,
    pub n_bins: usize,
}

impl Axis {
    /// Build the axis covering the range of the given values
    pub fn new(values: &[f64], bin_width: f64) -> Result<Self, HistogramError> {
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(HistogramError::InvalidBinWidth(bin_width));
        }
        if values.is_empty() {
            return Err(HistogramError::EmptyInput);
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(HistogramError::NonFiniteValue(*bad));
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let n_bins = ((max - min) / bin_width).floor() + 1.0;
        if !n_bins.is_finite() || n_bins > MAX_BINS_PER_AXIS as f64 {
            return Err(HistogramError::TooManyBins {
                requested: n_bins,
                max: MAX_BINS_PER_AXIS,
            });
        }
        let n_bins = n_bins as usize;
        Ok(Self {
            min,
            bin_width,
            n_bins,
        })
    }

    pub fn max(&self) -> f64 {
        self.min + self.n_bins as f64 * self.bin_width
    }

    /// Lower edge of a bin
    pub fn low_edge(&self, bin: usize) -> f64 {
        self.min + bin as f64 * self.bin_width
    }

    /// Find the bin of a value. Values below the axis return None; values at or past the top
    /// edge land in the last bin, which absorbs floating point error on the maximum.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if value < self.min {
            return None;
        }
        let bin = ((value - self.min) / self.bin_width).floor() as usize;
        Some(bin.min(self.n_bins - 1))
    }
}

/// Histogram1D counts scalar values into fixed-width bins
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram1D {
    pub axis: Axis,
    pub counts: Vec<u64>,
}

impl Histogram1D {
    /// Bin the values with a given bin width
    pub fn new(values: &[f64], bin_width: f64) -> Result<Self, HistogramError> {
        let axis = Axis::new(values, bin_width)?;
        let mut counts = vec![0; axis.n_bins];
        for value in values {
            if let Some(bin) = axis.find_bin(*value) {
                counts[bin] += 1;
            }
        }
        Ok(Self { axis, counts })
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate over (low edge, high edge, count) for every bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.counts.iter().enumerate().map(|(idx, count)| {
            let low = self.axis.low_edge(idx);
            (low, low + self.axis.bin_width, *count)
        })
    }
}

/// Histogram2D counts pairs of values into a grid of fixed-width bins.
///
/// Counts are stored row-major with the x bin as the outer index.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2D {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub counts: Vec<u64>,
}

impl Histogram2D {
    /// Bin parallel x and y values with independent bin widths
    pub fn new(
        xs: &[f64],
        ys: &[f64],
        bin_width_x: f64,
        bin_width_y: f64,
    ) -> Result<Self, HistogramError> {
        if xs.len() != ys.len() {
            return Err(HistogramError::MismatchedLengths(xs.len(), ys.len()));
        }
        let x_axis = Axis::new(xs, bin_width_x)?;
        let y_axis = Axis::new(ys, bin_width_y)?;
        let n_cells = match x_axis.n_bins.checked_mul(y_axis.n_bins) {
            Some(n) if n <= MAX_BINS_2D => n,
            _ => {
                return Err(HistogramError::TooManyBins {
                    requested: x_axis.n_bins as f64 * y_axis.n_bins as f64,
                    max: MAX_BINS_2D,
                })
            }
        };
        let mut counts = vec![0; n_cells];
        for (x, y) in xs.iter().zip(ys.iter()) {
            if let (Some(bx), Some(by)) = (x_axis.find_bin(*x), y_axis.find_bin(*y)) {
                counts[bx * y_axis.n_bins + by] += 1;
            }
        }
        Ok(Self {
            x_axis,
            y_axis,
            counts,
        })
    }

    pub fn count(&self, x_bin: usize, y_bin: usize) -> u64 {
        self.counts[x_bin * self.y_axis.n_bins + y_bin]
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_cover_range() {
        let hist = Histogram1D::new(&[0.0, 0.25, 0.5, 1.0], 0.5).unwrap();
        assert_eq!(hist.axis.n_bins, 3);
        assert_eq!(hist.counts, vec![2, 1, 1]);
        assert_eq!(hist.entries(), 4);
        assert_eq!(hist.max_count(), 2);
        let edges: Vec<(f64, f64)> = hist.bins().map(|(lo, hi, _)| (lo, hi)).collect();
        assert_eq!(edges, vec![(0.0, 0.5), (0.5, 1.0), (1.0, 1.5)]);
    }

    #[test]
    fn test_single_value() {
        let hist = Histogram1D::new(&[6.25], 0.01).unwrap();
        assert_eq!(hist.axis.n_bins, 1);
        assert_eq!(hist.counts, vec![1]);
    }

    #[test]
    fn test_fine_bins_keep_every_entry() {
        let values: Vec<f64> = (0..1000).map(|i| 0.1 + i as f64 * 0.0037).collect();
        let hist = Histogram1D::new(&values, 0.01).unwrap();
        assert_eq!(hist.entries(), 1000);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            Histogram1D::new(&[], 1.0),
            Err(HistogramError::EmptyInput)
        ));
        assert!(matches!(
            Histogram2D::new(&[], &[], 1.0, 1.0),
            Err(HistogramError::EmptyInput)
        ));
    }

    #[test]
    fn test_bad_bin_width() {
        assert!(matches!(
            Histogram1D::new(&[1.0], 0.0),
            Err(HistogramError::InvalidBinWidth(_))
        ));
        assert!(matches!(
            Histogram1D::new(&[1.0], f64::NAN),
            Err(HistogramError::InvalidBinWidth(_))
        ));
    }

    #[test]
    fn test_non_finite_value() {
        assert!(matches!(
            Histogram1D::new(&[1.0, f64::INFINITY], 1.0),
            Err(HistogramError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_too_many_bins() {
        // Quotient overflows to infinity
        assert!(matches!(
            Histogram1D::new(&[0.0, 1.0e300], 1.0e-10),
            Err(HistogramError::TooManyBins { .. })
        ));
        // A bin width typo over an ordinary range
        assert!(matches!(
            Histogram1D::new(&[0.0, 100.0], 1.0e-9),
            Err(HistogramError::TooManyBins { max: MAX_BINS_PER_AXIS, .. })
        ));
        assert!(matches!(
            Histogram1D::new(&[-1.0e308, 1.0e308], 1.0),
            Err(HistogramError::TooManyBins { .. })
        ));
        let hist = Histogram1D::new(&[0.0, (MAX_BINS_PER_AXIS - 1) as f64], 1.0).unwrap();
        assert_eq!(hist.axis.n_bins, MAX_BINS_PER_AXIS);
    }

    #[test]
    fn test_too_many_2d_cells() {
        let xs = [0.0, (MAX_BINS_PER_AXIS - 1) as f64];
        let ys = [0.0, 4.0];
        match Histogram2D::new(&xs, &ys, 1.0, 1.0) {
            Err(HistogramError::TooManyBins { requested, max }) => {
                assert_eq!(requested, 5.0e6);
                assert_eq!(max, MAX_BINS_2D);
            }
            other => panic!("Expected too many bins, got {other:?}"),
        }
    }

    #[test]
    fn test_2d_binning() {
        let xs = [0.1, 0.12, 0.305, 0.31];
        let ys = [1.0, 1.0, 2.0, 3.0];
        let hist = Histogram2D::new(&xs, &ys, 0.05, 1.0).unwrap();
        assert_eq!(hist.x_axis.n_bins, 5);
        assert_eq!(hist.y_axis.n_bins, 3);
        assert_eq!(hist.count(0, 0), 2);
        assert_eq!(hist.count(4, 1), 1);
        assert_eq!(hist.count(4, 2), 1);
        assert_eq!(hist.entries(), 4);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn test_2d_mismatched_lengths() {
        assert!(matches!(
            Histogram2D::new(&[1.0, 2.0], &[1.0], 1.0, 1.0),
            Err(HistogramError::MismatchedLengths(2, 1))
        ));
    }
}
