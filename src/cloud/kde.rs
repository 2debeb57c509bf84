//! Bivariate Gaussian kernel density estimate
//!
//! Full-covariance kernel with Scott's rule bandwidth (`n^(-1/6)` in two
//! dimensions) scaled by a user factor. The density is evaluated on a
//! regular grid and split into iso-proportion bands for filled contours:
//! band boundaries are the densities below which a given share of the
//! probability mass lies.

use std::f64::consts::PI;

/// Variance floor for degenerate inputs (single point, zero spread)
const MIN_VARIANCE: f64 = 1e-6;

/// Extent beyond the data, in kernel standard deviations
pub const DEFAULT_CUT: f64 = 3.0;

/// A fitted density estimate
#[derive(Debug, Clone)]
pub struct Kde {
    points: Vec<(f64, f64)>,
    /// Inverse kernel covariance [[a, b], [b, c]]
    inv_cov: [f64; 3],
    /// Kernel standard deviation per axis
    bandwidth: (f64, f64),
    norm: f64,
}

fn mean(values: impl Iterator<Item = f64>, n: f64) -> f64 {
    values.sum::<f64>() / n
}

impl Kde {
    /// Fit the estimate; `None` without points
    pub fn fit(points: &[(f64, f64)], bw_adjust: f64) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let n = points.len() as f64;
        let (mut vx, mut vy, mut cxy) = (MIN_VARIANCE, MIN_VARIANCE, 0.0);

        if points.len() > 1 {
            let mx = mean(points.iter().map(|p| p.0), n);
            let my = mean(points.iter().map(|p| p.1), n);
            vx = points.iter().map(|p| (p.0 - mx).powi(2)).sum::<f64>() / (n - 1.0);
            vy = points.iter().map(|p| (p.1 - my).powi(2)).sum::<f64>() / (n - 1.0);
            cxy = points.iter().map(|p| (p.0 - mx) * (p.1 - my)).sum::<f64>() / (n - 1.0);

            vx = vx.max(MIN_VARIANCE);
            vy = vy.max(MIN_VARIANCE);
            // Collinear data: drop the correlation rather than invert a singular matrix
            if vx * vy - cxy * cxy <= MIN_VARIANCE * MIN_VARIANCE {
                cxy = 0.0;
            }
        }

        let factor = n.powf(-1.0 / 6.0) * bw_adjust;
        let f2 = factor * factor;
        let (kx, ky, kxy) = (vx * f2, vy * f2, cxy * f2);
        let det = kx * ky - kxy * kxy;

        Some(Self {
            points: points.to_vec(),
            inv_cov: [ky / det, -kxy / det, kx / det],
            bandwidth: (kx.sqrt(), ky.sqrt()),
            norm: 1.0 / (n * 2.0 * PI * det.sqrt()),
        })
    }

    /// Kernel standard deviation along B and M
    pub fn bandwidth(&self) -> (f64, f64) {
        self.bandwidth
    }

    /// Density at a point
    pub fn density(&self, x: f64, y: f64) -> f64 {
        let [a, b, c] = self.inv_cov;
        let sum: f64 = self
            .points
            .iter()
            .map(|&(px, py)| {
                let dx = x - px;
                let dy = y - py;
                (-0.5 * (a * dx * dx + 2.0 * b * dx * dy + c * dy * dy)).exp()
            })
            .sum();
        sum * self.norm
    }

    /// Data extent padded by `cut` bandwidths, clipped to `bounds`
    pub fn support(&self, cut: f64, bounds: (f64, f64)) -> ((f64, f64), (f64, f64)) {
        let clip = |lo: f64, hi: f64| (lo.max(bounds.0), hi.min(bounds.1));

        let (min_x, max_x) = min_max(self.points.iter().map(|p| p.0));
        let (min_y, max_y) = min_max(self.points.iter().map(|p| p.1));

        (
            clip(min_x - cut * self.bandwidth.0, max_x + cut * self.bandwidth.0),
            clip(min_y - cut * self.bandwidth.1, max_y + cut * self.bandwidth.1),
        )
    }

    /// Evaluate on a `resolution` x `resolution` grid of cell centres
    pub fn evaluate(
        &self,
        x_range: (f64, f64),
        y_range: (f64, f64),
        resolution: usize,
    ) -> DensityGrid {
        let resolution = resolution.max(1);
        let cell_w = (x_range.1 - x_range.0) / resolution as f64;
        let cell_h = (y_range.1 - y_range.0) / resolution as f64;

        let values = (0..resolution)
            .map(|row| {
                let y = y_range.0 + (row as f64 + 0.5) * cell_h;
                (0..resolution)
                    .map(|col| self.density(x_range.0 + (col as f64 + 0.5) * cell_w, y))
                    .collect()
            })
            .collect();

        DensityGrid {
            origin: (x_range.0, y_range.0),
            cell_size: (cell_w, cell_h),
            values,
        }
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Density values over a rectangular grid
#[derive(Debug, Clone)]
pub struct DensityGrid {
    /// Lower-left corner
    pub origin: (f64, f64),
    /// Cell width and height
    pub cell_size: (f64, f64),
    /// Densities [row][col], row 0 at the bottom
    pub values: Vec<Vec<f64>>,
}

/// One filled grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandCell {
    pub lower_left: (f64, f64),
    pub upper_right: (f64, f64),
    /// 0 is the outermost drawn band
    pub band: usize,
}

impl DensityGrid {
    /// Cells at or above the lowest contour, tagged with their band
    ///
    /// `levels` boundaries are placed at mass quantiles evenly spread over
    /// `[thresh, 1]`, giving `levels - 1` bands.
    pub fn bands(&self, levels: usize, thresh: f64) -> Vec<BandCell> {
        let flat: Vec<f64> = self.values.iter().flatten().copied().collect();
        let boundaries = iso_levels(&flat, levels, thresh);
        if boundaries.is_empty() {
            return Vec::new();
        }

        let (w, h) = self.cell_size;
        let mut cells = Vec::new();
        for (row, line) in self.values.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if let Some(band) = band_of(value, &boundaries) {
                    let x0 = self.origin.0 + col as f64 * w;
                    let y0 = self.origin.1 + row as f64 * h;
                    cells.push(BandCell {
                        lower_left: (x0, y0),
                        upper_right: (x0 + w, y0 + h),
                        band,
                    });
                }
            }
        }
        cells
    }
}

/// Density values below which `q` of the total mass lies, for `levels`
/// quantiles evenly spaced over `[thresh, 1]`
///
/// Empty when the grid carries no mass.
pub fn iso_levels(values: &[f64], levels: usize, thresh: f64) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut cumulative = Vec::with_capacity(sorted.len());
    let mut acc = 0.0;
    for v in &sorted {
        acc += v;
        cumulative.push(acc / total);
    }

    let levels = levels.max(2);
    let thresh = thresh.clamp(0.0, 1.0);
    (0..levels)
        .map(|i| {
            let q = thresh + (1.0 - thresh) * i as f64 / (levels - 1) as f64;
            let idx = cumulative.partition_point(|&c| c < q).min(sorted.len() - 1);
            sorted[idx]
        })
        .collect()
}

/// Band index of a density value; `None` below the lowest boundary
pub fn band_of(value: f64, boundaries: &[f64]) -> Option<usize> {
    let first = *boundaries.first()?;
    if value < first || value <= 0.0 {
        return None;
    }
    let above = boundaries.iter().filter(|&&b| value >= b).count();
    // The top boundary is the peak itself; fold it into the last band
    Some((above - 1).min(boundaries.len().saturating_sub(2)))
}
