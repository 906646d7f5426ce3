//! Marginal histograms and the joint scatter/hexbin layouts built on them.
//!
//! Bin counts follow Sturges, Scott or Freedman-Diaconis rules, or a fixed
//! count.

use crate::axes::{Axes, Bar, JointAxes, Orientation};
use crate::color::Rgba;
use crate::config::{DensityScatterOptions, HexbinOptions};
use crate::data::DataSource;
use crate::error::{Error, Result};
use crate::style::{resolve, Style};

use super::{density_hexbin, density_scatter};

/// Binning strategy for histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BinStrategy {
    /// Sturges' rule: ceil(log2(n) + 1)
    #[default]
    Sturges,
    /// Scott's rule: 3.5 * std / n^(1/3)
    Scott,
    /// Freedman-Diaconis rule: 2 * IQR / n^(1/3)
    FreedmanDiaconis,
    /// Fixed number of bins
    Fixed(usize),
}

/// Builder for histogram bars along one axis.
#[derive(Debug, Clone)]
pub struct Histogram {
    data: Vec<f32>,
    bin_strategy: BinStrategy,
    color: Rgba,
    orientation: Orientation,
    normalize: bool,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create a new histogram builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            bin_strategy: BinStrategy::default(),
            color: Rgba::rgb(70, 130, 180),
            orientation: Orientation::Vertical,
            normalize: false,
        }
    }

    /// Set the data. Non-finite values are ignored.
    #[must_use]
    pub fn data(mut self, data: &[f32]) -> Self {
        self.data = data.iter().copied().filter(|v| v.is_finite()).collect();
        self
    }

    /// Set the binning strategy.
    #[must_use]
    pub fn bins(mut self, strategy: BinStrategy) -> Self {
        self.bin_strategy = strategy;
        self
    }

    /// Set the bar color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Bars grow up from the x axis (`Vertical`) or right from the y axis.
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Scale bar heights so the histogram integrates to one.
    #[must_use]
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Calculate the number of bins.
    #[must_use]
    pub fn bin_count(&self) -> usize {
        let n = self.data.len();
        if n == 0 {
            return 1;
        }
        let sturges = ((n as f32).log2().ceil() + 1.0) as usize;
        let by_width = |width: f32| {
            if width > 0.0 {
                (self.data_range() / width).ceil() as usize
            } else {
                sturges
            }
        };

        match self.bin_strategy {
            BinStrategy::Sturges => sturges,
            BinStrategy::Scott => by_width(3.5 * self.std_dev() / (n as f32).cbrt()),
            BinStrategy::FreedmanDiaconis => by_width(2.0 * self.iqr() / (n as f32).cbrt()),
            BinStrategy::Fixed(bins) => bins,
        }
        .max(1)
    }

    fn extent(&self) -> (f32, f32) {
        let min = self.data.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (min, max)
    }

    fn data_range(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let (min, max) = self.extent();
        max - min
    }

    fn std_dev(&self) -> f32 {
        if self.data.len() < 2 {
            return 0.0;
        }
        let mean = self.data.iter().sum::<f32>() / self.data.len() as f32;
        let variance = self.data.iter().map(|x| (x - mean).powi(2)).sum::<f32>()
            / (self.data.len() - 1) as f32;
        variance.sqrt()
    }

    fn iqr(&self) -> f32 {
        if self.data.len() < 4 {
            return self.data_range();
        }
        let mut sorted = self.data.clone();
        sorted.sort_by(f32::total_cmp);
        sorted[3 * sorted.len() / 4] - sorted[sorted.len() / 4]
    }

    /// Validate the histogram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooFewPoints`] if no finite values were given.
    pub fn build(self) -> Result<Self> {
        if self.data.is_empty() {
            return Err(Error::TooFewPoints { found: 0 });
        }
        Ok(self)
    }

    /// Per-bin counts (or densities when normalized) and the bin edges.
    #[must_use]
    pub fn counts(&self) -> (Vec<f32>, Vec<f32>) {
        let bin_count = self.bin_count();
        let (mut min, mut max) = self.extent();
        if !min.is_finite() {
            return (vec![0.0; bin_count], vec![0.0; bin_count + 1]);
        }
        if max <= min {
            min -= 0.5;
            max += 0.5;
        }
        let bin_width = (max - min) / bin_count as f32;

        let mut counts = vec![0.0f32; bin_count];
        for &value in &self.data {
            let bin = (((value - min) / bin_width).floor() as usize).min(bin_count - 1);
            counts[bin] += 1.0;
        }
        if self.normalize {
            let scale = self.data.len() as f32 * bin_width;
            counts.iter_mut().for_each(|c| *c /= scale);
        }
        let edges = (0..=bin_count).map(|i| min + i as f32 * bin_width).collect();
        (counts, edges)
    }

    /// One bar per non-empty bin.
    #[must_use]
    pub fn bars(&self) -> Vec<Bar> {
        let (counts, edges) = self.counts();
        counts
            .iter()
            .zip(edges.windows(2))
            .filter(|(c, _)| **c > 0.0)
            .map(|(&height, edge)| Bar {
                start: edge[0],
                end: edge[1],
                height,
                orientation: self.orientation,
                color: self.color,
            })
            .collect()
    }

    /// Axes holding only the bars.
    #[must_use]
    pub fn to_axes(&self) -> Axes {
        let mut ax = Axes::new();
        for bar in self.bars() {
            ax.add_bar(bar);
        }
        ax
    }
}

/// Histogram bars of `values` in the default marginal color.
///
/// # Errors
///
/// Returns [`Error::TooFewPoints`] if `values` has no finite entries.
pub fn histogram(values: &[f32], strategy: BinStrategy) -> Result<Vec<Bar>> {
    let color = resolve(&Style::default().hist_color)?;
    Ok(Histogram::new().data(values).bins(strategy).color(color).build()?.bars())
}

/// [`density_scatter`] with marginal histograms of x above and y to the right.
///
/// # Errors
///
/// Fails on the same conditions as [`density_scatter`].
#[tracing::instrument(skip_all)]
pub fn density_scatter_with_hist(
    source: &DataSource<'_>,
    options: &DensityScatterOptions,
    bins: BinStrategy,
) -> Result<JointAxes> {
    let main = density_scatter(source, options)?;
    joint(main, source, &options.style, bins)
}

/// [`density_hexbin`] with marginal histograms of x above and y to the right.
///
/// # Errors
///
/// Fails on the same conditions as [`density_hexbin`].
#[tracing::instrument(skip_all)]
pub fn density_hexbin_with_hist(
    source: &DataSource<'_>,
    options: &DensityScatterOptions,
    hex: &HexbinOptions,
    bins: BinStrategy,
) -> Result<JointAxes> {
    let main = density_hexbin(source, options, hex)?;
    joint(main, source, &options.style, bins)
}

fn joint(
    main: Axes,
    source: &DataSource<'_>,
    style: &Style,
    bins: BinStrategy,
) -> Result<JointAxes> {
    let (x, y) = source.xy()?;
    let (x, y): (Vec<f32>, Vec<f32>) =
        x.iter().zip(&y).filter(|(a, b)| a.is_finite() && b.is_finite()).unzip();
    let color = resolve(&style.hist_color)?;
    let (background, axis) = (main.background(), main.axis_color());

    let marginal = |values: &[f32], orientation| -> Result<Axes> {
        let hist = Histogram::new()
            .data(values)
            .bins(bins)
            .color(color)
            .orientation(orientation)
            .build()?;
        let mut ax = hist.to_axes();
        ax.set_colors(background, axis);
        Ok(ax)
    };
    Ok(JointAxes {
        top: marginal(&x, Orientation::Vertical)?,
        right: marginal(&y, Orientation::Horizontal)?,
        main,
    })
}
