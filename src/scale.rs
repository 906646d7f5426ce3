//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Named continuous color palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Palette {
    /// Viridis (perceptually uniform, colorblind-safe).
    #[default]
    Viridis,
    /// Sequential blues.
    Blues,
    /// Sequential greens.
    Greens,
    /// Magma (perceptually uniform).
    Magma,
    /// Diverging red-blue.
    RedBlue,
    /// Greyscale.
    Greyscale,
}

impl Palette {
    /// Every palette, in declaration order.
    pub const ALL: [Palette; 6] = [
        Palette::Viridis,
        Palette::Blues,
        Palette::Greens,
        Palette::Magma,
        Palette::RedBlue,
        Palette::Greyscale,
    ];

    /// Canonical display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Palette::Viridis => "Viridis",
            Palette::Blues => "Blues",
            Palette::Greens => "Greens",
            Palette::Magma => "Magma",
            Palette::RedBlue => "RdBu",
            Palette::Greyscale => "Greys",
        }
    }

    /// Color stops from low to high.
    #[must_use]
    pub fn colors(self) -> Vec<Rgba> {
        match self {
            Palette::Viridis => vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
            Palette::Blues => vec![
                Rgba::rgb(247, 251, 255),
                Rgba::rgb(198, 219, 239),
                Rgba::rgb(107, 174, 214),
                Rgba::rgb(33, 113, 181),
                Rgba::rgb(8, 48, 107),
            ],
            Palette::Greens => vec![
                Rgba::rgb(247, 252, 245),
                Rgba::rgb(199, 233, 192),
                Rgba::rgb(116, 196, 118),
                Rgba::rgb(35, 139, 69),
                Rgba::rgb(0, 68, 27),
            ],
            Palette::Magma => vec![
                Rgba::rgb(0, 0, 4),
                Rgba::rgb(81, 18, 124),
                Rgba::rgb(183, 55, 121),
                Rgba::rgb(252, 137, 97),
                Rgba::rgb(252, 253, 191),
            ],
            Palette::RedBlue => vec![
                Rgba::rgb(178, 24, 43),
                Rgba::rgb(239, 138, 98),
                Rgba::rgb(247, 247, 247),
                Rgba::rgb(103, 169, 207),
                Rgba::rgb(33, 102, 172),
            ],
            Palette::Greyscale => vec![Rgba::BLACK, Rgba::WHITE],
        }
    }

    /// Evenly spaced `(position, color)` stops in `[0, 1]`.
    #[must_use]
    pub fn stops(self) -> Vec<(f32, Rgba)> {
        let colors = self.colors();
        let last = (colors.len() - 1).max(1) as f32;
        colors.into_iter().enumerate().map(|(i, c)| (i as f32 / last, c)).collect()
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "viridis" => Ok(Palette::Viridis),
            "blues" => Ok(Palette::Blues),
            "greens" => Ok(Palette::Greens),
            "magma" => Ok(Palette::Magma),
            "rdbu" | "redblue" | "red_blue" => Ok(Palette::RedBlue),
            "greys" | "grays" | "greyscale" | "grayscale" => Ok(Palette::Greyscale),
            _ => Err(Error::UnknownColorScale(s.to_string())),
        }
    }
}

impl TryFrom<String> for Palette {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Palette> for String {
    fn from(p: Palette) -> Self {
        p.name().to_string()
    }
}

/// Color scale for mapping values to colors.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f32,
    domain_max: f32,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or domain is invalid.
    pub fn new(colors: Vec<Rgba>, domain: (f32, f32)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }

        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Create a scale from a palette, widening a degenerate domain by 0.5 each way.
    #[must_use]
    pub fn from_palette(palette: Palette, domain: (f32, f32)) -> Self {
        let (lo, hi) = if (domain.1 - domain.0).abs() < f32::EPSILON {
            (domain.0 - 0.5, domain.1 + 0.5)
        } else {
            domain
        };
        Self { colors: palette.colors(), domain_min: lo, domain_max: hi }
    }
}

impl Scale<f32, Rgba> for ColorScale {
    fn scale(&self, value: f32) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f32).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}
