use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lower bound of the color domain as a fraction of the year maximum.
/// Keeps near-zero values tinted instead of pure white.
pub const COLOR_DOMAIN_FLOOR: f64 = -0.15;

/// Smallest drawn cell as a fraction of the full cell size.
pub const SIZE_FLOOR: f64 = 0.75;

/// Share of the cell size that scales with the value.
pub const SIZE_RANGE: f64 = 0.25;

/// Growth factor of the hover pulse.
pub const PULSE_SCALE: f64 = 1.1;

/// Opacity of cells outside a highlighted month or weekday.
pub const DIMMED_OPACITY: f64 = 0.1;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseColorError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("color must have 3 or 6 hex digits")]
    BadLength,
    #[error("invalid hex digit in color")]
    BadDigit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channel-wise linear interpolation; `t` is not clamped here.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
        }
    }

    /// Composites this color at `opacity` over `background`.
    pub fn over(self, background: Rgb, opacity: f64) -> Rgb {
        background.lerp(self, opacity.clamp(0.0, 1.0))
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    v.round().clamp(0.0, 255.0) as u8
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').ok_or(ParseColorError::MissingHash)?;
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or(ParseColorError::BadDigit)?;
        match digits.as_slice() {
            [r, g, b] => Ok(Rgb::new(r * 17, g * 17, b * 17)),
            [r1, r2, g1, g2, b1, b2] => Ok(Rgb::new(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
            _ => Err(ParseColorError::BadLength),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Linear color scale from white to an accent color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorScale {
    domain: (f64, f64),
    range: (Rgb, Rgb),
}

impl ColorScale {
    /// Domain `[COLOR_DOMAIN_FLOOR * max, max]`, range `[white, accent]`.
    pub fn for_max(max_value: f64, accent: Rgb) -> Self {
        ColorScale {
            domain: (COLOR_DOMAIN_FLOOR * max_value, max_value),
            range: (Rgb::WHITE, accent),
        }
    }

    /// Maps a value onto the range. A degenerate domain maps to the range start.
    pub fn color(&self, value: f64) -> Rgb {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return self.range.0;
        }
        self.range.0.lerp(self.range.1, (value - d0) / span)
    }

    /// Fill for a day total: `None` (transparent) for totals at or below zero.
    pub fn fill(&self, total: f64) -> Option<Rgb> {
        (total > 0.0).then(|| self.color(total))
    }
}
