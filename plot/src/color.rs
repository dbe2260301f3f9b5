use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Color(r={}, g={}, b={}, a={})",
            self.r, self.g, self.b, self.a
        )
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb_f(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb_f(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb_f(1.0, 0.0, 0.0);
    pub const GREY: Color = Color::rgb_f(0.5, 0.5, 0.5);
    pub const PERU: Color = Color::rgb_f(205.0 / 255.0, 133.0 / 255.0, 63.0 / 255.0);

    pub fn rgb(r: usize, g: usize, b: usize) -> Color {
        Color::rgba(r, g, b, 1.0)
    }

    pub const fn rgb_f(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: usize, g: usize, b: usize, a: f32) -> Color {
        Color {
            r: (r as f32) / 255.0,
            g: (g as f32) / 255.0,
            b: (b as f32) / 255.0,
            a,
        }
    }

    pub fn alpha(&self, a: f32) -> Color {
        Color { a, ..*self }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn hex(raw: &str) -> Result<Color> {
        let digits = raw
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("Color {:?} doesn't start with #", raw))?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            bail!("Color {:?} must look like #RRGGBB or #RRGGBBAA", raw);
        }
        let channel = |idx: usize| -> Result<usize> {
            usize::from_str_radix(&digits[idx..idx + 2], 16)
                .map_err(|_| anyhow!("Bad hex digits in color {:?}", raw))
        };
        let a = if digits.len() == 8 {
            (channel(6)? as f32) / 255.0
        } else {
            1.0
        };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// `#rrggbb`. Transparency is dropped; SVG takes it separately.
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }

    pub fn lerp(self, other: Color, pct: f64) -> Color {
        let pct = pct as f32;
        Color {
            r: lerp(pct, (self.r, other.r)),
            g: lerp(pct, (self.g, other.g)),
            b: lerp(pct, (self.b, other.b)),
            a: lerp(pct, (self.a, other.a)),
        }
    }
}

fn to_byte(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn lerp(pct: f32, (x1, x2): (f32, f32)) -> f32 {
    x1 + pct * (x2 - x1)
}

/// Evenly spaced colors, linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale(pub Vec<Color>);

impl ColorScale {
    /// The "fire" palette, reversed: white for no effect, through yellow, orange and red, to
    /// black.
    pub fn fire_reversed() -> ColorScale {
        ColorScale(
            ["#ffffff", "#fff27a", "#ffb025", "#f4511e", "#b01000", "#000000"]
                .iter()
                .map(|x| Color::hex(x))
                .collect::<Result<Vec<_>>>()
                .unwrap_or_else(|_| vec![Color::WHITE, Color::BLACK]),
        )
    }

    /// `pct` is clamped to [0, 1].
    pub fn eval(&self, pct: f64) -> Color {
        let (low, pct) = self.inner_eval(pct);
        if low + 1 == self.0.len() {
            return self.0[low];
        }
        self.0[low].lerp(self.0[low + 1], pct)
    }

    fn inner_eval(&self, pct: f64) -> (usize, f64) {
        if self.0.len() < 2 {
            return (0, 0.0);
        }
        let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 1.0) };
        // What's the interval between each pair of colors?
        let width = 1.0 / (self.0.len() - 1) as f64;
        let low = (pct / width).floor() as usize;
        if low >= self.0.len() - 1 {
            return (self.0.len() - 2, 1.0);
        }
        (low, (pct % width) / width)
    }

    /// For an SVG gradient: (offset in [0, 1], color)
    pub fn stops(&self) -> Vec<(f64, Color)> {
        if self.0.len() < 2 {
            return self.0.iter().map(|c| (0.0, *c)).collect();
        }
        let n = (self.0.len() - 1) as f64;
        self.0
            .iter()
            .enumerate()
            .map(|(idx, c)| (idx as f64 / n, *c))
            .collect()
    }
}

/// Maps a value in `[low, high]` linearly onto a color scale. Values outside are clamped; NaN gets
/// its own color.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearColorMapper {
    pub scale: ColorScale,
    pub low: f64,
    pub high: f64,
    pub nan_color: Color,
}

impl LinearColorMapper {
    pub fn new(scale: ColorScale, low: f64, high: f64) -> LinearColorMapper {
        LinearColorMapper {
            scale,
            low,
            high,
            nan_color: Color::GREY,
        }
    }

    /// The range spans the finite values. Without any, it's [0, 1].
    pub fn spanning<I: IntoIterator<Item = f64>>(scale: ColorScale, values: I) -> LinearColorMapper {
        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for x in values {
            if x.is_finite() {
                low = low.min(x);
                high = high.max(x);
            }
        }
        if low > high {
            return LinearColorMapper::new(scale, 0.0, 1.0);
        }
        LinearColorMapper::new(scale, low, high)
    }

    pub fn map(&self, value: f64) -> Color {
        if value.is_nan() {
            return self.nan_color;
        }
        if self.high <= self.low {
            return self.scale.eval(0.0);
        }
        self.scale.eval((value - self.low) / (self.high - self.low))
    }
}

/// A gradient legend for a color mapper.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBar {
    pub mapper: LinearColorMapper,
    pub low_label: String,
    pub high_label: String,
}

impl ColorBar {
    pub fn new<I1: Into<String>, I2: Into<String>>(
        mapper: LinearColorMapper,
        low_label: I1,
        high_label: I2,
    ) -> ColorBar {
        ColorBar {
            mapper,
            low_label: low_label.into(),
            high_label: high_label.into(),
        }
    }
}
