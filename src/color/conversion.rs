//! Device color space conversion.
//!
//! Component values are clamped to `[0, 1]` before conversion (NaN becomes
//! 0), scaled to 0-255 and rounded half away from zero. All functions are
//! pure.

use super::CanonicalColor;
use serde::Serialize;
use std::fmt;

/// The device color spaces colors are matched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpaceKind {
    /// DeviceGray, one component
    Gray,
    /// DeviceRGB, three components
    Rgb,
    /// DeviceCMYK, four components
    Cmyk,
}

impl ColorSpaceKind {
    /// Number of color components.
    pub fn components(self) -> usize {
        match self {
            ColorSpaceKind::Gray => 1,
            ColorSpaceKind::Rgb => 3,
            ColorSpaceKind::Cmyk => 4,
        }
    }

    /// Device space selected by a `cs`/`CS` operand name.
    ///
    /// Only the device family names (and their inline abbreviations) qualify.
    /// Resource names such as `/CS0` refer to ICCBased, Separation or other
    /// spaces that need the page resources to interpret.
    pub fn from_space_name(name: &[u8]) -> Option<Self> {
        match name {
            b"DeviceGray" | b"G" => Some(ColorSpaceKind::Gray),
            b"DeviceRGB" | b"RGB" => Some(ColorSpaceKind::Rgb),
            b"DeviceCMYK" | b"CMYK" => Some(ColorSpaceKind::Cmyk),
            _ => None,
        }
    }

    /// Device space with the given component count.
    pub fn from_component_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ColorSpaceKind::Gray),
            3 => Some(ColorSpaceKind::Rgb),
            4 => Some(ColorSpaceKind::Cmyk),
            _ => None,
        }
    }
}

impl fmt::Display for ColorSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorSpaceKind::Gray => "gray",
            ColorSpaceKind::Rgb => "rgb",
            ColorSpaceKind::Cmyk => "cmyk",
        })
    }
}

/// Raw components of a matched color, not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "space", content = "components", rename_all = "lowercase")]
pub enum ColorValue {
    /// Gray level
    Gray(f32),
    /// Red, green, blue
    Rgb([f32; 3]),
    /// Cyan, magenta, yellow, black
    Cmyk([f32; 4]),
}

impl ColorValue {
    /// Build a value from a component slice whose length matches `space`.
    pub fn from_components(space: ColorSpaceKind, components: &[f32]) -> Option<Self> {
        match (space, components) {
            (ColorSpaceKind::Gray, &[g]) => Some(ColorValue::Gray(g)),
            (ColorSpaceKind::Rgb, &[r, g, b]) => Some(ColorValue::Rgb([r, g, b])),
            (ColorSpaceKind::Cmyk, &[c, m, y, k]) => Some(ColorValue::Cmyk([c, m, y, k])),
            _ => None,
        }
    }

    /// Color space of this value.
    pub fn space(&self) -> ColorSpaceKind {
        match self {
            ColorValue::Gray(_) => ColorSpaceKind::Gray,
            ColorValue::Rgb(_) => ColorSpaceKind::Rgb,
            ColorValue::Cmyk(_) => ColorSpaceKind::Cmyk,
        }
    }

    /// Raw components in operand order.
    pub fn components(&self) -> &[f32] {
        match self {
            ColorValue::Gray(g) => std::slice::from_ref(g),
            ColorValue::Rgb(rgb) => rgb,
            ColorValue::Cmyk(cmyk) => cmyk,
        }
    }

    /// Convert to the canonical RGB triple.
    pub fn to_canonical(&self) -> CanonicalColor {
        match *self {
            ColorValue::Gray(g) => gray_to_rgb(g),
            ColorValue::Rgb([r, g, b]) => rgb_to_rgb(r, g, b),
            ColorValue::Cmyk([c, m, y, k]) => cmyk_to_rgb(c, m, y, k),
        }
    }
}

impl From<ColorValue> for CanonicalColor {
    fn from(value: ColorValue) -> Self {
        value.to_canonical()
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn channel(v: f32) -> u8 {
    (unit(v) * 255.0).round() as u8
}

/// DeviceGray to RGB: all channels `round(g * 255)`.
pub fn gray_to_rgb(g: f32) -> CanonicalColor {
    let v = channel(g);
    CanonicalColor::new(v, v, v)
}

/// DeviceRGB to 8-bit RGB.
pub fn rgb_to_rgb(r: f32, g: f32, b: f32) -> CanonicalColor {
    CanonicalColor::new(channel(r), channel(g), channel(b))
}

/// DeviceCMYK to RGB with the naive subtractive formula
/// `R = 255 (1 - c)(1 - k)` and likewise for G (m) and B (y).
pub fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> CanonicalColor {
    let white = 1.0 - unit(k);
    let subtract = |v: f32| channel((1.0 - unit(v)) * white);
    CanonicalColor::new(subtract(c), subtract(m), subtract(y))
}
