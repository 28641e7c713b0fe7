//! Color spaces and the canonical RGB representation.
//!
//! Every matched color value is converted to a [`CanonicalColor`] before it
//! is counted, so colors from different spaces compare equal when they land
//! on the same RGB triple.

pub mod conversion;
pub mod names;

pub use conversion::{ColorSpaceKind, ColorValue, cmyk_to_rgb, gray_to_rgb, rgb_to_rgb};

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An RGB triple, 0-255 per channel.
///
/// Displays and serializes as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl CanonicalColor {
    /// Black (#000000)
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White (#FFFFFF)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Uppercase `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Whether all three channels are equal.
    pub fn is_neutral(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_sq(self, other: Self) -> u32 {
        self.channels()
            .iter()
            .zip(other.channels())
            .map(|(&a, b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum()
    }

    /// CSS3 keyword for this color, or the nearest one.
    pub fn css_name(self) -> &'static str {
        names::nearest_name(self)
    }

    /// CSS3 keyword when this color matches one exactly.
    pub fn exact_css_name(self) -> Option<&'static str> {
        names::exact_name(self)
    }
}

impl fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for CanonicalColor {
    type Err = Error;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or a CSS3 keyword.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return names::lookup(s).ok_or_else(invalid);
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            },
            _ => Err(invalid()),
        }
    }
}

impl Serialize for CanonicalColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
