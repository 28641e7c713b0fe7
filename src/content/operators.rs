//! Color-setting operators and matched color operations.
//!
//! ISO 32000-1:2008, Section 8.6.8, Table 74 lists the color operators. Lower
//! case operators set the nonstroking (fill) color, upper case the stroking
//! color.

use crate::color::{CanonicalColor, ColorSpaceKind, ColorValue};
use serde::Serialize;

/// Which color of the graphics state an operator sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintTarget {
    /// Nonstroking color (text, fills)
    Fill,
    /// Stroking color (lines, outlines)
    Stroke,
}

/// A color operator recognized in a content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOperator {
    /// `g` / `G`: gray level, sets the space to DeviceGray
    SetGray(PaintTarget),
    /// `rg` / `RG`: RGB components, sets the space to DeviceRGB
    SetRgb(PaintTarget),
    /// `k` / `K`: CMYK components, sets the space to DeviceCMYK
    SetCmyk(PaintTarget),
    /// `cs` / `CS`: select a color space by name
    SetColorSpace(PaintTarget),
    /// `sc` / `SC`: components in the current space
    SetColor(PaintTarget),
    /// `scn` / `SCN`: components in the current space, optional pattern name
    SetColorN(PaintTarget),
}

impl ColorOperator {
    /// Recognize an operator keyword. Anything else (including `gs`, `rgb`)
    /// is not a color operator.
    pub fn from_keyword(keyword: &[u8]) -> Option<Self> {
        use PaintTarget::{Fill, Stroke};

        Some(match keyword {
            b"g" => ColorOperator::SetGray(Fill),
            b"G" => ColorOperator::SetGray(Stroke),
            b"rg" => ColorOperator::SetRgb(Fill),
            b"RG" => ColorOperator::SetRgb(Stroke),
            b"k" => ColorOperator::SetCmyk(Fill),
            b"K" => ColorOperator::SetCmyk(Stroke),
            b"cs" => ColorOperator::SetColorSpace(Fill),
            b"CS" => ColorOperator::SetColorSpace(Stroke),
            b"sc" => ColorOperator::SetColor(Fill),
            b"SC" => ColorOperator::SetColor(Stroke),
            b"scn" => ColorOperator::SetColorN(Fill),
            b"SCN" => ColorOperator::SetColorN(Stroke),
            _ => return None,
        })
    }

    /// Graphics state color the operator affects.
    pub fn target(self) -> PaintTarget {
        match self {
            ColorOperator::SetGray(t)
            | ColorOperator::SetRgb(t)
            | ColorOperator::SetCmyk(t)
            | ColorOperator::SetColorSpace(t)
            | ColorOperator::SetColor(t)
            | ColorOperator::SetColorN(t) => t,
        }
    }

    /// Device space implied by the operator itself (`g`, `rg`, `k`).
    pub fn device_space(self) -> Option<ColorSpaceKind> {
        match self {
            ColorOperator::SetGray(_) => Some(ColorSpaceKind::Gray),
            ColorOperator::SetRgb(_) => Some(ColorSpaceKind::Rgb),
            ColorOperator::SetCmyk(_) => Some(ColorSpaceKind::Cmyk),
            _ => None,
        }
    }
}

/// One matched color-setting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorOperation {
    /// Color space and raw components
    pub value: ColorValue,
    /// Fill or stroke
    pub target: PaintTarget,
    /// Byte offset of the operator keyword in the decoded stream
    pub offset: usize,
    /// The operation was in an unsupported color space and mapped by
    /// component count
    pub approximate: bool,
}

impl ColorOperation {
    /// Color space of the matched value.
    pub fn space(&self) -> ColorSpaceKind {
        self.value.space()
    }

    /// Raw components in operand order.
    pub fn components(&self) -> &[f32] {
        self.value.components()
    }

    /// Canonical RGB form of the matched value.
    pub fn canonical(&self) -> CanonicalColor {
        self.value.to_canonical()
    }
}
