//! Color operator matching.
//!
//! A small state machine over lexer tokens. Operands accumulate on a stack
//! until an operator keyword arrives; the keyword then either produces a
//! [`ColorOperation`] or is discarded, and the stack is cleared.
//!
//! Matching is syntactic. `g`, `rg` and `k` need 1, 3 and 4 numeric operands
//! immediately before the keyword; earlier operands are ignored. Operand
//! values are not range-checked here.
//!
//! The current fill and stroke color spaces are tracked so that `sc`/`scn`
//! can be interpreted. `q`/`Q` save and restore them like the rest of the
//! graphics state.
//!
//! ```
//! use pdf_chroma::content::ColorMatcher;
//! use pdf_chroma::color::CanonicalColor;
//!
//! let matcher = ColorMatcher::new(b"0 0 0 1 k 10 10 50 50 re f");
//! let colors: Vec<_> = matcher.operations().map(|op| op.canonical()).collect();
//! assert_eq!(colors, vec![CanonicalColor::BLACK]);
//! ```

use crate::color::{ColorSpaceKind, ColorValue};
use crate::config::UnsupportedColorPolicy;
use crate::content::operators::{ColorOperation, ColorOperator, PaintTarget};
use crate::decoders::DecodedText;
use crate::lexer::{Lexer, Token};
use serde::Serialize;

/// Graphics state nesting beyond this depth is not tracked.
const MAX_SAVED_STATES: usize = 256;

/// Counters collected while matching one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Operations produced
    pub matched: usize,
    /// Color operators with missing or non-numeric operands
    pub malformed: usize,
    /// Operations in unsupported color spaces that were dropped
    pub unsupported: usize,
    /// Operations in unsupported color spaces mapped by component count
    pub approximated: usize,
}

impl MatchStats {
    /// Add another stream's counters to these.
    pub fn absorb(&mut self, other: MatchStats) {
        self.matched += other.matched;
        self.malformed += other.malformed;
        self.unsupported += other.unsupported;
        self.approximated += other.approximated;
    }
}

/// Current color space of one paint target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpaceState {
    Device(ColorSpaceKind),
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColorState {
    fill: SpaceState,
    stroke: SpaceState,
}

impl ColorState {
    fn initial() -> Self {
        // DeviceGray is the initial space for both targets.
        Self {
            fill: SpaceState::Device(ColorSpaceKind::Gray),
            stroke: SpaceState::Device(ColorSpaceKind::Gray),
        }
    }

    fn get(&self, target: PaintTarget) -> SpaceState {
        match target {
            PaintTarget::Fill => self.fill,
            PaintTarget::Stroke => self.stroke,
        }
    }

    fn set(&mut self, target: PaintTarget, space: SpaceState) {
        match target {
            PaintTarget::Fill => self.fill = space,
            PaintTarget::Stroke => self.stroke = space,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Operand<'a> {
    Number(f32),
    Name(&'a [u8]),
    Other,
}

/// Matcher over one decoded stream. Each call to
/// [`operations`](Self::operations) starts over from the first byte.
#[derive(Debug, Clone, Copy)]
pub struct ColorMatcher<'t> {
    text: &'t [u8],
    policy: UnsupportedColorPolicy,
}

impl<'t> ColorMatcher<'t> {
    /// Matcher over raw decoded bytes, skipping unsupported color spaces.
    pub fn new(text: &'t [u8]) -> Self {
        Self {
            text,
            policy: UnsupportedColorPolicy::Skip,
        }
    }

    /// Matcher over a decoded stream.
    pub fn from_text(text: &'t DecodedText<'_>) -> Self {
        Self::new(text.as_bytes())
    }

    /// Set the policy for unsupported color spaces.
    pub fn with_policy(mut self, policy: UnsupportedColorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Lazily match color operations from the start of the stream.
    pub fn operations(&self) -> ColorOperations<'t> {
        ColorOperations {
            lexer: Lexer::new(self.text),
            policy: self.policy,
            operands: Vec::new(),
            nesting: 0,
            state: ColorState::initial(),
            saved: Vec::new(),
            stats: MatchStats::default(),
        }
    }
}

/// Iterator of color operations in one stream.
#[derive(Debug, Clone)]
pub struct ColorOperations<'t> {
    lexer: Lexer<'t>,
    policy: UnsupportedColorPolicy,
    operands: Vec<Operand<'t>>,
    /// Depth inside arrays and dictionaries; their contents are one operand.
    nesting: usize,
    state: ColorState,
    saved: Vec<ColorState>,
    stats: MatchStats,
}

impl<'t> ColorOperations<'t> {
    /// Counters so far. Complete once the iterator is exhausted.
    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    fn push_operand(&mut self, operand: Operand<'t>) {
        if self.nesting == 0 {
            self.operands.push(operand);
        }
    }

    /// Handle an operator keyword with the operands collected before it.
    fn on_keyword(
        &mut self,
        keyword: &[u8],
        offset: usize,
        operands: &[Operand<'t>],
    ) -> Option<ColorOperation> {
        match keyword {
            b"q" => {
                if self.saved.len() < MAX_SAVED_STATES {
                    self.saved.push(self.state);
                }
                return None;
            },
            b"Q" => {
                if let Some(state) = self.saved.pop() {
                    self.state = state;
                }
                return None;
            },
            _ => {},
        }

        let operator = ColorOperator::from_keyword(keyword)?;
        let target = operator.target();

        match operator {
            ColorOperator::SetGray(_) | ColorOperator::SetRgb(_) | ColorOperator::SetCmyk(_) => {
                let space = operator.device_space()?;
                let op = self.device_operation(space, target, offset, operands);
                if op.is_some() {
                    self.state.set(target, SpaceState::Device(space));
                }
                op
            },
            ColorOperator::SetColorSpace(_) => {
                match operands.last() {
                    Some(Operand::Name(name)) => {
                        let space = ColorSpaceKind::from_space_name(name)
                            .map_or(SpaceState::Unsupported, SpaceState::Device);
                        self.state.set(target, space);
                    },
                    _ => self.stats.malformed += 1,
                }
                None
            },
            ColorOperator::SetColor(_) | ColorOperator::SetColorN(_) => {
                if let (ColorOperator::SetColorN(_), Some((Operand::Name(_), components))) =
                    (operator, operands.split_last())
                {
                    // Pattern name: the color comes from a pattern resource.
                    return self.unsupported_operation(target, offset, components);
                }

                match self.state.get(target) {
                    SpaceState::Device(space) => {
                        self.device_operation(space, target, offset, operands)
                    },
                    SpaceState::Unsupported => {
                        self.unsupported_operation(target, offset, operands)
                    },
                }
            },
        }
    }

    fn device_operation(
        &mut self,
        space: ColorSpaceKind,
        target: PaintTarget,
        offset: usize,
        operands: &[Operand<'t>],
    ) -> Option<ColorOperation> {
        let value = trailing_numbers(operands, space.components())
            .and_then(|components| ColorValue::from_components(space, &components));
        let Some(value) = value else {
            self.stats.malformed += 1;
            return None;
        };

        Some(ColorOperation {
            value,
            target,
            offset,
            approximate: false,
        })
    }

    fn unsupported_operation(
        &mut self,
        target: PaintTarget,
        offset: usize,
        operands: &[Operand<'t>],
    ) -> Option<ColorOperation> {
        if self.policy == UnsupportedColorPolicy::Skip {
            self.stats.unsupported += 1;
            return None;
        }

        let components = numeric_run(operands);
        let value = ColorSpaceKind::from_component_count(components.len())
            .and_then(|space| ColorValue::from_components(space, &components));

        match value {
            Some(value) => {
                self.stats.approximated += 1;
                Some(ColorOperation {
                    value,
                    target,
                    offset,
                    approximate: true,
                })
            },
            None => {
                self.stats.unsupported += 1;
                None
            },
        }
    }
}

/// The last `count` operands, if all of them are numbers.
fn trailing_numbers(operands: &[Operand<'_>], count: usize) -> Option<Vec<f32>> {
    let start = operands.len().checked_sub(count)?;
    operands[start..]
        .iter()
        .map(|operand| match operand {
            Operand::Number(v) => Some(*v),
            _ => None,
        })
        .collect()
}

/// The longest run of numbers at the end of the operands.
fn numeric_run(operands: &[Operand<'_>]) -> Vec<f32> {
    let mut run: Vec<f32> = operands
        .iter()
        .rev()
        .map_while(|operand| match operand {
            Operand::Number(v) => Some(*v),
            _ => None,
        })
        .collect();
    run.reverse();
    run
}

impl<'t> Iterator for ColorOperations<'t> {
    type Item = ColorOperation;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(lexeme) = self.lexer.next() {
            match lexeme.token {
                Token::Number(v) => self.push_operand(Operand::Number(v)),
                Token::Name(name) => self.push_operand(Operand::Name(name)),
                Token::LiteralString(_)
                | Token::HexString(_)
                | Token::InlineImageData(_)
                | Token::Invalid(_) => self.push_operand(Operand::Other),
                Token::ArrayStart | Token::DictStart => self.nesting += 1,
                Token::ArrayEnd | Token::DictEnd => {
                    self.nesting = self.nesting.saturating_sub(1);
                    self.push_operand(Operand::Other);
                },
                Token::Keyword(b"true" | b"false" | b"null") => self.push_operand(Operand::Other),
                Token::Keyword(keyword) => {
                    if self.nesting > 0 {
                        // Operators never appear inside arrays or dictionaries;
                        // an unclosed `[` or `<<` ends here.
                        log::trace!("Unclosed array or dictionary before byte {}", lexeme.offset);
                        self.nesting = 0;
                        self.operands.clear();
                        self.stats.malformed += 1;
                    }

                    let mut operands = std::mem::take(&mut self.operands);
                    let operation = self.on_keyword(keyword, lexeme.offset, &operands);
                    operands.clear();
                    self.operands = operands;

                    if let Some(op) = operation {
                        self.stats.matched += 1;
                        return Some(op);
                    }
                },
            }
        }
        None
    }
}
