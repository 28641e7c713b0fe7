//! Content stream color matching.
//!
//! [`ColorMatcher`] walks a decoded content stream and yields one
//! [`ColorOperation`] per color-setting operator it recognizes.

pub mod matcher;
pub mod operators;

pub use matcher::{ColorMatcher, ColorOperations, MatchStats};
pub use operators::{ColorOperation, ColorOperator, PaintTarget};
