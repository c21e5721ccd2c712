//! Runtime tags for the adapter's arity and result shape.
//!
//! The adapter carries its arity and shape as marker types; these tags are the
//! value-level mirror used in errors, logs and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArityTag {
    Zero,
    One,
    Two,
    Three,
}

impl ArityTag {
    pub fn count(self) -> usize {
        match self {
            ArityTag::Zero => 0,
            ArityTag::One => 1,
            ArityTag::Two => 2,
            ArityTag::Three => 3,
        }
    }
}

impl fmt::Display for ArityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// The result contract an engine interface expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeTag {
    Scalar,
    Void,
    IterableOfScalar,
    Pair,
    IterableOfPair,
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShapeTag::Scalar => "scalar",
            ShapeTag::Void => "void",
            ShapeTag::IterableOfScalar => "iterable",
            ShapeTag::Pair => "pair",
            ShapeTag::IterableOfPair => "iterable-of-pairs",
        };
        f.write_str(s)
    }
}
