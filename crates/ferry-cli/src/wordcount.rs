//! The `wordcount` module: closures shipped from the driver to workers.

use ferry_core::module::{ModuleBuilder, ModuleError};
use ferry_core::{Args, Closure, InvocationError, Value};
use serde::{Deserialize, Serialize};

pub const MODULE: &str = "wordcount";

/// Line -> words. Punctuation at either end of a word is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenize {
    pub lowercase: bool,
    pub min_len: usize,
}

impl Closure for Tokenize {
    const MODULE: &'static str = MODULE;
    const NAME: &'static str = "tokenize";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        let words = args
            .str(0)?
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.chars().count() >= self.min_len.max(1))
            .map(|w| {
                if self.lowercase {
                    Value::from(w.to_lowercase())
                } else {
                    Value::from(w)
                }
            });
        Ok(Value::List(words.collect()))
    }
}

/// Word -> (word, 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToPair;

impl Closure for ToPair {
    const MODULE: &'static str = MODULE;
    const NAME: &'static str = "to_pair";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        Ok(Value::pair(args.get(0)?.clone(), 1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumCounts;

impl Closure for SumCounts {
    const MODULE: &'static str = MODULE;
    const NAME: &'static str = "sum_counts";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        let (a, b) = (args.int(0)?, args.int(1)?);
        a.checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| InvocationError::new(format!("count overflow: {a} + {b}")))
    }
}

/// A closure from a module no worker knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stray {
    pub note: String,
}

impl Closure for Stray {
    const MODULE: &'static str = "scratchpad";
    const NAME: &'static str = "stray";

    fn invoke(&self, _: Args) -> Result<Value, InvocationError> {
        Ok(Value::from(self.note.clone()))
    }
}

pub fn define(module: &mut ModuleBuilder) -> Result<(), ModuleError> {
    module
        .closure::<Tokenize>()?
        .closure::<ToPair>()?
        .closure::<SumCounts>()?;
    Ok(())
}
