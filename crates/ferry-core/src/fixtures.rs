//! Closures and module sources shared by the unit tests.

use serde::{Deserialize, Serialize};

use crate::callable::Closure;
use crate::domain::{Args, InvocationError, Value};
use crate::module::{ModuleBuilder, ModuleError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Add;

impl Closure for Add {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "add";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        Ok(Value::Int(args.int(0)? + args.int(1)?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sum3;

impl Closure for Sum3 {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "sum3";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        Ok(Value::Int(args.int(0)? + args.int(1)? + args.int(2)?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offset {
    pub by: i64,
}

impl Closure for Offset {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "offset";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        Ok(Value::Int(args.int(0)? + self.by))
    }
}

/// Nested closure: its name carries a second delimiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaled {
    pub factor: i64,
}

impl Closure for Scaled {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "scale$fn__42";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        Ok(Value::Int(args.int(0)? * self.factor))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Range3;

impl Closure for Range3 {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "range3";

    fn invoke(&self, _args: Args) -> Result<Value, InvocationError> {
        Ok(Value::list([1, 2, 3]))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fail;

impl Closure for Fail {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "fail";

    fn invoke(&self, _args: Args) -> Result<Value, InvocationError> {
        Err(InvocationError::new("deliberate failure"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Const {
    pub value: Value,
}

impl Closure for Const {
    const MODULE: &'static str = "arith";
    const NAME: &'static str = "const";

    fn invoke(&self, _args: Args) -> Result<Value, InvocationError> {
        Ok(self.value.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenize {
    pub lowercase: bool,
}

impl Closure for Tokenize {
    const MODULE: &'static str = "text";
    const NAME: &'static str = "tokenize";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        let line = args.str(0)?;
        let words = line.split_whitespace().map(|w| {
            if self.lowercase {
                Value::from(w.to_lowercase())
            } else {
                Value::from(w)
            }
        });
        Ok(Value::List(words.collect()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap;

impl Closure for Swap {
    const MODULE: &'static str = "text";
    const NAME: &'static str = "swap";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        let (k, v) = args
            .get(0)?
            .clone()
            .into_pair()
            .map_err(|other| InvocationError::new(format!("expected pair, got {}", other.kind_name())))?;
        Ok(Value::pair(v, k))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explode;

impl Closure for Explode {
    const MODULE: &'static str = "text";
    const NAME: &'static str = "explode";

    fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
        let s = args.str(0)?;
        Ok(Value::List(
            s.chars().map(|c| Value::pair(c.to_string(), 1)).collect(),
        ))
    }
}

/// Declares `MODULE = "ghost"`, which no test catalog provides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost;

impl Closure for Ghost {
    const MODULE: &'static str = "ghost";
    const NAME: &'static str = "boo";

    fn invoke(&self, _args: Args) -> Result<Value, InvocationError> {
        Ok(Value::Unit)
    }
}

pub fn arith_module(m: &mut ModuleBuilder) -> Result<(), ModuleError> {
    m.closure::<Add>()?
        .closure::<Sum3>()?
        .closure::<Offset>()?
        .closure::<Scaled>()?
        .closure::<Range3>()?
        .closure::<Fail>()?
        .closure::<Const>()?;
    Ok(())
}

pub fn text_module(m: &mut ModuleBuilder) -> Result<(), ModuleError> {
    m.closure::<Tokenize>()?
        .closure::<Swap>()?
        .closure::<Explode>()?;
    Ok(())
}

/// A module whose evaluation fails, like a source file with a syntax error.
pub fn broken_module(m: &mut ModuleBuilder) -> Result<(), ModuleError> {
    Err(ModuleError::Evaluation {
        module: m.name().clone(),
        reason: "unexpected end of input".to_string(),
    })
}
