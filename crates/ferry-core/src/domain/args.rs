//! Positional arguments handed to a callable.

use super::errors::InvocationError;
use super::value::Value;

/// Up to three positional arguments, in call order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn one(a: Value) -> Self {
        Self(vec![a])
    }

    pub fn two(a: Value, b: Value) -> Self {
        Self(vec![a, b])
    }

    pub fn three(a: Value, b: Value, c: Value) -> Self {
        Self(vec![a, b, c])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0
    }

    /// Argument at `index`, or an invocation error naming the missing slot.
    pub fn get(&self, index: usize) -> Result<&Value, InvocationError> {
        self.0
            .get(index)
            .ok_or_else(|| InvocationError::new(format!("missing argument #{index}")))
    }

    pub fn int(&self, index: usize) -> Result<i64, InvocationError> {
        let value = self.get(index)?;
        value.as_int().ok_or_else(|| {
            InvocationError::new(format!(
                "argument #{index} must be int, got {}",
                value.kind_name()
            ))
        })
    }

    pub fn str(&self, index: usize) -> Result<&str, InvocationError> {
        let value = self.get(index)?;
        value.as_str().ok_or_else(|| {
            InvocationError::new(format!(
                "argument #{index} must be str, got {}",
                value.kind_name()
            ))
        })
    }
}

impl IntoIterator for Args {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
