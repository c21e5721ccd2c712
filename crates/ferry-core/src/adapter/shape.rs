//! Shape markers and result coercion.
//!
//! Each shape turns the callable's raw `Value` into what the engine
//! interface expects. Coercion happens on every call, never at wrap time.
//!
//! Iterable shapes expect the callable to return an already realized
//! `Value::List`; the iterators handed out are single pass.

use crate::domain::{AdapterError, ShapeTag, Value};

mod sealed {
    pub trait Sealed {}
}

pub trait Shape: sealed::Sealed + Send + Sync + 'static {
    const TAG: ShapeTag;

    type Output;

    fn coerce(value: Value) -> Result<Self::Output, AdapterError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Void {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterableOfScalar {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pair {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterableOfPair {}

impl sealed::Sealed for Scalar {}
impl sealed::Sealed for Void {}
impl sealed::Sealed for IterableOfScalar {}
impl sealed::Sealed for Pair {}
impl sealed::Sealed for IterableOfPair {}

fn mismatch(shape: ShapeTag, expected: &'static str, found: &Value) -> AdapterError {
    AdapterError::Coercion {
        shape,
        expected,
        found: found.kind_name(),
    }
}

impl Shape for Scalar {
    const TAG: ShapeTag = ShapeTag::Scalar;
    type Output = Value;

    fn coerce(value: Value) -> Result<Value, AdapterError> {
        Ok(value)
    }
}

impl Shape for Void {
    const TAG: ShapeTag = ShapeTag::Void;
    type Output = ();

    fn coerce(_value: Value) -> Result<(), AdapterError> {
        Ok(())
    }
}

impl Shape for IterableOfScalar {
    const TAG: ShapeTag = ShapeTag::IterableOfScalar;
    type Output = ValueIter;

    fn coerce(value: Value) -> Result<ValueIter, AdapterError> {
        value
            .into_list()
            .map(ValueIter::new)
            .map_err(|other| mismatch(Self::TAG, "list", &other))
    }
}

impl Shape for Pair {
    const TAG: ShapeTag = ShapeTag::Pair;
    type Output = (Value, Value);

    fn coerce(value: Value) -> Result<(Value, Value), AdapterError> {
        value
            .into_pair()
            .map_err(|other| mismatch(Self::TAG, "pair", &other))
    }
}

impl Shape for IterableOfPair {
    const TAG: ShapeTag = ShapeTag::IterableOfPair;
    type Output = PairIter;

    fn coerce(value: Value) -> Result<PairIter, AdapterError> {
        let items = value
            .into_list()
            .map_err(|other| mismatch(Self::TAG, "list of pairs", &other))?;
        let pairs = items
            .into_iter()
            .map(|item| {
                item.into_pair()
                    .map_err(|other| mismatch(Self::TAG, "pair element", &other))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PairIter::new(pairs))
    }
}

/// Single-pass iterator over the values a callable returned.
#[derive(Debug)]
pub struct ValueIter {
    inner: std::vec::IntoIter<Value>,
}

impl ValueIter {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            inner: items.into_iter(),
        }
    }
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ValueIter {}

/// Single-pass iterator over key/value pairs.
#[derive(Debug)]
pub struct PairIter {
    inner: std::vec::IntoIter<(Value, Value)>,
}

impl PairIter {
    pub fn new(pairs: Vec<(Value, Value)>) -> Self {
        Self {
            inner: pairs.into_iter(),
        }
    }
}

impl Iterator for PairIter {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<(Value, Value)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PairIter {}
