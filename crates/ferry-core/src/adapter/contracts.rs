//! Engine contracts - the fixed interfaces the engine calls.
//!
//! Each trait is implemented only for the one `CallableAdapter<A, S>` whose
//! arity and shape match it. Handing the engine an adapter of the wrong
//! shape is a compile error.

use super::arity::{One, Two, Three};
use super::callable_adapter::CallableAdapter;
use super::shape::{IterableOfPair, IterableOfScalar, Pair, PairIter, Scalar, ValueIter, Void};
use crate::domain::{AdapterError, Value};

pub trait Function: Send + Sync {
    fn call(&self, v1: Value) -> Result<Value, AdapterError>;
}

pub trait Function2: Send + Sync {
    fn call(&self, v1: Value, v2: Value) -> Result<Value, AdapterError>;
}

pub trait Function3: Send + Sync {
    fn call(&self, v1: Value, v2: Value, v3: Value) -> Result<Value, AdapterError>;
}

pub trait VoidFunction: Send + Sync {
    fn call(&self, v1: Value) -> Result<(), AdapterError>;
}

pub trait FlatMapFunction: Send + Sync {
    fn call(&self, v1: Value) -> Result<ValueIter, AdapterError>;
}

pub trait FlatMapFunction2: Send + Sync {
    fn call(&self, v1: Value, v2: Value) -> Result<ValueIter, AdapterError>;
}

pub trait PairFunction: Send + Sync {
    fn call(&self, v1: Value) -> Result<(Value, Value), AdapterError>;
}

pub trait PairFlatMapFunction: Send + Sync {
    fn call(&self, v1: Value) -> Result<PairIter, AdapterError>;
}

/// Two-argument SQL user-defined function.
pub trait Udf2: Send + Sync {
    fn call(&self, v1: Value, v2: Value) -> Result<Value, AdapterError>;
}

pub type FunctionAdapter = CallableAdapter<One, Scalar>;
pub type Function2Adapter = CallableAdapter<Two, Scalar>;
pub type Function3Adapter = CallableAdapter<Three, Scalar>;
pub type VoidFunctionAdapter = CallableAdapter<One, Void>;
pub type FlatMapFunctionAdapter = CallableAdapter<One, IterableOfScalar>;
pub type FlatMapFunction2Adapter = CallableAdapter<Two, IterableOfScalar>;
pub type PairFunctionAdapter = CallableAdapter<One, Pair>;
pub type PairFlatMapFunctionAdapter = CallableAdapter<One, IterableOfPair>;

impl Function for FunctionAdapter {
    fn call(&self, v1: Value) -> Result<Value, AdapterError> {
        self.call(v1)
    }
}

impl Function2 for Function2Adapter {
    fn call(&self, v1: Value, v2: Value) -> Result<Value, AdapterError> {
        self.call(v1, v2)
    }
}

impl Udf2 for Function2Adapter {
    fn call(&self, v1: Value, v2: Value) -> Result<Value, AdapterError> {
        self.call(v1, v2)
    }
}

impl Function3 for Function3Adapter {
    fn call(&self, v1: Value, v2: Value, v3: Value) -> Result<Value, AdapterError> {
        self.call(v1, v2, v3)
    }
}

impl VoidFunction for VoidFunctionAdapter {
    fn call(&self, v1: Value) -> Result<(), AdapterError> {
        self.call(v1)
    }
}

impl FlatMapFunction for FlatMapFunctionAdapter {
    fn call(&self, v1: Value) -> Result<ValueIter, AdapterError> {
        self.call(v1)
    }
}

impl FlatMapFunction2 for FlatMapFunction2Adapter {
    fn call(&self, v1: Value, v2: Value) -> Result<ValueIter, AdapterError> {
        self.call(v1, v2)
    }
}

impl PairFunction for PairFunctionAdapter {
    fn call(&self, v1: Value) -> Result<(Value, Value), AdapterError> {
        self.call(v1)
    }
}

impl PairFlatMapFunction for PairFlatMapFunctionAdapter {
    fn call(&self, v1: Value) -> Result<PairIter, AdapterError> {
        self.call(v1)
    }
}
