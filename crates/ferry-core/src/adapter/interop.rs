//! Scalar-function interop: the engine runtime's own function objects.
//!
//! Some engine internals take plain `apply`-style functions rather than the
//! `call`-style contracts. These reuse the zero- and one-argument scalar
//! adapters, so they serialize through the same codec.

use super::arity::{One, Zero};
use super::callable_adapter::CallableAdapter;
use super::shape::Scalar;
use crate::domain::{AdapterError, Value};

pub trait ScalarFunction0: Send + Sync {
    fn apply(&self) -> Result<Value, AdapterError>;
}

pub trait ScalarFunction1: Send + Sync {
    fn apply(&self, v1: Value) -> Result<Value, AdapterError>;
}

pub type Thunk = CallableAdapter<Zero, Scalar>;
pub type ScalarFn1 = CallableAdapter<One, Scalar>;

impl ScalarFunction0 for Thunk {
    fn apply(&self) -> Result<Value, AdapterError> {
        self.call()
    }
}

impl ScalarFunction1 for ScalarFn1 {
    fn apply(&self, v1: Value) -> Result<Value, AdapterError> {
        self.call(v1)
    }
}
