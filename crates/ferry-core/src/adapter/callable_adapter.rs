//! CallableAdapter - one generic adapter for every arity and shape.
//!
//! `CallableAdapter<A, S>` forwards each call straight to the wrapped
//! callable and coerces the result with `S::coerce`. Wrapping never inspects
//! the callable. A bad callable shows up on the first call.
//!
//! The callable is only absent after a lenient decode failed; such an
//! adapter answers every call with `AdapterError::UnresolvedCallable`.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::ser::{self, Serialize, Serializer};

use super::arity::{Arity, One, Three, Two, Zero};
use super::shape::Shape;
use crate::callable::{Closure, DynCallable, callable};
use crate::codec::SerializedForm;
use crate::domain::{AdapterError, Args, ArityTag, ShapeTag, Value};

pub struct CallableAdapter<A: Arity, S: Shape> {
    callable: Option<Arc<dyn DynCallable>>,
    _marker: PhantomData<(A, S)>,
}

impl<A: Arity, S: Shape> CallableAdapter<A, S> {
    pub fn new(callable: Arc<dyn DynCallable>) -> Self {
        Self {
            callable: Some(callable),
            _marker: PhantomData,
        }
    }

    pub fn of<C: Closure>(closure: C) -> Self {
        Self::new(callable(closure))
    }

    /// An adapter left behind by a lenient decode failure.
    pub fn unresolved() -> Self {
        Self {
            callable: None,
            _marker: PhantomData,
        }
    }

    pub fn callable(&self) -> Option<&Arc<dyn DynCallable>> {
        self.callable.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.callable.is_some()
    }

    pub fn arity(&self) -> ArityTag {
        A::TAG
    }

    pub fn shape(&self) -> ShapeTag {
        S::TAG
    }

    fn dispatch(&self, args: Args) -> Result<S::Output, AdapterError> {
        let callable = self
            .callable
            .as_ref()
            .ok_or(AdapterError::UnresolvedCallable {
                arity: A::TAG,
                shape: S::TAG,
            })?;
        let value = callable
            .invoke_dyn(args)
            .map_err(|source| AdapterError::Invocation {
                impl_id: callable.impl_id(),
                source,
            })?;
        S::coerce(value)
    }
}

impl<S: Shape> CallableAdapter<Zero, S> {
    pub fn call(&self) -> Result<S::Output, AdapterError> {
        self.dispatch(Args::none())
    }
}

impl<S: Shape> CallableAdapter<One, S> {
    pub fn call(&self, v1: Value) -> Result<S::Output, AdapterError> {
        self.dispatch(Args::one(v1))
    }
}

impl<S: Shape> CallableAdapter<Two, S> {
    pub fn call(&self, v1: Value, v2: Value) -> Result<S::Output, AdapterError> {
        self.dispatch(Args::two(v1, v2))
    }
}

impl<S: Shape> CallableAdapter<Three, S> {
    pub fn call(&self, v1: Value, v2: Value, v3: Value) -> Result<S::Output, AdapterError> {
        self.dispatch(Args::three(v1, v2, v3))
    }
}

impl<A: Arity, S: Shape> Clone for CallableAdapter<A, S> {
    fn clone(&self) -> Self {
        Self {
            callable: self.callable.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A: Arity, S: Shape> fmt::Debug for CallableAdapter<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableAdapter")
            .field("arity", &A::TAG)
            .field("shape", &S::TAG)
            .field("impl_id", &self.callable.as_ref().map(|c| c.impl_id()))
            .finish()
    }
}

/// Writes the adapter's `SerializedForm`. Decoding needs a resolver, see
/// `ClosureCodec::adapter_seed`.
impl<A: Arity, S: Shape> Serialize for CallableAdapter<A, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let callable = self.callable.as_ref().ok_or_else(|| {
            ser::Error::custom(format!(
                "{}-arg {} adapter has no callable to serialize",
                A::TAG,
                S::TAG
            ))
        })?;
        let form = SerializedForm::capture(callable.as_ref()).map_err(ser::Error::custom)?;
        form.serialize(serializer)
    }
}
