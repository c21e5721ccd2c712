//! Closure / DynCallable - the callable side of the adapter.
//!
//! Two layers, in the same way typed handlers are erased into object-safe
//! handlers:
//! - **Closure** (static): a serde struct whose fields are the captured
//!   state, with `MODULE` / `NAME` naming its implementation.
//! - **DynCallable** (erased): what adapters and the codec hold,
//!   `Arc<dyn DynCallable>`.
//!
//! `TypedCallable<C>` turns a `Closure` into a `DynCallable`. `LocalFn`
//! wraps a plain Rust closure; it runs fine in-process but refuses to be
//! encoded, since nothing on the other side could rebuild it.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{Args, ImplId, InvocationError, Value};

/// Module name under which `LocalFn`s report their identifier.
pub const LOCAL_MODULE: &str = "ferry.local";

/// A serializable unit of user logic.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Offset { by: i64 }
///
/// impl Closure for Offset {
///     const MODULE: &'static str = "arith";
///     const NAME: &'static str = "offset";
///
///     fn invoke(&self, args: Args) -> Result<Value, InvocationError> {
///         Ok(Value::Int(args.int(0)? + self.by))
///     }
/// }
/// ```
pub trait Closure: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Module that must be loaded before this closure can be decoded.
    const MODULE: &'static str;

    /// Name inside the module. May contain `$` for nested closures.
    const NAME: &'static str;

    fn invoke(&self, args: Args) -> Result<Value, InvocationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("closure state is not serializable")]
    Json(#[from] serde_json::Error),

    #[error("local closure '{0}' cannot be sent to another process")]
    Local(&'static str),
}

/// Object-safe view of a callable.
pub trait DynCallable: Send + Sync {
    fn invoke_dyn(&self, args: Args) -> Result<Value, InvocationError>;

    /// Module the callable declares, before any name is appended.
    fn module(&self) -> &'static str;

    fn impl_id(&self) -> ImplId;

    /// Object-graph encoding of the captured state.
    fn encode(&self) -> Result<serde_json::Value, EncodeError>;
}

pub struct TypedCallable<C: Closure> {
    closure: C,
}

impl<C: Closure> TypedCallable<C> {
    pub fn new(closure: C) -> Self {
        Self { closure }
    }
}

impl<C: Closure> DynCallable for TypedCallable<C> {
    fn invoke_dyn(&self, args: Args) -> Result<Value, InvocationError> {
        self.closure.invoke(args)
    }

    fn module(&self) -> &'static str {
        C::MODULE
    }

    fn impl_id(&self) -> ImplId {
        ImplId::from_parts(C::MODULE, C::NAME)
    }

    fn encode(&self) -> Result<serde_json::Value, EncodeError> {
        Ok(serde_json::to_value(&self.closure)?)
    }
}

pub struct LocalFn<F> {
    label: &'static str,
    f: F,
}

impl<F> DynCallable for LocalFn<F>
where
    F: Fn(Args) -> Result<Value, InvocationError> + Send + Sync,
{
    fn invoke_dyn(&self, args: Args) -> Result<Value, InvocationError> {
        (self.f)(args)
    }

    fn module(&self) -> &'static str {
        LOCAL_MODULE
    }

    fn impl_id(&self) -> ImplId {
        ImplId::from_parts(LOCAL_MODULE, self.label)
    }

    fn encode(&self) -> Result<serde_json::Value, EncodeError> {
        Err(EncodeError::Local(self.label))
    }
}

/// Erases a `Closure`.
pub fn callable<C: Closure>(closure: C) -> Arc<dyn DynCallable> {
    Arc::new(TypedCallable::new(closure))
}

/// Wraps an in-process Rust closure.
pub fn local_fn<F>(label: &'static str, f: F) -> Arc<dyn DynCallable>
where
    F: Fn(Args) -> Result<Value, InvocationError> + Send + Sync + 'static,
{
    Arc::new(LocalFn { label, f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Add, Offset};

    #[test]
    fn typed_callable_reports_its_impl_id() {
        let f = callable(Offset { by: 10 });
        assert_eq!(f.impl_id().as_str(), "arith$offset");
        assert_eq!(
            f.invoke_dyn(Args::one(Value::Int(1))).unwrap(),
            Value::Int(11)
        );
    }

    #[test]
    fn typed_callable_encodes_captured_state() {
        let f = callable(Offset { by: 10 });
        assert_eq!(f.encode().unwrap(), serde_json::json!({ "by": 10 }));

        let g = callable(Add);
        assert_eq!(g.encode().unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn local_fn_runs_but_cannot_be_encoded() {
        let f = local_fn("double", |args| Ok(Value::Int(args.int(0)? * 2)));
        assert_eq!(
            f.invoke_dyn(Args::one(Value::Int(4))).unwrap(),
            Value::Int(8)
        );
        assert_eq!(f.impl_id().as_str(), "ferry.local$double");
        assert!(matches!(f.encode(), Err(EncodeError::Local("double"))));
    }
}
