//! Callable - opaque user logic behind the adapters.

pub mod closure;

pub use self::closure::{
    Closure, DynCallable, EncodeError, LOCAL_MODULE, LocalFn, TypedCallable, callable, local_fn,
};
