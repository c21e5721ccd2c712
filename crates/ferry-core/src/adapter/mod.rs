//! Adapter - exposes a callable through the engine's fixed interfaces.
//!
//! - `CallableAdapter<A, S>`: the single generic adapter
//! - `arity` / `shape`: the marker types it is parameterized by
//! - `contracts`: engine interfaces (`Function2`, `PairFunction`, ...)
//! - `interop`: `apply`-style scalar functions

pub mod arity;
pub mod callable_adapter;
pub mod contracts;
pub mod interop;
pub mod shape;

pub use self::arity::{Arity, One, Three, Two, Zero};
pub use self::callable_adapter::CallableAdapter;
pub use self::contracts::{
    FlatMapFunction, FlatMapFunction2, FlatMapFunction2Adapter, FlatMapFunctionAdapter, Function,
    Function2, Function2Adapter, Function3, Function3Adapter, FunctionAdapter,
    PairFlatMapFunction, PairFlatMapFunctionAdapter, PairFunction, PairFunctionAdapter, Udf2,
    VoidFunction, VoidFunctionAdapter,
};
pub use self::interop::{ScalarFn1, ScalarFunction0, ScalarFunction1, Thunk};
pub use self::shape::{
    IterableOfPair, IterableOfScalar, Pair, PairIter, Scalar, Shape, ValueIter, Void,
};
