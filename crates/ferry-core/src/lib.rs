//! ferry-core
//!
//! Adapters that let opaque user callables be driven through a data
//! engine's fixed function interfaces, and the codec that ships those
//! callables to workers.
//!
//! # Modules
//! - **domain**: values, arguments, identifiers, error taxonomy
//! - **callable**: `Closure` (serde state + implementation id) and its erased form
//! - **adapter**: `CallableAdapter<A, S>` and the engine contracts it satisfies
//! - **module**: module definitions, the loader port, the load-once resolver
//! - **codec**: `ClosureCodec`, wire form, error policy, diagnostics
//! - **registry**: record codecs and the registration bridge
//! - **ports**: clock and id generation
//! - **config**: codec configuration

pub mod adapter;
pub mod callable;
pub mod codec;
pub mod config;
pub mod domain;
pub mod module;
pub mod ports;
pub mod registry;

#[cfg(test)]
mod fixtures;

pub use adapter::CallableAdapter;
pub use callable::{Closure, DynCallable, callable, local_fn};
pub use codec::{ClosureCodec, CodecError, ErrorPolicy};
pub use config::CodecConfig;
pub use domain::{AdapterError, Args, ImplId, InvocationError, ModuleName, Value};
pub use module::{CatalogLoader, ModuleBuilder, ModuleLoader, ModuleResolver};
pub use registry::{CodecRegistry, Registrator, RegistryBridge};
