//! Module - dynamically loaded units that define closures.
//!
//! - `definition`: what a module contributes (closure decoders)
//! - `loader`: the injectable load entry point
//! - `resolver`: the process's load-once module table

pub mod definition;
pub mod loader;
pub mod resolver;

pub use self::definition::{DecodeFn, ModuleBuilder, ModuleDefinition, ModuleError};
pub use self::loader::{CatalogLoader, LoadError, ModuleLoader, ModuleSource};
pub use self::resolver::{ModuleResolver, ResolveError};
