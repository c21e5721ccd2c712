//! Errors - error taxonomy shared by every component.
//!
//! | Kind          | Raised by                                   |
//! |---------------|---------------------------------------------|
//! | Invocation    | the wrapped callable                        |
//! | Coercion      | an adapter whose callable returned the wrong shape |
//! | Serialization | encoding / decoding the closure payload     |
//! | Resolution    | loading the module that defines a closure   |

use std::error::Error as StdError;

use super::ids::ImplId;
use super::tags::{ArityTag, ShapeTag};

/// ErrorKind classifies failures for logging and policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Invocation,
    Coercion,
    Serialization,
    Resolution,
}

/// Failure raised by user logic inside a callable.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct InvocationError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl InvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors surfaced by a `CallableAdapter` to the engine.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("callable {impl_id} failed")]
    Invocation {
        impl_id: ImplId,
        #[source]
        source: InvocationError,
    },

    #[error("{shape} adapter expected {expected}, callable returned {found}")]
    Coercion {
        shape: ShapeTag,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unresolved callable: {arity}-arg {shape} adapter has no callable to invoke")]
    UnresolvedCallable { arity: ArityTag, shape: ShapeTag },
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Invocation { .. } => ErrorKind::Invocation,
            AdapterError::Coercion { .. } => ErrorKind::Coercion,
            AdapterError::UnresolvedCallable { .. } => ErrorKind::Resolution,
        }
    }
}

/// Renders an error followed by its `source()` chain on one line.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        cause = inner.source();
    }
    out
}
