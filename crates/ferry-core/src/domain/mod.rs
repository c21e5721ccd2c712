//! Domain model (values, arguments, identifiers, error taxonomy).

pub mod args;
pub mod errors;
pub mod ids;
pub mod tags;
pub mod value;

pub use self::args::Args;
pub use self::errors::{AdapterError, ErrorKind, InvocationError, error_chain};
pub use self::ids::{
    DiagnosticId, Id, IdMarker, ImplId, ModuleName, NameError, SYNTHETIC_DELIMITER, ShipmentId,
};
pub use self::tags::{ArityTag, ShapeTag};
pub use self::value::Value;
