//! Codec - closure serialization bridge.

pub mod closure_codec;
pub mod diagnostics;
pub mod form;
pub mod policy;

pub use self::closure_codec::{AdapterSeed, ClosureCodec, CodecError};
pub use self::diagnostics::{Diagnostic, DiagnosticLog};
pub use self::form::SerializedForm;
pub use self::policy::{ErrorPolicy, UnknownPolicy};
