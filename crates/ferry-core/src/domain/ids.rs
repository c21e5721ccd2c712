//! Identifiers: module names, implementation ids and ULID-based ids.
//!
//! # ModuleName / ImplId
//! A closure's implementation is identified by `<module>$<name>`. The module
//! part names the unit that has to be loaded before the closure can be
//! rebuilt; the name part may itself contain `$` for nested closures
//! (`wordcount$outer$inner`).
//!
//! `ModuleName` refuses `$`, so cutting an `ImplId` at its first `$` always
//! gives back the module it was built from.
//!
//! # Id<T>
//! ULID ids with a phantom marker so a `DiagnosticId` and a `ShipmentId`
//! cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Separator between the module and the closure name in an `ImplId`.
pub const SYNTHETIC_DELIMITER: char = '$';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("module name is empty")]
    Empty,

    #[error("module name '{0}' contains the synthetic delimiter '$'")]
    Delimiter(String),
}

/// Name of a dynamically loaded unit that defines closures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.contains(SYNTHETIC_DELIMITER) {
            return Err(NameError::Delimiter(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fully-qualified implementation identifier, as written on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplId(String);

impl ImplId {
    pub fn new(module: &ModuleName, name: &str) -> Self {
        Self(format!("{module}{SYNTHETIC_DELIMITER}{name}"))
    }

    /// Builds an id from a closure's declared constants without validating
    /// them; `module()` reports a bad module part when it is read back.
    pub fn from_parts(module: &str, name: &str) -> Self {
        Self(format!("{module}{SYNTHETIC_DELIMITER}{name}"))
    }

    /// Wraps an identifier read from the wire.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Module that defines this implementation: everything before the first
    /// delimiter, or the whole identifier when there is none.
    pub fn module(&self) -> Result<ModuleName, NameError> {
        let head = match self.0.split_once(SYNTHETIC_DELIMITER) {
            Some((head, _)) => head,
            None => self.0.as_str(),
        };
        ModuleName::new(head)
    }

    /// Closure name inside the module (may contain further delimiters).
    pub fn name(&self) -> Option<&str> {
        self.0
            .split_once(SYNTHETIC_DELIMITER)
            .map(|(_, name)| name)
    }
}

impl fmt::Display for ImplId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Marker trait for `Id<T>`: supplies the Display prefix.
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Marker for lenient-decode diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Diag {}

impl IdMarker for Diag {
    fn prefix() -> &'static str {
        "diag-"
    }
}

/// Marker for one serialized adapter sent to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shipment {}

impl IdMarker for Shipment {
    fn prefix() -> &'static str {
        "ship-"
    }
}

pub type DiagnosticId = Id<Diag>;
pub type ShipmentId = Id<Shipment>;
