//! SerializedForm - the two-field wire layout of a shipped callable.
//!
//! `[ "<module>$<name>", <payload> ]`: identifier first, so a reader can
//! load the module before it touches the payload.

use serde::{Deserialize, Serialize};

use crate::callable::{DynCallable, EncodeError};
use crate::domain::ImplId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedForm(String, serde_json::Value);

impl SerializedForm {
    pub fn new(impl_id: &ImplId, payload: serde_json::Value) -> Self {
        Self(impl_id.as_str().to_string(), payload)
    }

    /// Encodes a callable into its wire form.
    pub fn capture(callable: &dyn DynCallable) -> Result<Self, EncodeError> {
        let payload = callable.encode()?;
        Ok(Self::new(&callable.impl_id(), payload))
    }

    /// Identifier exactly as it was read, before any parsing.
    pub fn raw_identifier(&self) -> &str {
        &self.0
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.1
    }

    pub fn into_parts(self) -> (String, serde_json::Value) {
        (self.0, self.1)
    }
}
