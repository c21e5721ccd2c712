//! PairCodec - `Value::Pair` as a two-element array.

use serde_json::Value as Json;

use super::framework::{CodecRegistry, SerializationError, ValueCodec};
use crate::domain::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct PairCodec;

impl ValueCodec for PairCodec {
    fn encode(&self, value: &Value, registry: &CodecRegistry) -> Result<Json, SerializationError> {
        match value {
            Value::Pair(left, right) => Ok(Json::Array(vec![
                registry.encode_tree(left)?,
                registry.encode_tree(right)?,
            ])),
            other => Err(SerializationError::Malformed(format!(
                "pair codec cannot encode {}",
                other.kind_name()
            ))),
        }
    }

    fn decode(&self, data: Json, registry: &CodecRegistry) -> Result<Value, SerializationError> {
        match data {
            Json::Array(mut items) if items.len() == 2 => {
                let right = registry.decode_tree(items.pop().unwrap_or(Json::Null))?;
                let left = registry.decode_tree(items.pop().unwrap_or(Json::Null))?;
                Ok(Value::pair(left, right))
            }
            other => Err(SerializationError::Malformed(format!(
                "pair must be a two-element array, got {other}"
            ))),
        }
    }
}
