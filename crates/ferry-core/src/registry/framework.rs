//! CodecRegistry - generic serialization for engine records.
//!
//! Scalars and lists are written as plain JSON. Pairs and records are
//! written as `{"@type": <tag>, "data": ...}` and need a codec registered
//! under their tag, except records when the instantiation strategy is
//! `Standard`, which rebuilds them field by field.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};

use crate::domain::Value;

/// Tag under which the pair codec is registered.
pub const PAIR_TAG: &str = "pair";

const TYPE_KEY: &str = "@type";
const DATA_KEY: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("no codec registered for '{0}'")]
    Unregistered(String),

    #[error("record type '{0}' has no codec and the instantiation strategy cannot construct it")]
    NotInstantiable(String),

    #[error("float {0} cannot be encoded")]
    NonFiniteFloat(f64),

    #[error("malformed encoded value: {0}")]
    Malformed(String),

    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("a codec is already registered for '{0}'")]
    DuplicateCodec(String),

    #[error("codec for '{tag}' rejected: {reason}")]
    Rejected { tag: String, reason: String },

    #[error("codec registration failed during {step}")]
    Fatal {
        step: &'static str,
        #[source]
        source: Box<RegistrationError>,
    },
}

/// How records without a registered codec are constructed on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstantiationStrategy {
    /// Only types with a registered codec can be constructed.
    #[default]
    CodecOnly,
    /// Construct any record directly from its encoded fields.
    Standard,
}

pub trait ValueCodec: Send + Sync {
    fn encode(&self, value: &Value, registry: &CodecRegistry) -> Result<Json, SerializationError>;

    fn decode(&self, data: Json, registry: &CodecRegistry) -> Result<Value, SerializationError>;
}

#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn ValueCodec>>,
    instantiation: InstantiationStrategy,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
            instantiation: InstantiationStrategy::CodecOnly,
        }
    }

    pub fn register(
        &mut self,
        tag: impl Into<String>,
        codec: Arc<dyn ValueCodec>,
    ) -> Result<(), RegistrationError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(RegistrationError::Rejected {
                tag,
                reason: "empty tag".to_string(),
            });
        }
        if self.codecs.contains_key(&tag) {
            return Err(RegistrationError::DuplicateCodec(tag));
        }
        self.codecs.insert(tag, codec);
        Ok(())
    }

    pub fn set_instantiation_strategy(&mut self, strategy: InstantiationStrategy) {
        self.instantiation = strategy;
    }

    pub fn instantiation_strategy(&self) -> InstantiationStrategy {
        self.instantiation
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.codecs.contains_key(tag)
    }

    pub fn registered_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.codecs.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializationError> {
        Ok(serde_json::to_vec(&self.encode_tree(value)?)?)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, SerializationError> {
        self.decode_tree(serde_json::from_slice(bytes)?)
    }

    pub fn encode_tree(&self, value: &Value) -> Result<Json, SerializationError> {
        match value {
            Value::Unit => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Int(i) => Ok(Json::from(*i)),
            Value::Float(x) => Number::from_f64(*x)
                .map(Json::Number)
                .ok_or(SerializationError::NonFiniteFloat(*x)),
            Value::Str(s) => Ok(Json::String(s.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| self.encode_tree(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Value::Pair(..) => self.tagged(PAIR_TAG, value),
            Value::Record { type_name, fields } => {
                if self.codecs.contains_key(type_name) {
                    return self.tagged(type_name, value);
                }
                let encoded = fields
                    .iter()
                    .map(|(name, field)| {
                        Ok(Json::Array(vec![
                            Json::String(name.clone()),
                            self.encode_tree(field)?,
                        ]))
                    })
                    .collect::<Result<Vec<_>, SerializationError>>()?;
                Ok(envelope(type_name, Json::Array(encoded)))
            }
        }
    }

    pub fn decode_tree(&self, json: Json) -> Result<Value, SerializationError> {
        match json {
            Json::Null => Ok(Value::Unit),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Value::Int(i)),
                (None, Some(x)) => Ok(Value::Float(x)),
                (None, None) => Err(SerializationError::Malformed(format!("number {n}"))),
            },
            Json::String(s) => Ok(Value::Str(s)),
            Json::Array(items) => items
                .into_iter()
                .map(|item| self.decode_tree(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Json::Object(mut map) => {
                let tag = match map.remove(TYPE_KEY) {
                    Some(Json::String(tag)) => tag,
                    _ => return Err(SerializationError::Malformed("missing @type".to_string())),
                };
                let data = map
                    .remove(DATA_KEY)
                    .ok_or_else(|| SerializationError::Malformed(format!("'{tag}' has no data")))?;

                if let Some(codec) = self.codecs.get(&tag) {
                    return codec.decode(data, self);
                }
                if tag == PAIR_TAG {
                    return Err(SerializationError::Unregistered(tag));
                }
                match self.instantiation {
                    InstantiationStrategy::Standard => self.decode_fields(tag, data),
                    InstantiationStrategy::CodecOnly => {
                        Err(SerializationError::NotInstantiable(tag))
                    }
                }
            }
        }
    }

    fn tagged(&self, tag: &str, value: &Value) -> Result<Json, SerializationError> {
        let codec = self
            .codecs
            .get(tag)
            .ok_or_else(|| SerializationError::Unregistered(tag.to_string()))?;
        Ok(envelope(tag, codec.encode(value, self)?))
    }

    fn decode_fields(&self, type_name: String, data: Json) -> Result<Value, SerializationError> {
        let Json::Array(entries) = data else {
            return Err(SerializationError::Malformed(format!(
                "'{type_name}' fields must be an array"
            )));
        };
        let mut fields = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Json::Array(mut kv) if kv.len() == 2 => {
                    let value = kv.pop().unwrap_or(Json::Null);
                    let Some(Json::String(name)) = kv.pop() else {
                        return Err(SerializationError::Malformed(format!(
                            "'{type_name}' field name must be a string"
                        )));
                    };
                    fields.push((name, self.decode_tree(value)?));
                }
                _ => {
                    return Err(SerializationError::Malformed(format!(
                        "'{type_name}' field must be a [name, value] pair"
                    )));
                }
            }
        }
        Ok(Value::Record { type_name, fields })
    }
}

fn envelope(tag: &str, data: Json) -> Json {
    let mut map = Map::new();
    map.insert(TYPE_KEY.to_string(), Json::String(tag.to_string()));
    map.insert(DATA_KEY.to_string(), data);
    Json::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_and_lists_need_no_codec() {
        let registry = CodecRegistry::new();
        let v = Value::list([Value::Int(1), Value::Float(2.5), Value::from("x"), Value::Unit]);
        let back = registry.decode(&registry.encode(&v).unwrap()).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn pairs_need_a_codec() {
        let registry = CodecRegistry::new();
        let err = registry.encode(&Value::pair(1, 2)).unwrap_err();
        assert!(matches!(err, SerializationError::Unregistered(tag) if tag == PAIR_TAG));

        let err = registry
            .decode(br#"{"@type":"pair","data":[1,2]}"#)
            .unwrap_err();
        assert!(matches!(err, SerializationError::Unregistered(_)));
    }

    #[test]
    fn records_without_codec_need_standard_instantiation() {
        let rec = Value::record("user", vec![("id".to_string(), Value::Int(9))]);
        let mut registry = CodecRegistry::new();
        let bytes = registry.encode(&rec).unwrap();

        let err = registry.decode(&bytes).unwrap_err();
        assert!(matches!(err, SerializationError::NotInstantiable(t) if t == "user"));

        registry.set_instantiation_strategy(InstantiationStrategy::Standard);
        assert_eq!(registry.decode(&bytes).unwrap(), rec);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let registry = CodecRegistry::new();
        assert!(matches!(
            registry.encode(&Value::Float(f64::NAN)),
            Err(SerializationError::NonFiniteFloat(_))
        ));
    }
}
