//! RegistryBridge - the mandatory codec registrations plus one hook.
//!
//! `apply` always installs the pair codec and the `Standard` instantiation
//! strategy, then calls `Registrator::register` for deployment-specific
//! codecs. Everything runs against a staged copy; the caller's registry is
//! only replaced once every step succeeded.

use std::sync::Arc;

use super::framework::{CodecRegistry, InstantiationStrategy, PAIR_TAG, RegistrationError};
use super::pair::PairCodec;

/// Deployment-specific codecs. The only customization point of the bridge.
pub trait Registrator: Send + Sync {
    fn register(&self, _registry: &mut CodecRegistry) -> Result<(), RegistrationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtras;

impl Registrator for NoExtras {}

pub struct RegistryBridge<R: Registrator = NoExtras> {
    extras: R,
}

impl RegistryBridge<NoExtras> {
    pub fn new() -> Self {
        Self { extras: NoExtras }
    }
}

impl Default for RegistryBridge<NoExtras> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Registrator> RegistryBridge<R> {
    pub fn with_extras(extras: R) -> Self {
        Self { extras }
    }

    pub fn apply(&self, registry: &mut CodecRegistry) -> Result<(), RegistrationError> {
        let mut staged = registry.clone();
        register_mandatory(&mut staged).map_err(|e| fatal("mandatory registrations", e))?;
        self.extras
            .register(&mut staged)
            .map_err(|e| fatal("deployment registrations", e))?;

        *registry = staged;
        tracing::debug!(codecs = ?registry.registered_tags(), "codec registry ready");
        Ok(())
    }

    /// A fresh registry with everything applied.
    pub fn build(&self) -> Result<CodecRegistry, RegistrationError> {
        let mut registry = CodecRegistry::new();
        self.apply(&mut registry)?;
        Ok(registry)
    }
}

fn register_mandatory(registry: &mut CodecRegistry) -> Result<(), RegistrationError> {
    registry.register(PAIR_TAG, Arc::new(PairCodec))?;
    registry.set_instantiation_strategy(InstantiationStrategy::Standard);
    Ok(())
}

fn fatal(step: &'static str, source: RegistrationError) -> RegistrationError {
    tracing::error!(step, error = %source, "codec registration failed");
    RegistrationError::Fatal {
        step,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;
    use crate::registry::{SerializationError, ValueCodec};
    use serde_json::Value as Json;

    /// `point` records as `[x, y]`.
    struct PointCodec;

    impl ValueCodec for PointCodec {
        fn encode(&self, value: &Value, _: &CodecRegistry) -> Result<Json, SerializationError> {
            let Value::Record { fields, .. } = value else {
                return Err(SerializationError::Malformed("not a point".into()));
            };
            let coords: Vec<Json> = fields
                .iter()
                .map(|(_, v)| Json::from(v.as_int().unwrap_or_default()))
                .collect();
            Ok(Json::Array(coords))
        }

        fn decode(&self, data: Json, _: &CodecRegistry) -> Result<Value, SerializationError> {
            let xs: Vec<i64> = serde_json::from_value(data)?;
            Ok(Value::record(
                "point",
                vec![
                    ("x".to_string(), Value::Int(xs[0])),
                    ("y".to_string(), Value::Int(xs[1])),
                ],
            ))
        }
    }

    struct Points;

    impl Registrator for Points {
        fn register(&self, registry: &mut CodecRegistry) -> Result<(), RegistrationError> {
            registry.register("point", Arc::new(PointCodec))
        }
    }

    struct Failing;

    impl Registrator for Failing {
        fn register(&self, registry: &mut CodecRegistry) -> Result<(), RegistrationError> {
            registry.register("point", Arc::new(PointCodec))?;
            Err(RegistrationError::Rejected {
                tag: "broken".to_string(),
                reason: "bad config".to_string(),
            })
        }
    }

    #[test]
    fn mandatory_set_is_applied() {
        let registry = RegistryBridge::new().build().unwrap();
        assert!(registry.is_registered(PAIR_TAG));
        assert_eq!(
            registry.instantiation_strategy(),
            InstantiationStrategy::Standard
        );

        let v = Value::pair("word", 3);
        assert_eq!(registry.decode(&registry.encode(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn hook_runs_in_addition_to_mandatory_set() {
        let registry = RegistryBridge::with_extras(Points).build().unwrap();
        assert_eq!(registry.registered_tags(), vec!["pair", "point"]);

        let p = Value::record(
            "point",
            vec![("x".to_string(), Value::Int(1)), ("y".to_string(), Value::Int(2))],
        );
        let bytes = registry.encode(&Value::pair(p.clone(), 0)).unwrap();
        assert_eq!(registry.decode(&bytes).unwrap(), Value::pair(p, 0));
    }

    #[test]
    fn failing_hook_is_fatal_and_leaves_registry_untouched() {
        let mut registry = CodecRegistry::new();
        let err = RegistryBridge::with_extras(Failing)
            .apply(&mut registry)
            .unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::Fatal {
                step: "deployment registrations",
                ..
            }
        ));
        assert!(registry.registered_tags().is_empty());
        assert_eq!(
            registry.instantiation_strategy(),
            InstantiationStrategy::CodecOnly
        );
    }

    #[test]
    fn applying_twice_fails_on_the_mandatory_step() {
        let bridge = RegistryBridge::new();
        let mut registry = bridge.build().unwrap();
        let err = bridge.apply(&mut registry).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Fatal {
                step: "mandatory registrations",
                ..
            }
        ));
        assert_eq!(registry.registered_tags(), vec!["pair"]);
    }
}
