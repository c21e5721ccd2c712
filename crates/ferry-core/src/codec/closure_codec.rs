//! ClosureCodec - ships callables between processes.
//!
//! # Write
//! `SerializedForm(impl_id, payload)` where the payload is the closure's
//! serde encoding.
//!
//! # Read
//! 1. read the identifier
//! 2. derive the module and `ensure_loaded` it
//! 3. only then decode the payload with the module's decoder
//!
//! Read failures follow the configured `ErrorPolicy`.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::{self, Deserialize, DeserializeSeed, Deserializer};

use super::diagnostics::DiagnosticLog;
use super::form::SerializedForm;
use super::policy::ErrorPolicy;
use crate::adapter::{Arity, CallableAdapter, Shape};
use crate::callable::{DynCallable, EncodeError};
use crate::config::CodecConfig;
use crate::domain::{ErrorKind, ImplId, ModuleName, error_chain};
use crate::module::{ModuleResolver, ResolveError};

/// Identifier recorded when the frame itself could not be read.
const UNREADABLE_IDENTIFIER: &str = "<unreadable>";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode {impl_id}")]
    Encode {
        impl_id: ImplId,
        #[source]
        source: EncodeError,
    },

    #[error("failed to resolve {impl_id}")]
    Resolve {
        impl_id: ImplId,
        #[source]
        source: ResolveError,
    },

    #[error("failed to decode {impl_id}")]
    Decode {
        impl_id: ImplId,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed serialized form")]
    Frame(#[source] serde_json::Error),

    #[error("adapter has no callable to encode")]
    MissingCallable,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Resolve { .. } => ErrorKind::Resolution,
            _ => ErrorKind::Serialization,
        }
    }
}

pub struct ClosureCodec {
    resolver: Arc<ModuleResolver>,
    policy: ErrorPolicy,
    diagnostics: Arc<DiagnosticLog>,
}

impl ClosureCodec {
    pub fn new(resolver: Arc<ModuleResolver>, config: &CodecConfig) -> Self {
        Self {
            resolver,
            policy: config.error_policy,
            diagnostics: Arc::new(DiagnosticLog::new(config.diagnostics_capacity)),
        }
    }

    /// Shares an existing diagnostics log (e.g. one built with a test clock).
    pub fn with_diagnostics(mut self, diagnostics: Arc<DiagnosticLog>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn resolver(&self) -> &Arc<ModuleResolver> {
        &self.resolver
    }

    pub fn diagnostics(&self) -> &Arc<DiagnosticLog> {
        &self.diagnostics
    }

    /// Encoding failures always propagate; the policy only governs reads.
    pub fn write(&self, callable: &dyn DynCallable) -> Result<SerializedForm, CodecError> {
        let impl_id = callable.impl_id();
        // the declared module must survive the first-`$` split on read
        if let Err(source) = ModuleName::new(callable.module()) {
            return Err(CodecError::Resolve {
                source: ResolveError::InvalidIdentifier {
                    raw: impl_id.as_str().to_string(),
                    source,
                },
                impl_id,
            });
        }
        SerializedForm::capture(callable).map_err(|source| CodecError::Encode { impl_id, source })
    }

    /// Rebuilds a callable. `Ok(None)` only happens under `Lenient`.
    pub fn read(&self, form: SerializedForm) -> Result<Option<Arc<dyn DynCallable>>, CodecError> {
        let (raw, payload) = form.into_parts();
        let impl_id = ImplId::from_raw(raw);
        let result = self
            .resolver
            .decoder(&impl_id)
            .map_err(|source| CodecError::Resolve {
                impl_id: impl_id.clone(),
                source,
            })
            .and_then(|decode| {
                decode(payload).map_err(|source| CodecError::Decode {
                    impl_id: impl_id.clone(),
                    source,
                })
            });
        self.apply_policy(impl_id.as_str(), impl_id.module().ok(), result)
    }

    pub fn to_bytes(&self, callable: &dyn DynCallable) -> Result<Vec<u8>, CodecError> {
        let form = self.write(callable)?;
        serde_json::to_vec(&form).map_err(|source| CodecError::Encode {
            impl_id: callable.impl_id(),
            source: EncodeError::Json(source),
        })
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Option<Arc<dyn DynCallable>>, CodecError> {
        match serde_json::from_slice::<SerializedForm>(bytes) {
            Ok(form) => self.read(form),
            Err(err) => self.apply_policy(UNREADABLE_IDENTIFIER, None, Err(CodecError::Frame(err))),
        }
    }

    pub fn encode_adapter<A: Arity, S: Shape>(
        &self,
        adapter: &CallableAdapter<A, S>,
    ) -> Result<Vec<u8>, CodecError> {
        let callable = adapter.callable().ok_or(CodecError::MissingCallable)?;
        self.to_bytes(callable.as_ref())
    }

    /// Rebuilds an adapter; a lenient failure gives an unresolved adapter.
    pub fn decode_adapter<A: Arity, S: Shape>(
        &self,
        bytes: &[u8],
    ) -> Result<CallableAdapter<A, S>, CodecError> {
        Ok(match self.from_bytes(bytes)? {
            Some(callable) => CallableAdapter::new(callable),
            None => CallableAdapter::unresolved(),
        })
    }

    /// Seed for decoding an adapter nested inside a larger serde structure.
    pub fn adapter_seed<A: Arity, S: Shape>(&self) -> AdapterSeed<'_, A, S> {
        AdapterSeed {
            codec: self,
            _marker: PhantomData,
        }
    }

    fn apply_policy<T>(
        &self,
        raw_identifier: &str,
        module: Option<ModuleName>,
        result: Result<T, CodecError>,
    ) -> Result<Option<T>, CodecError> {
        match (result, self.policy) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(err), ErrorPolicy::Strict) => Err(err),
            (Err(err), ErrorPolicy::Lenient) => {
                let cause = error_chain(&err);
                tracing::warn!(
                    impl_id = raw_identifier,
                    module = module.as_ref().map(|m| m.as_str()).unwrap_or("-"),
                    kind = ?err.kind(),
                    error = %cause,
                    "lenient decode failed; continuing without callable"
                );
                self.diagnostics.record(raw_identifier, module, cause);
                Ok(None)
            }
        }
    }
}

pub struct AdapterSeed<'a, A: Arity, S: Shape> {
    codec: &'a ClosureCodec,
    _marker: PhantomData<(A, S)>,
}

impl<'de, A: Arity, S: Shape> DeserializeSeed<'de> for AdapterSeed<'_, A, S> {
    type Value = CallableAdapter<A, S>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let form = SerializedForm::deserialize(deserializer)?;
        match self.codec.read(form) {
            Ok(Some(callable)) => Ok(CallableAdapter::new(callable)),
            Ok(None) => Ok(CallableAdapter::unresolved()),
            Err(err) => Err(de::Error::custom(error_chain(&err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Function2Adapter, FunctionAdapter, Scalar, Two};
    use crate::callable::{Closure, callable, local_fn};
    use crate::domain::{AdapterError, Args, InvocationError, ModuleName, Value};
    use crate::fixtures::{Add, Ghost, Offset, Scaled, arith_module, broken_module};
    use crate::module::{CatalogLoader, LoadError, ModuleDefinition, ModuleLoader};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::sync::Mutex;

    fn name(s: &str) -> ModuleName {
        ModuleName::new(s).unwrap()
    }

    fn catalog() -> CatalogLoader {
        CatalogLoader::new()
            .with_module(name("arith"), arith_module)
            .with_module(name("broken"), broken_module)
    }

    /// A fresh "worker process": nothing loaded yet.
    fn worker(policy: ErrorPolicy) -> ClosureCodec {
        let config = CodecConfig {
            error_policy: policy,
            ..CodecConfig::default()
        };
        ClosureCodec::new(Arc::new(ModuleResolver::new(catalog())), &config)
    }

    #[test]
    fn add_survives_a_round_trip() {
        let driver = worker(ErrorPolicy::Strict);
        let adapter = Function2Adapter::of(Add);
        assert_eq!(
            adapter.call(Value::Int(3), Value::Int(4)).unwrap(),
            Value::Int(7)
        );

        let bytes = driver.encode_adapter(&adapter).unwrap();

        let remote = worker(ErrorPolicy::Strict);
        assert!(!remote.resolver().is_loaded(&name("arith")));
        let decoded: Function2Adapter = remote.decode_adapter(&bytes).unwrap();
        assert!(remote.resolver().is_loaded(&name("arith")));
        assert_eq!(
            decoded.call(Value::Int(3), Value::Int(4)).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn captured_state_survives_a_round_trip() {
        let codec = worker(ErrorPolicy::Strict);
        let f = callable(Offset { by: 40 });
        let bytes = codec.to_bytes(f.as_ref()).unwrap();

        let g = worker(ErrorPolicy::Strict).from_bytes(&bytes).unwrap().unwrap();
        let args = crate::domain::Args::one(Value::Int(2));
        assert_eq!(g.invoke_dyn(args.clone()).unwrap(), f.invoke_dyn(args).unwrap());
    }

    #[test]
    fn nested_closure_resolves_its_outer_module() {
        let codec = worker(ErrorPolicy::Strict);
        let adapter = FunctionAdapter::of(Scaled { factor: 3 });
        let bytes = codec.encode_adapter(&adapter).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with(r#"["arith$scale$fn__42""#));

        let decoded: FunctionAdapter = worker(ErrorPolicy::Strict).decode_adapter(&bytes).unwrap();
        assert_eq!(decoded.call(Value::Int(5)).unwrap(), Value::Int(15));
    }

    #[test]
    fn module_is_loaded_before_payload_is_decoded() {
        struct Recording {
            inner: CatalogLoader,
            log: Mutex<Vec<String>>,
        }
        impl ModuleLoader for Recording {
            fn load(&self, module: &ModuleName) -> Result<ModuleDefinition, LoadError> {
                self.log.lock().unwrap().push(module.to_string());
                self.inner.load(module)
            }
        }

        let loader = Arc::new(Recording {
            inner: catalog(),
            log: Mutex::new(Vec::new()),
        });
        let codec = ClosureCodec::new(
            Arc::new(ModuleResolver::with_loader(loader.clone())),
            &CodecConfig::default(),
        );

        // payload is garbage: decode fails, but only after the module load
        let form = SerializedForm::new(&ImplId::from_raw("arith$offset"), serde_json::json!("x"));
        let err = codec.read(form).err().unwrap();
        assert!(matches!(err, CodecError::Decode { .. }));
        assert_eq!(*loader.log.lock().unwrap(), vec!["arith".to_string()]);
    }

    #[test]
    fn strict_mode_propagates_missing_module() {
        let codec = worker(ErrorPolicy::Strict);
        let bytes = codec.to_bytes(callable(Ghost).as_ref()).unwrap();
        let err = codec.from_bytes(&bytes).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(matches!(
            err,
            CodecError::Resolve {
                source: ResolveError::ModuleNotFound(_),
                ..
            }
        ));
        assert!(codec.diagnostics().is_empty());
    }

    #[test]
    fn lenient_mode_records_diagnostic_and_returns_none() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let log = Arc::new(DiagnosticLog::with_clock(16, Arc::new(FixedClock::new(t))));
        let codec = worker(ErrorPolicy::Lenient).with_diagnostics(log.clone());

        let bytes = codec.to_bytes(callable(Ghost).as_ref()).unwrap();
        assert!(codec.from_bytes(&bytes).unwrap().is_none());

        let d = log.latest().unwrap();
        assert_eq!(d.raw_identifier, "ghost$boo");
        assert_eq!(d.module, Some(name("ghost")));
        assert_eq!(d.recorded_at, t);
        assert!(d.cause.contains("module 'ghost' not found"));
    }

    #[test]
    fn lenient_mode_covers_malformed_modules_and_frames() {
        let codec = worker(ErrorPolicy::Lenient);

        let form = SerializedForm::new(&ImplId::from_raw("broken$f"), serde_json::Value::Null);
        assert!(codec.read(form).unwrap().is_none());

        assert!(codec.from_bytes(b"not json").unwrap().is_none());

        let causes: Vec<String> = codec.diagnostics().entries().into_iter().map(|d| d.cause).collect();
        assert!(causes[0].contains("has errors"));
        let entries = codec.diagnostics().entries();
        assert_eq!(entries[0].module, Some(name("broken")));
        assert_eq!(entries[1].raw_identifier, UNREADABLE_IDENTIFIER);
        assert_eq!(entries[1].module, None);
    }

    /// `arith$inner` would be read back as module `arith`, closure `inner$x`.
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Misplaced;

    impl Closure for Misplaced {
        const MODULE: &'static str = "arith$inner";
        const NAME: &'static str = "x";

        fn invoke(&self, _args: Args) -> Result<Value, InvocationError> {
            Ok(Value::Unit)
        }
    }

    #[rstest]
    #[case(ErrorPolicy::Strict)]
    #[case(ErrorPolicy::Lenient)]
    fn write_rejects_a_declared_module_containing_the_delimiter(#[case] policy: ErrorPolicy) {
        let codec = worker(policy);
        let err = codec.to_bytes(callable(Misplaced).as_ref()).unwrap_err();

        assert!(matches!(
            err,
            CodecError::Resolve {
                source: ResolveError::InvalidIdentifier { .. },
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert!(codec.diagnostics().is_empty());
    }

    #[test]
    fn lenient_adapter_fails_fast_when_invoked() {
        let codec = worker(ErrorPolicy::Lenient);
        let bytes = codec.encode_adapter(&Function2Adapter::of(Ghost)).unwrap();

        let adapter: CallableAdapter<Two, Scalar> = codec.decode_adapter(&bytes).unwrap();
        assert!(!adapter.is_resolved());
        let err = adapter.call(Value::Int(3), Value::Int(4)).unwrap_err();
        assert!(matches!(err, AdapterError::UnresolvedCallable { .. }));
        assert_eq!(codec.diagnostics().len(), 1);
    }

    #[test]
    fn local_closures_cannot_be_shipped() {
        let codec = worker(ErrorPolicy::Lenient);
        let f = local_fn("inline", |_| Ok(Value::Unit));
        let err = codec.to_bytes(f.as_ref()).unwrap_err();
        assert!(matches!(err, CodecError::Encode { source: EncodeError::Local(_), .. }));
    }

    #[test]
    fn adapter_seed_decodes_nested_adapters() {
        let codec = worker(ErrorPolicy::Strict);
        let text = serde_json::to_string(&Function2Adapter::of(Add)).unwrap();

        let mut de = serde_json::Deserializer::from_str(&text);
        let adapter = codec.adapter_seed::<Two, Scalar>().deserialize(&mut de).unwrap();
        assert_eq!(
            adapter.call(Value::Int(1), Value::Int(1)).unwrap(),
            Value::Int(2)
        );

        let mut de = serde_json::Deserializer::from_str(r#"["ghost$boo", null]"#);
        assert!(codec.adapter_seed::<Two, Scalar>().deserialize(&mut de).is_err());
    }
}
