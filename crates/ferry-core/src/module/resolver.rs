//! ModuleResolver - load-once module table.
//!
//! `ensure_loaded` is idempotent and safe to call from many task threads at
//! once. Callers racing on the same module serialize on a per-module gate:
//! the first one loads, the rest find the module already in the table.
//! Failures are never cached. The next caller tries the loader again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::definition::{DecodeFn, ModuleDefinition};
use super::loader::{LoadError, ModuleLoader};
use crate::domain::{ImplId, ModuleName, NameError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot derive a module from '{raw}'")]
    InvalidIdentifier {
        raw: String,
        #[source]
        source: NameError,
    },

    #[error("module '{0}' not found")]
    ModuleNotFound(ModuleName),

    #[error("module '{module}' has errors: {reason}")]
    ModuleMalformed { module: ModuleName, reason: String },

    #[error("module '{module}' does not define closure '{name}'")]
    UnknownClosure { module: ModuleName, name: String },
}

impl From<LoadError> for ResolveError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound(module) => ResolveError::ModuleNotFound(module),
            LoadError::Malformed { module, reason } => {
                ResolveError::ModuleMalformed { module, reason }
            }
        }
    }
}

pub struct ModuleResolver {
    loader: Arc<dyn ModuleLoader>,
    loaded: RwLock<HashMap<ModuleName, Arc<ModuleDefinition>>>,
    gates: Mutex<HashMap<ModuleName, Arc<Mutex<()>>>>,
}

impl ModuleResolver {
    pub fn new(loader: impl ModuleLoader + 'static) -> Self {
        Self::with_loader(Arc::new(loader))
    }

    pub fn with_loader(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            loaded: RwLock::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Loads `name` unless it is already loaded.
    pub fn ensure_loaded(&self, name: &ModuleName) -> Result<Arc<ModuleDefinition>, ResolveError> {
        if let Some(definition) = self.get(name) {
            return Ok(definition);
        }

        let gate = self.gate(name);
        let result = {
            let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
            self.load_locked(name)
        };
        self.release_gate(name, gate);
        result
    }

    fn load_locked(&self, name: &ModuleName) -> Result<Arc<ModuleDefinition>, ResolveError> {
        // another caller may have finished while we waited on the gate
        if let Some(definition) = self.get(name) {
            return Ok(definition);
        }

        tracing::debug!(module = %name, "loading module");
        let definition = match self.loader.load(name) {
            Ok(definition) => definition,
            Err(err) => {
                tracing::debug!(module = %name, error = %err, "module load failed");
                return Err(err.into());
            }
        };
        if definition.name() != name {
            return Err(ResolveError::ModuleMalformed {
                module: name.clone(),
                reason: format!("loader returned module '{}'", definition.name()),
            });
        }

        let definition = Arc::new(definition);
        self.loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), definition.clone());
        if definition.is_empty() {
            tracing::warn!(module = %name, "module defines no closures");
        }
        tracing::info!(
            module = %name,
            closures = definition.len(),
            names = ?definition.closure_names(),
            "module loaded"
        );
        Ok(definition)
    }

    /// Finds the decoder for `impl_id`, loading its module first.
    pub fn decoder(&self, impl_id: &ImplId) -> Result<DecodeFn, ResolveError> {
        let module = impl_id
            .module()
            .map_err(|source| ResolveError::InvalidIdentifier {
                raw: impl_id.as_str().to_string(),
                source,
            })?;
        let definition = self.ensure_loaded(&module)?;
        let name = impl_id.name().unwrap_or_default();
        definition
            .decoder(name)
            .ok_or_else(|| ResolveError::UnknownClosure {
                module,
                name: name.to_string(),
            })
    }

    pub fn is_loaded(&self, name: &ModuleName) -> bool {
        self.get(name).is_some()
    }

    pub fn loaded_modules(&self) -> Vec<ModuleName> {
        let mut names: Vec<ModuleName> = self
            .loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn get(&self, name: &ModuleName) -> Option<Arc<ModuleDefinition>> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn gate(&self, name: &ModuleName) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.clone())
            .or_default()
            .clone()
    }

    /// Drops the gate once no other caller holds or waits on it.
    fn release_gate(&self, name: &ModuleName, gate: Arc<Mutex<()>>) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // handles are only cloned and dropped under the map lock
        drop(gate);
        if gates.get(name).is_some_and(|g| Arc::strong_count(g) == 1) {
            gates.remove(name);
        }
    }
}
