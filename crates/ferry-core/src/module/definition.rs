//! ModuleDefinition - what a loaded module contributes to the process.
//!
//! Evaluating a module fills a `ModuleBuilder` with one decoder per closure
//! type. Until the module is loaded, the codec has no way to rebuild those
//! closures from their payload.

use std::collections::HashMap;
use std::sync::Arc;

use crate::callable::{Closure, DynCallable, TypedCallable};
use crate::domain::ModuleName;

/// Rebuilds a closure from its object-graph encoding.
pub type DecodeFn = fn(serde_json::Value) -> Result<Arc<dyn DynCallable>, serde_json::Error>;

fn decode_closure<C: Closure>(
    payload: serde_json::Value,
) -> Result<Arc<dyn DynCallable>, serde_json::Error> {
    let closure: C = serde_json::from_value(payload)?;
    Ok(Arc::new(TypedCallable::new(closure)))
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModuleError {
    #[error("closure '{name}' declares module '{declared}' but is defined in '{module}'")]
    ForeignClosure {
        module: ModuleName,
        declared: String,
        name: String,
    },

    #[error("closure '{name}' is defined twice in module '{module}'")]
    DuplicateClosure { module: ModuleName, name: String },

    #[error("closure in module '{0}' has an empty name")]
    EmptyName(ModuleName),

    #[error("module '{module}' failed to evaluate: {reason}")]
    Evaluation { module: ModuleName, reason: String },
}

pub struct ModuleBuilder {
    name: ModuleName,
    decoders: HashMap<String, DecodeFn>,
}

impl ModuleBuilder {
    pub fn new(name: ModuleName) -> Self {
        Self {
            name,
            decoders: HashMap::new(),
        }
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Defines closure type `C` in this module.
    pub fn closure<C: Closure>(&mut self) -> Result<&mut Self, ModuleError> {
        if C::MODULE != self.name.as_str() {
            return Err(ModuleError::ForeignClosure {
                module: self.name.clone(),
                declared: C::MODULE.to_string(),
                name: C::NAME.to_string(),
            });
        }
        if C::NAME.is_empty() {
            return Err(ModuleError::EmptyName(self.name.clone()));
        }
        if self.decoders.contains_key(C::NAME) {
            return Err(ModuleError::DuplicateClosure {
                module: self.name.clone(),
                name: C::NAME.to_string(),
            });
        }
        self.decoders.insert(C::NAME.to_string(), decode_closure::<C>);
        Ok(self)
    }

    pub fn build(self) -> ModuleDefinition {
        ModuleDefinition {
            name: self.name,
            decoders: self.decoders,
        }
    }
}

#[derive(Debug)]
pub struct ModuleDefinition {
    name: ModuleName,
    decoders: HashMap<String, DecodeFn>,
}

impl ModuleDefinition {
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn decoder(&self, closure_name: &str) -> Option<DecodeFn> {
        self.decoders.get(closure_name).copied()
    }

    pub fn closure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.decoders.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}
