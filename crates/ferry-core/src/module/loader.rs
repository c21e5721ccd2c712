//! ModuleLoader port - the dynamic runtime's load entry point.
//!
//! The resolver never looks modules up on its own. It asks an injected
//! loader, which lets tests count and fail loads.
//!
//! # Implementations
//! - **CatalogLoader**: module sources compiled into the binary, evaluated
//!   only when first requested.

use std::collections::HashMap;

use super::definition::{ModuleBuilder, ModuleDefinition, ModuleError};
use crate::domain::ModuleName;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("module '{0}' not found")]
    NotFound(ModuleName),

    #[error("module '{module}' is malformed: {reason}")]
    Malformed { module: ModuleName, reason: String },
}

pub trait ModuleLoader: Send + Sync {
    fn load(&self, name: &ModuleName) -> Result<ModuleDefinition, LoadError>;
}

/// Source of a module: populates the builder with the module's closures.
pub type ModuleSource = fn(&mut ModuleBuilder) -> Result<(), ModuleError>;

#[derive(Default, Clone)]
pub struct CatalogLoader {
    sources: HashMap<ModuleName, ModuleSource>,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn with_module(mut self, name: ModuleName, source: ModuleSource) -> Self {
        self.add(name, source);
        self
    }

    /// Adds or replaces the source for `name`.
    pub fn add(&mut self, name: ModuleName, source: ModuleSource) {
        self.sources.insert(name, source);
    }

    pub fn module_names(&self) -> Vec<ModuleName> {
        let mut names: Vec<ModuleName> = self.sources.keys().cloned().collect();
        names.sort();
        names
    }
}

impl ModuleLoader for CatalogLoader {
    fn load(&self, name: &ModuleName) -> Result<ModuleDefinition, LoadError> {
        let source = self
            .sources
            .get(name)
            .ok_or_else(|| LoadError::NotFound(name.clone()))?;

        let mut builder = ModuleBuilder::new(name.clone());
        source(&mut builder).map_err(|e| LoadError::Malformed {
            module: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(builder.build())
    }
}
