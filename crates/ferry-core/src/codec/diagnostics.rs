//! DiagnosticLog - what lenient decoding swallowed.
//!
//! Every entry keeps the raw identifier, the module derived from it (when
//! one could be derived) and the full cause chain. The log is bounded; the
//! oldest entries are dropped first.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DiagnosticId, ModuleName};
use crate::ports::{Clock, IdGenerator, SystemClock, UlidGenerator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub recorded_at: DateTime<Utc>,
    pub raw_identifier: String,
    pub module: Option<ModuleName>,
    pub cause: String,
}

pub struct DiagnosticLog {
    entries: Mutex<VecDeque<Diagnostic>>,
    capacity: usize,
    clock: Arc<dyn Clock>,
    ids: UlidGenerator<Arc<dyn Clock>>,
}

impl DiagnosticLog {
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            ids: UlidGenerator::new(clock.clone()),
            clock,
        }
    }

    pub fn record(
        &self,
        raw_identifier: &str,
        module: Option<ModuleName>,
        cause: String,
    ) -> Diagnostic {
        let diagnostic = Diagnostic {
            id: self.ids.generate_diagnostic_id(),
            recorded_at: self.clock.now(),
            raw_identifier: raw_identifier.to_string(),
            module,
            cause,
        };

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(diagnostic.clone());
        diagnostic
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn latest(&self) -> Option<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
