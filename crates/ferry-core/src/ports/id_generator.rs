//! IdGenerator port - ULID ids for diagnostics and shipments.
//!
//! The timestamp part comes from a `Clock`, so ids generated under a
//! `FixedClock` share a deterministic prefix while staying unique.

use crate::domain::ids::{DiagnosticId, ShipmentId};
use crate::ports::Clock;
use ulid::Ulid;

pub trait IdGenerator: Send + Sync {
    fn generate_diagnostic_id(&self) -> DiagnosticId;

    fn generate_shipment_id(&self) -> ShipmentId;
}

pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_diagnostic_id(&self) -> DiagnosticId {
        DiagnosticId::from(self.next_ulid())
    }

    fn generate_shipment_id(&self) -> ShipmentId {
        ShipmentId::from(self.next_ulid())
    }
}
