//! Ports - swappable capabilities (time, id generation).
//!
//! The module loader is a port too but lives next to the resolver in
//! `module::loader`.

pub mod clock;
pub mod id_generator;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
