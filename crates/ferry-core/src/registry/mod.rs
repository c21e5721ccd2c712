//! Registry - codec registrations for the engine's record serializer.

pub mod bridge;
pub mod framework;
pub mod pair;

pub use self::bridge::{NoExtras, Registrator, RegistryBridge};
pub use self::framework::{
    CodecRegistry, InstantiationStrategy, PAIR_TAG, RegistrationError, SerializationError,
    ValueCodec,
};
pub use self::pair::PairCodec;
