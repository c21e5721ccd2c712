//! Arity markers.
//!
//! Uninhabited types used only as type parameters of `CallableAdapter`, so
//! the number of arguments is fixed at compile time.

use crate::domain::ArityTag;

mod sealed {
    pub trait Sealed {}
}

pub trait Arity: sealed::Sealed + Send + Sync + 'static {
    const TAG: ArityTag;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zero {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum One {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Two {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Three {}

impl sealed::Sealed for Zero {}
impl sealed::Sealed for One {}
impl sealed::Sealed for Two {}
impl sealed::Sealed for Three {}

impl Arity for Zero {
    const TAG: ArityTag = ArityTag::Zero;
}

impl Arity for One {
    const TAG: ArityTag = ArityTag::One;
}

impl Arity for Two {
    const TAG: ArityTag = ArityTag::Two;
}

impl Arity for Three {
    const TAG: ArityTag = ArityTag::Three;
}
