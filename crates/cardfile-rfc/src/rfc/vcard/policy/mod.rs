//! Property registry, version capabilities and ALTID rules.

pub mod altid;
pub mod capability;
pub mod registry;

pub use capability::{AltIdRule, Cardinality, Support, support};
pub use registry::{Converter, PropertyDescriptor, lookup};
