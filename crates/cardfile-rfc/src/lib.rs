//! vCard 2.1 / 3.0 / 4.0 / 5.0 parsing and serialization.
//!
//! See [`rfc::vcard`] for the engine and its data model.

pub mod error;
pub mod rfc;
