//! Core card model.

mod argument;
mod card;
mod datetime;
mod kind;
mod part;
mod structured;
mod version;

pub use argument::{Argument, types};
pub use card::{Card, VCardKind};
pub use datetime::{DateAndOrTime, VCardDate, VCardTime, VCardUtcOffset};
pub use kind::{FieldKind, PartsArrayKind, ScalarKind, SingletonKind, names};
pub use part::{AgentInfo, ExtensionInfo, MediaInfo, MediaSource, Part, PartMeta, PartValue};
pub use structured::{AddressInfo, ClientPidMapInfo, GenderInfo, NameInfo, OrganizationInfo, Sex};
pub use version::VCardVersion;

pub(crate) use part::decode_base64;
