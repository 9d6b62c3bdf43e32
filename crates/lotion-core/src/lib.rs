//! Core types for the lotion content store client.
//!
//! This crate converts between the store's wire JSON for page properties and
//! a closed set of typed [`property::Property`] variants, and builds validated
//! query filters with [`filter::Builder`]. Everything here is pure: no I/O,
//! no shared mutable state.

#[macro_use]
mod macros;

pub mod error;
pub mod filter;
pub mod page;
pub mod properties;
pub mod property;
pub mod time;

pub use error::PropertyError;
pub use filter::{Builder, Cond, ConditionRuleset, FilterError, Prop, ValidationError};
pub use page::{BasePage, PageError, PageId};
pub use properties::Properties;
pub use property::{Property, PropertyKind};
pub use time::StoreOffset;
