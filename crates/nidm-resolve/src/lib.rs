//! # nidm-resolve
//!
//! Field Resolver: raw QC fields → typed, vocabulary-mapped fields.
//!
//! For each `(key, value)` the resolver normalizes the key, looks it up in
//! the [`Dictionary`](nidm_core::Dictionary), and coerces the value to the
//! entry's datatype. Misses and coercion failures are per-field
//! [`ResolutionError`](nidm_core::ResolutionError)s; nothing here aborts a
//! subject.

pub mod coerce;
mod resolver;

pub use coerce::coerce;
pub use resolver::{FieldResolver, Resolution};
