//! Core types, validation, and trait definitions for the rolo contact
//! service.
//!
//! This crate is deliberately free of HTTP dependencies. All other crates
//! depend on it; it depends on nothing proprietary.

pub mod contact;
pub mod sanitize;
pub mod store;
pub mod validate;

pub use contact::{Contact, ContactPatch, NewContact};
