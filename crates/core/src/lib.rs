//! Shared domain types for Zero-Proof Bar.
//!
//! Newtype wrappers for IDs, money amounts, and email addresses, used by the
//! storefront. The crate holds types only, no I/O and no HTTP clients, so
//! anything can depend on it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
