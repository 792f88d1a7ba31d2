//! Pasarela Core - Validation types and checksum functions.
//!
//! This crate provides the pure, synchronous building blocks used by the
//! checkout wizard:
//!
//! - Newtype wrappers with validating constructors (`TaxId`, `Email`,
//!   `PhoneNumber`, `PostalCode`, `ExpiryDate`)
//! - Payment card functions (Luhn checksum, brand detection, display
//!   formatting, CVV rules)
//! - A typed EUR amount (`Price`) backed by decimal arithmetic
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no timers,
//! no async. Everything here is side-effect-free and deterministic, which is
//! what lets the validation engine call into it from both the synchronous and
//! the asynchronous rule paths.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
