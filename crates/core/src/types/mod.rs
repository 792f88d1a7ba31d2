//! Core types for Pasarela.
//!
//! This module provides type-safe wrappers for the checkout domain.

pub mod card;
pub mod email;
pub mod expiry;
pub mod phone;
pub mod postal_code;
pub mod price;
pub mod tax_id;

pub use card::{CardBrand, format_card_number, luhn_check, required_cvv_len, validate_cvv};
pub use email::{Email, EmailError};
pub use expiry::{ExpiryDate, ExpiryDateError};
pub use phone::{PhoneNumber, PhoneNumberError};
pub use postal_code::{PostalCode, PostalCodeError};
pub use price::Price;
pub use tax_id::{TaxId, TaxIdError};
