//! Validation result types.
//!
//! Errors are keyed by [`Field`] so that multiple simultaneous errors can
//! coexist and be independently cleared; `Field::as_str` names (camelCase)
//! are the keys presentational components use for accessible error
//! association.

use serde::{Deserialize, Serialize};

/// Every wizard field, across all four steps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    // Step 1: billing
    FullName,
    TaxId,
    Email,
    Phone,
    Address,
    PostalCode,
    City,
    Province,
    Country,
    // Step 2: shipping
    SameAsBilling,
    RecipientName,
    ShippingAddress,
    ShippingPostalCode,
    ShippingCity,
    ShippingProvince,
    ShippingCountry,
    ContactPhone,
    DeliveryInstructions,
    // Step 3: payment
    CardNumber,
    CardHolder,
    ExpiryDate,
    Cvv,
    PaypalEmail,
    TransferReference,
    BizumPhone,
    DiscountCode,
    // Step 4: summary
    AcceptTerms,
    AcceptPrivacy,
}

impl Field {
    /// The camelCase name keying the per-field error map.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::TaxId => "taxId",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::PostalCode => "postalCode",
            Self::City => "city",
            Self::Province => "province",
            Self::Country => "country",
            Self::SameAsBilling => "sameAsBilling",
            Self::RecipientName => "recipientName",
            Self::ShippingAddress => "shippingAddress",
            Self::ShippingPostalCode => "shippingPostalCode",
            Self::ShippingCity => "shippingCity",
            Self::ShippingProvince => "shippingProvince",
            Self::ShippingCountry => "shippingCountry",
            Self::ContactPhone => "contactPhone",
            Self::DeliveryInstructions => "deliveryInstructions",
            Self::CardNumber => "cardNumber",
            Self::CardHolder => "cardHolder",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
            Self::PaypalEmail => "paypalEmail",
            Self::TransferReference => "transferReference",
            Self::BizumPhone => "bizumPhone",
            Self::DiscountCode => "discountCode",
            Self::AcceptTerms => "acceptTerms",
            Self::AcceptPrivacy => "acceptPrivacy",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The field the message belongs to.
    pub field: Field,
    /// User-facing message.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error.
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The outcome of validating a step: valid iff there are zero errors across
/// all currently relevant fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    /// All failures, at most one per field (the first failing rule wins).
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Whether the validated data passed every relevant rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The message for a field, if it failed.
    #[must_use]
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Append a failure unless the field already has one.
    pub fn push(&mut self, error: ValidationError) {
        if self.error_for(error.field).is_none() {
            self.errors.push(error);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_valid() {
        assert!(ValidationResult::default().is_valid());
    }

    #[test]
    fn test_error_lookup_by_field() {
        let mut result = ValidationResult::default();
        result.push(ValidationError::new(Field::Email, "Formato de email inválido"));

        assert!(!result.is_valid());
        assert_eq!(result.error_for(Field::Email), Some("Formato de email inválido"));
        assert_eq!(result.error_for(Field::Phone), None);
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut result = ValidationResult::default();
        result.push(ValidationError::new(Field::Email, "primero"));
        result.push(ValidationError::new(Field::Email, "segundo"));

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.error_for(Field::Email), Some("primero"));
    }

    #[test]
    fn test_field_names_are_camel_case() {
        assert_eq!(Field::FullName.as_str(), "fullName");
        assert_eq!(Field::SameAsBilling.as_str(), "sameAsBilling");
        assert_eq!(Field::Cvv.as_str(), "cvv");
        assert_eq!(
            serde_json::to_string(&Field::PostalCode).unwrap(),
            "\"postalCode\""
        );
    }
}
