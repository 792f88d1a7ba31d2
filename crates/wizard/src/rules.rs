//! Declarative per-step validation rules.
//!
//! Each step has a static table of [`FieldSpec`]s: which field, when it is
//! relevant, and which checks run against it. Relevance is re-evaluated
//! against the live state on every pass, so fields whose requiredness depends
//! on a sibling value (shipping address behind `sameAsBilling`, the payment
//! method groups) need no schema mutation - their rows are simply skipped.
//!
//! The first failing check per field wins. Format checks skip empty values;
//! emptiness is `Required`'s concern.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use pasarela_core::{
    CardBrand, Email, ExpiryDate, PhoneNumber, PostalCode, TaxId, TaxIdError, luhn_check,
    validate_cvv,
};

use crate::types::{PaymentDetails, PaymentMethodKind, Step, WizardState};
use crate::validate::{Field, ValidationError, ValidationResult};

/// Letters (including Spanish accents) and spaces.
static PERSON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñ\s]+$").expect("person name regex"));

/// When a field's rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    /// Always validated on its step.
    Always,
    /// Only when shipping goes to a separate address (`sameAsBilling` false).
    CourierShipping,
    /// Only while the given payment method is active.
    Method(PaymentMethodKind),
}

impl Relevance {
    /// Whether the field is currently relevant.
    #[must_use]
    pub fn applies(self, state: &WizardState) -> bool {
        match self {
            Self::Always => true,
            Self::CourierShipping => !state.shipping.same_as_billing,
            Self::Method(kind) => state.payment.method() == kind,
        }
    }
}

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Non-empty after trimming (checkbox fields are exempt).
    Required,
    /// At least this many characters.
    MinChars(usize),
    /// At most this many characters.
    MaxChars(usize),
    /// Letters, Spanish accents and spaces only.
    PersonName,
    /// NIF/NIE shape (a wrong control letter is `TaxIdChecksum`'s concern).
    TaxIdFormat,
    /// NIF/NIE control letter.
    TaxIdChecksum,
    /// `local@domain.tld` shape.
    Email,
    /// 9 digits starting with 6, 7 or 9.
    SpanishPhone,
    /// Exactly 5 digits (existence is checked asynchronously).
    PostalCodeFormat,
    /// Luhn checksum over the card number.
    CardNumber,
    /// `MM/YY` shape with a month in 1-12.
    ExpiryFormat,
    /// Strictly before the card's expiry month.
    ExpiryFuture,
    /// CVV length for the detected brand of the sibling card number.
    CardCvv,
    /// Checkbox must be ticked.
    Accepted,
}

/// A rule plus its user-facing failure message.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub kind: CheckKind,
    pub message: &'static str,
}

const fn check(kind: CheckKind, message: &'static str) -> Check {
    Check { kind, message }
}

/// One row of a step's rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub relevance: Relevance,
    pub checks: &'static [Check],
}

const fn spec(field: Field, relevance: Relevance, checks: &'static [Check]) -> FieldSpec {
    FieldSpec {
        field,
        relevance,
        checks,
    }
}

const BILLING_SPECS: &[FieldSpec] = &[
    spec(
        Field::FullName,
        Relevance::Always,
        &[
            check(CheckKind::Required, "El nombre es obligatorio"),
            check(CheckKind::MinChars(3), "Mínimo 3 caracteres"),
            check(CheckKind::MaxChars(50), "Máximo 50 caracteres"),
            check(CheckKind::PersonName, "Solo se permiten letras"),
        ],
    ),
    spec(
        Field::TaxId,
        Relevance::Always,
        &[
            check(CheckKind::Required, "El NIF/NIE es obligatorio"),
            check(CheckKind::TaxIdFormat, "Formato inválido"),
            check(CheckKind::TaxIdChecksum, "NIF inválido"),
        ],
    ),
    spec(
        Field::Email,
        Relevance::Always,
        &[
            check(CheckKind::Required, "El email es obligatorio"),
            check(CheckKind::Email, "Formato de email inválido"),
        ],
    ),
    spec(
        Field::Phone,
        Relevance::Always,
        &[
            check(CheckKind::Required, "El teléfono es obligatorio"),
            check(CheckKind::SpanishPhone, "Formato de teléfono español inválido"),
        ],
    ),
    spec(
        Field::Address,
        Relevance::Always,
        &[check(CheckKind::Required, "La dirección es obligatoria")],
    ),
    spec(
        Field::PostalCode,
        Relevance::Always,
        &[
            check(CheckKind::Required, "El código postal es obligatorio"),
            check(CheckKind::PostalCodeFormat, "Debe tener 5 dígitos"),
        ],
    ),
    spec(
        Field::City,
        Relevance::Always,
        &[check(CheckKind::Required, "La ciudad es obligatoria")],
    ),
    spec(
        Field::Province,
        Relevance::Always,
        &[check(CheckKind::Required, "La provincia es obligatoria")],
    ),
    spec(
        Field::Country,
        Relevance::Always,
        &[check(CheckKind::Required, "El país es obligatorio")],
    ),
];

const SHIPPING_SPECS: &[FieldSpec] = &[
    spec(
        Field::RecipientName,
        Relevance::CourierShipping,
        &[
            check(CheckKind::Required, "El nombre del destinatario es obligatorio"),
            check(CheckKind::MinChars(3), "Mínimo 3 caracteres"),
        ],
    ),
    spec(
        Field::ShippingAddress,
        Relevance::CourierShipping,
        &[check(CheckKind::Required, "La dirección de envío es obligatoria")],
    ),
    spec(
        Field::ShippingPostalCode,
        Relevance::CourierShipping,
        &[
            check(CheckKind::Required, "El código postal es obligatorio"),
            check(CheckKind::PostalCodeFormat, "Debe tener 5 dígitos"),
        ],
    ),
    spec(
        Field::ShippingCity,
        Relevance::CourierShipping,
        &[check(CheckKind::Required, "La ciudad es obligatoria")],
    ),
    spec(
        Field::ShippingProvince,
        Relevance::CourierShipping,
        &[check(CheckKind::Required, "La provincia es obligatoria")],
    ),
    spec(
        Field::ShippingCountry,
        Relevance::CourierShipping,
        &[check(CheckKind::Required, "El país es obligatorio")],
    ),
    spec(
        Field::ContactPhone,
        Relevance::CourierShipping,
        &[
            check(CheckKind::Required, "El teléfono de contacto es obligatorio"),
            check(CheckKind::SpanishPhone, "Formato de teléfono español inválido"),
        ],
    ),
    spec(
        Field::DeliveryInstructions,
        Relevance::Always,
        &[check(CheckKind::MaxChars(200), "Máximo 200 caracteres")],
    ),
];

const PAYMENT_SPECS: &[FieldSpec] = &[
    spec(
        Field::CardNumber,
        Relevance::Method(PaymentMethodKind::Card),
        &[
            check(CheckKind::Required, "El número de tarjeta es obligatorio"),
            check(CheckKind::CardNumber, "Número de tarjeta inválido"),
        ],
    ),
    spec(
        Field::CardHolder,
        Relevance::Method(PaymentMethodKind::Card),
        &[check(CheckKind::Required, "El nombre del titular es obligatorio")],
    ),
    spec(
        Field::ExpiryDate,
        Relevance::Method(PaymentMethodKind::Card),
        &[
            check(CheckKind::Required, "La fecha de expiración es obligatoria"),
            check(CheckKind::ExpiryFormat, "Formato MM/YY"),
            check(CheckKind::ExpiryFuture, "La tarjeta está expirada"),
        ],
    ),
    spec(
        Field::Cvv,
        Relevance::Method(PaymentMethodKind::Card),
        &[
            check(CheckKind::Required, "El CVV es obligatorio"),
            check(CheckKind::CardCvv, "CVV inválido"),
        ],
    ),
    spec(
        Field::PaypalEmail,
        Relevance::Method(PaymentMethodKind::Paypal),
        &[
            check(CheckKind::Required, "El email de PayPal es obligatorio"),
            check(CheckKind::Email, "Formato de email inválido"),
        ],
    ),
    spec(
        Field::TransferReference,
        Relevance::Method(PaymentMethodKind::Transfer),
        &[check(CheckKind::Required, "La referencia es obligatoria")],
    ),
    spec(
        Field::BizumPhone,
        Relevance::Method(PaymentMethodKind::Bizum),
        &[
            check(CheckKind::Required, "El teléfono es obligatorio"),
            check(CheckKind::SpanishPhone, "Formato de teléfono español inválido"),
        ],
    ),
];

const SUMMARY_SPECS: &[FieldSpec] = &[
    spec(
        Field::AcceptTerms,
        Relevance::Always,
        &[check(CheckKind::Accepted, "Debes aceptar los términos y condiciones")],
    ),
    spec(
        Field::AcceptPrivacy,
        Relevance::Always,
        &[check(CheckKind::Accepted, "Debes aceptar la política de privacidad")],
    ),
];

/// The rule table for a step.
#[must_use]
pub const fn step_specs(step: Step) -> &'static [FieldSpec] {
    match step {
        Step::Billing => BILLING_SPECS,
        Step::Shipping => SHIPPING_SPECS,
        Step::Payment => PAYMENT_SPECS,
        Step::Summary => SUMMARY_SPECS,
    }
}

/// A field's raw value as seen by the rules.
enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
}

/// Pull a field's current raw value out of the state.
///
/// Fields belonging to an inactive payment variant read as empty text; their
/// relevance row keeps them out of validation anyway.
fn field_value(state: &WizardState, field: Field) -> FieldValue<'_> {
    let b = &state.billing;
    let s = &state.shipping;
    match field {
        Field::FullName => FieldValue::Text(&b.full_name),
        Field::TaxId => FieldValue::Text(&b.tax_id),
        Field::Email => FieldValue::Text(&b.email),
        Field::Phone => FieldValue::Text(&b.phone),
        Field::Address => FieldValue::Text(&b.address),
        Field::PostalCode => FieldValue::Text(&b.postal_code),
        Field::City => FieldValue::Text(&b.city),
        Field::Province => FieldValue::Text(&b.province),
        Field::Country => FieldValue::Text(&b.country),
        Field::SameAsBilling => FieldValue::Flag(s.same_as_billing),
        Field::RecipientName => FieldValue::Text(&s.recipient_name),
        Field::ShippingAddress => FieldValue::Text(&s.shipping_address),
        Field::ShippingPostalCode => FieldValue::Text(&s.postal_code),
        Field::ShippingCity => FieldValue::Text(&s.city),
        Field::ShippingProvince => FieldValue::Text(&s.province),
        Field::ShippingCountry => FieldValue::Text(&s.country),
        Field::ContactPhone => FieldValue::Text(&s.contact_phone),
        Field::DeliveryInstructions => FieldValue::Text(&s.delivery_instructions),
        Field::CardNumber => match &state.payment {
            PaymentDetails::Card { number, .. } => FieldValue::Text(number),
            _ => FieldValue::Text(""),
        },
        Field::CardHolder => match &state.payment {
            PaymentDetails::Card { holder, .. } => FieldValue::Text(holder),
            _ => FieldValue::Text(""),
        },
        Field::ExpiryDate => match &state.payment {
            PaymentDetails::Card { expiry, .. } => FieldValue::Text(expiry),
            _ => FieldValue::Text(""),
        },
        Field::Cvv => match &state.payment {
            PaymentDetails::Card { cvv, .. } => FieldValue::Text(cvv),
            _ => FieldValue::Text(""),
        },
        Field::PaypalEmail => match &state.payment {
            PaymentDetails::Paypal { email } => FieldValue::Text(email),
            _ => FieldValue::Text(""),
        },
        Field::TransferReference => match &state.payment {
            PaymentDetails::Transfer { reference } => FieldValue::Text(reference),
            _ => FieldValue::Text(""),
        },
        Field::BizumPhone => match &state.payment {
            PaymentDetails::Bizum { phone } => FieldValue::Text(phone),
            _ => FieldValue::Text(""),
        },
        Field::DiscountCode => FieldValue::Text(""),
        Field::AcceptTerms => FieldValue::Flag(state.consents.accept_terms),
        Field::AcceptPrivacy => FieldValue::Flag(state.consents.accept_privacy),
    }
}

/// The card number currently on file, for the CVV length rule.
fn active_card_number(state: &WizardState) -> &str {
    match &state.payment {
        PaymentDetails::Card { number, .. } => number,
        _ => "",
    }
}

/// Whether a single check passes for a text value.
fn text_check_passes(kind: CheckKind, value: &str, state: &WizardState) -> bool {
    match kind {
        CheckKind::Required => !value.trim().is_empty(),
        CheckKind::MinChars(n) => value.trim().chars().count() >= n,
        CheckKind::MaxChars(n) => value.trim().chars().count() <= n,
        CheckKind::PersonName => PERSON_NAME_RE.is_match(value.trim()),
        CheckKind::TaxIdFormat => !matches!(
            TaxId::parse(value.trim()),
            Err(TaxIdError::Empty | TaxIdError::InvalidFormat)
        ),
        CheckKind::TaxIdChecksum => TaxId::parse(value.trim()).is_ok(),
        CheckKind::Email => Email::parse(value.trim()).is_ok(),
        CheckKind::SpanishPhone => PhoneNumber::parse(value.trim()).is_ok(),
        CheckKind::PostalCodeFormat => PostalCode::parse(value.trim()).is_ok(),
        CheckKind::CardNumber => luhn_check(value),
        CheckKind::ExpiryFormat => ExpiryDate::parse(value.trim()).is_ok(),
        CheckKind::ExpiryFuture => ExpiryDate::parse(value.trim())
            .is_ok_and(|expiry| expiry.is_valid_at(Utc::now())),
        CheckKind::CardCvv => {
            let brand = CardBrand::detect(active_card_number(state));
            validate_cvv(value.trim(), brand)
        }
        // Accepted only ever applies to checkbox fields.
        CheckKind::Accepted => true,
    }
}

/// The first failing check's message for one rule row, if any.
fn first_failure(state: &WizardState, row: &FieldSpec) -> Option<&'static str> {
    match field_value(state, row.field) {
        FieldValue::Flag(flag) => row
            .checks
            .iter()
            .find(|c| matches!(c.kind, CheckKind::Accepted) && !flag)
            .map(|c| c.message),
        FieldValue::Text(value) => {
            let trimmed = value.trim();
            for c in row.checks {
                // Empty values fail Required only; other checks wait for input.
                if trimmed.is_empty() && !matches!(c.kind, CheckKind::Required) {
                    continue;
                }
                if !text_check_passes(c.kind, value, state) {
                    return Some(c.message);
                }
            }
            None
        }
    }
}

/// Run every synchronous rule of a step against the state.
///
/// Only currently relevant fields are evaluated; the result is valid iff none
/// of them failed. Asynchronous rules (postal code existence, discount codes)
/// are layered on top by the wizard machine.
#[must_use]
pub fn validate_step(state: &WizardState, step: Step) -> ValidationResult {
    let mut result = ValidationResult::default();

    for row in step_specs(step) {
        if !row.relevance.applies(state) {
            continue;
        }
        if let Some(message) = first_failure(state, row) {
            result.push(ValidationError::new(row.field, message));
        }
    }

    result
}
