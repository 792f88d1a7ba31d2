//! Wizard data model: steps and per-step form records.
//!
//! `WizardState` is the aggregate root. It is only ever mutated through the
//! operations on [`crate::machine::CheckoutWizard`]; everything handed out of
//! the machine is a snapshot clone.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// The four wizard steps, in order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    /// Step 1: personal and billing data.
    #[default]
    Billing,
    /// Step 2: shipping address.
    Shipping,
    /// Step 3: payment method and discount code.
    Payment,
    /// Step 4: order summary and consents.
    Summary,
}

impl Step {
    /// All steps in wizard order.
    pub const ALL: [Self; 4] = [Self::Billing, Self::Shipping, Self::Payment, Self::Summary];

    /// The 1-based index shown to the user (and stored in drafts).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Billing => 1,
            Self::Shipping => 2,
            Self::Payment => 3,
            Self::Summary => 4,
        }
    }

    /// Parse a step from its 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidStep`] for anything outside 1-4. An
    /// out-of-range index is a caller bug, not user input.
    pub const fn from_index(index: u8) -> Result<Self, WizardError> {
        match index {
            1 => Ok(Self::Billing),
            2 => Ok(Self::Shipping),
            3 => Ok(Self::Payment),
            4 => Ok(Self::Summary),
            other => Err(WizardError::InvalidStep(other)),
        }
    }

    /// The step after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Billing => Some(Self::Shipping),
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// The step before this one, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Billing => None,
            Self::Shipping => Some(Self::Billing),
            Self::Payment => Some(Self::Shipping),
            Self::Summary => Some(Self::Payment),
        }
    }

    /// User-facing step title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Billing => "Datos de Facturación",
            Self::Shipping => "Dirección de Envío",
            Self::Payment => "Método de Pago",
            Self::Summary => "Resumen del Pedido",
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = WizardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.index()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Personal and billing data (step 1).
///
/// Fields hold raw form input; validation happens in the rules engine so
/// partially-typed values can be stored and persisted as drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingDetails {
    pub full_name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub province: String,
    pub country: String,
}

impl Default for BillingDetails {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            tax_id: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            province: String::new(),
            country: "España".to_owned(),
        }
    }
}

/// Shipping data (step 2).
///
/// When `same_as_billing` is true every other field is inert: not required,
/// not validated, not looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingDetails {
    pub same_as_billing: bool,
    pub recipient_name: String,
    pub shipping_address: String,
    pub postal_code: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub contact_phone: String,
    pub delivery_instructions: String,
}

impl Default for ShippingDetails {
    fn default() -> Self {
        Self {
            same_as_billing: true,
            recipient_name: String::new(),
            shipping_address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            province: String::new(),
            country: "España".to_owned(),
            contact_phone: String::new(),
            delivery_instructions: String::new(),
        }
    }
}

/// The payment method discriminant, without the method's field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethodKind {
    Card,
    Paypal,
    Transfer,
    Bizum,
}

impl PaymentMethodKind {
    /// User-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Tarjeta de crédito/débito",
            Self::Paypal => "PayPal",
            Self::Transfer => "Transferencia bancaria",
            Self::Bizum => "Bizum",
        }
    }
}

impl std::fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::Transfer => "transfer",
            Self::Bizum => "bizum",
        };
        write!(f, "{tag}")
    }
}

/// Payment data (step 3), one variant per method.
///
/// Exactly one method's field group exists at a time, so validation never has
/// to ask whether a card field is "currently meaningful" while PayPal is
/// selected - the fields of inactive methods are simply gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum PaymentDetails {
    /// Credit/debit card.
    Card {
        #[serde(default)]
        number: String,
        #[serde(default)]
        holder: String,
        #[serde(default)]
        expiry: String,
        #[serde(default)]
        cvv: String,
    },
    /// PayPal account.
    Paypal {
        #[serde(default)]
        email: String,
    },
    /// Bank transfer.
    Transfer {
        #[serde(default)]
        reference: String,
    },
    /// Bizum mobile payment.
    Bizum {
        #[serde(default)]
        phone: String,
    },
}

impl PaymentDetails {
    /// The active method's discriminant.
    #[must_use]
    pub const fn method(&self) -> PaymentMethodKind {
        match self {
            Self::Card { .. } => PaymentMethodKind::Card,
            Self::Paypal { .. } => PaymentMethodKind::Paypal,
            Self::Transfer { .. } => PaymentMethodKind::Transfer,
            Self::Bizum { .. } => PaymentMethodKind::Bizum,
        }
    }

    /// An empty field group for the given method.
    #[must_use]
    pub fn empty(kind: PaymentMethodKind) -> Self {
        match kind {
            PaymentMethodKind::Card => Self::Card {
                number: String::new(),
                holder: String::new(),
                expiry: String::new(),
                cvv: String::new(),
            },
            PaymentMethodKind::Paypal => Self::Paypal {
                email: String::new(),
            },
            PaymentMethodKind::Transfer => Self::Transfer {
                reference: String::new(),
            },
            PaymentMethodKind::Bizum => Self::Bizum {
                phone: String::new(),
            },
        }
    }
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self::empty(PaymentMethodKind::Card)
    }
}

/// Consent checkboxes (step 4). Not persisted in drafts: consents must be
/// re-given after a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentDetails {
    pub accept_terms: bool,
    pub accept_privacy: bool,
    pub accept_newsletter: bool,
}

/// The aggregate wizard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    pub current_step: Step,
    pub completed_steps: BTreeSet<Step>,
    pub billing: BillingDetails,
    pub shipping: ShippingDetails,
    pub payment: PaymentDetails,
    pub consents: ConsentDetails,
    /// Discount percentage (0-100), set only after a successful code lookup.
    pub applied_discount: Option<u8>,
    /// Timestamp of the last successful draft write.
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl WizardState {
    /// Whether the step has passed validation at least once.
    #[must_use]
    pub fn is_completed(&self, step: Step) -> bool {
        self.completed_steps.contains(&step)
    }
}
