//! Order summary pricing.
//!
//! The order itself is fixed (one base price plus flat shipping); what varies
//! is the payment method fee and the applied discount. The breakdown is a
//! pure function of the wizard state, recomputed on demand - callers rerun it
//! after any mutation that can affect price.

use serde::Serialize;

use pasarela_core::Price;

use crate::types::{PaymentMethodKind, WizardState};

/// Fixed order subtotal, in cents.
const SUBTOTAL_CENTS: i64 = 11_900;

/// Flat shipping cost, in cents.
const SHIPPING_CENTS: i64 = 495;

/// PayPal processing fee, in cents. Other methods carry no fee.
const PAYPAL_FEE_CENTS: i64 = 190;

/// A computed order price breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Price,
    pub shipping: Price,
    pub payment_fee: Price,
    /// The applied discount percentage (0 when none is applied).
    pub discount_percent: u8,
    /// `subtotal × discount_percent / 100`, rounded to cents.
    pub discount_amount: Price,
    /// `subtotal + shipping + payment_fee − discount_amount`.
    pub total: Price,
}

impl PriceBreakdown {
    /// Compute the breakdown for the current wizard state.
    ///
    /// Billing and shipping data never affect the price; the payment method
    /// and the applied discount do.
    #[must_use]
    pub fn compute(state: &WizardState) -> Self {
        let subtotal = Price::from_cents(SUBTOTAL_CENTS);
        let shipping = Price::from_cents(SHIPPING_CENTS);
        let payment_fee = match state.payment.method() {
            PaymentMethodKind::Paypal => Price::from_cents(PAYPAL_FEE_CENTS),
            _ => Price::ZERO,
        };
        let discount_percent = state.applied_discount.unwrap_or(0);
        let discount_amount = subtotal.percentage(discount_percent);

        Self {
            subtotal,
            shipping,
            payment_fee,
            discount_percent,
            discount_amount,
            total: subtotal + shipping + payment_fee - discount_amount,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::PaymentDetails;

    #[test]
    fn test_base_price_without_discount() {
        let state = WizardState::default();
        let breakdown = PriceBreakdown::compute(&state);

        assert_eq!(breakdown.subtotal, Price::from_cents(11_900));
        assert_eq!(breakdown.shipping, Price::from_cents(495));
        assert_eq!(breakdown.payment_fee, Price::ZERO);
        assert_eq!(breakdown.discount_amount, Price::ZERO);
        assert_eq!(breakdown.total, Price::from_cents(12_395));
    }

    #[test]
    fn test_discount_reduces_total() {
        let state = WizardState {
            applied_discount: Some(10),
            ..WizardState::default()
        };
        let breakdown = PriceBreakdown::compute(&state);

        // 119,00 € at 10% -> 11,90 € off; 119,00 + 4,95 - 11,90 = 112,05 €.
        assert_eq!(breakdown.discount_amount, Price::from_cents(1190));
        assert_eq!(breakdown.total, Price::from_cents(11_205));
    }

    #[test]
    fn test_paypal_adds_processing_fee() {
        let state = WizardState {
            payment: PaymentDetails::empty(PaymentMethodKind::Paypal),
            ..WizardState::default()
        };
        let breakdown = PriceBreakdown::compute(&state);

        assert_eq!(breakdown.payment_fee, Price::from_cents(190));
        assert_eq!(breakdown.total, Price::from_cents(12_585));
    }

    #[test]
    fn test_billing_data_does_not_affect_price() {
        let mut state = WizardState::default();
        let before = PriceBreakdown::compute(&state);
        state.billing.full_name = "Juan Pérez".to_owned();
        state.shipping.same_as_billing = false;
        assert_eq!(PriceBreakdown::compute(&state), before);
    }

    #[test]
    fn test_replacing_discount_changes_amount() {
        let mut state = WizardState {
            applied_discount: Some(20),
            ..WizardState::default()
        };
        assert_eq!(
            PriceBreakdown::compute(&state).discount_amount,
            Price::from_cents(2380)
        );

        state.applied_discount = Some(30);
        assert_eq!(
            PriceBreakdown::compute(&state).discount_amount,
            Price::from_cents(3570)
        );
    }
}
