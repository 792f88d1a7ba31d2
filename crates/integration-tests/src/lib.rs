//! Integration tests for Pasarela.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pasarela-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Step gating and the end-to-end wizard scenario
//! - `async_validation` - Debounce and stale-resolution properties
//! - `draft_persistence` - Snapshot round-trips, version gate, autosave
//! - `discounts` - Discount application and pricing
//!
//! All timer-sensitive tests run under `#[tokio::test(start_paused = true)]`
//! and elapse windows with `tokio::time::sleep`: the paused clock
//! auto-advances from timer to timer while the test task sleeps, which runs
//! debounce tasks and simulated lookups deterministically and without
//! wall-clock time.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use pasarela_wizard::{CheckoutWizard, MemoryDraftStore, PaymentDetails, WizardConfig};

/// A wizard over an in-memory draft store, plus the store for inspection.
#[must_use]
pub fn test_wizard() -> (CheckoutWizard, Arc<MemoryDraftStore>) {
    let store = Arc::new(MemoryDraftStore::new());
    let wizard = CheckoutWizard::new(
        WizardConfig::default(),
        Arc::clone(&store) as Arc<dyn pasarela_wizard::DraftStore>,
    );
    (wizard, store)
}

/// Fill the billing step with known-valid data, city and province included.
pub fn fill_valid_billing(wizard: &CheckoutWizard) {
    wizard.edit_billing(|b| {
        b.full_name = "Juan Pérez García".to_owned();
        b.tax_id = "12345678Z".to_owned();
        b.email = "juan@example.com".to_owned();
        b.phone = "612345678".to_owned();
        b.address = "Calle Mayor 123".to_owned();
        b.postal_code = "28001".to_owned();
        b.city = "Madrid".to_owned();
        b.province = "Madrid".to_owned();
    });
}

/// Fill the payment step with a valid card.
pub fn fill_card_payment(wizard: &CheckoutWizard) {
    wizard.edit_payment(|p| {
        *p = PaymentDetails::Card {
            number: "4111 1111 1111 1111".to_owned(),
            holder: "JUAN PEREZ".to_owned(),
            expiry: "12/99".to_owned(),
            cvv: "123".to_owned(),
        };
    });
}

/// Sleep through a window, letting the paused clock auto-advance across every
/// timer inside it (debounce deadlines, simulated lookup latencies).
pub async fn sleep_through(window: std::time::Duration) {
    tokio::time::sleep(window).await;
    // One extra yield so tasks woken at the window edge finish applying.
    tokio::task::yield_now().await;
}
