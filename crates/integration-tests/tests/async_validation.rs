//! Debounce and stale-resolution properties of the async validation path.
//!
//! Timing map with the default configuration: a postal edit at `t` schedules
//! its lookup at `t + 500 ms` (debounce) and its resolution at
//! `t + 1000 ms` (debounce + simulated latency), unless a newer edit bumps
//! the field's generation first.

use std::time::Duration;

use pasarela_integration_tests::{sleep_through, test_wizard};
use pasarela_wizard::{AddressScope, Field, Step, StepOutcome};

const DEBOUNCE: Duration = Duration::from_millis(500);
const FULL_WINDOW: Duration = Duration::from_millis(1100);

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_trigger_exactly_one_lookup() {
    let (wizard, _) = test_wizard();

    // Three keystrokes inside the debounce window.
    wizard.postal_code_changed(AddressScope::Billing, "28001");
    sleep_through(Duration::from_millis(200)).await;
    wizard.postal_code_changed(AddressScope::Billing, "08001");
    sleep_through(Duration::from_millis(200)).await;
    wizard.postal_code_changed(AddressScope::Billing, "41001");

    sleep_through(FULL_WINDOW).await;

    // Only the last value was looked up.
    assert_eq!(wizard.postal_directory_lookups(), 1);
    let billing = wizard.state().billing;
    assert_eq!(billing.postal_code, "41001");
    assert_eq!(billing.city, "Sevilla");
    assert_eq!(billing.province, "Sevilla");
}

#[tokio::test(start_paused = true)]
async fn test_edits_slower_than_the_debounce_each_fire() {
    let (wizard, _) = test_wizard();

    wizard.postal_code_changed(AddressScope::Billing, "28001");
    sleep_through(FULL_WINDOW).await;
    wizard.postal_code_changed(AddressScope::Billing, "08001");
    sleep_through(FULL_WINDOW).await;

    assert_eq!(wizard.postal_directory_lookups(), 2);
    assert_eq!(wizard.state().billing.city, "Barcelona");
}

#[tokio::test(start_paused = true)]
async fn test_stale_resolution_is_discarded() {
    let (wizard, _) = test_wizard();

    // An unknown code's lookup goes in flight...
    wizard.postal_code_changed(AddressScope::Billing, "99999");
    sleep_through(DEBOUNCE + Duration::from_millis(100)).await;

    // ...and the field changes before it resolves.
    wizard.postal_code_changed(AddressScope::Billing, "28001");
    sleep_through(FULL_WINDOW).await;

    // The stale "not found" never lands; the newer value's resolution wins.
    assert_eq!(wizard.field_error(Field::PostalCode), None);
    let billing = wizard.state().billing;
    assert_eq!(billing.postal_code, "28001");
    assert_eq!(billing.city, "Madrid");
    // Both lookups reached the directory; only one result was applied.
    assert_eq!(wizard.postal_directory_lookups(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_hit_does_not_overwrite_newer_value() {
    let (wizard, _) = test_wizard();

    // A known code's lookup goes in flight...
    wizard.postal_code_changed(AddressScope::Billing, "28001");
    sleep_through(DEBOUNCE + Duration::from_millis(100)).await;

    // ...and the user replaces it with a malformed value before resolution.
    wizard.postal_code_changed(AddressScope::Billing, "28");
    sleep_through(FULL_WINDOW).await;

    // The Madrid auto-fill must not appear over the newer raw value.
    let billing = wizard.state().billing;
    assert_eq!(billing.postal_code, "28");
    assert_eq!(billing.city, "");
    assert_eq!(billing.province, "");
}

#[tokio::test(start_paused = true)]
async fn test_unknown_code_records_field_error_after_debounce() {
    let (wizard, _) = test_wizard();

    wizard.postal_code_changed(AddressScope::Billing, "99999");
    sleep_through(FULL_WINDOW).await;

    assert_eq!(
        wizard.field_error(Field::PostalCode).as_deref(),
        Some("Código postal no existe")
    );

    // The recorded error is part of the step's aggregate validation.
    let result = wizard.validate_current_step();
    assert_eq!(result.error_for(Field::PostalCode), Some("Código postal no existe"));

    // A later hit clears it.
    wizard.postal_code_changed(AddressScope::Billing, "46001");
    sleep_through(FULL_WINDOW).await;
    assert_eq!(wizard.field_error(Field::PostalCode), None);
    assert_eq!(wizard.state().billing.city, "Valencia");
}

#[tokio::test(start_paused = true)]
async fn test_submission_is_held_until_lookup_resolves() {
    let (wizard, _) = test_wizard();
    pasarela_integration_tests::fill_valid_billing(&wizard);

    // No prior lookup has resolved 28001; next_step must wait for the
    // simulated latency and then advance rather than reject.
    let outcome = wizard.next_step().await;
    assert_eq!(outcome, StepOutcome::Advanced(Step::Shipping));
    assert_eq!(wizard.postal_directory_lookups(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shipping_postal_lookup_skipped_when_same_as_billing() {
    let (wizard, _) = test_wizard();
    wizard.go_to_step(Step::Shipping);

    // sameAsBilling leaves the shipping postal code inert: no lookup at all.
    assert_eq!(wizard.next_step().await, StepOutcome::Advanced(Step::Payment));
    assert_eq!(wizard.postal_directory_lookups(), 0);
}
