//! Discount application semantics and their effect on the order summary.

use pasarela_core::Price;
use pasarela_integration_tests::test_wizard;
use pasarela_wizard::{Field, PaymentMethodKind};

#[tokio::test(start_paused = true)]
async fn test_applying_a_code_is_idempotent() {
    let (wizard, _) = test_wizard();

    assert_eq!(wizard.apply_discount("BIENVENIDO10").await, Some(10));
    assert_eq!(wizard.state().applied_discount, Some(10));

    // Re-applying simply re-confirms the same percentage.
    assert_eq!(wizard.apply_discount("BIENVENIDO10").await, Some(10));
    assert_eq!(wizard.state().applied_discount, Some(10));

    // The second apply was served from the cache.
    assert_eq!(wizard.discount_directory_lookups(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_codes_are_case_insensitive() {
    let (wizard, _) = test_wizard();
    assert_eq!(wizard.apply_discount("bienvenido10").await, Some(10));
    assert_eq!(wizard.state().applied_discount, Some(10));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_code_keeps_the_prior_discount() {
    let (wizard, _) = test_wizard();

    assert_eq!(wizard.apply_discount("VERANO20").await, Some(20));
    assert_eq!(wizard.apply_discount("NOEXISTE99").await, None);

    // The applied discount is untouched; only a field error is surfaced.
    assert_eq!(wizard.state().applied_discount, Some(20));
    assert_eq!(
        wizard.field_error(Field::DiscountCode).as_deref(),
        Some("Código de descuento no válido")
    );
}

#[tokio::test(start_paused = true)]
async fn test_a_different_valid_code_replaces_the_discount() {
    let (wizard, _) = test_wizard();

    wizard.apply_discount("BIENVENIDO10").await;
    wizard.apply_discount("NOEXISTE99").await;
    assert!(wizard.field_error(Field::DiscountCode).is_some());

    assert_eq!(wizard.apply_discount("VIP30").await, Some(30));
    assert_eq!(wizard.state().applied_discount, Some(30));
    // A successful apply clears the earlier field error.
    assert_eq!(wizard.field_error(Field::DiscountCode), None);
}

#[tokio::test(start_paused = true)]
async fn test_discount_and_method_drive_the_breakdown() {
    let (wizard, _) = test_wizard();

    let base = wizard.price_breakdown();
    assert_eq!(base.total, Price::from_cents(12_395));

    wizard.apply_discount("VERANO20").await;
    let discounted = wizard.price_breakdown();
    assert_eq!(discounted.discount_amount, Price::from_cents(2380));
    assert_eq!(discounted.total, Price::from_cents(10_015));

    // Switching to PayPal adds its processing fee on top.
    wizard.set_payment_method(PaymentMethodKind::Paypal);
    let with_fee = wizard.price_breakdown();
    assert_eq!(with_fee.payment_fee, Price::from_cents(190));
    assert_eq!(with_fee.total, Price::from_cents(10_205));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_code_does_not_block_the_payment_step() {
    let (wizard, _) = test_wizard();
    wizard.go_to_step(pasarela_wizard::Step::Payment);
    pasarela_integration_tests::fill_card_payment(&wizard);

    wizard.apply_discount("NOEXISTE99").await;
    assert!(wizard.field_error(Field::DiscountCode).is_some());

    // The discount input is optional: its error never gates the transition.
    let result = wizard.validate_current_step();
    assert!(result.is_valid());
    assert_eq!(
        wizard.next_step().await,
        pasarela_wizard::StepOutcome::Advanced(pasarela_wizard::Step::Summary)
    );
}
