//! Scripted end-to-end checkout.
//!
//! Drives the wizard through all four steps with the same sample order a
//! manual test run would use: billing in Madrid, shipping to a different
//! address in Barcelona, card payment with the welcome discount. Each
//! transition prints the live price breakdown so the reactive pricing is
//! visible from the terminal.

use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use pasarela_core::Price;
use pasarela_wizard::{
    AddressScope, CheckoutWizard, ConfirmOutcome, FileDraftStore, PaymentDetails,
    PaymentMethodKind, Step, StepOutcome, ValidationResult, WizardConfig,
};

/// Extra settle time on top of debounce + latency before reading back an
/// auto-filled field.
const LOOKUP_MARGIN: Duration = Duration::from_millis(100);

/// Run the demo checkout.
pub async fn run(fresh: bool) -> Result<(), Box<dyn Error>> {
    let config = WizardConfig::from_env()?;
    let store = Arc::new(FileDraftStore::new(config.draft_path.clone()));
    let wizard = CheckoutWizard::new(config, store);

    if fresh {
        wizard.reset();
    } else if let Some(snapshot) = wizard.load_draft() {
        let prompt = format!(
            "Se encontró un borrador del {} (paso {}). ¿Restaurarlo? [s/N] ",
            snapshot.saved_at.format("%d/%m/%Y %H:%M"),
            snapshot.current_step
        );
        if ask(&prompt)? {
            wizard.restore(snapshot);
        }
    }

    let _autosave = wizard.spawn_autosave();

    while wizard.current_step() != Step::Summary {
        let step = wizard.current_step();
        println!("\n== Paso {}: {} ==", step.index(), step.title());

        match step {
            Step::Billing => fill_billing(&wizard).await,
            Step::Shipping => fill_shipping(&wizard).await,
            Step::Payment => fill_payment(&wizard).await,
            Step::Summary => unreachable!("loop exits before the summary step"),
        }

        match wizard.next_step().await {
            StepOutcome::Advanced(next) => {
                println!("Paso {} completado.", step.index());
                print_breakdown(&wizard);
                tracing::debug!(step = %next, "demo advanced");
            }
            StepOutcome::Rejected(result) => {
                print_errors(&result);
                return Err("el paso no superó la validación".into());
            }
            StepOutcome::NoFurtherStep => break,
        }
    }

    println!("\n== Paso 4: {} ==", Step::Summary.title());
    print_summary(&wizard);

    wizard.edit_consents(|c| {
        c.accept_terms = true;
        c.accept_privacy = true;
    });

    match wizard.confirm_order()? {
        ConfirmOutcome::Confirmed(confirmation) => {
            println!("\n¡Pedido confirmado con éxito!");
            println!("  Referencia: {}", confirmation.reference);
            println!("  Total:      {}", confirmation.total);
        }
        ConfirmOutcome::Rejected(result) => {
            print_errors(&result);
            return Err("faltan consentimientos obligatorios".into());
        }
    }

    Ok(())
}

/// Fill the billing step; city and province arrive via the postal lookup.
async fn fill_billing(wizard: &CheckoutWizard) {
    wizard.edit_billing(|b| {
        b.full_name = "Juan Pérez García".to_owned();
        b.tax_id = "12345678Z".to_owned();
        b.email = "juan@example.com".to_owned();
        b.phone = "612345678".to_owned();
        b.address = "Calle Mayor 123".to_owned();
    });
    wizard.postal_code_changed(AddressScope::Billing, "28001");
    settle(wizard).await;

    let billing = wizard.state().billing;
    println!(
        "  Código postal 28001 -> {} ({})",
        billing.city, billing.province
    );
}

/// Fill the shipping step with a separate delivery address.
async fn fill_shipping(wizard: &CheckoutWizard) {
    wizard.edit_shipping(|s| {
        s.same_as_billing = false;
        s.recipient_name = "María López".to_owned();
        s.shipping_address = "Avenida Principal 456".to_owned();
        s.contact_phone = "698765432".to_owned();
        s.delivery_instructions = "Dejar en portería".to_owned();
    });
    wizard.postal_code_changed(AddressScope::Shipping, "08001");
    settle(wizard).await;

    let shipping = wizard.state().shipping;
    println!(
        "  Código postal 08001 -> {} ({})",
        shipping.city, shipping.province
    );
}

/// Fill the payment step with a card and apply the welcome discount.
async fn fill_payment(wizard: &CheckoutWizard) {
    wizard.set_payment_method(PaymentMethodKind::Card);
    wizard.edit_payment(|p| {
        if let PaymentDetails::Card {
            number,
            holder,
            expiry,
            cvv,
        } = p
        {
            *number = "4111 1111 1111 1111".to_owned();
            *holder = "JUAN PEREZ".to_owned();
            *expiry = "12/30".to_owned();
            *cvv = "123".to_owned();
        }
    });

    match wizard.apply_discount("BIENVENIDO10").await {
        Some(percent) => println!("  ¡Código válido! Descuento del {percent}%."),
        None => println!("  Código de descuento no válido."),
    }
}

/// Wait for the debounced postal lookup to land.
async fn settle(wizard: &CheckoutWizard) {
    let config = wizard.config();
    tokio::time::sleep(config.debounce + config.postal_latency + LOOKUP_MARGIN).await;
}

fn print_breakdown(wizard: &CheckoutWizard) {
    let breakdown = wizard.price_breakdown();
    println!("  Subtotal:  {}", breakdown.subtotal);
    println!("  Envío:     {}", breakdown.shipping);
    if breakdown.payment_fee != Price::ZERO {
        println!("  Comisión:  {}", breakdown.payment_fee);
    }
    if breakdown.discount_percent > 0 {
        println!(
            "  Descuento: -{} ({}%)",
            breakdown.discount_amount, breakdown.discount_percent
        );
    }
    println!("  Total:     {}", breakdown.total);
}

fn print_summary(wizard: &CheckoutWizard) {
    let state = wizard.state();
    println!("  Facturación: {} ({})", state.billing.full_name, state.billing.city);
    if state.shipping.same_as_billing {
        println!("  Envío:       a la dirección de facturación");
    } else {
        println!(
            "  Envío:       {} ({})",
            state.shipping.recipient_name, state.shipping.city
        );
    }
    println!("  Pago:        {}", state.payment.method().label());
    print_breakdown(wizard);
}

fn print_errors(result: &ValidationResult) {
    println!("Corrige los siguientes errores:");
    for error in &result.errors {
        println!("  - {}: {}", error.field, error.message);
    }
}

/// Yes/no prompt on stdin; anything but `s`/`si` declines.
fn ask(prompt: &str) -> Result<bool, Box<dyn Error>> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "s" || answer == "si" || answer == "sí")
}
