//! The wizard state machine and controller.
//!
//! [`CheckoutWizard`] owns the [`WizardState`] and is the only writer to it.
//! It is cheaply cloneable (`Arc` inside), which is how the debounce and
//! autosave tasks get their handle on the state.
//!
//! # Stale async resolutions
//!
//! Every field with asynchronous validation carries a generation counter.
//! Editing the field bumps the generation; a background resolution re-reads
//! the counter before applying anything and discards itself when it no longer
//! matches. This is what guarantees that the resolution of an abandoned
//! input value never overwrites the state belonging to a newer one.
//!
//! # Locking
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `await`: async paths take a snapshot, suspend, then re-acquire and
//! re-check their generation before mutating.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use pasarela_core::{PostalCode, Price};

use crate::config::WizardConfig;
use crate::draft::{DraftError, DraftSnapshot, DraftStore};
use crate::error::WizardError;
use crate::lookup::{DiscountService, PostalCodeService};
use crate::pricing::PriceBreakdown;
use crate::rules::{step_specs, validate_step};
use crate::types::{
    BillingDetails, ConsentDetails, PaymentDetails, PaymentMethodKind, ShippingDetails, Step,
    WizardState,
};
use crate::validate::{Field, ValidationError, ValidationResult};

/// Message for a postal code the directory does not know.
const POSTAL_NOT_FOUND: &str = "Código postal no existe";

/// Message for a discount code the table does not know.
const DISCOUNT_NOT_FOUND: &str = "Código de descuento no válido";

/// Which address block a postal code edit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    Billing,
    Shipping,
}

impl AddressScope {
    /// The postal code field of this scope.
    #[must_use]
    pub const fn postal_field(self) -> Field {
        match self {
            Self::Billing => Field::PostalCode,
            Self::Shipping => Field::ShippingPostalCode,
        }
    }
}

/// Outcome of a forward transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step was valid; the wizard advanced and snapshotted.
    Advanced(Step),
    /// Validation failed; state is unchanged and the errors are returned.
    Rejected(ValidationResult),
    /// Already on the summary step; nothing to advance to.
    NoFurtherStep,
}

/// Outcome of a confirmation attempt from the summary step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Consents passed; the draft is cleared and the state reset.
    Confirmed(OrderConfirmation),
    /// Consent rules failed; state is unchanged.
    Rejected(ValidationResult),
}

/// Receipt returned by a successful [`CheckoutWizard::confirm_order`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Order reference shown to the user.
    pub reference: Uuid,
    /// Total charged, discount included.
    pub total: Price,
    pub confirmed_at: DateTime<Utc>,
}

struct Inner {
    state: Mutex<WizardState>,
    /// Field errors produced by async rules, merged into step validation.
    async_errors: Mutex<BTreeMap<Field, String>>,
    /// Per-field request generations; see the module docs.
    generations: Mutex<BTreeMap<Field, u64>>,
    postal: PostalCodeService,
    discounts: DiscountService,
    drafts: Arc<dyn DraftStore>,
    config: WizardConfig,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().expect("wizard state lock poisoned")
    }

    fn async_errors(&self) -> MutexGuard<'_, BTreeMap<Field, String>> {
        self.async_errors.lock().expect("async error map lock poisoned")
    }

    fn generations(&self) -> MutexGuard<'_, BTreeMap<Field, u64>> {
        self.generations.lock().expect("generation map lock poisoned")
    }

    fn bump_generation(&self, field: Field) -> u64 {
        let mut generations = self.generations();
        let entry = generations.entry(field).or_insert(0);
        *entry += 1;
        *entry
    }

    fn generation(&self, field: Field) -> u64 {
        self.generations().get(&field).copied().unwrap_or(0)
    }
}

/// The checkout wizard: four steps, gated transitions, persisted drafts.
///
/// Create one per checkout session, injecting the draft store:
///
/// ```
/// use std::sync::Arc;
/// use pasarela_wizard::{CheckoutWizard, MemoryDraftStore, WizardConfig};
///
/// let wizard = CheckoutWizard::new(WizardConfig::default(), Arc::new(MemoryDraftStore::new()));
/// assert_eq!(wizard.current_step().index(), 1);
/// ```
#[derive(Clone)]
pub struct CheckoutWizard {
    inner: Arc<Inner>,
}

impl CheckoutWizard {
    /// Create a fresh wizard with the given configuration and draft store.
    #[must_use]
    pub fn new(config: WizardConfig, drafts: Arc<dyn DraftStore>) -> Self {
        let postal = PostalCodeService::new(config.postal_latency);
        let discounts = DiscountService::new(config.discount_latency);

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(WizardState::default()),
                async_errors: Mutex::new(BTreeMap::new()),
                generations: Mutex::new(BTreeMap::new()),
                postal,
                discounts,
                drafts,
                config,
            }),
        }
    }

    /// A snapshot clone of the current state.
    #[must_use]
    pub fn state(&self) -> WizardState {
        self.inner.state().clone()
    }

    /// The active step.
    #[must_use]
    pub fn current_step(&self) -> Step {
        self.inner.state().current_step
    }

    /// The wizard configuration.
    #[must_use]
    pub fn config(&self) -> &WizardConfig {
        &self.inner.config
    }

    /// The current price breakdown (recompute after any mutation).
    #[must_use]
    pub fn price_breakdown(&self) -> PriceBreakdown {
        PriceBreakdown::compute(&self.inner.state())
    }

    // =========================================================================
    // Field updates
    // =========================================================================

    /// Edit the billing record in place.
    pub fn edit_billing(&self, edit: impl FnOnce(&mut BillingDetails)) {
        edit(&mut self.inner.state().billing);
    }

    /// Edit the shipping record in place.
    pub fn edit_shipping(&self, edit: impl FnOnce(&mut ShippingDetails)) {
        edit(&mut self.inner.state().shipping);
    }

    /// Edit the active payment field group in place.
    pub fn edit_payment(&self, edit: impl FnOnce(&mut PaymentDetails)) {
        edit(&mut self.inner.state().payment);
    }

    /// Edit the consent checkboxes in place.
    pub fn edit_consents(&self, edit: impl FnOnce(&mut ConsentDetails)) {
        edit(&mut self.inner.state().consents);
    }

    /// Switch the payment method, replacing the field group when it changes.
    ///
    /// Fields of the abandoned method are dropped with it; selecting the
    /// already-active method keeps the entered data.
    pub fn set_payment_method(&self, kind: PaymentMethodKind) {
        let mut state = self.inner.state();
        if state.payment.method() != kind {
            state.payment = PaymentDetails::empty(kind);
            tracing::debug!(method = %kind, "payment method switched");
        }
    }

    /// Record a postal code keystroke and schedule its debounced lookup.
    ///
    /// The raw value lands in the state immediately; the lookup fires only if
    /// no further edit arrives within the debounce window. On a hit the
    /// scope's city and province are auto-filled; on a miss a field error is
    /// recorded. Either way the resolution is discarded if the field has
    /// been edited again in the meantime.
    pub fn postal_code_changed(&self, scope: AddressScope, value: impl Into<String>) {
        let value = value.into();
        let field = scope.postal_field();

        {
            let mut state = self.inner.state();
            match scope {
                AddressScope::Billing => state.billing.postal_code.clone_from(&value),
                AddressScope::Shipping => state.shipping.postal_code.clone_from(&value),
            }
        }

        let generation = self.inner.bump_generation(field);

        // Malformed codes never reach the lookup; the sync format rule owns
        // that error.
        if PostalCode::parse(value.trim()).is_err() {
            self.inner.async_errors().remove(&field);
            return;
        }

        let inner = Arc::clone(&self.inner);
        let code = value.trim().to_owned();
        tokio::spawn(async move {
            tokio::time::sleep(inner.config.debounce).await;
            if inner.generation(field) != generation {
                tracing::debug!(%field, "debounced edit superseded before lookup");
                return;
            }

            let resolved = inner.postal.lookup(&code).await;

            if inner.generation(field) != generation {
                tracing::warn!(%field, code, "discarding stale postal resolution");
                return;
            }

            if let Some(info) = resolved {
                {
                    let mut state = inner.state();
                    match scope {
                        AddressScope::Billing => {
                            state.billing.city.clone_from(&info.city);
                            state.billing.province.clone_from(&info.province);
                        }
                        AddressScope::Shipping => {
                            state.shipping.city.clone_from(&info.city);
                            state.shipping.province.clone_from(&info.province);
                        }
                    }
                }
                inner.async_errors().remove(&field);
                tracing::debug!(%field, code, city = %info.city, "postal code auto-filled");
            } else {
                inner
                    .async_errors()
                    .insert(field, POSTAL_NOT_FOUND.to_owned());
            }
        });
    }

    /// Apply a discount code.
    ///
    /// Idempotent: re-applying the currently applied code re-confirms the
    /// same percentage. A different valid code replaces the prior one. An
    /// unknown code leaves the applied discount untouched and records a
    /// `discountCode` field error; the error clears on the next valid apply.
    pub async fn apply_discount(&self, code: &str) -> Option<u8> {
        let generation = self.inner.bump_generation(Field::DiscountCode);
        let resolved = self.inner.discounts.lookup(code).await;

        if self.inner.generation(Field::DiscountCode) != generation {
            tracing::warn!(code, "discarding stale discount resolution");
            return None;
        }

        match resolved {
            Some(discount) => {
                self.inner.state().applied_discount = Some(discount.percent);
                self.inner.async_errors().remove(&Field::DiscountCode);
                tracing::info!(code = %discount.code, percent = discount.percent, "discount applied");
                Some(discount.percent)
            }
            None => {
                self.inner
                    .async_errors()
                    .insert(Field::DiscountCode, DISCOUNT_NOT_FOUND.to_owned());
                tracing::debug!(code, "discount code rejected");
                None
            }
        }
    }

    /// The async-rule error currently recorded for a field, if any.
    #[must_use]
    pub fn field_error(&self, field: Field) -> Option<String> {
        self.inner.async_errors().get(&field).cloned()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the active step: synchronous rules plus any recorded
    /// async-rule errors for its currently relevant fields.
    #[must_use]
    pub fn validate_current_step(&self) -> ValidationResult {
        let state = self.inner.state().clone();
        let step = state.current_step;
        let mut result = validate_step(&state, step);

        let async_errors = self.inner.async_errors();
        for row in step_specs(step) {
            if !row.relevance.applies(&state) {
                continue;
            }
            if let Some(message) = async_errors.get(&row.field) {
                result.push(ValidationError::new(row.field, message.clone()));
            }
        }

        result
    }

    /// The postal fields whose existence must be confirmed before leaving
    /// this step: `(field, code)` pairs.
    fn pending_postal_checks(state: &WizardState, step: Step) -> Vec<(Field, String)> {
        match step {
            Step::Billing => vec![(Field::PostalCode, state.billing.postal_code.trim().to_owned())],
            Step::Shipping if !state.shipping.same_as_billing => vec![(
                Field::ShippingPostalCode,
                state.shipping.postal_code.trim().to_owned(),
            )],
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Attempt to advance to the next step.
    ///
    /// Synchronous rules run immediately; if they pass, the transition is
    /// held until the step's postal lookups resolve, then re-evaluated. Only
    /// a fully valid step advances - a rejected attempt changes nothing.
    pub async fn next_step(&self) -> StepOutcome {
        let snapshot = self.state();
        let step = snapshot.current_step;
        let Some(next) = step.next() else {
            return StepOutcome::NoFurtherStep;
        };

        let mut result = validate_step(&snapshot, step);

        if result.is_valid() {
            // Held, not rejected: await the async rules for this step.
            for (field, code) in Self::pending_postal_checks(&snapshot, step) {
                if self.inner.postal.lookup(&code).await.is_none() {
                    self.inner
                        .async_errors()
                        .insert(field, POSTAL_NOT_FOUND.to_owned());
                    result.push(ValidationError::new(field, POSTAL_NOT_FOUND));
                } else {
                    self.inner.async_errors().remove(&field);
                }
            }
        }

        if result.is_valid() {
            // Input may have changed while the transition was held.
            let reevaluated = validate_step(&self.inner.state(), step);
            if !reevaluated.is_valid() {
                result = reevaluated;
            }
        }

        if !result.is_valid() {
            tracing::debug!(step = %step, errors = result.errors.len(), "step transition blocked");
            return StepOutcome::Rejected(result);
        }

        {
            let mut state = self.inner.state();
            state.completed_steps.insert(step);
            state.current_step = next;
        }
        tracing::info!(from = %step, to = %next, "step advanced");
        self.persist_snapshot();

        StepOutcome::Advanced(next)
    }

    /// Step back. Always legal above step 1; completion state is retained.
    pub fn previous_step(&self) -> Option<Step> {
        let previous = {
            let mut state = self.inner.state();
            let previous = state.current_step.previous()?;
            state.current_step = previous;
            previous
        };
        tracing::debug!(step = %previous, "step back");
        self.persist_snapshot();
        Some(previous)
    }

    /// Jump directly to a step without validating.
    ///
    /// Used for draft rehydration; validation is re-checked lazily on the
    /// next forward transition.
    pub fn go_to_step(&self, step: Step) {
        self.inner.state().current_step = step;
        tracing::debug!(step = %step, "jumped to step");
    }

    /// Confirm the order from the summary step.
    ///
    /// On success the persisted draft is cleared and the in-memory state
    /// reset to defaults, so nothing leaks into a later session.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotOnSummaryStep`] when called from any other
    /// step - that is a caller bug, not a validation failure.
    pub fn confirm_order(&self) -> Result<ConfirmOutcome, WizardError> {
        let state = self.state();
        if state.current_step != Step::Summary {
            return Err(WizardError::NotOnSummaryStep);
        }

        let result = validate_step(&state, Step::Summary);
        if !result.is_valid() {
            tracing::debug!(errors = result.errors.len(), "confirmation blocked");
            return Ok(ConfirmOutcome::Rejected(result));
        }

        let confirmation = OrderConfirmation {
            reference: Uuid::new_v4(),
            total: PriceBreakdown::compute(&state).total,
            confirmed_at: Utc::now(),
        };

        if let Err(error) = self.inner.drafts.clear() {
            tracing::warn!(%error, "failed to clear draft after confirmation");
        }
        self.reset_in_memory();
        tracing::info!(reference = %confirmation.reference, total = %confirmation.total, "order confirmed");

        Ok(ConfirmOutcome::Confirmed(confirmation))
    }

    /// Explicit "reset form": clear the persisted draft and all state.
    pub fn reset(&self) {
        if let Err(error) = self.inner.drafts.clear() {
            tracing::warn!(%error, "failed to clear draft on reset");
        }
        self.reset_in_memory();
        tracing::info!("wizard reset");
    }

    fn reset_in_memory(&self) {
        *self.inner.state() = WizardState::default();
        self.inner.async_errors().clear();
        // Dropping the counters also invalidates every in-flight resolution:
        // their remembered generations can no longer match.
        self.inner.generations().clear();
    }

    // =========================================================================
    // Draft persistence
    // =========================================================================

    /// Snapshot the current state into the draft store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if serializing or writing fails.
    pub fn save_draft(&self) -> Result<DateTime<Utc>, DraftError> {
        let saved_at = Utc::now();
        let snapshot = DraftSnapshot::capture(&self.inner.state(), saved_at);
        self.inner.drafts.save(&snapshot)?;
        self.inner.state().last_saved_at = Some(saved_at);
        tracing::debug!(step = %snapshot.current_step, "draft saved");
        Ok(saved_at)
    }

    /// Snapshot, logging instead of propagating failures (used by the
    /// transition and autosave paths, where a failed write must not block
    /// the checkout).
    fn persist_snapshot(&self) {
        if let Err(error) = self.save_draft() {
            tracing::warn!(%error, "failed to persist draft");
        }
    }

    /// The stored draft, if a readable one exists.
    ///
    /// Unreadable drafts and store read failures degrade to `None`: the
    /// wizard starts fresh rather than crashing on advisory data.
    #[must_use]
    pub fn load_draft(&self) -> Option<DraftSnapshot> {
        match self.inner.drafts.load() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "failed to read draft store");
                None
            }
        }
    }

    /// Rehydrate from a snapshot (after the user accepted the restore).
    ///
    /// Steps before the stored one count as completed; the stored step itself
    /// is re-validated on the next forward transition. Consents are not part
    /// of the snapshot and stay unchecked.
    pub fn restore(&self, snapshot: DraftSnapshot) {
        let step = snapshot.current_step;
        {
            let mut state = self.inner.state();
            state.billing = snapshot.billing;
            state.shipping = snapshot.shipping;
            state.payment = snapshot.payment;
            state.applied_discount = snapshot.applied_discount;
            state.last_saved_at = Some(snapshot.saved_at);
            state.completed_steps = Step::ALL.into_iter().filter(|s| *s < step).collect();
        }
        self.go_to_step(step);
        tracing::info!(step = %step, "draft restored");
    }

    /// Start the periodic autosave task.
    ///
    /// Keep the returned guard alive for as long as autosaving should run;
    /// dropping it stops the task and takes one final snapshot (the page
    /// unload analog) unless the state is pristine.
    #[must_use]
    pub fn spawn_autosave(&self) -> AutosaveGuard {
        let wizard = self.clone();
        let interval = self.inner.config.autosave_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                wizard.persist_snapshot();
            }
        });

        AutosaveGuard {
            wizard: self.clone(),
            handle,
        }
    }

    // =========================================================================
    // Test observability
    // =========================================================================

    /// Postal directory consultations so far (cache hits excluded).
    #[must_use]
    pub fn postal_directory_lookups(&self) -> u64 {
        self.inner.postal.directory_lookups()
    }

    /// Discount table consultations so far (cache hits excluded).
    #[must_use]
    pub fn discount_directory_lookups(&self) -> u64 {
        self.inner.discounts.directory_lookups()
    }
}

/// Handle for the autosave task; see [`CheckoutWizard::spawn_autosave`].
pub struct AutosaveGuard {
    wizard: CheckoutWizard,
    handle: JoinHandle<()>,
}

impl Drop for AutosaveGuard {
    fn drop(&mut self) {
        self.handle.abort();
        // Final snapshot on the way out, unless there is nothing to keep
        // (a just-confirmed or just-reset wizard must not resurrect a draft).
        let pristine = *self.wizard.inner.state() == WizardState::default();
        if !pristine {
            self.wizard.persist_snapshot();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::draft::MemoryDraftStore;

    fn wizard() -> (CheckoutWizard, Arc<MemoryDraftStore>) {
        let store = Arc::new(MemoryDraftStore::new());
        let wizard =
            CheckoutWizard::new(WizardConfig::default(), Arc::clone(&store) as Arc<dyn DraftStore>);
        (wizard, store)
    }

    fn fill_valid_billing(wizard: &CheckoutWizard) {
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

    #[tokio::test(start_paused = true)]
    async fn test_next_step_is_noop_when_invalid() {
        let (wizard, store) = wizard();

        let outcome = wizard.next_step().await;
        let StepOutcome::Rejected(result) = outcome else {
            panic!("empty billing step must be rejected");
        };
        assert!(!result.is_valid());
        assert_eq!(wizard.current_step(), Step::Billing);
        assert!(wizard.state().completed_steps.is_empty());
        // A rejected transition takes no snapshot.
        assert!(store.raw().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_step_advances_and_snapshots() {
        let (wizard, store) = wizard();
        fill_valid_billing(&wizard);

        assert_eq!(wizard.next_step().await, StepOutcome::Advanced(Step::Shipping));
        assert_eq!(wizard.current_step(), Step::Shipping);
        assert!(wizard.state().is_completed(Step::Billing));
        assert!(store.raw().is_some());
        assert!(wizard.state().last_saved_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_postal_code_blocks_billing() {
        let (wizard, _) = wizard();
        fill_valid_billing(&wizard);
        wizard.edit_billing(|b| b.postal_code = "99999".to_owned());

        let StepOutcome::Rejected(result) = wizard.next_step().await else {
            panic!("unknown postal code must block the step");
        };
        assert_eq!(result.error_for(Field::PostalCode), Some(POSTAL_NOT_FOUND));
        assert_eq!(wizard.current_step(), Step::Billing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_previous_step_keeps_completion() {
        let (wizard, _) = wizard();
        fill_valid_billing(&wizard);
        wizard.next_step().await;

        assert_eq!(wizard.previous_step(), Some(Step::Billing));
        assert!(wizard.state().is_completed(Step::Billing));
        // At step 1 there is nowhere further back.
        assert_eq!(wizard.previous_step(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_step_on_summary_is_noop() {
        let (wizard, _) = wizard();
        wizard.go_to_step(Step::Summary);
        assert_eq!(wizard.next_step().await, StepOutcome::NoFurtherStep);
    }

    #[test]
    fn test_confirm_outside_summary_is_a_contract_error() {
        let (wizard, _) = wizard();
        assert_eq!(
            wizard.confirm_order(),
            Err(WizardError::NotOnSummaryStep)
        );
    }

    #[test]
    fn test_confirm_requires_consents() {
        let (wizard, _) = wizard();
        wizard.go_to_step(Step::Summary);

        let Ok(ConfirmOutcome::Rejected(result)) = wizard.confirm_order() else {
            panic!("unchecked consents must reject the confirmation");
        };
        assert!(result.error_for(Field::AcceptTerms).is_some());
        assert!(result.error_for(Field::AcceptPrivacy).is_some());
    }

    #[test]
    fn test_confirm_clears_draft_and_resets() {
        let (wizard, store) = wizard();
        fill_valid_billing(&wizard);
        wizard.save_draft().unwrap();
        assert!(store.raw().is_some());

        wizard.go_to_step(Step::Summary);
        wizard.edit_consents(|c| {
            c.accept_terms = true;
            c.accept_privacy = true;
        });

        let Ok(ConfirmOutcome::Confirmed(confirmation)) = wizard.confirm_order() else {
            panic!("consented confirmation must succeed");
        };
        assert_eq!(confirmation.total, wizard.price_breakdown().total);
        assert!(store.raw().is_none());
        assert_eq!(wizard.state(), WizardState::default());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (wizard, store) = wizard();
        fill_valid_billing(&wizard);
        wizard.save_draft().unwrap();

        wizard.reset();
        assert!(store.raw().is_none());
        assert_eq!(wizard.state(), WizardState::default());
    }

    #[test]
    fn test_set_payment_method_drops_stale_fields() {
        let (wizard, _) = wizard();
        wizard.edit_payment(|p| {
            if let PaymentDetails::Card { number, .. } = p {
                *number = "4111111111111111".to_owned();
            }
        });

        wizard.set_payment_method(PaymentMethodKind::Bizum);
        assert_eq!(wizard.state().payment, PaymentDetails::empty(PaymentMethodKind::Bizum));

        // Re-selecting the active method keeps entered data.
        wizard.edit_payment(|p| {
            if let PaymentDetails::Bizum { phone } = p {
                *phone = "612345678".to_owned();
            }
        });
        wizard.set_payment_method(PaymentMethodKind::Bizum);
        assert_eq!(
            wizard.state().payment,
            PaymentDetails::Bizum {
                phone: "612345678".to_owned()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_marks_prior_steps_completed() {
        let (wizard, _) = wizard();
        fill_valid_billing(&wizard);
        wizard.go_to_step(Step::Payment);
        wizard.save_draft().unwrap();

        let snapshot = wizard.load_draft().unwrap();
        wizard.reset();

        wizard.restore(snapshot);
        assert_eq!(wizard.current_step(), Step::Payment);
        let state = wizard.state();
        assert!(state.is_completed(Step::Billing));
        assert!(state.is_completed(Step::Shipping));
        assert!(!state.is_completed(Step::Payment));
        assert_eq!(state.billing.full_name, "Juan Pérez García");
        // Consents never survive a restore.
        assert!(!state.consents.accept_terms);
    }
}
