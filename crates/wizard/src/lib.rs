//! Pasarela Wizard - The checkout wizard engine.
//!
//! A four-step, step-gated checkout flow (billing → shipping → payment →
//! summary) with:
//!
//! - A declarative field validation engine with conditional relevance
//!   ([`rules`])
//! - Simulated async lookups for postal codes and discount codes, cached and
//!   debounced, with stale resolutions discarded ([`lookup`], [`machine`])
//! - A persisted draft that survives restarts, versioned and restored on
//!   confirmation ([`draft`])
//! - Reactive order pricing with an applied discount ([`pricing`])
//!
//! # Architecture
//!
//! [`CheckoutWizard`] is the single writer to the wizard state; everything
//! else - the rule tables, the lookup services, the draft store - is either
//! pure or injected. The engine is UI-agnostic: presentational components
//! consume [`Field`]-keyed error maps and drive the step transitions.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pasarela_wizard::{CheckoutWizard, MemoryDraftStore, StepOutcome, WizardConfig};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let wizard = CheckoutWizard::new(WizardConfig::default(), Arc::new(MemoryDraftStore::new()));
//!
//! // An empty billing step cannot advance.
//! let StepOutcome::Rejected(errors) = wizard.next_step().await else {
//!     panic!("expected a rejection");
//! };
//! assert!(!errors.is_valid());
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod draft;
pub mod error;
pub mod lookup;
pub mod machine;
pub mod pricing;
pub mod rules;
pub mod types;
pub mod validate;

pub use config::{ConfigError, WizardConfig};
pub use draft::{
    DEFAULT_DRAFT_FILE, DRAFT_SCHEMA_VERSION, DraftError, DraftSnapshot, DraftStore,
    FileDraftStore, MemoryDraftStore,
};
pub use error::WizardError;
pub use lookup::{Discount, DiscountService, PostalCodeService, PostalInfo};
pub use machine::{
    AddressScope, AutosaveGuard, CheckoutWizard, ConfirmOutcome, OrderConfirmation, StepOutcome,
};
pub use pricing::PriceBreakdown;
pub use rules::validate_step;
pub use types::{
    BillingDetails, ConsentDetails, PaymentDetails, PaymentMethodKind, ShippingDetails, Step,
    WizardState,
};
pub use validate::{Field, ValidationError, ValidationResult};
