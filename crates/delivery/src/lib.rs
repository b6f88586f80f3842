//! Popup delivery engine — targeting, frequency control, and display
//! scheduling for storefront popup campaigns.
//!
//! # Modules
//!
//! - [`matcher`] — Path targeting (exact + `*` glob patterns)
//! - [`ledger`] — Session/cooldown suppression ledger
//! - [`scheduler`] — Per-campaign trigger state machine
//! - [`policy`] — At-most-one campaign selection per page view
//! - [`display`] — Show/hide lifecycle and metric reporting
//! - [`clock`] — Time source abstraction for deterministic tests

pub mod clock;
pub mod display;
pub mod ledger;
pub mod matcher;
pub mod policy;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use display::{CtaOutcome, DisplayController, DisplayPhase, DisplaySession};
pub use ledger::{FrequencyGate, FrequencyLedger, MemoryLedger};
pub use policy::{DeliveryEngine, ScheduledCampaign};
pub use scheduler::{PageEvent, SchedulerState, TriggerKind, TriggerScheduler};
