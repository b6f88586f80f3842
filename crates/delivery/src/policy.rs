//! Campaign selection policy — picks at most one campaign per page view
//! and hands it to a freshly armed trigger scheduler.

use std::sync::Arc;
use tracing::debug;

use popup_core::types::Campaign;
use popup_store::PopupStore;

use crate::clock::Clock;
use crate::ledger::{FrequencyGate, FrequencyLedger};
use crate::matcher;
use crate::scheduler::TriggerScheduler;

/// First campaign (in store list order) whose targeting matches the path.
/// No priority system.
pub fn select_campaign<'a>(campaigns: &'a [Campaign], path: &str) -> Option<&'a Campaign> {
    campaigns
        .iter()
        .find(|c| matcher::should_show(&c.behaviour.targeting, path))
}

/// The campaign selected for a page view, with its armed scheduler. The
/// host pumps page events into the scheduler and must call
/// `scheduler.cancel()` on navigation/teardown if it has not fired.
pub struct ScheduledCampaign {
    pub campaign: Campaign,
    pub scheduler: TriggerScheduler,
}

/// Orchestrates store, matcher, and frequency ledger. Runs once per
/// page view; the enabled list is refetched every time (staleness is
/// acceptable in this domain, caching is not assumed).
#[derive(Clone)]
pub struct DeliveryEngine {
    store: Arc<PopupStore>,
    gate: FrequencyGate,
    clock: Arc<dyn Clock>,
}

impl DeliveryEngine {
    pub fn new(
        store: Arc<PopupStore>,
        ledger: Arc<dyn FrequencyLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gate = FrequencyGate::new(ledger, clock.clone());
        Self { store, gate, clock }
    }

    pub fn gate(&self) -> &FrequencyGate {
        &self.gate
    }

    /// Select and arm at most one campaign for this page view. Frequency
    /// eligibility is evaluated once, here, at selection time.
    pub fn begin_page_view(&self, path: &str) -> Option<ScheduledCampaign> {
        let enabled = self.store.list_enabled();
        let selected = select_campaign(&enabled, path)?;

        if !self.gate.is_eligible(selected) {
            debug!(campaign_id = %selected.id, path, "Selected campaign suppressed by frequency rules");
            return None;
        }

        let scheduler = TriggerScheduler::new(
            selected.id,
            &selected.behaviour.triggers,
            self.clock.clone(),
        );

        debug!(campaign_id = %selected.id, path, "Campaign scheduled for page view");
        Some(ScheduledCampaign {
            campaign: selected.clone(),
            scheduler,
        })
    }
}
