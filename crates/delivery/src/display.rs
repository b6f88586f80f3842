//! Display controller — show/hide lifecycle of the selected campaign,
//! close/CTA routing, and impression/click reporting back to the store.
//!
//! Metric reporting is best-effort telemetry: a failed report is logged
//! and never blocks the visible popup.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use popup_core::types::{Campaign, MetricKind};
use popup_store::PopupStore;

use crate::ledger::FrequencyGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Showing,
    Hidden,
}

/// One campaign on screen. The logical `Hidden` transition happens
/// immediately on close/CTA; only the visual teardown is deferred by the
/// returned delay.
pub struct DisplaySession {
    campaign: Campaign,
    phase: DisplayPhase,
}

impl DisplaySession {
    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }
}

/// Outcome of a CTA click: where to navigate (if the CTA has a
/// destination) and how long to keep the exit animation on screen.
#[derive(Debug, Clone)]
pub struct CtaOutcome {
    pub navigate_to: Option<String>,
    pub teardown_delay: Duration,
}

pub struct DisplayController {
    store: Arc<PopupStore>,
    gate: FrequencyGate,
}

impl DisplayController {
    pub fn new(store: Arc<PopupStore>, gate: FrequencyGate) -> Self {
        Self { store, gate }
    }

    /// Put the fired campaign on screen: report the impression exactly once
    /// and record the session/cooldown marks its frequency rules ask for.
    /// Refuses content the renderer cannot handle.
    pub fn show(&self, campaign: &Campaign) -> Option<DisplaySession> {
        if campaign.content.is_unknown() {
            warn!(campaign_id = %campaign.id, "Refusing to display unknown content template");
            return None;
        }

        if self.store.increment_metric(campaign.id, MetricKind::Impressions).is_none() {
            warn!(campaign_id = %campaign.id, "Impression report dropped: campaign not in store");
        }
        self.gate.record_shown(campaign);

        debug!(campaign_id = %campaign.id, "Popup showing");
        Some(DisplaySession {
            campaign: campaign.clone(),
            phase: DisplayPhase::Showing,
        })
    }

    /// User dismissed the popup. Returns the visual teardown delay.
    pub fn close(&self, session: &mut DisplaySession) -> Duration {
        session.phase = DisplayPhase::Hidden;
        debug!(campaign_id = %session.campaign.id, "Popup closed");
        self.teardown_delay(&session.campaign)
    }

    /// User activated the call-to-action: report the click, then hand back
    /// the destination. The click is counted before any navigation happens.
    pub fn cta_click(&self, session: &mut DisplaySession) -> CtaOutcome {
        if session.phase == DisplayPhase::Showing {
            if self.store.increment_metric(session.campaign.id, MetricKind::Clicks).is_none() {
                warn!(campaign_id = %session.campaign.id, "Click report dropped: campaign not in store");
            }
        }
        session.phase = DisplayPhase::Hidden;

        CtaOutcome {
            navigate_to: session
                .campaign
                .content
                .cta()
                .and_then(|cta| cta.href.clone()),
            teardown_delay: self.teardown_delay(&session.campaign),
        }
    }

    fn teardown_delay(&self, campaign: &Campaign) -> Duration {
        Duration::from_millis(campaign.animation.duration_ms)
    }
}
