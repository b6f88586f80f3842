//! Frequency ledger — session-shown flags and cooldown timestamps keyed by
//! campaign id, behind a pluggable trait so production can back it with
//! browser/local storage while tests use the in-memory implementation.

use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, DashSet};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use popup_core::types::Campaign;

use crate::clock::Clock;

/// Suppression bookkeeping. Session flags live for the session only;
/// cooldown timestamps persist across sessions and expire passively.
pub trait FrequencyLedger: Send + Sync {
    fn was_shown_this_session(&self, id: Uuid) -> bool;
    fn mark_shown_this_session(&self, id: Uuid);
    fn last_shown_at(&self, id: Uuid) -> Option<DateTime<Utc>>;
    fn mark_cooldown_start(&self, id: Uuid, at: DateTime<Utc>);
    /// Drop all session flags. Models the end of a browser session.
    fn reset_session(&self);
}

/// In-memory ledger. No cross-tab coordination: two concurrent sessions may
/// both see an unset flag and both fire — an accepted limitation.
#[derive(Default)]
pub struct MemoryLedger {
    session_shown: DashSet<Uuid>,
    cooldowns: DashMap<Uuid, DateTime<Utc>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrequencyLedger for MemoryLedger {
    fn was_shown_this_session(&self, id: Uuid) -> bool {
        self.session_shown.contains(&id)
    }

    fn mark_shown_this_session(&self, id: Uuid) {
        self.session_shown.insert(id);
    }

    fn last_shown_at(&self, id: Uuid) -> Option<DateTime<Utc>> {
        self.cooldowns.get(&id).map(|r| *r.value())
    }

    fn mark_cooldown_start(&self, id: Uuid, at: DateTime<Utc>) {
        self.cooldowns.insert(id, at);
    }

    fn reset_session(&self) {
        self.session_shown.clear();
    }
}

/// Combines the two independent suppression checks into campaign-level
/// eligibility, and records the marks a shown campaign asks for.
#[derive(Clone)]
pub struct FrequencyGate {
    ledger: Arc<dyn FrequencyLedger>,
    clock: Arc<dyn Clock>,
}

impl FrequencyGate {
    pub fn new(ledger: Arc<dyn FrequencyLedger>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    /// True iff a prior show is still inside the cooldown window. The window
    /// is exact elapsed time (`days` × 24h in milliseconds), not calendar days.
    pub fn is_in_cooldown(&self, id: Uuid, days: f64) -> bool {
        match self.ledger.last_shown_at(id) {
            None => false,
            Some(last) => {
                let window = Duration::milliseconds((days * 86_400_000.0) as i64);
                self.clock.now() - last < window
            }
        }
    }

    /// Both frequency rules must pass; a rule the campaign does not carry
    /// never suppresses.
    pub fn is_eligible(&self, campaign: &Campaign) -> bool {
        let freq = &campaign.behaviour.frequency;

        if freq.once_per_session && self.ledger.was_shown_this_session(campaign.id) {
            debug!(campaign_id = %campaign.id, "Suppressed: already shown this session");
            return false;
        }

        if let Some(days) = freq.cool_down_days {
            if days > 0.0 && self.is_in_cooldown(campaign.id, days) {
                debug!(campaign_id = %campaign.id, days, "Suppressed: in cooldown");
                return false;
            }
        }

        true
    }

    /// Record whichever marks the campaign's frequency rules request.
    pub fn record_shown(&self, campaign: &Campaign) {
        let freq = &campaign.behaviour.frequency;
        if freq.once_per_session {
            self.ledger.mark_shown_this_session(campaign.id);
        }
        if freq.cool_down_days.map_or(false, |d| d > 0.0) {
            self.ledger.mark_cooldown_start(campaign.id, self.clock.now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use popup_core::types::{
        BannerContent, BehaviourConfig, CampaignMetrics, FrequencyRule, PopupContent,
    };

    fn campaign_with(frequency: FrequencyRule) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            enabled: true,
            content: PopupContent::Banner(BannerContent {
                headline: "hi".to_string(),
                cta: None,
            }),
            behaviour: BehaviourConfig {
                frequency,
                ..Default::default()
            },
            animation: Default::default(),
            metrics: CampaignMetrics::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn gate() -> (FrequencyGate, Arc<MemoryLedger>, Arc<ManualClock>) {
        let ledger = Arc::new(MemoryLedger::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let gate = FrequencyGate::new(ledger.clone(), clock.clone());
        (gate, ledger, clock)
    }

    #[test]
    fn test_session_suppression() {
        let (gate, ledger, _) = gate();
        let campaign = campaign_with(FrequencyRule {
            once_per_session: true,
            cool_down_days: None,
        });

        assert!(gate.is_eligible(&campaign));
        gate.record_shown(&campaign);
        assert!(ledger.was_shown_this_session(campaign.id));
        assert!(!gate.is_eligible(&campaign));

        // Session reset clears the flag.
        ledger.reset_session();
        assert!(gate.is_eligible(&campaign));
    }

    #[test]
    fn test_cooldown_window_math() {
        let (gate, _, clock) = gate();
        let campaign = campaign_with(FrequencyRule {
            once_per_session: false,
            cool_down_days: Some(7.0),
        });

        gate.record_shown(&campaign);
        assert!(gate.is_in_cooldown(campaign.id, 7.0));
        assert!(!gate.is_eligible(&campaign));

        // One minute short of 7×24h: still suppressed.
        clock.advance(Duration::days(7) - Duration::minutes(1));
        assert!(!gate.is_eligible(&campaign));

        // Past the exact window: eligible again.
        clock.advance(Duration::minutes(2));
        assert!(!gate.is_in_cooldown(campaign.id, 7.0));
        assert!(gate.is_eligible(&campaign));
    }

    #[test]
    fn test_cooldown_survives_session_reset() {
        let (gate, ledger, _) = gate();
        let campaign = campaign_with(FrequencyRule {
            once_per_session: true,
            cool_down_days: Some(1.0),
        });

        gate.record_shown(&campaign);
        ledger.reset_session();
        // Session flag is gone but the cooldown still suppresses.
        assert!(!gate.is_eligible(&campaign));
    }

    #[test]
    fn test_no_rules_never_suppresses() {
        let (gate, _, _) = gate();
        let campaign = campaign_with(FrequencyRule::default());

        gate.record_shown(&campaign);
        gate.record_shown(&campaign);
        assert!(gate.is_eligible(&campaign));
    }

    #[test]
    fn test_zero_cooldown_is_no_rule() {
        let (gate, ledger, _) = gate();
        let campaign = campaign_with(FrequencyRule {
            once_per_session: false,
            cool_down_days: Some(0.0),
        });

        gate.record_shown(&campaign);
        assert!(ledger.last_shown_at(campaign.id).is_none());
        assert!(gate.is_eligible(&campaign));
    }

    #[test]
    fn test_no_timestamp_means_no_cooldown() {
        let (gate, _, _) = gate();
        assert!(!gate.is_in_cooldown(Uuid::new_v4(), 30.0));
    }
}
