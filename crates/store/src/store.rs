//! In-memory popup store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing.

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::info;
use uuid::Uuid;

use popup_core::types::{Campaign, CampaignDraft, CampaignMetrics, CampaignPatch, MetricKind};

/// Thread-safe campaign store. All mutating operations are serialized
/// behind `write_gate` so a read-modify-write (metric increments in
/// particular) can never lose an update to a concurrent writer. Reads
/// skip the gate and see a point-in-time snapshot.
pub struct PopupStore {
    campaigns: DashMap<Uuid, Campaign>,
    write_gate: Mutex<()>,
}

impl PopupStore {
    pub fn new() -> Self {
        Self {
            campaigns: DashMap::new(),
            write_gate: Mutex::new(()),
        }
    }

    /// All campaigns regardless of enabled state, newest first.
    pub fn list(&self) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> =
            self.campaigns.iter().map(|r| r.value().clone()).collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }

    /// Enabled campaigns only, newest first.
    pub fn list_enabled(&self) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|r| r.value().enabled)
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }

    pub fn get(&self, id: Uuid) -> Option<Campaign> {
        self.campaigns.get(&id).map(|r| r.value().clone())
    }

    pub fn create(&self, draft: CampaignDraft) -> Campaign {
        let _gate = self.write_gate.lock();
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            name: draft.name,
            enabled: draft.enabled,
            content: draft.content,
            behaviour: draft.behaviour,
            animation: draft.animation,
            metrics: draft.metrics.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        let id = campaign.id;
        self.campaigns.insert(id, campaign.clone());
        info!(campaign_id = %id, name = %campaign.name, "Campaign created");
        campaign
    }

    /// Shallow-merges the patch and refreshes `updated_at`. The patch type
    /// carries no id/created_at/metrics fields, so those cannot change here.
    pub fn update(&self, id: Uuid, patch: CampaignPatch) -> Option<Campaign> {
        let _gate = self.write_gate.lock();
        self.campaigns.get_mut(&id).map(|mut entry| {
            let c = entry.value_mut();
            if let Some(name) = patch.name {
                c.name = name;
            }
            if let Some(enabled) = patch.enabled {
                c.enabled = enabled;
            }
            if let Some(content) = patch.content {
                c.content = content;
            }
            if let Some(behaviour) = patch.behaviour {
                c.behaviour = behaviour;
            }
            if let Some(animation) = patch.animation {
                c.animation = animation;
            }
            c.updated_at = Utc::now();
            info!(campaign_id = %id, "Campaign updated");
            c.clone()
        })
    }

    pub fn delete(&self, id: Uuid) -> bool {
        let _gate = self.write_gate.lock();
        let removed = self.campaigns.remove(&id).is_some();
        if removed {
            info!(campaign_id = %id, "Campaign deleted");
        }
        removed
    }

    /// Atomically adds 1 to the named counter, stamping
    /// `last_shown_at`/`last_clicked_at` and `updated_at`.
    pub fn increment_metric(&self, id: Uuid, kind: MetricKind) -> Option<Campaign> {
        let _gate = self.write_gate.lock();
        self.campaigns.get_mut(&id).map(|mut entry| {
            let c = entry.value_mut();
            let now = Utc::now();
            match kind {
                MetricKind::Impressions => {
                    c.metrics.impressions += 1;
                    c.metrics.last_shown_at = Some(now);
                }
                MetricKind::Clicks => {
                    c.metrics.clicks += 1;
                    c.metrics.last_clicked_at = Some(now);
                }
            }
            c.updated_at = now;
            c.clone()
        })
    }

    /// Copies a campaign under a new id. The copy is always disabled with
    /// zeroed metrics, whatever the source's state.
    pub fn duplicate(&self, id: Uuid) -> Option<Campaign> {
        let _gate = self.write_gate.lock();
        let source = self.campaigns.get(&id).map(|r| r.value().clone())?;
        let now = Utc::now();
        let copy = Campaign {
            id: Uuid::new_v4(),
            name: format!("{} (copy)", source.name),
            enabled: false,
            content: source.content,
            behaviour: source.behaviour,
            animation: source.animation,
            metrics: CampaignMetrics::default(),
            created_at: now,
            updated_at: now,
        };
        let copy_id = copy.id;
        self.campaigns.insert(copy_id, copy.clone());
        info!(campaign_id = %copy_id, source_id = %id, "Campaign duplicated");
        Some(copy)
    }

    /// Seed three demo campaigns for development.
    pub fn seed_demo_data(&self) {
        use popup_core::types::*;

        self.create(CampaignDraft {
            name: "Welcome Discount".to_string(),
            enabled: true,
            content: PopupContent::Modal(ModalContent {
                title: "10% off your first order".to_string(),
                body: Some("Join the list and we'll send you a code.".to_string()),
                image_url: None,
                cta: Some(CtaConfig {
                    label: "Get my code".to_string(),
                    href: Some("https://shop.example.com/signup".to_string()),
                    background: Some("#1a7f5a".to_string()),
                }),
            }),
            behaviour: BehaviourConfig {
                triggers: TriggerConfig {
                    on_load_delay_ms: Some(3000),
                    ..Default::default()
                },
                frequency: FrequencyRule {
                    once_per_session: true,
                    cool_down_days: Some(7.0),
                },
                targeting: TargetingRule::default(),
            },
            animation: AnimationConfig::default(),
            metrics: None,
        });

        self.create(CampaignDraft {
            name: "Free Shipping Banner".to_string(),
            enabled: true,
            content: PopupContent::Banner(BannerContent {
                headline: "Free shipping on orders over $50".to_string(),
                cta: None,
            }),
            behaviour: BehaviourConfig {
                triggers: TriggerConfig {
                    on_scroll_percent: Some(40.0),
                    ..Default::default()
                },
                frequency: FrequencyRule {
                    once_per_session: true,
                    cool_down_days: None,
                },
                targeting: TargetingRule {
                    mode: TargetingMode::Include,
                    paths: vec!["/products/*".to_string()],
                },
            },
            animation: AnimationConfig {
                enter: AnimationStyle::Slide,
                exit: AnimationStyle::Slide,
                duration_ms: 200,
                overlay: false,
            },
            metrics: None,
        });

        self.create(CampaignDraft {
            name: "Exit Offer".to_string(),
            enabled: false,
            content: PopupContent::Corner(CornerContent {
                title: "Before you go".to_string(),
                body: Some("Your cart is waiting.".to_string()),
                cta: Some(CtaConfig {
                    label: "Back to cart".to_string(),
                    href: Some("https://shop.example.com/cart".to_string()),
                    background: None,
                }),
            }),
            behaviour: BehaviourConfig {
                triggers: TriggerConfig {
                    exit_intent: true,
                    ..Default::default()
                },
                frequency: FrequencyRule::default(),
                targeting: TargetingRule {
                    mode: TargetingMode::Exclude,
                    paths: vec!["/checkout".to_string()],
                },
            },
            animation: AnimationConfig::default(),
            metrics: None,
        });

        info!("Seeded 3 demo campaigns");
    }
}

impl Default for PopupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popup_core::types::{BannerContent, PopupContent};
    use std::sync::Arc;

    fn draft(name: &str, enabled: bool) -> CampaignDraft {
        CampaignDraft {
            name: name.to_string(),
            enabled,
            content: PopupContent::Banner(BannerContent {
                headline: "hello".to_string(),
                cta: None,
            }),
            behaviour: Default::default(),
            animation: Default::default(),
            metrics: None,
        }
    }

    #[test]
    fn test_create_defaults() {
        let store = PopupStore::new();
        let campaign = store.create(draft("Spring Sale", true));

        assert_eq!(campaign.metrics.impressions, 0);
        assert_eq!(campaign.metrics.clicks, 0);
        assert_eq!(campaign.created_at, campaign.updated_at);
        assert_eq!(store.get(campaign.id).unwrap().name, "Spring Sale");
    }

    #[test]
    fn test_list_enabled_filters() {
        let store = PopupStore::new();
        store.create(draft("on", true));
        store.create(draft("off", false));

        assert_eq!(store.list().len(), 2);
        let enabled = store.list_enabled();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "on");
    }

    #[test]
    fn test_get_unknown_is_none() {
        let store = PopupStore::new();
        assert!(store.get(Uuid::new_v4()).is_none());
        assert!(store.update(Uuid::new_v4(), CampaignPatch::default()).is_none());
        assert!(!store.delete(Uuid::new_v4()));
        assert!(store.increment_metric(Uuid::new_v4(), MetricKind::Clicks).is_none());
        assert!(store.duplicate(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_update_refreshes_updated_at() {
        let store = PopupStore::new();
        let created = store.create(draft("a", true));

        let updated = store
            .update(
                created.id,
                CampaignPatch {
                    name: Some("b".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "b");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        // Untouched fields survive the shallow merge.
        assert!(updated.enabled);
    }

    #[test]
    fn test_increment_metric_stamps() {
        let store = PopupStore::new();
        let campaign = store.create(draft("a", true));

        let after = store
            .increment_metric(campaign.id, MetricKind::Impressions)
            .unwrap();
        assert_eq!(after.metrics.impressions, 1);
        assert!(after.metrics.last_shown_at.is_some());
        assert!(after.metrics.last_clicked_at.is_none());

        let after = store.increment_metric(campaign.id, MetricKind::Clicks).unwrap();
        assert_eq!(after.metrics.clicks, 1);
        assert!(after.metrics.last_clicked_at.is_some());
    }

    #[test]
    fn test_monotonic_metrics_under_concurrency() {
        let store = Arc::new(PopupStore::new());
        let campaign = store.create(draft("hot", true));
        let id = campaign.id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store.increment_metric(id, MetricKind::Impressions).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.get(id).unwrap().metrics.impressions, 400);
    }

    #[test]
    fn test_duplicate_resets_state() {
        let store = PopupStore::new();
        let source = store.create(draft("Original", true));
        store.increment_metric(source.id, MetricKind::Impressions).unwrap();
        store.increment_metric(source.id, MetricKind::Clicks).unwrap();

        let copy = store.duplicate(source.id).unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, "Original (copy)");
        assert!(!copy.enabled);
        assert_eq!(copy.metrics.impressions, 0);
        assert_eq!(copy.metrics.clicks, 0);
        assert!(copy.metrics.last_shown_at.is_none());
        // Source is untouched.
        assert_eq!(store.get(source.id).unwrap().metrics.impressions, 1);
    }

    #[test]
    fn test_seed_demo_data() {
        let store = PopupStore::new();
        store.seed_demo_data();
        assert_eq!(store.list().len(), 3);
        assert_eq!(store.list_enabled().len(), 2);
    }
}
