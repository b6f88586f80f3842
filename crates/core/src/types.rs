//! Popup campaign domain types — campaigns, content variants, triggers,
//! frequency rules, targeting, animation, and metrics.
//!
//! Wire format is camelCase: the admin builder UI and the storefront host
//! are both JavaScript consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Campaign ──────────────────────────────────────────────────────────────

/// One configured popup: content, behaviour rules, animation, and metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub enabled: bool,
    pub content: PopupContent,
    #[serde(default)]
    pub behaviour: BehaviourConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub metrics: CampaignMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Content ───────────────────────────────────────────────────────────────

/// Display payload, tagged by template so the display controller can handle
/// each variant exhaustively. Unrecognized template tags land in `Unknown`
/// and are never displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum PopupContent {
    Modal(ModalContent),
    Banner(BannerContent),
    Corner(CornerContent),
    #[serde(other)]
    Unknown,
}

impl PopupContent {
    /// The CTA configured for this content, if any.
    pub fn cta(&self) -> Option<&CtaConfig> {
        match self {
            PopupContent::Modal(c) => c.cta.as_ref(),
            PopupContent::Banner(c) => c.cta.as_ref(),
            PopupContent::Corner(c) => c.cta.as_ref(),
            PopupContent::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PopupContent::Unknown)
    }
}

/// Centered dialog with optional imagery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalContent {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub cta: Option<CtaConfig>,
}

/// Full-width strip pinned to the top or bottom edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerContent {
    pub headline: String,
    #[serde(default)]
    pub cta: Option<CtaConfig>,
}

/// Small card docked in a viewport corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerContent {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub cta: Option<CtaConfig>,
}

/// Call-to-action button. `href`, if present, is followed on click.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaConfig {
    pub label: String,
    #[serde(default)]
    pub href: Option<String>,
    /// Button background as a `#rrggbb` hex color.
    #[serde(default)]
    pub background: Option<String>,
}

// ─── Behaviour ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviourConfig {
    #[serde(default)]
    pub triggers: TriggerConfig,
    #[serde(default)]
    pub frequency: FrequencyRule,
    #[serde(default)]
    pub targeting: TargetingRule,
}

/// Conditions that can cause a campaign to display. With all three absent
/// the campaign can never fire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    /// One-shot timer after page load, in milliseconds.
    #[serde(default)]
    pub on_load_delay_ms: Option<u64>,
    /// Scroll depth threshold, 0–100.
    #[serde(default)]
    pub on_scroll_percent: Option<f64>,
    /// Fire when the pointer leaves the viewport through the top edge.
    #[serde(default)]
    pub exit_intent: bool,
}

impl TriggerConfig {
    pub fn is_empty(&self) -> bool {
        self.on_load_delay_ms.is_none() && self.on_scroll_percent.is_none() && !self.exit_intent
    }
}

/// Suppression policy limiting how often a campaign may redisplay.
/// Both rules gate independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRule {
    #[serde(default)]
    pub once_per_session: bool,
    /// Cooldown measured as exact elapsed time (days × 24h), not calendar days.
    #[serde(default)]
    pub cool_down_days: Option<f64>,
}

/// Path-matching rule determining which pages a campaign is eligible on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingRule {
    #[serde(default)]
    pub mode: TargetingMode,
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    #[default]
    All,
    Include,
    Exclude,
    /// Unrecognized mode values never match.
    #[serde(other)]
    Unknown,
}

// ─── Animation ─────────────────────────────────────────────────────────────

/// Enter/exit styling. Opaque to the core except that `duration_ms` sets
/// how long the visual teardown is deferred after hide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    #[serde(default)]
    pub enter: AnimationStyle,
    #[serde(default)]
    pub exit: AnimationStyle,
    #[serde(default = "default_animation_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub overlay: bool,
}

pub fn default_animation_ms() -> u64 {
    250
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enter: AnimationStyle::default(),
            exit: AnimationStyle::default(),
            duration_ms: default_animation_ms(),
            overlay: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    #[default]
    Fade,
    Slide,
    Zoom,
}

// ─── Metrics ───────────────────────────────────────────────────────────────

/// Impression/click counters. Monotonically non-decreasing; mutated only
/// through the store's atomic increment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub impressions: u64,
    pub clicks: u64,
    #[serde(default)]
    pub last_shown_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_clicked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Impressions,
    Clicks,
}

// ─── API request types ─────────────────────────────────────────────────────

/// Payload for creating a campaign. Id, timestamps, and (absent) metrics
/// are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub content: PopupContent,
    #[serde(default)]
    pub behaviour: BehaviourConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub metrics: Option<CampaignMetrics>,
}

/// Shallow-merge update. Carries no id/created_at/metrics fields, so those
/// cannot be mutated through the generic update path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPatch {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub content: Option<PopupContent>,
    pub behaviour: Option<BehaviourConfig>,
    pub animation: Option<AnimationConfig>,
}
