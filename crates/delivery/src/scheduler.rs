//! Trigger scheduler — a per-campaign state machine that arms the
//! campaign's trigger conditions and fires at most once per page view.
//!
//! The browser's timers and DOM listeners become a host-pumped event model:
//! the page-view host feeds `Tick`/`Scroll`/`PointerLeave` events and acts
//! on the returned fire. The state guard makes firing exactly-once and a
//! cancelled scheduler structurally unable to fire later.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

use popup_core::types::TriggerConfig;

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing armed: no triggers configured, or torn down before firing.
    Idle,
    Armed,
    /// Terminal. Never re-arms for the same page view.
    Fired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    LoadDelay,
    ScrollDepth,
    ExitIntent,
}

/// Events supplied by the page-view host.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent {
    /// Clock poll for the load-delay deadline.
    Tick,
    Scroll {
        scroll_y: f64,
        document_height: f64,
        viewport_height: f64,
    },
    PointerLeave {
        client_y: f64,
    },
}

pub struct TriggerScheduler {
    campaign_id: Uuid,
    state: SchedulerState,
    deadline: Option<DateTime<Utc>>,
    scroll_threshold: Option<f64>,
    exit_intent: bool,
    clock: Arc<dyn Clock>,
}

impl TriggerScheduler {
    /// Arms immediately if the campaign configures at least one trigger;
    /// otherwise stays `Idle` and can never fire.
    pub fn new(campaign_id: Uuid, triggers: &TriggerConfig, clock: Arc<dyn Clock>) -> Self {
        if triggers.is_empty() {
            return Self {
                campaign_id,
                state: SchedulerState::Idle,
                deadline: None,
                scroll_threshold: None,
                exit_intent: false,
                clock,
            };
        }

        // Saturate absurd delays instead of letting the cast wrap negative
        // and fire the timer immediately.
        let deadline = triggers.on_load_delay_ms.map(|ms| {
            let delay = Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
            clock
                .now()
                .checked_add_signed(delay)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        });

        debug!(
            campaign_id = %campaign_id,
            load_delay = ?triggers.on_load_delay_ms,
            scroll = ?triggers.on_scroll_percent,
            exit_intent = triggers.exit_intent,
            "Scheduler armed"
        );

        Self {
            campaign_id,
            state: SchedulerState::Armed,
            deadline,
            scroll_threshold: triggers.on_scroll_percent,
            exit_intent: triggers.exit_intent,
            clock,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn has_fired(&self) -> bool {
        self.state == SchedulerState::Fired
    }

    /// Feed one host event. Returns the trigger that fired, if any.
    /// First satisfied trigger wins; everything else is disarmed with it.
    pub fn handle(&mut self, event: PageEvent) -> Option<TriggerKind> {
        if self.state != SchedulerState::Armed {
            return None;
        }

        let fired = match event {
            PageEvent::Tick => self
                .deadline
                .filter(|d| self.clock.now() >= *d)
                .map(|_| TriggerKind::LoadDelay),
            PageEvent::Scroll {
                scroll_y,
                document_height,
                viewport_height,
            } => self
                .scroll_threshold
                .filter(|threshold| {
                    scroll_percent(scroll_y, document_height, viewport_height) >= *threshold
                })
                .map(|_| TriggerKind::ScrollDepth),
            PageEvent::PointerLeave { client_y } => {
                (self.exit_intent && client_y <= 0.0).then_some(TriggerKind::ExitIntent)
            }
        };

        if let Some(kind) = fired {
            self.state = SchedulerState::Fired;
            self.disarm();
            debug!(campaign_id = %self.campaign_id, ?kind, "Trigger fired");
        } else {
            trace!(campaign_id = %self.campaign_id, ?event, "Event did not satisfy any trigger");
        }

        fired
    }

    /// Page teardown: synchronously drop every pending trigger. An unfired,
    /// cancelled scheduler never fires later. No-op once fired.
    pub fn cancel(&mut self) {
        if self.state == SchedulerState::Armed {
            self.disarm();
            self.state = SchedulerState::Idle;
            debug!(campaign_id = %self.campaign_id, "Scheduler cancelled");
        }
    }

    /// Idempotent: a disarm racing a fire is a no-op.
    fn disarm(&mut self) {
        self.deadline = None;
        self.scroll_threshold = None;
        self.exit_intent = false;
    }
}

/// `scroll_y / (document_height - viewport_height) × 100`. A page no taller
/// than the viewport counts as fully scrolled.
fn scroll_percent(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        100.0
    } else {
        scroll_y / scrollable * 100.0
    }
}
