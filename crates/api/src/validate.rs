//! Draft validation — malformed campaigns are rejected with field-level
//! detail before they reach the store.

use serde::Serialize;
use url::Url;

use popup_core::types::{BehaviourConfig, CampaignDraft, CampaignPatch, CtaConfig, PopupContent};

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

pub fn validate_draft(draft: &CampaignDraft) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if draft.name.trim().is_empty() {
        errors.push(FieldError::new("name", "must not be empty"));
    }
    validate_content(&draft.content, &mut errors);
    validate_behaviour(&draft.behaviour, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Same checks as [`validate_draft`], applied only to the fields the patch
/// actually carries.
pub fn validate_patch(patch: &CampaignPatch) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }
    }
    if let Some(content) = &patch.content {
        validate_content(content, &mut errors);
    }
    if let Some(behaviour) = &patch.behaviour {
        validate_behaviour(behaviour, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_content(content: &PopupContent, errors: &mut Vec<FieldError>) {
    match content {
        PopupContent::Modal(c) => {
            if c.title.trim().is_empty() {
                errors.push(FieldError::new("content.title", "must not be empty"));
            }
            if let Some(cta) = &c.cta {
                validate_cta(cta, errors);
            }
        }
        PopupContent::Banner(c) => {
            if c.headline.trim().is_empty() {
                errors.push(FieldError::new("content.headline", "must not be empty"));
            }
            if let Some(cta) = &c.cta {
                validate_cta(cta, errors);
            }
        }
        PopupContent::Corner(c) => {
            if c.title.trim().is_empty() {
                errors.push(FieldError::new("content.title", "must not be empty"));
            }
            if let Some(cta) = &c.cta {
                validate_cta(cta, errors);
            }
        }
        PopupContent::Unknown => {
            errors.push(FieldError::new("content.template", "unsupported template"));
        }
    }
}

fn validate_cta(cta: &CtaConfig, errors: &mut Vec<FieldError>) {
    if cta.label.trim().is_empty() {
        errors.push(FieldError::new("content.cta.label", "must not be empty"));
    }
    if let Some(href) = &cta.href {
        if Url::parse(href).is_err() {
            errors.push(FieldError::new("content.cta.href", "must be a valid URL"));
        }
    }
    if let Some(color) = &cta.background {
        if !is_hex_color(color) {
            errors.push(FieldError::new(
                "content.cta.background",
                "must be a #rrggbb hex color",
            ));
        }
    }
}

/// One day in milliseconds. No legitimate popup delays longer than that.
const MAX_LOAD_DELAY_MS: u64 = 86_400_000;

fn validate_behaviour(behaviour: &BehaviourConfig, errors: &mut Vec<FieldError>) {
    if let Some(delay) = behaviour.triggers.on_load_delay_ms {
        if delay > MAX_LOAD_DELAY_MS {
            errors.push(FieldError::new(
                "behaviour.triggers.onLoadDelayMs",
                "must not exceed 24 hours",
            ));
        }
    }
    if let Some(percent) = behaviour.triggers.on_scroll_percent {
        if !(0.0..=100.0).contains(&percent) {
            errors.push(FieldError::new(
                "behaviour.triggers.onScrollPercent",
                "must be between 0 and 100",
            ));
        }
    }
    if let Some(days) = behaviour.frequency.cool_down_days {
        if days < 0.0 {
            errors.push(FieldError::new(
                "behaviour.frequency.coolDownDays",
                "must not be negative",
            ));
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
