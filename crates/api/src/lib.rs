//! REST surface for the popup engine — admin campaign management plus the
//! public tracking and eligibility endpoints the storefront host calls.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod router;
pub mod validate;

pub use router::popup_router;
