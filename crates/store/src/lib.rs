//! Campaign store — durable record of popup campaign definitions.

pub mod store;

pub use store::PopupStore;
