//! Speech to Text customization API.
//!
//! Resource kinds, listing records, request construction for every
//! (resource, action) pair, and the client that sends requests to a Watson
//! Speech to Text instance.

pub mod api;
pub mod client;
pub mod kind;
pub mod record;
pub mod requests;

pub use api::{ApiRequest, CustomizationApi, RequestBody};
pub use client::WatsonClient;
pub use kind::CustomizationKind;
pub use record::CustomizationRecord;
