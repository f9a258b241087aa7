//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Typed decoding of pull_request payloads

pub mod events;
pub mod signature;

pub use events::{parse_pull_request_event, ParseError, PrAction, PullRequestEvent};
pub use signature::{compute_signature, format_signature_header, verify_signature};
