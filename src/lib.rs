//! devflow-bot - a webhook-driven orchestrator that keeps a Notion task
//! board, a GitHub review thread, and a Slack approval flow consistent with
//! one another.
//!
//! This library provides the signature verifier, the typed webhook decoder,
//! the task-reference extractor, the two workflow state machines, and the
//! HTTP ingress router.

pub mod config;
pub mod server;
pub mod services;
pub mod types;
pub mod webhooks;
pub mod workflow;

#[cfg(test)]
pub mod test_utils;
