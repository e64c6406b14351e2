//! Provider gateway for the Kie API family.
//!
//! This crate provides:
//! - Media upload (base64 envelope) and download-URL resolution
//! - Direct-poll (numeric success flag) and task-poll (string state) render adapters
//! - Chat completion used for prompt expansion, with tolerant response parsing
//! - Credit lookup for credential checks

pub mod chat;
pub mod client;
pub mod config;
pub mod direct_poll;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod task;
pub mod task_poll;

#[cfg(test)]
mod client_tests;

pub use chat::{ChatMessage, ChatRole};
pub use client::KieClient;
pub use config::GatewayConfig;
pub use direct_poll::DirectPollProvider;
pub use error::{GatewayError, GatewayResult};
pub use gateway::Gateway;
pub use provider::{RawStatus, RenderProvider};
pub use task::{DirectPollTask, TaskPollInput, TaskPollTask, TaskSpec};
pub use task_poll::TaskPollProvider;
