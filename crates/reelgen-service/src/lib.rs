//! Reelgen HTTP API Service.
//!
//! This crate provides the HTTP API for the reelgen generation service,
//! including:
//!
//! - Prompt submission for video and audio generation (quota-enforced)
//! - Generation job lookup and listing
//! - Job status refresh (poll) and provider webhooks (push)
//! - Daily usage inspection
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **JWT bearer tokens** - For end-user requests (dashboard, etc.)
//! 2. **Admin API key** - For the billing system's profile writes

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async for consistency

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod provider;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use orchestrator::{GenerationOrchestrator, GenerationRequest, OrchestratorError};
pub use provider::{HttpProviderGateway, ProviderError, ProviderGateway, RemoteJob, RemoteStatus};
pub use routes::create_router;
pub use state::AppState;
