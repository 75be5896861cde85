//! Core types and utilities for reelgen.
//!
//! This crate provides the foundational types used throughout the reelgen
//! platform:
//!
//! - **Identifiers**: `UserId`, `JobId`
//! - **Plans & quotas**: `Plan`, `UserProfile`, `Limits`, `effective_plan`,
//!   `limits_for`
//! - **Jobs**: `GenerationJob`, `JobStatus`, `MediaKind`
//! - **Usage**: `UsageRecord`, `UsageDay`, `UsageSnapshot`
//!
//! # Quota model
//!
//! Quotas are counted per user, per UTC calendar day and per media kind.
//! The limits themselves derive from the user's subscription plan through
//! the pure [`limits_for`] function; an expired paid plan falls back to the
//! free tier.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod job;
pub mod plan;
pub mod usage;

pub use ids::{IdError, JobId, UserId};
pub use job::{GenerationJob, JobStatus, MediaKind};
pub use plan::{
    effective_plan, limits_for, Limits, Plan, UserProfile, FREE_MAX_AUDIO_SECONDS,
    FREE_MAX_GENERATIONS_PER_DAY, FREE_MAX_PROMPT_WORDS, FREE_MAX_VIDEO_SECONDS,
    PRO_MAX_AUDIO_SECONDS, PRO_MAX_GENERATIONS_PER_DAY, PRO_MAX_PROMPT_WORDS,
    PRO_MAX_VIDEO_SECONDS, PRO_PLUS_MAX_AUDIO_SECONDS, PRO_PLUS_MAX_PROMPT_WORDS,
    PRO_PLUS_MAX_VIDEO_SECONDS,
};
pub use usage::{UsageDay, UsageRecord, UsageSnapshot};
