//! `RocksDB` storage layer for reelgen.
//!
//! This crate provides persistent storage for subscription profiles, daily
//! usage counters, and generation jobs using `RocksDB` with column families
//! for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `profiles`: Subscription profiles, keyed by `user_id`
//! - `usage`: Daily counters, keyed by `user_id || day` (one record per pair)
//! - `jobs`: Generation jobs, keyed by `job_id` (ULID)
//! - `jobs_by_user`: Index for listing a user's jobs, newest first
//! - `jobs_by_status`: Index for sweeping jobs in a given state
//!
//! The persistence shape is an implementation detail: callers program
//! against the [`UsageLedger`], [`JobStore`], and [`ProfileStore`] traits.
//!
//! # Example
//!
//! ```no_run
//! use reelgen_store::{JobStore, RocksStore, UsageLedger};
//! use reelgen_core::{MediaKind, UsageDay, UserId};
//!
//! let store = RocksStore::open("/tmp/reelgen-db").unwrap();
//!
//! let user_id = UserId::generate();
//! let day = UsageDay::today();
//!
//! // Reserve one video generation against a limit of 5/day.
//! let snapshot = store.try_consume(&user_id, day, MediaKind::Video, Some(5)).unwrap();
//! assert_eq!(snapshot.used, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod shared;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;
pub use shared::SharedStore;

use reelgen_core::{
    GenerationJob, JobId, JobStatus, MediaKind, UsageDay, UsageRecord, UsageSnapshot, UserId,
    UserProfile,
};

/// The daily usage ledger.
///
/// Owns the per-user, per-day counters. `try_consume` is the *reservation*
/// side of quota enforcement: the upsert, the limit check, and the increment
/// happen as one atomic operation with respect to concurrent callers for the
/// same `(user, day)` key.
pub trait UsageLedger: Send + Sync {
    /// Reserve one generation of `kind` for `(user_id, day)`.
    ///
    /// Lazily creates the usage record on first use of the day. If the
    /// current count has reached `limit`, nothing is mutated. A `limit` of
    /// `None` means unlimited.
    ///
    /// # Errors
    ///
    /// - `StoreError::QuotaExceeded` when the counter is at the limit.
    /// - `StoreError::Database`/`Serialization` on storage faults.
    fn try_consume(
        &self,
        user_id: &UserId,
        day: UsageDay,
        kind: MediaKind,
        limit: Option<u32>,
    ) -> Result<UsageSnapshot>;

    /// Undo a reservation after a failed provider call.
    ///
    /// Decrements the counter for `kind` by 1, floored at zero. Releasing
    /// against a missing record is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn release(&self, user_id: &UserId, day: UsageDay, kind: MediaKind) -> Result<()>;

    /// Read the usage record for `(user_id, day)`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn record_for(&self, user_id: &UserId, day: UsageDay) -> Result<Option<UsageRecord>>;
}

/// Persistence for generation jobs and their state transitions.
pub trait JobStore: Send + Sync {
    /// Insert a new job and maintain the user and status indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create(&self, job: &GenerationJob) -> Result<()>;

    /// Get a job by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get(&self, job_id: &JobId) -> Result<Option<GenerationJob>>;

    /// List jobs for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GenerationJob>>;

    /// List jobs in a given status, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_by_status(&self, status: JobStatus, limit: usize) -> Result<Vec<GenerationJob>>;

    /// Apply a status transition and return the updated job.
    ///
    /// Transitions out of a terminal state are rejected; re-applying the
    /// same terminal state is an idempotent no-op.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the job doesn't exist.
    /// - `StoreError::MediaUrlRequired` for `Ready` without a URL.
    /// - `StoreError::InvalidTransition` out of a differing terminal state.
    fn update_status(
        &self,
        job_id: &JobId,
        new_status: JobStatus,
        media_url: Option<String>,
    ) -> Result<GenerationJob>;
}

/// Read/write access to subscription profiles.
///
/// Profiles are written by the external billing system (through the admin
/// endpoint); the request path only reads them.
pub trait ProfileStore: Send + Sync {
    /// Get a user's profile, if billing has written one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>>;

    /// Insert or replace a user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_profile(&self, profile: &UserProfile) -> Result<()>;
}
