//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Subscription profiles (read-mostly), keyed by `user_id`.
    pub const PROFILES: &str = "profiles";

    /// Daily usage counters, keyed by `user_id || day`.
    /// The key shape makes the one-record-per-(user, day) invariant
    /// structural.
    pub const USAGE: &str = "usage";

    /// Generation jobs, keyed by `job_id` (ULID).
    pub const JOBS: &str = "jobs";

    /// Index: jobs by user, keyed by `user_id || job_id`.
    /// Value is empty (index only).
    pub const JOBS_BY_USER: &str = "jobs_by_user";

    /// Index: jobs by status, keyed by `status_byte || job_id`.
    /// Value is empty (index only).
    pub const JOBS_BY_STATUS: &str = "jobs_by_status";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::PROFILES,
        cf::USAGE,
        cf::JOBS,
        cf::JOBS_BY_USER,
        cf::JOBS_BY_STATUS,
    ]
}
