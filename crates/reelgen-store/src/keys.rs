//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use reelgen_core::{JobId, JobStatus, UsageDay, UserId};

/// Length of the encoded day component (`YYYY-MM-DD`).
const DAY_LEN: usize = 10;

/// Create a profile key from a user ID.
#[must_use]
pub fn profile_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a usage key from a user ID and day.
///
/// Format: `user_id (16 bytes) || day (10 bytes, "YYYY-MM-DD")`
#[must_use]
pub fn usage_key(user_id: &UserId, day: UsageDay) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + DAY_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(day.to_string().as_bytes());
    key
}

/// Create a job key from a job ID.
#[must_use]
pub fn job_key(job_id: &JobId) -> Vec<u8> {
    job_id.to_bytes().to_vec()
}

/// Create a user-job index key.
///
/// Format: `user_id (16 bytes) || job_id (16 bytes)`
///
/// Since ULIDs are time-ordered, jobs for a user will be sorted by time.
#[must_use]
pub fn user_job_key(user_id: &UserId, job_id: &JobId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&job_id.to_bytes());
    key
}

/// Create a prefix for iterating all jobs for a user.
#[must_use]
pub fn user_jobs_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a status-job index key.
///
/// Format: `status (1 byte) || job_id (16 bytes)`
#[must_use]
pub fn status_job_key(status: JobStatus, job_id: &JobId) -> Vec<u8> {
    let mut key = Vec::with_capacity(17);
    key.push(status.as_byte());
    key.extend_from_slice(&job_id.to_bytes());
    key
}

/// Create a prefix for iterating all jobs with a given status.
#[must_use]
pub fn status_jobs_prefix(status: JobStatus) -> Vec<u8> {
    vec![status.as_byte()]
}

/// Extract the job ID from the tail 16 bytes of an index key.
///
/// # Panics
///
/// Panics if the key is shorter than 16 bytes.
#[must_use]
pub fn extract_job_id_from_index_key(key: &[u8]) -> JobId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[key.len() - 16..]);
    JobId::from_bytes(bytes).expect("valid ULID bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_key_format() {
        let user_id = UserId::generate();
        let day: UsageDay = "2025-06-01".parse().unwrap();
        let key = usage_key(&user_id, day);

        assert_eq!(key.len(), 26);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], b"2025-06-01");
    }

    #[test]
    fn user_job_key_format() {
        let user_id = UserId::generate();
        let job_id = JobId::generate();
        let key = user_job_key(&user_id, &job_id);

        assert_eq!(key.len(), 32);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], job_id.to_bytes());
    }

    #[test]
    fn status_job_key_format() {
        let job_id = JobId::generate();
        let key = status_job_key(JobStatus::Ready, &job_id);

        assert_eq!(key.len(), 17);
        assert_eq!(key[0], JobStatus::Ready.as_byte());
    }

    #[test]
    fn extract_job_id_roundtrip() {
        let user_id = UserId::generate();
        let job_id = JobId::generate();

        let from_user_key = extract_job_id_from_index_key(&user_job_key(&user_id, &job_id));
        assert_eq!(from_user_key, job_id);

        let from_status_key =
            extract_job_id_from_index_key(&status_job_key(JobStatus::Queued, &job_id));
        assert_eq!(from_status_key, job_id);
    }
}
