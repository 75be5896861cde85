//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the
//! [`UsageLedger`], [`JobStore`], and [`ProfileStore`] traits.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use reelgen_core::{
    GenerationJob, JobId, JobStatus, MediaKind, UsageDay, UsageRecord, UsageSnapshot, UserId,
    UserProfile,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{JobStore, ProfileStore, UsageLedger};

/// RocksDB-backed storage implementation.
///
/// The `usage_lock` serializes the upsert-check-increment sequence in
/// [`UsageLedger::try_consume`] so the limit check and the write are a single
/// atomic operation for concurrent requests. The lock is only ever held
/// around local `RocksDB` reads/writes, never across a network call.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    usage_lock: Mutex<()>,
    jobs_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            usage_lock: Mutex::new(()),
            jobs_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock<'a>(mutex: &'a Mutex<()>, what: &str) -> Result<MutexGuard<'a, ()>> {
        mutex
            .lock()
            .map_err(|_| StoreError::Database(format!("{what} lock poisoned")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_usage_record(&self, user_id: &UserId, day: UsageDay) -> Result<Option<UsageRecord>> {
        let cf = self.cf(cf::USAGE)?;
        let key = keys::usage_key(user_id, day);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_usage_record(&self, record: &UsageRecord) -> Result<()> {
        let cf = self.cf(cf::USAGE)?;
        let key = keys::usage_key(&record.user_id, record.day);
        let value = Self::serialize(record)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

impl UsageLedger for RocksStore {
    fn try_consume(
        &self,
        user_id: &UserId,
        day: UsageDay,
        kind: MediaKind,
        limit: Option<u32>,
    ) -> Result<UsageSnapshot> {
        // Upsert, limit check and increment must be one atomic step: a
        // read-then-write without the guard would let two near-limit
        // requests both pass the check.
        let _guard = Self::lock(&self.usage_lock, "usage")?;

        let mut record = self
            .get_usage_record(user_id, day)?
            .unwrap_or_else(|| UsageRecord::new(*user_id, day));

        let used = record.count(kind);
        if let Some(limit) = limit {
            if used >= limit {
                return Err(StoreError::QuotaExceeded { limit, used });
            }
        }

        *record.count_mut(kind) += 1;
        record.updated_at = chrono::Utc::now();
        self.put_usage_record(&record)?;

        Ok(UsageSnapshot {
            day,
            kind,
            used: record.count(kind),
            limit,
        })
    }

    fn release(&self, user_id: &UserId, day: UsageDay, kind: MediaKind) -> Result<()> {
        let _guard = Self::lock(&self.usage_lock, "usage")?;

        // Nothing reserved for this day means nothing to release.
        let Some(mut record) = self.get_usage_record(user_id, day)? else {
            return Ok(());
        };

        let count = record.count_mut(kind);
        *count = count.saturating_sub(1);
        record.updated_at = chrono::Utc::now();
        self.put_usage_record(&record)
    }

    fn record_for(&self, user_id: &UserId, day: UsageDay) -> Result<Option<UsageRecord>> {
        let _guard = Self::lock(&self.usage_lock, "usage")?;
        self.get_usage_record(user_id, day)
    }
}

impl JobStore for RocksStore {
    fn create(&self, job: &GenerationJob) -> Result<()> {
        let cf_jobs = self.cf(cf::JOBS)?;
        let cf_by_user = self.cf(cf::JOBS_BY_USER)?;
        let cf_by_status = self.cf(cf::JOBS_BY_STATUS)?;

        let job_key = keys::job_key(&job.id);
        let user_job_key = keys::user_job_key(&job.user_id, &job.id);
        let status_job_key = keys::status_job_key(job.status, &job.id);
        let value = Self::serialize(job)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_jobs, &job_key, &value);
        batch.put_cf(&cf_by_user, &user_job_key, []); // Index entry (empty value)
        batch.put_cf(&cf_by_status, &status_job_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get(&self, job_id: &JobId) -> Result<Option<GenerationJob>> {
        let cf = self.cf(cf::JOBS)?;
        let key = keys::job_key(job_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GenerationJob>> {
        let cf_by_user = self.cf(cf::JOBS_BY_USER)?;
        let prefix = keys::user_jobs_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // Collect matching keys first; ULIDs are naturally time-ordered so
        // reversing yields newest first.
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        all_keys.reverse();

        let mut jobs = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if jobs.len() >= limit {
                break;
            }

            let job_id = keys::extract_job_id_from_index_key(&key);
            if let Some(job) = self.get(&job_id)? {
                jobs.push(job);
            }
        }

        Ok(jobs)
    }

    fn list_by_status(&self, status: JobStatus, limit: usize) -> Result<Vec<GenerationJob>> {
        let cf_by_status = self.cf(cf::JOBS_BY_STATUS)?;
        let prefix = keys::status_jobs_prefix(status);

        let iter = self.db.iterator_cf(
            &cf_by_status,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        all_keys.reverse();

        let mut jobs = Vec::new();
        for key in all_keys.into_iter().take(limit) {
            let job_id = keys::extract_job_id_from_index_key(&key);
            if let Some(job) = self.get(&job_id)? {
                jobs.push(job);
            }
        }

        Ok(jobs)
    }

    fn update_status(
        &self,
        job_id: &JobId,
        new_status: JobStatus,
        media_url: Option<String>,
    ) -> Result<GenerationJob> {
        if new_status == JobStatus::Ready && media_url.is_none() {
            return Err(StoreError::MediaUrlRequired);
        }

        // Serialize transitions so the terminal check and the index swap see
        // a consistent view under concurrent refreshes/webhooks.
        let _guard = Self::lock(&self.jobs_lock, "jobs")?;

        let mut job = self.get(job_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "job",
            id: job_id.to_string(),
        })?;

        if job.status == new_status {
            // Idempotent no-op: re-delivered webhooks and repeated refreshes.
            return Ok(job);
        }

        if job.status.is_terminal() {
            return Err(StoreError::InvalidTransition {
                from: job.status,
                to: new_status,
            });
        }

        let old_status = job.status;
        job.status = new_status;
        job.media_url = if new_status == JobStatus::Ready {
            media_url
        } else {
            None
        };
        job.updated_at = chrono::Utc::now();

        let cf_jobs = self.cf(cf::JOBS)?;
        let cf_by_status = self.cf(cf::JOBS_BY_STATUS)?;

        let job_value = Self::serialize(&job)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_jobs, keys::job_key(job_id), &job_value);
        batch.delete_cf(&cf_by_status, keys::status_job_key(old_status, job_id));
        batch.put_cf(&cf_by_status, keys::status_job_key(new_status, job_id), []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(job)
    }
}

impl ProfileStore for RocksStore {
    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::profile_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::profile_key(&profile.user_id);
        let value = Self::serialize(profile)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}
