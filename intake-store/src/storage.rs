//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `requests` - Intake requests as JSON (key: request_id)
//! - `scores` - Score records as bincode (key: request_id)
//! - `review_tasks` - Review tasks as bincode (key: request_id || task_id)
//! - `review_comments` - Comments as bincode (key: task_id || comment_id)
//!
//! Requests hold an open-ended JSON details bag, which bincode cannot
//! round-trip, so they are stored as JSON.
//!
//! Every write that touches a request goes through `write_lock`, so the
//! read-modify-write in the commits cannot interleave with `put_request`.

use crate::{
    config::Config,
    error::{Error, Result},
    review::{ReviewAction, ReviewComment, ReviewStatus, ReviewTask},
    store::{apply_review, apply_score, sort_tasks, RequestStore, ReviewStore, ScoreStore},
    types::{IntakeRequest, ScoreRecord},
};
use parking_lot::Mutex;
use risk_engine::IntakeDetails;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

/// Column family names
const CF_REQUESTS: &str = "requests";
const CF_SCORES: &str = "scores";
const CF_REVIEW_TASKS: &str = "review_tasks";
const CF_REVIEW_COMMENTS: &str = "review_comments";

/// Storage wrapper for RocksDB
pub struct Storage {
    db: Arc<DB>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").field("path", &self.db.path()).finish()
    }
}

impl Storage {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        // Create directory if not exists
        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_REQUESTS, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_SCORES, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_REVIEW_TASKS, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_REVIEW_COMMENTS, Self::cf_options()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = ?path, "Opened intake store");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    fn cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    /// Key: parent_id || child_id
    fn compound_key(parent: &Uuid, child: &Uuid) -> Vec<u8> {
        let mut key = Vec::with_capacity(32);
        key.extend_from_slice(parent.as_bytes());
        key.extend_from_slice(child.as_bytes());
        key
    }

    /// Bincode values under a key prefix (empty prefix scans the whole CF)
    fn scan_prefix<T: DeserializeOwned>(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<T>> {
        let cf = self.cf_handle(cf_name)?;

        let mut items = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            items.push(bincode::deserialize(&value)?);
        }
        Ok(items)
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("Intake store closed");
        Ok(())
    }
}

impl RequestStore for Storage {
    fn get_request(&self, id: Uuid) -> Result<IntakeRequest> {
        let cf = self.cf_handle(CF_REQUESTS)?;
        let value = self
            .db
            .get_cf(&cf, id.as_bytes())?
            .ok_or(Error::RequestNotFound(id))?;

        Ok(serde_json::from_slice(&value)?)
    }

    fn put_request(&self, request: &IntakeRequest) -> Result<()> {
        let cf = self.cf_handle(CF_REQUESTS)?;
        let value = serde_json::to_vec(request)?;

        let _guard = self.write_lock.lock();
        self.db.put_cf(&cf, request.id.as_bytes(), value)?;

        tracing::debug!(request_id = %request.id, "Request stored");
        Ok(())
    }

    fn list_requests(&self) -> Result<Vec<IntakeRequest>> {
        let cf = self.cf_handle(CF_REQUESTS)?;

        let mut requests = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            requests.push(serde_json::from_slice::<IntakeRequest>(&value)?);
        }

        requests.sort_by_key(|r| (r.created_at, r.id));
        Ok(requests)
    }
}

impl ScoreStore for Storage {
    fn get_score(&self, request_id: Uuid) -> Result<Option<ScoreRecord>> {
        let cf = self.cf_handle(CF_SCORES)?;
        match self.db.get_cf(&cf, request_id.as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    fn commit_score(&self, scored: &IntakeDetails, score: &ScoreRecord) -> Result<IntakeRequest> {
        let _guard = self.write_lock.lock();

        let mut request = self.get_request(score.request_id)?;
        apply_score(&mut request, scored, score)?;

        let mut batch = WriteBatch::default();

        // 1. Request summary
        let cf_requests = self.cf_handle(CF_REQUESTS)?;
        batch.put_cf(&cf_requests, request.id.as_bytes(), serde_json::to_vec(&request)?);

        // 2. Score record
        let cf_scores = self.cf_handle(CF_SCORES)?;
        batch.put_cf(&cf_scores, score.request_id.as_bytes(), bincode::serialize(score)?);

        // Atomic commit
        self.db.write(batch)?;

        Ok(request)
    }
}

impl ReviewStore for Storage {
    fn review_tasks(&self, request_id: Uuid) -> Result<Vec<ReviewTask>> {
        let mut tasks: Vec<ReviewTask> = self.scan_prefix(CF_REVIEW_TASKS, request_id.as_bytes())?;
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    fn pending_review_tasks(&self) -> Result<Vec<ReviewTask>> {
        let mut tasks: Vec<ReviewTask> = self.scan_prefix(CF_REVIEW_TASKS, &[])?;
        tasks.retain(|t| t.status == ReviewStatus::Pending);
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    fn commit_review(&self, task: &ReviewTask, action: ReviewAction) -> Result<IntakeRequest> {
        let _guard = self.write_lock.lock();

        let mut request = self.get_request(task.request_id)?;

        let mut tasks = self.review_tasks(task.request_id)?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        apply_review(&mut request, &tasks, task, action);

        let mut batch = WriteBatch::default();

        let cf_requests = self.cf_handle(CF_REQUESTS)?;
        batch.put_cf(&cf_requests, request.id.as_bytes(), serde_json::to_vec(&request)?);

        let cf_tasks = self.cf_handle(CF_REVIEW_TASKS)?;
        batch.put_cf(
            &cf_tasks,
            Self::compound_key(&task.request_id, &task.id),
            bincode::serialize(task)?,
        );

        self.db.write(batch)?;

        Ok(request)
    }

    fn put_comment(&self, comment: &ReviewComment) -> Result<()> {
        let cf = self.cf_handle(CF_REVIEW_COMMENTS)?;
        self.db.put_cf(
            &cf,
            Self::compound_key(&comment.task_id, &comment.id),
            bincode::serialize(comment)?,
        )?;
        Ok(())
    }

    fn comments_for(&self, task_id: Uuid) -> Result<Vec<ReviewComment>> {
        let mut comments: Vec<ReviewComment> =
            self.scan_prefix(CF_REVIEW_COMMENTS, task_id.as_bytes())?;
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestStatus;
    use chrono::Utc;
    use risk_engine::RiskScoringEngine;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_config() -> (Config, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        (config, temp_dir)
    }

    fn test_request() -> IntakeRequest {
        let details = IntakeDetails::from_value(json!({
            "data_types": ["PII", "Financial"],
            "deployment_type": "Cloud",
            "nested": {"owner": "finance", "tags": [1, 2]},
        }));
        IntakeRequest::new("Invoice assistant", "Reads invoices", "user-7", details)
    }

    #[test]
    fn test_storage_open() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();
        assert!(storage.db.cf_handle(CF_REQUESTS).is_some());
        assert!(storage.db.cf_handle(CF_SCORES).is_some());
    }

    #[test]
    fn test_request_round_trip_keeps_details() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();

        let request = test_request();
        storage.put_request(&request).unwrap();

        let retrieved = storage.get_request(request.id).unwrap();
        assert_eq!(retrieved, request);
        assert_eq!(storage.list_requests().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_request() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();

        let err = storage.get_request(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::RequestNotFound(_)));
    }

    #[test]
    fn test_atomic_commit() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();

        let request = test_request();
        storage.put_request(&request).unwrap();
        assert!(storage.get_score(request.id).unwrap().is_none());

        let assessment = RiskScoringEngine::default().score(&request.details);
        let record = ScoreRecord::new(request.id, &assessment, Utc::now());
        let committed = storage.commit_score(&request.details, &record).unwrap();

        let stored_request = storage.get_request(request.id).unwrap();
        assert_eq!(stored_request, committed);
        assert_eq!(stored_request.risk_score, Some(record.total_score));

        let stored_score = storage.get_score(request.id).unwrap().unwrap();
        assert_eq!(stored_score, record);
    }

    #[test]
    fn test_commit_score_rereads_request() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();

        let request = test_request();
        storage.put_request(&request).unwrap();
        let record = ScoreRecord::new(
            request.id,
            &RiskScoringEngine::default().score(&request.details),
            Utc::now(),
        );

        let mut renamed = request.clone();
        renamed.title = "Invoice assistant v2".to_string();
        storage.put_request(&renamed).unwrap();
        let committed = storage.commit_score(&request.details, &record).unwrap();
        assert_eq!(committed.title, "Invoice assistant v2");

        let mut edited = committed.clone();
        edited.details.insert("data_types", json!(["Public"]));
        storage.put_request(&edited).unwrap();
        let err = storage.commit_score(&request.details, &record).unwrap_err();
        assert!(matches!(err, Error::StaleRequest(_)));
        assert_eq!(storage.get_request(request.id).unwrap(), edited);
    }

    #[test]
    fn test_review_tasks_and_comments() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();

        let request = test_request();
        let other = test_request();
        storage.put_request(&request).unwrap();
        storage.put_request(&other).unwrap();

        let mut task = ReviewTask::new(request.id, "legal", None);
        let opened = storage.commit_review(&task, ReviewAction::Open).unwrap();
        assert_eq!(opened.status, RequestStatus::Reviewing);
        storage
            .commit_review(&ReviewTask::new(other.id, "arch", None), ReviewAction::Open)
            .unwrap();

        assert_eq!(storage.review_tasks(request.id).unwrap(), vec![task.clone()]);
        assert_eq!(storage.pending_review_tasks().unwrap().len(), 2);

        task.status = ReviewStatus::Approved;
        let approved = storage.commit_review(&task, ReviewAction::Approve).unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(storage.review_tasks(request.id).unwrap(), vec![task.clone()]);
        assert_eq!(storage.pending_review_tasks().unwrap().len(), 1);

        let comment = ReviewComment {
            id: Uuid::new_v4(),
            task_id: task.id,
            commenter_id: "rev-1".to_string(),
            section: "Data".to_string(),
            text: "Retention period?".to_string(),
            created_at: Utc::now(),
        };
        storage.put_comment(&comment).unwrap();
        assert_eq!(storage.comments_for(task.id).unwrap(), vec![comment]);
        assert!(storage.comments_for(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_commit_review_unknown_request() {
        let (config, _temp) = test_config();
        let storage = Storage::open(&config).unwrap();

        let task = ReviewTask::new(Uuid::new_v4(), "legal", None);
        let err = storage.commit_review(&task, ReviewAction::Open).unwrap_err();
        assert!(matches!(err, Error::RequestNotFound(_)));
        assert!(storage.pending_review_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let (config, _temp) = test_config();
        let request = test_request();

        {
            let storage = Storage::open(&config).unwrap();
            storage.put_request(&request).unwrap();
            storage.close().unwrap();
        }

        let storage = Storage::open(&config).unwrap();
        assert_eq!(storage.get_request(request.id).unwrap().title, "Invoice assistant");
    }
}
