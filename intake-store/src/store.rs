//! Store interfaces and the in-memory store
//!
//! The scoring service only needs two capabilities: resolve a request by id
//! and atomically write a score record together with the request's
//! `risk_score`. The review desk additionally keeps review tasks and
//! comments. [`MemoryStore`] backs tests and ephemeral runs;
//! [`crate::storage::Storage`] persists to RocksDB.
//!
//! Commits never write back a caller's copy of a request. They re-read the
//! stored request inside the write and change only the fields they own, so
//! a concurrent edit through [`RequestStore::put_request`] is never lost.

use crate::review::{ReviewAction, ReviewComment, ReviewTask, ReviewStatus};
use crate::types::{IntakeRequest, ScoreRecord};
use crate::{Error, Result};
use parking_lot::RwLock;
use risk_engine::IntakeDetails;
use std::collections::HashMap;
use uuid::Uuid;

/// Intake request records
pub trait RequestStore: Send + Sync {
    /// Get request by ID
    fn get_request(&self, id: Uuid) -> Result<IntakeRequest>;

    /// Insert or replace a request
    fn put_request(&self, request: &IntakeRequest) -> Result<()>;

    /// All requests, oldest first
    fn list_requests(&self) -> Result<Vec<IntakeRequest>>;
}

/// Risk score records, one per request
pub trait ScoreStore: Send + Sync {
    /// Current score for a request, if computed
    fn get_score(&self, request_id: Uuid) -> Result<Option<ScoreRecord>>;

    /// Upsert the score record and set the request's `risk_score` in one
    /// atomic step, returning the request as stored
    ///
    /// Only `risk_score` and `updated_at` change on the request. Fails with
    /// [`Error::StaleRequest`] if the stored details no longer equal
    /// `scored`, the details the record was computed from.
    fn commit_score(&self, scored: &IntakeDetails, score: &ScoreRecord) -> Result<IntakeRequest>;
}

/// Review tasks and comments
pub trait ReviewStore: Send + Sync {
    /// Tasks of a request, oldest first
    fn review_tasks(&self, request_id: Uuid) -> Result<Vec<ReviewTask>>;

    /// Pending tasks across all requests, oldest first
    fn pending_review_tasks(&self) -> Result<Vec<ReviewTask>>;

    /// Upsert a task and apply the action's request status change in one
    /// atomic step, returning the request as stored
    ///
    /// Only `status` and `updated_at` change on the request. Fails with
    /// [`Error::RequestNotFound`] for an unknown request.
    fn commit_review(&self, task: &ReviewTask, action: ReviewAction) -> Result<IntakeRequest>;

    /// Store a comment
    fn put_comment(&self, comment: &ReviewComment) -> Result<()>;

    /// Comments on a task, oldest first
    fn comments_for(&self, task_id: Uuid) -> Result<Vec<ReviewComment>>;
}

/// Everything the scoring service needs
pub trait IntakeStore: RequestStore + ScoreStore {}

impl<T: RequestStore + ScoreStore> IntakeStore for T {}

/// Set the score summary on the stored request
pub(crate) fn apply_score(
    request: &mut IntakeRequest,
    scored: &IntakeDetails,
    score: &ScoreRecord,
) -> Result<()> {
    if request.details != *scored {
        return Err(Error::StaleRequest(request.id));
    }
    request.risk_score = Some(score.total_score);
    request.updated_at = score.updated_at;
    Ok(())
}

/// Apply a review action to the stored request, given all of its tasks
pub(crate) fn apply_review(
    request: &mut IntakeRequest,
    tasks: &[ReviewTask],
    task: &ReviewTask,
    action: ReviewAction,
) {
    if let Some(status) = action.request_status_after(tasks) {
        request.status = status;
        request.updated_at = task.updated_at;
    }
}

pub(crate) fn sort_tasks(tasks: &mut [ReviewTask]) {
    tasks.sort_by_key(|t| (t.created_at, t.id));
}

#[derive(Default)]
struct Tables {
    requests: HashMap<Uuid, IntakeRequest>,
    scores: HashMap<Uuid, ScoreRecord>,
    tasks: HashMap<Uuid, ReviewTask>,
    comments: HashMap<Uuid, ReviewComment>,
}

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of score records
    pub fn score_count(&self) -> usize {
        self.tables.read().scores.len()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("MemoryStore")
            .field("requests", &tables.requests.len())
            .field("scores", &tables.scores.len())
            .finish()
    }
}

impl RequestStore for MemoryStore {
    fn get_request(&self, id: Uuid) -> Result<IntakeRequest> {
        self.tables
            .read()
            .requests
            .get(&id)
            .cloned()
            .ok_or(Error::RequestNotFound(id))
    }

    fn put_request(&self, request: &IntakeRequest) -> Result<()> {
        self.tables
            .write()
            .requests
            .insert(request.id, request.clone());
        Ok(())
    }

    fn list_requests(&self) -> Result<Vec<IntakeRequest>> {
        let mut requests: Vec<_> = self.tables.read().requests.values().cloned().collect();
        requests.sort_by_key(|r| (r.created_at, r.id));
        Ok(requests)
    }
}

impl ScoreStore for MemoryStore {
    fn get_score(&self, request_id: Uuid) -> Result<Option<ScoreRecord>> {
        Ok(self.tables.read().scores.get(&request_id).cloned())
    }

    fn commit_score(&self, scored: &IntakeDetails, score: &ScoreRecord) -> Result<IntakeRequest> {
        // Both tables under one write lock
        let mut tables = self.tables.write();
        let request = tables
            .requests
            .get_mut(&score.request_id)
            .ok_or(Error::RequestNotFound(score.request_id))?;
        apply_score(request, scored, score)?;
        let request = request.clone();

        tables.scores.insert(score.request_id, score.clone());
        Ok(request)
    }
}

impl MemoryStore {
    fn tasks_matching(tables: &Tables, keep: impl Fn(&ReviewTask) -> bool) -> Vec<ReviewTask> {
        let mut tasks: Vec<_> = tables.tasks.values().filter(|t| keep(t)).cloned().collect();
        sort_tasks(&mut tasks);
        tasks
    }
}

impl ReviewStore for MemoryStore {
    fn review_tasks(&self, request_id: Uuid) -> Result<Vec<ReviewTask>> {
        let tables = self.tables.read();
        Ok(Self::tasks_matching(&tables, |t| t.request_id == request_id))
    }

    fn pending_review_tasks(&self) -> Result<Vec<ReviewTask>> {
        let tables = self.tables.read();
        Ok(Self::tasks_matching(&tables, |t| t.status == ReviewStatus::Pending))
    }

    fn commit_review(&self, task: &ReviewTask, action: ReviewAction) -> Result<IntakeRequest> {
        let mut tables = self.tables.write();
        if !tables.requests.contains_key(&task.request_id) {
            return Err(Error::RequestNotFound(task.request_id));
        }

        tables.tasks.insert(task.id, task.clone());
        let tasks = Self::tasks_matching(&tables, |t| t.request_id == task.request_id);

        let request = tables
            .requests
            .get_mut(&task.request_id)
            .ok_or(Error::RequestNotFound(task.request_id))?;
        apply_review(request, &tasks, task, action);
        Ok(request.clone())
    }

    fn put_comment(&self, comment: &ReviewComment) -> Result<()> {
        self.tables.write().comments.insert(comment.id, comment.clone());
        Ok(())
    }

    fn comments_for(&self, task_id: Uuid) -> Result<Vec<ReviewComment>> {
        let mut comments: Vec<_> = self
            .tables
            .read()
            .comments
            .values()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }
}
