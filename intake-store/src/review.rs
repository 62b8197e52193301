//! Review workflow
//!
//! Each reviewing team (cybersecurity, legal, compliance, architecture)
//! holds one task per request. Task decisions drive the request status:
//!
//! - Opening a task moves the request to `reviewing`
//! - A rejection denies the request
//! - The request is approved once every one of its tasks is approved
//! - Asking for more information leaves the request status alone
//!
//! The task write and the status change land in one atomic store write
//! ([`ReviewStore::commit_review`]), which touches nothing on the request
//! but `status` and `updated_at`.

use crate::store::{RequestStore, ReviewStore};
use crate::types::RequestStatus;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// State of one team's review
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    /// Awaiting the reviewer
    #[default]
    Pending,
    /// Reviewer asked the requestor for more information
    NeedsInfo,
    /// Approved by the team
    Approved,
    /// Rejected by the team
    Rejected,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::NeedsInfo => "needs-info",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// One team's review of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTask {
    /// Task ID
    pub id: Uuid,

    /// Reviewed request
    pub request_id: Uuid,

    /// Reviewing team
    pub team: String,

    /// Reviewer of the latest decision
    pub reviewer_id: Option<String>,

    /// Review state
    pub status: ReviewStatus,

    /// Reviewer's note on the latest decision
    pub comments: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last decision time
    pub updated_at: DateTime<Utc>,
}

impl ReviewTask {
    /// New pending task
    pub fn new(request_id: Uuid, team: impl Into<String>, reviewer_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            request_id,
            team: team.into(),
            reviewer_id,
            status: ReviewStatus::Pending,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Reviewer comment on a task section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Comment ID
    pub id: Uuid,

    /// Commented task
    pub task_id: Uuid,

    /// Author
    pub commenter_id: String,

    /// Section of the request the comment refers to
    pub section: String,

    /// Comment text
    pub text: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// What a reviewer did to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Task opened for a team
    Open,
    /// Team approved
    Approve,
    /// Team rejected
    Reject,
    /// Team needs more information
    RequestInfo,
}

impl ReviewAction {
    /// Task status after the action
    pub fn task_status(self) -> ReviewStatus {
        match self {
            ReviewAction::Open => ReviewStatus::Pending,
            ReviewAction::Approve => ReviewStatus::Approved,
            ReviewAction::Reject => ReviewStatus::Rejected,
            ReviewAction::RequestInfo => ReviewStatus::NeedsInfo,
        }
    }

    /// Request status after the action, given every task of the request
    /// (including the one just decided); `None` leaves it unchanged
    pub fn request_status_after(self, tasks: &[ReviewTask]) -> Option<RequestStatus> {
        match self {
            ReviewAction::Open => Some(RequestStatus::Reviewing),
            ReviewAction::Approve => tasks
                .iter()
                .all(|task| task.status == ReviewStatus::Approved)
                .then_some(RequestStatus::Approved),
            ReviewAction::Reject => Some(RequestStatus::Denied),
            ReviewAction::RequestInfo => None,
        }
    }
}

/// A team's decision on a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    /// Deciding reviewer
    pub reviewer_id: String,

    /// Reviewing team
    pub team: String,

    /// Note attached to the decision
    #[serde(default)]
    pub comments: Option<String>,
}

impl ReviewDecision {
    /// Decision without a note
    pub fn new(reviewer_id: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            reviewer_id: reviewer_id.into(),
            team: team.into(),
            comments: None,
        }
    }

    /// Attach a note
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Result of a recorded decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Task as stored
    pub task: ReviewTask,

    /// Request status after the decision
    pub request_status: RequestStatus,
}

/// Records review tasks, decisions and comments
pub struct ReviewDesk<S> {
    store: Arc<S>,
    // Find-or-create of a team's task must not interleave
    decisions: Mutex<()>,
}

impl<S: RequestStore + ReviewStore> ReviewDesk<S> {
    /// Create desk over a store
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            decisions: Mutex::new(()),
        }
    }

    /// Open a pending task for a team; the request moves to `reviewing`
    ///
    /// Fails with [`Error::RequestNotFound`] for an unknown request.
    pub fn open_task(
        &self,
        request_id: Uuid,
        team: impl Into<String>,
        reviewer_id: Option<String>,
    ) -> Result<ReviewOutcome> {
        let _guard = self.decisions.lock();

        let task = ReviewTask::new(request_id, team, reviewer_id);
        let request = self.store.commit_review(&task, ReviewAction::Open)?;

        tracing::info!(
            %request_id,
            task_id = %task.id,
            team = %task.team,
            "Review task opened"
        );

        Ok(ReviewOutcome {
            task,
            request_status: request.status,
        })
    }

    /// Approve for the decision's team
    pub fn approve(&self, request_id: Uuid, decision: &ReviewDecision) -> Result<ReviewOutcome> {
        self.decide(request_id, decision, ReviewAction::Approve)
    }

    /// Reject for the decision's team; the request is denied
    pub fn reject(&self, request_id: Uuid, decision: &ReviewDecision) -> Result<ReviewOutcome> {
        self.decide(request_id, decision, ReviewAction::Reject)
    }

    /// Ask the requestor for more information
    pub fn request_info(
        &self,
        request_id: Uuid,
        decision: &ReviewDecision,
    ) -> Result<ReviewOutcome> {
        self.decide(request_id, decision, ReviewAction::RequestInfo)
    }

    /// Comment on the request's first review task
    ///
    /// Fails with [`Error::ReviewTaskNotFound`] if no task was opened yet.
    pub fn add_comment(
        &self,
        request_id: Uuid,
        commenter_id: impl Into<String>,
        section: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<ReviewComment> {
        let task = self
            .store
            .review_tasks(request_id)?
            .into_iter()
            .next()
            .ok_or(Error::ReviewTaskNotFound(request_id))?;

        let comment = ReviewComment {
            id: Uuid::new_v4(),
            task_id: task.id,
            commenter_id: commenter_id.into(),
            section: section.into(),
            text: text.into(),
            created_at: Utc::now(),
        };
        self.store.put_comment(&comment)?;

        tracing::debug!(%request_id, task_id = %task.id, "Review comment added");
        Ok(comment)
    }

    /// Tasks of a request, oldest first
    pub fn tasks(&self, request_id: Uuid) -> Result<Vec<ReviewTask>> {
        self.store.review_tasks(request_id)
    }

    /// Pending tasks across all requests
    pub fn pending_tasks(&self) -> Result<Vec<ReviewTask>> {
        self.store.pending_review_tasks()
    }

    /// Comments on a task, oldest first
    pub fn comments(&self, task_id: Uuid) -> Result<Vec<ReviewComment>> {
        self.store.comments_for(task_id)
    }

    fn decide(
        &self,
        request_id: Uuid,
        decision: &ReviewDecision,
        action: ReviewAction,
    ) -> Result<ReviewOutcome> {
        let _guard = self.decisions.lock();

        let existing = self
            .store
            .review_tasks(request_id)?
            .into_iter()
            .find(|task| task.team == decision.team);

        // A decision from a team without a task opens one
        let mut task = existing
            .unwrap_or_else(|| ReviewTask::new(request_id, decision.team.clone(), None));
        task.status = action.task_status();
        task.reviewer_id = Some(decision.reviewer_id.clone());
        task.comments = decision.comments.clone();
        task.updated_at = Utc::now();

        let request = self.store.commit_review(&task, action)?;

        tracing::info!(
            %request_id,
            task_id = %task.id,
            team = %task.team,
            task_status = %task.status,
            request_status = %request.status,
            "Review decision recorded"
        );

        Ok(ReviewOutcome {
            task,
            request_status: request.status,
        })
    }
}

impl<S> fmt::Debug for ReviewDesk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewDesk").finish_non_exhaustive()
    }
}
