//! Intake Store
//!
//! Persistence and orchestration around the risk engine: intake request
//! records, per-request score records, the service that computes a score
//! and commits it atomically with the request's summary field, and the
//! review desk that moves requests through team reviews.
//!
//! # Architecture
//!
//! - **Pure engine**: [`risk_engine::RiskScoringEngine`] never touches storage
//! - **Create-or-update**: one score record per request, overwritten on recompute
//! - **Atomic commit**: request summary and score written in one batch, never
//!   overwriting other fields of the request
//! - **Per-request serialization**: concurrent recomputes of one request queue up
//!
//! # Example
//!
//! ```no_run
//! use intake_store::{IntakeRequest, MemoryStore, RequestStore, ScoringService};
//! use risk_engine::{IntakeDetails, RiskScoringEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> intake_store::Result<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let request = IntakeRequest::new("Support bot", "", "user-1", IntakeDetails::new());
//!     store.put_request(&request)?;
//!
//!     let service = ScoringService::new(RiskScoringEngine::default(), store)?;
//!     let record = service.compute(request.id).await?;
//!     println!("total risk: {}", record.total_score);
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod review;
pub mod service;
pub mod storage;
pub mod store;
pub mod types;

// Re-exports
pub use config::{Config, StoreBackend};
pub use error::{Error, Result};
pub use review::{
    ReviewAction, ReviewComment, ReviewDecision, ReviewDesk, ReviewOutcome, ReviewStatus, ReviewTask,
};
pub use service::ScoringService;
pub use storage::Storage;
pub use store::{IntakeStore, MemoryStore, RequestStore, ReviewStore, ScoreStore};
pub use types::{IntakeRequest, IntakeSubmission, RequestStatus, ScoreRecord};
