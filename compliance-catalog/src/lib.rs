//! Compliance checklist catalog
//!
//! Static per-framework review questions and per-request checklists that
//! reviewers fill in. Independent of risk scoring.

pub mod catalog;
pub mod checklist;
pub mod error;

pub use catalog::{all_frameworks, checklist_for, framework_from_id, CategoryTemplate, FrameworkInfo};
pub use checklist::{Checklist, ChecklistItem};
pub use error::{CatalogError, Result};
pub use risk_engine::Framework;
