use crate::catalog::checklist_for;
use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use risk_engine::Framework;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: String,
    pub question: String,
    pub answer: Option<String>,
    pub notes: Option<String>,
}

/// One framework's review questions for one intake request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: Uuid,
    pub request_id: Uuid,
    pub framework: Framework,
    pub items: Vec<ChecklistItem>,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checklist {
    /// Blank checklist seeded from the catalog
    pub fn new(request_id: Uuid, framework: Framework) -> Self {
        let items = checklist_for(framework)
            .iter()
            .flat_map(|template| {
                template.questions.iter().map(move |question| ChecklistItem {
                    category: template.category.to_string(),
                    question: question.to_string(),
                    answer: None,
                    notes: None,
                })
            })
            .collect();

        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            request_id,
            framework,
            items,
            completed: false,
            completed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn answer(
        &mut self,
        index: usize,
        answer: impl Into<String>,
        notes: Option<String>,
    ) -> Result<()> {
        if let Some(by) = &self.completed_by {
            return Err(CatalogError::AlreadyCompleted(by.clone()));
        }

        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CatalogError::QuestionOutOfRange { index, len })?;

        item.answer = Some(answer.into());
        item.notes = notes;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn unanswered(&self) -> usize {
        self.items.iter().filter(|item| item.answer.is_none()).count()
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.items.len() - self.unanswered(), self.items.len())
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Sign off; every question must be answered
    pub fn complete(&mut self, completed_by: impl Into<String>) -> Result<()> {
        if let Some(by) = &self.completed_by {
            return Err(CatalogError::AlreadyCompleted(by.clone()));
        }

        let remaining = self.unanswered();
        if remaining > 0 {
            return Err(CatalogError::Incomplete(remaining));
        }

        let completed_by = completed_by.into();
        info!(
            checklist_id = %self.id,
            request_id = %self.request_id,
            framework = %self.framework,
            completed_by = %completed_by,
            "Checklist completed"
        );

        self.completed = true;
        self.completed_by = Some(completed_by);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checklist_from_catalog() {
        let checklist = Checklist::new(Uuid::new_v4(), Framework::Sox);
        assert_eq!(checklist.items.len(), 15);
        assert_eq!(checklist.items[0].category, "Internal Controls");
        assert_eq!(checklist.progress(), (0, 15));
        assert!(!checklist.is_complete());
    }

    #[test]
    fn test_answer_and_complete() {
        let mut checklist = Checklist::new(Uuid::new_v4(), Framework::Maestro);
        assert_eq!(checklist.complete("reviewer-1"), Err(CatalogError::Incomplete(15)));

        for index in 0..checklist.items.len() {
            checklist.answer(index, "Yes", None).unwrap();
        }
        checklist.answer(3, "No", Some("Bias review scheduled".to_string())).unwrap();
        assert_eq!(checklist.progress(), (15, 15));

        checklist.complete("reviewer-1").unwrap();
        assert!(checklist.is_complete());
        assert_eq!(checklist.completed_by.as_deref(), Some("reviewer-1"));
        assert_eq!(
            checklist.answer(0, "No", None),
            Err(CatalogError::AlreadyCompleted("reviewer-1".to_string()))
        );
    }

    #[test]
    fn test_answer_out_of_range() {
        let mut checklist = Checklist::new(Uuid::new_v4(), Framework::Nist);
        assert_eq!(
            checklist.answer(20, "Yes", None),
            Err(CatalogError::QuestionOutOfRange { index: 20, len: 20 })
        );
    }
}
