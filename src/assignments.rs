//! Assignment builder - In-memory homework assignments for the 3D homework creator.
//!
//! Nothing here is persisted. Assignments are append-only for the life of the board,
//! newest first, and the most recently created one becomes the selection.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::info;

/// A created assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Unique within the board, increasing with creation time
    pub id: i64,
    /// Assignment title
    pub title: String,
    /// School subject
    pub subject: String,
    /// Optional extra instructions, may be empty
    pub description: String,
    /// Non-empty tasks in the order they were written
    pub tasks: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// The assignment form as the user is filling it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    /// Title field
    pub title: String,
    /// Subject field
    pub subject: String,
    /// Description field
    pub description: String,
    tasks: Vec<String>,
}

impl Default for AssignmentDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            description: String::new(),
            tasks: vec![String::new()],
        }
    }
}

impl AssignmentDraft {
    /// Builds a draft from field values
    pub fn new(
        title: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        tasks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut tasks: Vec<String> = tasks.into_iter().map(Into::into).collect();
        if tasks.is_empty() {
            tasks.push(String::new());
        }
        Self {
            title: title.into(),
            subject: subject.into(),
            description: description.into(),
            tasks,
        }
    }

    /// Task rows, including blank ones
    #[must_use]
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Appends a blank task row
    pub fn add_task(&mut self) {
        self.tasks.push(String::new());
    }

    /// Removes a task row. The last remaining row stays.
    pub fn remove_task(&mut self, index: usize) -> bool {
        if self.tasks.len() <= 1 || index >= self.tasks.len() {
            return false;
        }
        self.tasks.remove(index);
        true
    }

    /// Replaces the text of a task row
    pub fn update_task(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.tasks.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }
}

/// Created assignments plus the current selection
#[derive(Debug, Default)]
pub struct AssignmentBoard {
    assignments: Vec<Assignment>,
    selected: Option<i64>,
    last_id: i64,
}

impl AssignmentBoard {
    /// Validates a draft and adds it to the front of the board, selecting it.
    ///
    /// # Errors
    /// `Validation` if the title or subject is blank, or if every task row is blank.
    /// The board is unchanged on error.
    pub fn create(&mut self, draft: &AssignmentDraft) -> Result<&Assignment> {
        let title = draft.title.trim();
        let subject = draft.subject.trim();
        if title.is_empty() || subject.is_empty() {
            return Err(Error::Validation {
                message: "Please fill in title and subject".to_string(),
            });
        }

        let tasks: Vec<String> = draft
            .tasks
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();
        if tasks.is_empty() {
            return Err(Error::Validation {
                message: "Please add at least one task".to_string(),
            });
        }

        let created_at = Utc::now();
        let id = created_at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        self.assignments.insert(
            0,
            Assignment {
                id,
                title: title.to_string(),
                subject: subject.to_string(),
                description: draft.description.clone(),
                tasks,
                created_at,
            },
        );
        self.selected = Some(id);
        info!("Created assignment {} '{}'", id, title);
        Ok(&self.assignments[0])
    }

    /// Creates from a draft and hands back a fresh draft for the next entry.
    ///
    /// On error the original draft is returned untouched alongside the error.
    pub fn submit(&mut self, draft: AssignmentDraft) -> (AssignmentDraft, Result<i64>) {
        match self.create(&draft).map(|a| a.id) {
            Ok(id) => (AssignmentDraft::default(), Ok(id)),
            Err(e) => (draft, Err(e)),
        }
    }

    /// All assignments, newest first
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// The selected assignment, if any
    #[must_use]
    pub fn selected(&self) -> Option<&Assignment> {
        let id = self.selected?;
        self.assignments.iter().find(|a| a.id == id)
    }

    /// Selects an existing assignment. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: i64) -> bool {
        if self.assignments.iter().any(|a| a.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }
}
