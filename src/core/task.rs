use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::AsDay;
use crate::error::PlannerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created: NaiveDateTime,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
            due_date: None,
            notes: None,
            created: chrono::Local::now().naive_local(),
        }
    }

    pub fn toggle(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        self.is_completed
    }

    /// Open and due before `today`.
    pub fn is_overdue(&self, today: impl AsDay) -> bool {
        let today = today.as_day();
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn is_due_on(&self, day: impl AsDay) -> bool {
        self.due_date == Some(day.as_day())
    }
}

/// In-memory task list. Order is insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed).count()
    }

    /// Tasks due on `day`, in list order.
    pub fn due_on(&self, day: impl AsDay) -> Vec<&Task> {
        let day = day.as_day();
        self.tasks.iter().filter(|t| t.is_due_on(day)).collect()
    }

    pub fn add_task(
        &mut self,
        title: &str,
        due_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<&Task, PlannerError> {
        let title = title.trim();
        if title.is_empty() {
            log::warn!("Rejected task with empty title");
            return Err(PlannerError::InvalidArgument("task title is empty".into()));
        }

        let mut task = Task::new(title);
        task.due_date = due_date;
        task.notes = notes.filter(|n| !n.trim().is_empty());
        log::debug!("Added task {} ({:?})", task.id, task.title);

        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flip completion of the task. Returns the new state.
    pub fn toggle_completion(&mut self, id: Uuid) -> Result<bool, PlannerError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| PlannerError::task_not_found(id))?;
        let completed = task.toggle();
        log::debug!("Task {}: completed={}", id, completed);
        Ok(completed)
    }

    /// Remove every task whose position before this call is in `positions`.
    ///
    /// Positions all refer to the list as it was on entry, so `{1, 3}` on
    /// `[A, B, C, D]` leaves `[A, C]`. Any position past the end rejects the
    /// whole call. Returns the removed tasks in list order.
    pub fn delete_tasks(&mut self, positions: &BTreeSet<usize>) -> Result<Vec<Task>, PlannerError> {
        if let Some(&last) = positions.last() {
            if last >= self.tasks.len() {
                log::warn!(
                    "Rejected task deletion at position {} of {}",
                    last,
                    self.tasks.len()
                );
                return Err(PlannerError::InvalidArgument(format!(
                    "position {} is out of range for {} tasks",
                    last,
                    self.tasks.len()
                )));
            }
        }

        let (removed, kept): (Vec<(usize, Task)>, Vec<(usize, Task)>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .enumerate()
            .partition(|(pos, _)| positions.contains(pos));

        self.tasks = kept.into_iter().map(|(_, t)| t).collect();
        log::debug!("Deleted {} tasks", removed.len());
        Ok(removed.into_iter().map(|(_, t)| t).collect())
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<Task, PlannerError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| PlannerError::task_not_found(id))?;
        log::debug!("Deleted task {}", id);
        Ok(self.tasks.remove(pos))
    }
}
