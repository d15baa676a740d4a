use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::de::null_as_default;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Review,
            TaskStatus::Completed,
        ]
    }

    /// Wire name (`in_progress`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn is_completed(self) -> bool {
        self == TaskStatus::Completed
    }

    /// Checkbox semantics: completed goes back to todo, everything else completes.
    pub fn toggled(self) -> TaskStatus {
        if self.is_completed() {
            TaskStatus::Todo
        } else {
            TaskStatus::Completed
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        TaskStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown status '{s}' (expected todo, in_progress, review or completed)")
            })
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn all() -> &'static [TaskPriority] {
        &[
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Urgent,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TaskPriority::all()
            .iter()
            .copied()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| format!("unknown priority '{s}' (expected low, medium, high or urgent)"))
    }
}

/// Embedded assignee summary on task detail responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Embedded project summary on task detail responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub owner: String,
}

/// A related record as the backend renders it.
///
/// Detail responses carry the id; list rows carry the record's display
/// string instead (project name, user email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related {
    Id(Id),
    Name(String),
}

impl Related {
    pub fn id(&self) -> Option<Id> {
        match self {
            Related::Id(id) => Some(*id),
            Related::Name(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Related::Id(_) => None,
            Related::Name(name) => Some(name),
        }
    }
}

impl From<Id> for Related {
    fn from(id: Id) -> Self {
        Related::Id(id)
    }
}

impl fmt::Display for Related {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Related::Id(id) => write!(f, "{id}"),
            Related::Name(name) => f.write_str(name),
        }
    }
}

/// A task as returned by the API.
///
/// Covers both the detail shape and the lighter list-row shape, which
/// drops `description` and `dependencies` and adds `dependencies_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Owning project.
    pub project: Related,
    #[serde(default)]
    pub assignee: Option<Related>,
    /// Ids of tasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies_count: Option<usize>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_details: Option<UserSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_details: Option<ProjectSummary>,
}

impl Task {
    pub fn project_id(&self) -> Option<Id> {
        self.project_details
            .as_ref()
            .map(|p| p.id)
            .or_else(|| self.project.id())
    }

    pub fn assignee_id(&self) -> Option<Id> {
        self.assignee_details
            .as_ref()
            .map(|u| u.id)
            .or_else(|| self.assignee.as_ref().and_then(Related::id))
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies_count.unwrap_or(self.dependencies.len())
    }
}

/// Task action responses (`status`, `assign`) wrap the record as
/// `{message, task}`; some deployments return the bare record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TaskEnvelope {
    Wrapped {
        #[serde(default)]
        message: Option<String>,
        task: Task,
    },
    Bare(Task),
}

impl TaskEnvelope {
    pub fn into_task(self) -> Task {
        match self {
            TaskEnvelope::Wrapped { task, .. } | TaskEnvelope::Bare(task) => task,
        }
    }
}

/// Body of task create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskData {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub project: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Id>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub user_id: Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRequest {
    pub dependency_id: Id,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_json(status: &str) -> String {
        format!(
            r#"{{"id": 1, "title": "Write docs", "description": "", "status": "{status}",
                "priority": "high", "project": 5, "dependencies": [2, 3]}}"#
        )
    }

    #[test]
    fn test_status_toggle_round_trip() {
        for status in TaskStatus::all() {
            let twice = status.toggled().toggled();
            if *status == TaskStatus::Completed || *status == TaskStatus::Todo {
                assert_eq!(twice, *status);
            } else {
                // In-flight statuses complete, then reopen as todo.
                assert_eq!(twice, TaskStatus::Todo);
            }
        }
    }

    #[test]
    fn test_status_from_str_accepts_variants() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_parses_wire_names() {
        let task: Task = serde_json::from_str(&task_json("in_progress")).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.project, Related::Id(5));
        assert_eq!(task.project_id(), Some(5));
        assert_eq!(task.dependencies, vec![2, 3]);
        assert_eq!(task.dependency_count(), 2);
        assert!(task.assignee.is_none());
    }

    #[test]
    fn test_task_parses_list_row() {
        let task: Task = serde_json::from_str(
            r#"{"id": 4, "title": "Ship", "status": "todo", "priority": "urgent",
                "deadline": null, "project": "Website", "assignee": "dev@b.com",
                "dependencies_count": 3, "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.project.name(), Some("Website"));
        assert_eq!(task.project_id(), None);
        assert_eq!(task.assignee, Some(Related::Name("dev@b.com".to_string())));
        assert_eq!(task.assignee_id(), None);
        assert_eq!(task.dependency_count(), 3);
        assert!(task.description.is_empty());
    }

    #[test]
    fn test_envelope_accepts_wrapped_and_bare() {
        let wrapped = format!(
            r#"{{"message": "Task status updated to review", "task": {}}}"#,
            task_json("review")
        );
        let task = serde_json::from_str::<TaskEnvelope>(&wrapped)
            .unwrap()
            .into_task();
        assert_eq!(task.status, TaskStatus::Review);

        let bare = serde_json::from_str::<TaskEnvelope>(&task_json("todo"))
            .unwrap()
            .into_task();
        assert_eq!(bare.status, TaskStatus::Todo);
    }

    #[test]
    fn test_status_request_uses_wire_name() {
        let body = serde_json::to_string(&StatusRequest {
            status: TaskStatus::InProgress,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"in_progress"}"#);
    }
}
