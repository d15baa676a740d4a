use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::de::null_as_default;

/// What an activity log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    Assigned,
    StatusChanged,
    JoinedProject,
    LeftProject,
    SubscriptionChanged,
    /// Actions added server-side after this client was built.
    #[serde(other)]
    Other,
}

impl ActivityAction {
    pub fn label(self) -> &'static str {
        match self {
            ActivityAction::Created => "Created",
            ActivityAction::Updated => "Updated",
            ActivityAction::Deleted => "Deleted",
            ActivityAction::Assigned => "Assigned",
            ActivityAction::StatusChanged => "Status Changed",
            ActivityAction::JoinedProject => "Joined Project",
            ActivityAction::LeftProject => "Left Project",
            ActivityAction::SubscriptionChanged => "Subscription Changed",
            ActivityAction::Other => "Other",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    TaskAssigned,
    TaskStatusChanged,
    ProjectInvite,
    DeadlineReminder,
    SubscriptionExpired,
    SystemMessage,
    #[serde(other)]
    Other,
}

impl NotificationType {
    pub fn label(self) -> &'static str {
        match self {
            NotificationType::TaskAssigned => "Task Assigned",
            NotificationType::TaskStatusChanged => "Task Status Changed",
            NotificationType::ProjectInvite => "Project Invite",
            NotificationType::DeadlineReminder => "Deadline Reminder",
            NotificationType::SubscriptionExpired => "Subscription Expired",
            NotificationType::SystemMessage => "System Message",
            NotificationType::Other => "Other",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The record an entry points at: `{id, type, repr}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDetails {
    pub id: Id,
    /// Model name, e.g. `task` or `project`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display string of the target (task title, project name).
    #[serde(default)]
    pub repr: String,
}

impl fmt::Display for TargetDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} {}", self.kind, self.id, self.repr)
    }
}

/// An entry in the current user's activity history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Id,
    /// Acting user's email.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    pub action: ActivityAction,
    #[serde(default)]
    pub target_details: Option<TargetDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Id,
    pub notification_type: NotificationType,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub target_details: Option<TargetDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
