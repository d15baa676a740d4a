use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::de::null_as_default;

/// A project as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Owner email.
    #[serde(default)]
    pub owner: String,
    /// Member user ids.
    #[serde(default)]
    pub members: Vec<Id>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Server-computed completion ratio (0-100). Read-only.
    #[serde(default)]
    pub progress_percentage: f64,
}

/// Body of project create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectData {
    pub name: String,
    pub description: String,
    /// Raw deadline as entered (`YYYY-MM-DDTHH:MM`, optionally with offset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Id>>,
}

/// Body of the add/remove member actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRequest {
    pub user_id: Id,
}
