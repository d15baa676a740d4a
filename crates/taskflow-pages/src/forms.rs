//! Local form state with presence-only validation.
//!
//! A form that fails validation produces [`FieldErrors`] and no request.

use std::collections::BTreeMap;

use taskflow_core::ApiError;
use taskflow_types::{
    CreateProjectData, CreateTaskData, Id, Project, RegisterData, TaskPriority, TaskStatus,
};

/// Field name -> message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Records `message` when `value` is blank.
    fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }

    /// Server-side validation messages, first message per field.
    pub fn from_api(err: &ApiError) -> Self {
        let mut errors = Self::default();
        for (field, messages) in &err.field_errors {
            if let Some(first) = messages.first() {
                errors.insert(field.clone(), first.clone());
            }
        }
        errors
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    /// `YYYY-MM-DDTHH:MM` as entered; blank means no deadline.
    pub deadline: String,
}

impl ProjectForm {
    /// Prefills the form for a full-replace update.
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            deadline: project
                .deadline
                .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<CreateProjectData, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name, "Name is required");
        errors.into_result(CreateProjectData {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            deadline: optional(&self.deadline),
            members: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: String,
    pub project: Option<Id>,
    pub assignee: Option<Id>,
}

impl TaskForm {
    /// Empty form bound to `project`.
    pub fn for_project(project: Id) -> Self {
        Self {
            project: Some(project),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<CreateTaskData, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("title", &self.title, "Title is required");
        if self.project.is_none() {
            errors.insert("project", "Project is required");
        }
        errors.into_result(CreateTaskData {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status: Some(self.status),
            priority: Some(self.priority),
            deadline: optional(&self.deadline),
            project: self.project.unwrap_or_default(),
            assignee: self.assignee,
            dependencies: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("email", &self.email, "Email is required");
        errors.require("password", &self.password, "Password is required");
        errors.into_result((self.email.trim().to_string(), self.password.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterForm {
    /// Password equality is left to the server.
    pub fn validate(&self) -> Result<RegisterData, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("email", &self.email, "Email is required");
        errors.require("username", &self.username, "Username is required");
        errors.require("password", &self.password, "Password is required");
        errors.require(
            "password_confirm",
            &self.password_confirm,
            "Please confirm your password",
        );
        errors.into_result(RegisterData {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        })
    }
}
