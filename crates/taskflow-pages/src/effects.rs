//! Page effect and outcome types.
//!
//! Effects are commands returned by page reducers that the runtime executes.
//! They represent I/O only; the runtime answers each one with exactly one
//! [`Outcome`] carrying the same task id.

use taskflow_core::ApiResult;
use taskflow_types::{
    CreateProjectData, CreateTaskData, Id, Page, Project, RegisterData, Task, TaskStatus, User,
};

use crate::common::TaskId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchProjects {
        task: TaskId,
    },
    /// Project record plus its tasks (`?project=<id>`).
    FetchProjectDetail {
        task: TaskId,
        project: Id,
    },
    /// Task list (optionally filtered) plus project options for the form.
    FetchTasksPage {
        task: TaskId,
        project: Option<Id>,
    },
    CreateProject {
        task: TaskId,
        data: CreateProjectData,
    },
    UpdateProject {
        task: TaskId,
        id: Id,
        data: CreateProjectData,
    },
    DeleteProject {
        task: TaskId,
        id: Id,
    },
    CreateTask {
        task: TaskId,
        data: CreateTaskData,
    },
    UpdateTaskStatus {
        task: TaskId,
        id: Id,
        status: TaskStatus,
    },
    Login {
        task: TaskId,
        email: String,
        password: String,
    },
    Register {
        task: TaskId,
        data: RegisterData,
    },
}

impl Effect {
    pub fn task(&self) -> TaskId {
        match self {
            Effect::FetchProjects { task }
            | Effect::FetchProjectDetail { task, .. }
            | Effect::FetchTasksPage { task, .. }
            | Effect::CreateProject { task, .. }
            | Effect::UpdateProject { task, .. }
            | Effect::DeleteProject { task, .. }
            | Effect::CreateTask { task, .. }
            | Effect::UpdateTaskStatus { task, .. }
            | Effect::Login { task, .. }
            | Effect::Register { task, .. } => *task,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetail {
    pub project: Project,
    pub tasks: Page<Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TasksOverview {
    pub tasks: Page<Task>,
    pub projects: Page<Project>,
}

/// Result of an executed effect.
#[derive(Debug, Clone)]
pub enum Outcome {
    ProjectsLoaded {
        task: TaskId,
        result: ApiResult<Page<Project>>,
    },
    ProjectDetailLoaded {
        task: TaskId,
        result: ApiResult<ProjectDetail>,
    },
    TasksPageLoaded {
        task: TaskId,
        result: ApiResult<TasksOverview>,
    },
    ProjectSaved {
        task: TaskId,
        result: ApiResult<Project>,
    },
    ProjectDeleted {
        task: TaskId,
        id: Id,
        result: ApiResult<()>,
    },
    TaskSaved {
        task: TaskId,
        result: ApiResult<Task>,
    },
    Authenticated {
        task: TaskId,
        result: ApiResult<User>,
    },
}
