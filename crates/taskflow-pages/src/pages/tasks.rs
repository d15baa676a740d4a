//! Tasks page: all tasks (optionally filtered by project), project options
//! for the create form, and status changes.

use taskflow_types::{Id, Project, Task, TaskStatus};
use tracing::debug;

use crate::common::{TaskSeq, TaskState};
use crate::effects::{Effect, Outcome};
use crate::forms::{FieldErrors, TaskForm};
use crate::state::{Component, LoadState, describe};

#[derive(Debug, Clone, PartialEq)]
pub enum TasksAction {
    Reload,
    /// Re-fetch with a different project filter.
    Filter(Option<Id>),
    SubmitTask,
    ChangeStatus(Id, TaskStatus),
    ToggleStatus(Id),
}

#[derive(Debug, Default)]
struct Running {
    list: TaskState,
    create: TaskState,
    status: TaskState,
}

#[derive(Debug, Default)]
pub struct TasksPage {
    pub load: LoadState,
    pub filter: Option<Id>,
    pub tasks: Vec<Task>,
    /// Options for the form's project selector.
    pub projects: Vec<Project>,
    pub form: TaskForm,
    pub form_errors: FieldErrors,
    pub banner: Option<String>,
    seq: TaskSeq,
    running: Running,
}

impl TasksPage {
    pub fn new(filter: Option<Id>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Loaded, but nothing matched.
    pub fn is_empty(&self) -> bool {
        self.load == LoadState::Ready && self.tasks.is_empty()
    }

    pub fn project_name(&self, id: Id) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    fn fetch(&mut self) -> Vec<Effect> {
        self.load = LoadState::Loading;
        let task = self.running.list.start(&mut self.seq);
        vec![Effect::FetchTasksPage {
            task,
            project: self.filter,
        }]
    }

    fn change_status(&mut self, id: Id, status: TaskStatus) -> Vec<Effect> {
        if !self.tasks.iter().any(|t| t.id == id) {
            return Vec::new();
        }
        self.banner = None;
        let task = self.running.status.start(&mut self.seq);
        vec![Effect::UpdateTaskStatus { task, id, status }]
    }
}

impl Component for TasksPage {
    type Action = TasksAction;

    fn mount(&mut self) -> Vec<Effect> {
        self.fetch()
    }

    fn update(&mut self, action: TasksAction) -> Vec<Effect> {
        match action {
            TasksAction::Reload => self.fetch(),
            TasksAction::Filter(filter) => {
                self.filter = filter;
                self.fetch()
            }
            TasksAction::SubmitTask => match self.form.validate() {
                Ok(data) => {
                    self.form_errors = FieldErrors::default();
                    self.banner = None;
                    let task = self.running.create.start(&mut self.seq);
                    vec![Effect::CreateTask { task, data }]
                }
                Err(errors) => {
                    self.form_errors = errors;
                    Vec::new()
                }
            },
            TasksAction::ChangeStatus(id, status) => self.change_status(id, status),
            TasksAction::ToggleStatus(id) => {
                let Some(status) = self
                    .tasks
                    .iter()
                    .find(|t| t.id == id)
                    .map(|t| t.status.toggled())
                else {
                    return Vec::new();
                };
                self.change_status(id, status)
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::TasksPageLoaded { task, result } => {
                if !self.running.list.finish_if_active(task) {
                    return Vec::new();
                }
                match result {
                    Ok(overview) => {
                        self.tasks = overview.tasks.results;
                        self.projects = overview.projects.results;
                        self.load = LoadState::Ready;
                    }
                    Err(e) => self.load = LoadState::Failed(describe(&e, "Failed to fetch data")),
                }
            }
            Outcome::TaskSaved { task, result } if self.running.create.finish_if_active(task) => {
                match result {
                    Ok(created) => {
                        self.tasks.push(created);
                        self.form = TaskForm::default();
                    }
                    Err(e) => {
                        self.form_errors = FieldErrors::from_api(&e);
                        self.banner = Some(describe(&e, "Failed to create task"));
                    }
                }
            }
            Outcome::TaskSaved { task, result } if self.running.status.finish_if_active(task) => {
                match result {
                    Ok(updated) => {
                        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
                            *slot = updated;
                        }
                    }
                    Err(e) => self.banner = Some(describe(&e, "Failed to update task status")),
                }
            }
            other => debug!(?other, "Outcome dropped by tasks page"),
        }
        Vec::new()
    }

    fn unmount(&mut self) {
        self.running.list.clear();
        self.running.create.clear();
        self.running.status.clear();
    }
}
