//! Project detail page: the project, its tasks and a task form bound to it.

use taskflow_types::{Id, Project, Task, TaskStatus};
use tracing::debug;

use crate::common::{TaskSeq, TaskState};
use crate::effects::{Effect, Outcome};
use crate::forms::{FieldErrors, TaskForm};
use crate::state::{Component, LoadState, describe};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectDetailAction {
    Reload,
    SubmitTask,
    /// `completed` -> `todo`, anything else -> `completed`.
    ToggleStatus(Id),
}

#[derive(Debug, Default)]
struct Tasks {
    detail: TaskState,
    create: TaskState,
    status: TaskState,
}

#[derive(Debug)]
pub struct ProjectDetailPage {
    pub project_id: Id,
    pub load: LoadState,
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
    pub form: TaskForm,
    pub form_errors: FieldErrors,
    pub banner: Option<String>,
    seq: TaskSeq,
    running: Tasks,
}

impl ProjectDetailPage {
    pub fn new(project_id: Id) -> Self {
        Self {
            project_id,
            load: LoadState::Idle,
            project: None,
            tasks: Vec::new(),
            form: TaskForm::for_project(project_id),
            form_errors: FieldErrors::default(),
            banner: None,
            seq: TaskSeq::default(),
            running: Tasks::default(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    pub fn remaining_count(&self) -> usize {
        self.tasks.len() - self.completed_count()
    }

    fn fetch(&mut self) -> Vec<Effect> {
        self.load = LoadState::Loading;
        let task = self.running.detail.start(&mut self.seq);
        vec![Effect::FetchProjectDetail {
            task,
            project: self.project_id,
        }]
    }

    fn splice(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        } else {
            self.tasks.push(task);
        }
    }
}

impl Component for ProjectDetailPage {
    type Action = ProjectDetailAction;

    fn mount(&mut self) -> Vec<Effect> {
        self.fetch()
    }

    fn update(&mut self, action: ProjectDetailAction) -> Vec<Effect> {
        match action {
            ProjectDetailAction::Reload => self.fetch(),
            ProjectDetailAction::SubmitTask => {
                if self.project.is_none() {
                    self.banner = Some("Project not loaded".to_string());
                    return Vec::new();
                }
                // The project is implied by the page.
                self.form.project = Some(self.project_id);
                let data = match self.form.validate() {
                    Ok(data) => data,
                    Err(errors) => {
                        self.form_errors = errors;
                        return Vec::new();
                    }
                };
                self.form_errors = FieldErrors::default();
                self.banner = None;
                let task = self.running.create.start(&mut self.seq);
                vec![Effect::CreateTask { task, data }]
            }
            ProjectDetailAction::ToggleStatus(id) => {
                let Some(current) = self.tasks.iter().find(|t| t.id == id) else {
                    return Vec::new();
                };
                let status = current.status.toggled();
                let task = self.running.status.start(&mut self.seq);
                vec![Effect::UpdateTaskStatus { task, id, status }]
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::ProjectDetailLoaded { task, result } => {
                if !self.running.detail.finish_if_active(task) {
                    return Vec::new();
                }
                match result {
                    Ok(detail) => {
                        self.project = Some(detail.project);
                        self.tasks = detail.tasks.results;
                        self.load = LoadState::Ready;
                    }
                    Err(e) => {
                        self.load =
                            LoadState::Failed(describe(&e, "Failed to fetch project details"));
                    }
                }
            }
            Outcome::TaskSaved { task, result } if self.running.create.finish_if_active(task) => {
                match result {
                    Ok(created) => {
                        self.tasks.push(created);
                        self.form = TaskForm::for_project(self.project_id);
                    }
                    Err(e) => {
                        self.form_errors = FieldErrors::from_api(&e);
                        self.banner = Some(describe(&e, "Failed to create task"));
                    }
                }
            }
            Outcome::TaskSaved { task, result } if self.running.status.finish_if_active(task) => {
                match result {
                    Ok(updated) => self.splice(updated),
                    Err(e) => self.banner = Some(describe(&e, "Failed to update task status")),
                }
            }
            other => debug!(?other, "Outcome dropped by project detail page"),
        }
        Vec::new()
    }

    fn unmount(&mut self) {
        self.running.detail.clear();
        self.running.create.clear();
        self.running.status.clear();
    }
}
