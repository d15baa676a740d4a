//! Projects list page: fetch on mount, create form, update and delete.

use taskflow_types::{Id, Project};
use tracing::debug;

use crate::common::{TaskSeq, TaskState};
use crate::effects::{Effect, Outcome};
use crate::forms::{FieldErrors, ProjectForm};
use crate::state::{Component, LoadState, describe};

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsAction {
    Reload,
    /// Validate the create form and submit it.
    Submit,
    /// Full replace of an existing project with the form contents.
    SubmitUpdate(Id),
    Delete(Id),
}

#[derive(Debug, Default)]
struct Tasks {
    list: TaskState,
    save: TaskState,
    /// Project being replaced by the in-flight save; `None` for a create.
    save_target: Option<Id>,
    delete: TaskState,
}

#[derive(Debug, Default)]
pub struct ProjectsPage {
    pub load: LoadState,
    pub projects: Vec<Project>,
    pub form: ProjectForm,
    pub form_errors: FieldErrors,
    /// Mutation failure message.
    pub banner: Option<String>,
    seq: TaskSeq,
    tasks: Tasks,
}

impl ProjectsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.load == LoadState::Ready && self.projects.is_empty()
    }

    pub fn project(&self, id: Id) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn fetch(&mut self) -> Vec<Effect> {
        self.load = LoadState::Loading;
        let task = self.tasks.list.start(&mut self.seq);
        vec![Effect::FetchProjects { task }]
    }

    fn submit(&mut self, update: Option<Id>) -> Vec<Effect> {
        let data = match self.form.validate() {
            Ok(data) => data,
            Err(errors) => {
                self.form_errors = errors;
                return Vec::new();
            }
        };
        self.form_errors = FieldErrors::default();
        self.banner = None;

        let task = self.tasks.save.start(&mut self.seq);
        self.tasks.save_target = update;
        match update {
            Some(id) => vec![Effect::UpdateProject { task, id, data }],
            None => vec![Effect::CreateProject { task, data }],
        }
    }
}

impl Component for ProjectsPage {
    type Action = ProjectsAction;

    fn mount(&mut self) -> Vec<Effect> {
        self.fetch()
    }

    fn update(&mut self, action: ProjectsAction) -> Vec<Effect> {
        match action {
            ProjectsAction::Reload => self.fetch(),
            ProjectsAction::Submit => self.submit(None),
            ProjectsAction::SubmitUpdate(id) => self.submit(Some(id)),
            ProjectsAction::Delete(id) => {
                self.banner = None;
                let task = self.tasks.delete.start(&mut self.seq);
                vec![Effect::DeleteProject { task, id }]
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::ProjectsLoaded { task, result } => {
                if !self.tasks.list.finish_if_active(task) {
                    return Vec::new();
                }
                match result {
                    Ok(page) => {
                        self.projects = page.results;
                        self.load = LoadState::Ready;
                    }
                    Err(e) => {
                        self.load = LoadState::Failed(describe(&e, "Failed to fetch projects"));
                    }
                }
            }
            Outcome::ProjectSaved { task, result } => {
                if !self.tasks.save.finish_if_active(task) {
                    return Vec::new();
                }
                match result {
                    Ok(project) => {
                        if let Some(slot) = self.projects.iter_mut().find(|p| p.id == project.id) {
                            *slot = project;
                        } else {
                            self.projects.push(project);
                        }
                        self.form = ProjectForm::default();
                    }
                    Err(e) => {
                        self.form_errors = FieldErrors::from_api(&e);
                        let fallback = if self.tasks.save_target.is_some() {
                            "Failed to update project"
                        } else {
                            "Failed to create project"
                        };
                        self.banner = Some(describe(&e, fallback));
                    }
                }
            }
            Outcome::ProjectDeleted { task, id, result } => {
                if !self.tasks.delete.finish_if_active(task) {
                    return Vec::new();
                }
                match result {
                    Ok(()) => self.projects.retain(|p| p.id != id),
                    Err(e) => self.banner = Some(describe(&e, "Failed to delete project")),
                }
            }
            other => debug!(?other, "Outcome not handled by projects page"),
        }
        Vec::new()
    }

    fn unmount(&mut self) {
        self.tasks.list.clear();
        self.tasks.save.clear();
        self.tasks.delete.clear();
    }
}
