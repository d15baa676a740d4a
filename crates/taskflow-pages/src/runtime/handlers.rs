//! Effect handlers: one API call sequence per effect.

use taskflow_core::api::{projects, tasks};
use taskflow_core::{ApiClient, ApiResult, Session};
use taskflow_types::Id;

use crate::effects::{Effect, Outcome, ProjectDetail, TasksOverview};

/// Executes an effect and returns its outcome.
///
/// Pure async function - the runtime awaits it and feeds the result back.
pub async fn execute(effect: Effect, session: &mut Session) -> Outcome {
    let client = session.client().clone();
    match effect {
        Effect::FetchProjects { task } => Outcome::ProjectsLoaded {
            task,
            result: projects::list(&client).await,
        },
        Effect::FetchProjectDetail { task, project } => Outcome::ProjectDetailLoaded {
            task,
            result: project_detail(&client, project).await,
        },
        Effect::FetchTasksPage { task, project } => Outcome::TasksPageLoaded {
            task,
            result: tasks_overview(&client, project).await,
        },
        Effect::CreateProject { task, data } => Outcome::ProjectSaved {
            task,
            result: projects::create(&client, &data).await,
        },
        Effect::UpdateProject { task, id, data } => Outcome::ProjectSaved {
            task,
            result: projects::update(&client, id, &data).await,
        },
        Effect::DeleteProject { task, id } => Outcome::ProjectDeleted {
            task,
            id,
            result: projects::delete(&client, id).await,
        },
        Effect::CreateTask { task, data } => Outcome::TaskSaved {
            task,
            result: tasks::create(&client, &data).await,
        },
        Effect::UpdateTaskStatus { task, id, status } => Outcome::TaskSaved {
            task,
            result: tasks::update_status(&client, id, status).await,
        },
        Effect::Login {
            task,
            email,
            password,
        } => Outcome::Authenticated {
            task,
            result: session.login(&email, &password).await,
        },
        Effect::Register { task, data } => Outcome::Authenticated {
            task,
            result: session.register(&data).await,
        },
    }
}

/// The project record, then its tasks.
async fn project_detail(client: &ApiClient, project: Id) -> ApiResult<ProjectDetail> {
    let record = projects::get(client, project).await?;
    let tasks = tasks::list(client, Some(project)).await?;
    Ok(ProjectDetail {
        project: record,
        tasks,
    })
}

async fn tasks_overview(client: &ApiClient, project: Option<Id>) -> ApiResult<TasksOverview> {
    let (tasks, projects) = tokio::join!(tasks::list(client, project), projects::list(client));
    Ok(TasksOverview {
        tasks: tasks?,
        projects: projects?,
    })
}
