//! Project command handlers.

use anyhow::{Context, Result};
use taskflow_core::Session;
use taskflow_core::api::projects;
use taskflow_pages::forms::ProjectForm;
use taskflow_pages::{PageRuntime, ProjectDetailPage, ProjectsAction, ProjectsPage};
use taskflow_types::Id;

use super::{check_banner, check_form, check_load};
use crate::cli::{ProjectFields, render};

fn apply_fields(form: &mut ProjectForm, fields: ProjectFields) {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(deadline) = fields.deadline {
        form.deadline = deadline;
    }
}

pub async fn list(session: &mut Session) -> Result<()> {
    let mut page = ProjectsPage::new();
    let mut runtime = PageRuntime::new(session);
    runtime.mount(&mut page).await;
    check_load(&page.load)?;

    if page.is_empty() {
        println!("No projects yet. Create one with `taskflow projects create --name <NAME>`.");
    } else {
        println!("{}", render::projects(&page.projects));
    }
    Ok(())
}

pub async fn show(session: &mut Session, id: Id) -> Result<()> {
    let mut page = ProjectDetailPage::new(id);
    let mut runtime = PageRuntime::new(session);
    runtime.mount(&mut page).await;
    check_load(&page.load)?;

    let Some(project) = &page.project else {
        anyhow::bail!("Project {id} not found");
    };
    println!("{}", render::project(project));
    println!(
        "Tasks: {} completed, {} remaining",
        page.completed_count(),
        page.remaining_count()
    );
    if page.tasks.is_empty() {
        println!("No tasks in this project.");
    } else {
        println!("{}", render::tasks(&page.tasks, |_| Some(project.name.as_str())));
    }
    Ok(())
}

pub async fn create(session: &mut Session, fields: ProjectFields) -> Result<()> {
    let mut page = ProjectsPage::new();
    apply_fields(&mut page.form, fields);

    let mut runtime = PageRuntime::new(session);
    runtime.dispatch(&mut page, ProjectsAction::Submit).await;
    check_form(&page.form_errors)?;
    check_banner(page.banner.as_deref())?;

    let created = page.projects.last().context("No project returned")?;
    println!("Created project #{} {}", created.id, created.name);
    Ok(())
}

/// Full replace: unset flags keep the current values.
pub async fn update(session: &mut Session, id: Id, fields: ProjectFields) -> Result<()> {
    let current = projects::get(session.client(), id)
        .await
        .with_context(|| format!("load project {id}"))?;

    let mut page = ProjectsPage::new();
    page.form = ProjectForm::from_project(&current);
    page.projects.push(current);
    apply_fields(&mut page.form, fields);

    let mut runtime = PageRuntime::new(session);
    runtime.dispatch(&mut page, ProjectsAction::SubmitUpdate(id)).await;
    check_form(&page.form_errors)?;
    check_banner(page.banner.as_deref())?;

    let updated = page.project(id).context("No project returned")?;
    println!("Updated project #{} {}", updated.id, updated.name);
    Ok(())
}

pub async fn delete(session: &mut Session, id: Id) -> Result<()> {
    let mut page = ProjectsPage::new();
    let mut runtime = PageRuntime::new(session);
    runtime.dispatch(&mut page, ProjectsAction::Delete(id)).await;
    check_banner(page.banner.as_deref())?;
    println!("Deleted project #{id}");
    Ok(())
}

pub async fn add_member(session: &Session, id: Id, user_id: Id) -> Result<()> {
    let project = projects::add_member(session.client(), id, user_id)
        .await
        .with_context(|| format!("add user {user_id} to project {id}"))?;
    println!(
        "Added user {user_id} to {} ({} members)",
        project.name,
        project.members.len()
    );
    Ok(())
}

pub async fn remove_member(session: &Session, id: Id, user_id: Id) -> Result<()> {
    let project = projects::remove_member(session.client(), id, user_id)
        .await
        .with_context(|| format!("remove user {user_id} from project {id}"))?;
    println!(
        "Removed user {user_id} from {} ({} members)",
        project.name,
        project.members.len()
    );
    Ok(())
}
