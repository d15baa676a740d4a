//! Task command handlers.

use anyhow::{Context, Result};
use taskflow_core::Session;
use taskflow_core::api::tasks;
use taskflow_pages::forms::TaskForm;
use taskflow_pages::{PageRuntime, TasksAction, TasksPage};
use taskflow_types::{Id, Task, TaskStatus};

use super::{check_banner, check_form, check_load};
use crate::cli::{TaskFields, render};

fn apply_fields(form: &mut TaskForm, fields: TaskFields) {
    let TaskFields {
        title,
        description,
        project,
        status,
        priority,
        deadline,
        assignee,
    } = fields;
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(description) = description {
        form.description = description;
    }
    if project.is_some() {
        form.project = project;
    }
    if let Some(status) = status {
        form.status = status;
    }
    if let Some(priority) = priority {
        form.priority = priority;
    }
    if let Some(deadline) = deadline {
        form.deadline = deadline;
    }
    if assignee.is_some() {
        form.assignee = assignee;
    }
}

/// Prefill for a full-replace update.
fn form_from_task(task: &Task) -> TaskForm {
    TaskForm {
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        priority: task.priority,
        deadline: task
            .deadline
            .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
            .unwrap_or_default(),
        project: task.project_id(),
        assignee: task.assignee_id(),
    }
}

pub async fn list(session: &mut Session, project: Option<Id>) -> Result<()> {
    let mut page = TasksPage::new(project);
    let mut runtime = PageRuntime::new(session);
    runtime.mount(&mut page).await;
    check_load(&page.load)?;

    if page.is_empty() {
        match project {
            Some(id) => println!("No tasks in project {id}."),
            None => println!("No tasks yet."),
        }
    } else {
        println!(
            "{}",
            render::tasks(&page.tasks, |id| page.project_name(id))
        );
    }
    Ok(())
}

pub async fn show(session: &Session, id: Id) -> Result<()> {
    let task = tasks::get(session.client(), id)
        .await
        .with_context(|| format!("load task {id}"))?;
    println!("{}", render::task(&task));
    Ok(())
}

pub async fn create(session: &mut Session, fields: TaskFields) -> Result<()> {
    let mut page = TasksPage::new(None);
    apply_fields(&mut page.form, fields);

    let mut runtime = PageRuntime::new(session);
    runtime.dispatch(&mut page, TasksAction::SubmitTask).await;
    check_form(&page.form_errors)?;
    check_banner(page.banner.as_deref())?;

    let created = page.tasks.last().context("No task returned")?;
    println!("Created task #{} {}", created.id, created.title);
    Ok(())
}

pub async fn update(session: &Session, id: Id, fields: TaskFields) -> Result<()> {
    let client = session.client();
    let current = tasks::get(client, id)
        .await
        .with_context(|| format!("load task {id}"))?;

    let mut form = form_from_task(&current);
    apply_fields(&mut form, fields);
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => return check_form(&errors),
    };

    let updated = tasks::update(client, id, &data)
        .await
        .with_context(|| format!("update task {id}"))?;
    println!("Updated task #{} {}", updated.id, updated.title);
    Ok(())
}

pub async fn delete(session: &Session, id: Id) -> Result<()> {
    tasks::delete(session.client(), id)
        .await
        .with_context(|| format!("delete task {id}"))?;
    println!("Deleted task #{id}");
    Ok(())
}

pub async fn set_status(session: &Session, id: Id, status: TaskStatus) -> Result<()> {
    let task = tasks::update_status(session.client(), id, status)
        .await
        .with_context(|| format!("update status of task {id}"))?;
    println!("Task #{} is now {}", task.id, task.status.label());
    Ok(())
}

/// Completed goes back to todo; anything else completes.
pub async fn toggle(session: &Session, id: Id) -> Result<()> {
    let current = tasks::get(session.client(), id)
        .await
        .with_context(|| format!("load task {id}"))?;
    set_status(session, id, current.status.toggled()).await
}

pub async fn assign(session: &Session, id: Id, user_id: Id) -> Result<()> {
    let task = tasks::assign(session.client(), id, user_id)
        .await
        .with_context(|| format!("assign task {id}"))?;
    println!("Assigned task #{} to user {user_id}", task.id);
    Ok(())
}

pub async fn add_dependency(session: &Session, id: Id, dependency_id: Id) -> Result<()> {
    let task = tasks::add_dependency(session.client(), id, dependency_id)
        .await
        .with_context(|| format!("add dependency to task {id}"))?;
    println!("Task #{} now depends on #{dependency_id}", task.id);
    Ok(())
}
