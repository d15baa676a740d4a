//! Notification and activity history handlers.

use anyhow::{Context, Result};
use taskflow_core::Session;
use taskflow_core::api::{activity, notifications};
use taskflow_types::Id;

use crate::cli::render;

pub async fn notifications(session: &Session, unread_only: bool) -> Result<()> {
    let client = session.client();
    let page = if unread_only {
        notifications::unread(client).await
    } else {
        notifications::list(client).await
    }
    .context("fetch notifications")?;

    if page.is_empty() {
        println!(
            "{}",
            if unread_only {
                "No unread notifications."
            } else {
                "No notifications."
            }
        );
    } else {
        println!("{}", render::notifications(&page.results));
    }
    Ok(())
}

pub async fn mark_read(session: &Session, id: Id) -> Result<()> {
    let reply = notifications::mark_read(session.client(), id)
        .await
        .with_context(|| format!("mark notification {id} as read"))?;
    println!("{}", reply.message);
    Ok(())
}

pub async fn mark_all_read(session: &Session) -> Result<()> {
    let reply = notifications::mark_all_read(session.client())
        .await
        .context("mark notifications as read")?;
    println!("{}", reply.message);
    Ok(())
}

pub async fn delete_notification(session: &Session, id: Id) -> Result<()> {
    notifications::delete(session.client(), id)
        .await
        .with_context(|| format!("delete notification {id}"))?;
    println!("Deleted notification #{id}");
    Ok(())
}

pub async fn history(session: &Session) -> Result<()> {
    let page = activity::list(session.client())
        .await
        .context("fetch activity")?;
    if page.is_empty() {
        println!("No activity yet.");
    } else {
        println!("{}", render::activity(&page.results));
    }
    Ok(())
}
