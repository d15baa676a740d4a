//! Plain-text rendering of API records.

use chrono::{DateTime, Local, Utc};
use comfy_table::{ContentArrangement, Table};
use taskflow_types::{
    ActivityLog, Id, Notification, Project, Related, SubscriptionPlan, Task, UsageLimits,
    UserSubscription,
};

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

/// Local time, minute precision; `-` when unset.
pub fn date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || "-".to_string(),
        |d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

pub fn projects(projects: &[Project]) -> String {
    let mut t = table(&["ID", "Name", "Owner", "Members", "Progress", "Deadline"]);
    for p in projects {
        t.add_row(vec![
            p.id.to_string(),
            p.name.clone(),
            or_dash(&p.owner).to_string(),
            p.members.len().to_string(),
            format!("{:.0}%", p.progress_percentage),
            date(p.deadline),
        ]);
    }
    t.to_string()
}

pub fn project(project: &Project) -> String {
    let mut out = format!("#{} {}\n", project.id, project.name);
    if !project.description.trim().is_empty() {
        out.push_str(&project.description);
        out.push('\n');
    }
    out.push_str(&format!("Owner: {}\n", or_dash(&project.owner)));
    out.push_str(&format!("Deadline: {}\n", date(project.deadline)));
    out.push_str(&format!("Progress: {:.0}%", project.progress_percentage));
    out
}

/// Task table. Row-shaped tasks already carry the project name;
/// `project_name` resolves the ones that only carry an id.
pub fn tasks<'a>(tasks: &[Task], project_name: impl Fn(Id) -> Option<&'a str>) -> String {
    let mut t = table(&["ID", "Title", "Status", "Priority", "Project", "Assignee", "Deadline"]);
    for task in tasks {
        let project = match &task.project {
            Related::Name(name) => name.clone(),
            Related::Id(id) => project_name(*id).map_or_else(|| id.to_string(), str::to_string),
        };
        t.add_row(vec![
            task.id.to_string(),
            task.title.clone(),
            task.status.label().to_string(),
            task.priority.to_string(),
            project,
            assignee(task),
            date(task.deadline),
        ]);
    }
    t.to_string()
}

fn assignee(task: &Task) -> String {
    match (&task.assignee_details, &task.assignee) {
        (Some(user), _) => user.email.clone(),
        (None, Some(related)) => related.to_string(),
        (None, None) => "-".to_string(),
    }
}

pub fn task(task: &Task) -> String {
    let mut out = format!("#{} {}\n", task.id, task.title);
    if !task.description.trim().is_empty() {
        out.push_str(&task.description);
        out.push('\n');
    }
    out.push_str(&format!("Status: {}\n", task.status.label()));
    out.push_str(&format!("Priority: {}\n", task.priority));

    let project = task
        .project_details
        .as_ref()
        .map_or_else(|| task.project.to_string(), |p| p.name.clone());
    out.push_str(&format!("Project: {project}\n"));
    out.push_str(&format!("Assignee: {}\n", assignee(task)));

    if !task.dependencies.is_empty() {
        let ids: Vec<String> = task.dependencies.iter().map(ToString::to_string).collect();
        out.push_str(&format!("Depends on: {}\n", ids.join(", ")));
    } else if task.dependency_count() > 0 {
        out.push_str(&format!("Dependencies: {}\n", task.dependency_count()));
    }
    out.push_str(&format!("Deadline: {}", date(task.deadline)));
    out
}

pub fn plans(plans: &[SubscriptionPlan]) -> String {
    let mut t = table(&["ID", "Plan", "Price", "Projects", "Members", "Tasks"]);
    for plan in plans {
        let price = if plan.is_free() {
            "Free".to_string()
        } else {
            format!("${:.2}/mo", plan.price)
        };
        t.add_row(vec![
            plan.id.to_string(),
            plan.name.clone(),
            price,
            plan.projects_limit.to_string(),
            plan.team_members_limit.to_string(),
            plan.tasks_limit.to_string(),
        ]);
    }
    t.to_string()
}

pub fn subscription(sub: &UserSubscription) -> String {
    let mut out = format!("Plan: {}\n", sub.plan.name);
    out.push_str(&format!("Status: {}\n", sub.status));
    if sub.is_trial_period {
        out.push_str(&format!("Trial ends: {}\n", date(sub.trial_end_date)));
    }
    if let Some(days) = sub.days_until_expiry {
        out.push_str(&format!("Days until expiry: {days}\n"));
    }
    out.push_str(&format!(
        "Auto-renew: {}",
        if sub.auto_renew { "on" } else { "off" }
    ));
    out
}

pub fn limits(usage: &UsageLimits) -> String {
    let mut out = if usage.within_limits {
        "Within plan limits".to_string()
    } else {
        "Plan limits exceeded".to_string()
    };
    if !usage.message.trim().is_empty() {
        out.push_str(&format!(": {}", usage.message));
    }
    let mut t = table(&["Projects", "Members", "Tasks"]);
    t.add_row(vec![
        usage.limits.projects_limit.to_string(),
        usage.limits.team_members_limit.to_string(),
        usage.limits.tasks_limit.to_string(),
    ]);
    out.push('\n');
    out.push_str(&t.to_string());
    out
}

/// Unread rows are marked with `*`.
pub fn notifications(notifications: &[Notification]) -> String {
    let mut t = table(&["", "ID", "Type", "Title", "Message", "Received"]);
    for n in notifications {
        t.add_row(vec![
            if n.is_read { "" } else { "*" }.to_string(),
            n.id.to_string(),
            n.notification_type.label().to_string(),
            n.title.clone(),
            or_dash(&n.message).to_string(),
            date(n.created_at),
        ]);
    }
    t.to_string()
}

pub fn activity(entries: &[ActivityLog]) -> String {
    let mut t = table(&["When", "Action", "Target", "Description"]);
    for entry in entries {
        t.add_row(vec![
            date(entry.created_at),
            entry.action.label().to_string(),
            entry
                .target_details
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            or_dash(&entry.description).to_string(),
        ]);
    }
    t.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_projects_table_has_rows() {
        let list: Vec<Project> = serde_json::from_value(json!([
            {"id": 1, "name": "Site", "owner": "a@b.com", "members": [1, 2], "progress_percentage": 50.0}
        ]))
        .unwrap();
        let out = projects(&list);
        assert!(out.contains("Site"));
        assert!(out.contains("50%"));
        assert!(out.contains("a@b.com"));
    }

    #[test]
    fn test_task_uses_embedded_details() {
        let t: Task = serde_json::from_value(json!({
            "id": 3, "title": "Docs", "project": 5, "status": "in_progress",
            "dependencies": [1, 2],
            "assignee": 9,
            "assignee_details": {"id": 9, "email": "dev@b.com"},
            "project_details": {"id": 5, "name": "Site"}
        }))
        .unwrap();
        let out = task(&t);
        assert!(out.contains("Status: In Progress"));
        assert!(out.contains("Project: Site"));
        assert!(out.contains("Assignee: dev@b.com"));
        assert!(out.contains("Depends on: 1, 2"));
    }

    #[test]
    fn test_task_rows_render_names() {
        let list: Vec<Task> = serde_json::from_value(json!([
            {"id": 1, "title": "Ship", "project": "Website", "assignee": "dev@b.com",
             "dependencies_count": 0},
            {"id": 2, "title": "Plan", "project": 5, "assignee": null}
        ]))
        .unwrap();
        let out = tasks(&list, |id| (id == 5).then_some("Site"));
        assert!(out.contains("Website"));
        assert!(out.contains("dev@b.com"));
        assert!(out.contains("Site"));
    }

    #[test]
    fn test_free_plan_label() {
        let list: Vec<SubscriptionPlan> = serde_json::from_value(json!([
            {"id": 1, "name": "Free", "price": "0.00", "projects_limit": 1, "team_members_limit": 1, "tasks_limit": 10},
            {"id": 2, "name": "Pro", "price": 9.5, "projects_limit": 10, "team_members_limit": 5, "tasks_limit": 100}
        ]))
        .unwrap();
        let out = plans(&list);
        assert!(out.contains("Free"));
        assert!(out.contains("$9.50/mo"));
    }

    #[test]
    fn test_unread_notifications_are_marked() {
        let list: Vec<Notification> = serde_json::from_value(json!([
            {"id": 1, "notification_type": "deadline_reminder", "title": "Due soon", "is_read": false},
            {"id": 2, "notification_type": "system_message", "title": "Welcome", "is_read": true}
        ]))
        .unwrap();
        let out = notifications(&list);
        assert!(out.contains("Deadline Reminder"));
        assert_eq!(out.matches('*').count(), 1);
    }

    #[test]
    fn test_missing_date_is_dash() {
        assert_eq!(date(None), "-");
    }
}
