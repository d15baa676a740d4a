//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use taskflow_core::config::{self, Config};
use taskflow_core::{ApiClient, AuthEvent, FileTokenStore, NoopNavigator, Session, logging};
use taskflow_types::{Id, TaskPriority, TaskStatus};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(version)]
#[command(about = "Manage Taskflow projects, tasks and subscriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Api(ApiCommands),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that talk to the backend.
#[derive(clap::Subcommand)]
enum ApiCommands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log out and forget stored tokens
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Subscription plans and billing status
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },
    /// Read and clear notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },
    /// Show your recent activity
    Activity,
}

#[derive(clap::Args, Debug, Clone, Default)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long)]
    password: String,
    /// Defaults to --password
    #[arg(long)]
    password_confirm: Option<String>,
}

/// Fields shared by project create and update.
#[derive(clap::Args, Debug, Clone, Default)]
struct ProjectFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Deadline as YYYY-MM-DDTHH:MM
    #[arg(long)]
    deadline: Option<String>,
}

#[derive(clap::Subcommand)]
enum ProjectCommands {
    /// List projects
    List,
    /// Show a project with its tasks
    Show {
        #[arg(value_name = "PROJECT_ID")]
        id: Id,
    },
    /// Create a project
    Create(ProjectFields),
    /// Replace a project's name, description and deadline
    Update {
        #[arg(value_name = "PROJECT_ID")]
        id: Id,
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// Delete a project
    Delete {
        #[arg(value_name = "PROJECT_ID")]
        id: Id,
    },
    /// Add a member to a project
    AddMember {
        #[arg(value_name = "PROJECT_ID")]
        id: Id,
        #[arg(value_name = "USER_ID")]
        user_id: Id,
    },
    /// Remove a member from a project
    RemoveMember {
        #[arg(value_name = "PROJECT_ID")]
        id: Id,
        #[arg(value_name = "USER_ID")]
        user_id: Id,
    },
}

/// Fields shared by task create and update.
#[derive(clap::Args, Debug, Clone, Default)]
struct TaskFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    project: Option<Id>,
    /// todo, in_progress, review or completed
    #[arg(long)]
    status: Option<TaskStatus>,
    /// low, medium, high or urgent
    #[arg(long)]
    priority: Option<TaskPriority>,
    /// Deadline as YYYY-MM-DDTHH:MM
    #[arg(long)]
    deadline: Option<String>,
    /// Assignee user id
    #[arg(long)]
    assignee: Option<Id>,
}

#[derive(clap::Subcommand)]
enum TaskCommands {
    /// List tasks
    List {
        /// Only tasks of this project
        #[arg(long)]
        project: Option<Id>,
    },
    /// Show a task
    Show {
        #[arg(value_name = "TASK_ID")]
        id: Id,
    },
    /// Create a task
    Create(TaskFields),
    /// Replace a task's fields (unset flags keep current values)
    Update {
        #[arg(value_name = "TASK_ID")]
        id: Id,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task
    Delete {
        #[arg(value_name = "TASK_ID")]
        id: Id,
    },
    /// Set a task's status
    Status {
        #[arg(value_name = "TASK_ID")]
        id: Id,
        #[arg(value_name = "STATUS")]
        status: TaskStatus,
    },
    /// Toggle between completed and todo
    Toggle {
        #[arg(value_name = "TASK_ID")]
        id: Id,
    },
    /// Assign a task to a user
    Assign {
        #[arg(value_name = "TASK_ID")]
        id: Id,
        #[arg(value_name = "USER_ID")]
        user_id: Id,
    },
    /// Make a task depend on another
    AddDependency {
        #[arg(value_name = "TASK_ID")]
        id: Id,
        #[arg(value_name = "DEPENDENCY_ID")]
        dependency_id: Id,
    },
}

#[derive(clap::Subcommand)]
enum SubscriptionCommands {
    /// List available plans
    Plans,
    /// Show the current subscription
    Show,
    /// Switch to another plan
    Change {
        #[arg(value_name = "PLAN_ID")]
        plan_id: Id,
    },
    /// Check usage against plan limits
    Limits,
    /// Start the free trial
    StartTrial,
}

#[derive(clap::Subcommand)]
enum NotificationCommands {
    /// List all notifications
    List,
    /// List unread notifications
    Unread,
    /// Mark a notification as read
    Read {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: Id,
    },
    /// Mark every notification as read
    ReadAll,
    /// Delete a notification
    Delete {
        #[arg(value_name = "NOTIFICATION_ID")]
        id: Id,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the backend base URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

const LOGIN_HINT: &str = "Session expired. Run `taskflow login --email <EMAIL>` to sign in.";

/// True once the client has given up on refreshing the session.
fn session_expired(events: &mut broadcast::Receiver<AuthEvent>) -> bool {
    matches!(
        events.try_recv(),
        Ok(AuthEvent::SessionExpired) | Err(TryRecvError::Lagged(_))
    )
}

/// Builds the session over the persisted token file.
fn open_session(config: &Config) -> Result<Session> {
    let store = Arc::new(FileTokenStore::open_default());
    let client = ApiClient::from_config(config, store, Arc::new(NoopNavigator))
        .context("create API client")?;
    Ok(Session::new(client))
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        // Config commands must work even when the config file is broken.
        Commands::Config { command } => run_config(command),
        Commands::Api(command) => run_api(command).await,
    }
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
    }
}

async fn run_api(command: ApiCommands) -> Result<()> {
    let config = Config::load().context("load config")?;
    let _log_guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };
    tracing::debug!(home = %config::paths::taskflow_home().display(), "Starting");

    let mut session = open_session(&config)?;
    let mut events = session.client().subscribe();

    let result = run_command(&mut session, command).await;
    if session_expired(&mut events) {
        eprintln!("{LOGIN_HINT}");
    }
    result
}

async fn run_command(session: &mut Session, command: ApiCommands) -> Result<()> {
    match command {
        ApiCommands::Login { email, password } => {
            commands::auth::login(session, &email, password).await
        }
        ApiCommands::Register(args) => commands::auth::register(session, args).await,
        ApiCommands::Logout => commands::auth::logout(session).await,
        ApiCommands::Whoami => commands::auth::whoami(session).await,

        ApiCommands::Projects { command } => match command {
            ProjectCommands::List => commands::projects::list(session).await,
            ProjectCommands::Show { id } => commands::projects::show(session, id).await,
            ProjectCommands::Create(fields) => commands::projects::create(session, fields).await,
            ProjectCommands::Update { id, fields } => {
                commands::projects::update(session, id, fields).await
            }
            ProjectCommands::Delete { id } => commands::projects::delete(session, id).await,
            ProjectCommands::AddMember { id, user_id } => {
                commands::projects::add_member(session, id, user_id).await
            }
            ProjectCommands::RemoveMember { id, user_id } => {
                commands::projects::remove_member(session, id, user_id).await
            }
        },

        ApiCommands::Tasks { command } => match command {
            TaskCommands::List { project } => commands::tasks::list(session, project).await,
            TaskCommands::Show { id } => commands::tasks::show(session, id).await,
            TaskCommands::Create(fields) => commands::tasks::create(session, fields).await,
            TaskCommands::Update { id, fields } => {
                commands::tasks::update(session, id, fields).await
            }
            TaskCommands::Delete { id } => commands::tasks::delete(session, id).await,
            TaskCommands::Status { id, status } => {
                commands::tasks::set_status(session, id, status).await
            }
            TaskCommands::Toggle { id } => commands::tasks::toggle(session, id).await,
            TaskCommands::Assign { id, user_id } => {
                commands::tasks::assign(session, id, user_id).await
            }
            TaskCommands::AddDependency { id, dependency_id } => {
                commands::tasks::add_dependency(session, id, dependency_id).await
            }
        },

        ApiCommands::Notifications { command } => match command {
            NotificationCommands::List => commands::activity::notifications(session, false).await,
            NotificationCommands::Unread => commands::activity::notifications(session, true).await,
            NotificationCommands::Read { id } => commands::activity::mark_read(session, id).await,
            NotificationCommands::ReadAll => commands::activity::mark_all_read(session).await,
            NotificationCommands::Delete { id } => {
                commands::activity::delete_notification(session, id).await
            }
        },
        ApiCommands::Activity => commands::activity::history(session).await,

        ApiCommands::Subscriptions { command } => match command {
            SubscriptionCommands::Plans => commands::subscriptions::plans(session).await,
            SubscriptionCommands::Show => commands::subscriptions::show(session).await,
            SubscriptionCommands::Change { plan_id } => {
                commands::subscriptions::change(session, plan_id).await
            }
            SubscriptionCommands::Limits => commands::subscriptions::limits(session).await,
            SubscriptionCommands::StartTrial => {
                commands::subscriptions::start_trial(session).await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_status_argument_parses() {
        let cli = Cli::try_parse_from(["taskflow", "tasks", "status", "3", "in-progress"]).unwrap();
        let Commands::Api(ApiCommands::Tasks {
            command: TaskCommands::Status { id, status },
        }) = cli.command
        else {
            panic!("expected tasks status");
        };
        assert_eq!(id, 3);
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        assert!(
            Cli::try_parse_from(["taskflow", "tasks", "create", "--priority", "extreme"]).is_err()
        );
    }
}
