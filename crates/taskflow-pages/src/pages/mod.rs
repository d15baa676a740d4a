mod auth;
mod project_detail;
mod projects;
mod tasks;

pub use auth::{LoginAction, LoginPage, RegisterAction, RegisterPage};
pub use project_detail::{ProjectDetailAction, ProjectDetailPage};
pub use projects::{ProjectsAction, ProjectsPage};
pub use tasks::{TasksAction, TasksPage};
