//! Page components for the Taskflow client.
//!
//! Each page is a state struct with a pure reducer: user actions and effect
//! outcomes mutate state and return [`Effect`]s. The [`PageRuntime`] executes
//! effects against the API and feeds outcomes back into the page.

pub mod common;
pub mod effects;
pub mod forms;
pub mod pages;
pub mod runtime;
pub mod state;

pub use effects::{Effect, Outcome};
pub use forms::FieldErrors;
pub use pages::{
    LoginAction, LoginPage, ProjectDetailAction, ProjectDetailPage, ProjectsAction, ProjectsPage,
    RegisterAction, RegisterPage, TasksAction, TasksPage,
};
pub use runtime::PageRuntime;
pub use state::{Component, LoadState};
