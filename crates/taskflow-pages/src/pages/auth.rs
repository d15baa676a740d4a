//! Login and register forms that drive the session manager.

use taskflow_types::User;
use tracing::debug;

use crate::common::{TaskSeq, TaskState};
use crate::effects::{Effect, Outcome};
use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::state::{Component, describe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    Submit,
}

#[derive(Debug, Default)]
pub struct LoginPage {
    pub form: LoginForm,
    pub form_errors: FieldErrors,
    pub banner: Option<String>,
    /// Set once the session accepted the credentials.
    pub user: Option<User>,
    seq: TaskSeq,
    submit: TaskState,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit.is_running()
    }
}

impl Component for LoginPage {
    type Action = LoginAction;

    fn mount(&mut self) -> Vec<Effect> {
        Vec::new()
    }

    fn update(&mut self, action: LoginAction) -> Vec<Effect> {
        match action {
            LoginAction::Submit => {
                if self.submit.is_running() {
                    return Vec::new();
                }
                let (email, password) = match self.form.validate() {
                    Ok(credentials) => credentials,
                    Err(errors) => {
                        self.form_errors = errors;
                        return Vec::new();
                    }
                };
                self.form_errors = FieldErrors::default();
                self.banner = None;
                let task = self.submit.start(&mut self.seq);
                vec![Effect::Login {
                    task,
                    email,
                    password,
                }]
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Authenticated { task, result } if self.submit.finish_if_active(task) => {
                match result {
                    Ok(user) => {
                        self.form.password.clear();
                        self.user = Some(user);
                    }
                    Err(e) => self.banner = Some(describe(&e, "Login failed")),
                }
            }
            other => debug!(?other, "Outcome dropped by login page"),
        }
        Vec::new()
    }

    fn unmount(&mut self) {
        self.submit.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAction {
    Submit,
}

#[derive(Debug, Default)]
pub struct RegisterPage {
    pub form: RegisterForm,
    pub form_errors: FieldErrors,
    pub banner: Option<String>,
    pub user: Option<User>,
    seq: TaskSeq,
    submit: TaskState,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for RegisterPage {
    type Action = RegisterAction;

    fn mount(&mut self) -> Vec<Effect> {
        Vec::new()
    }

    fn update(&mut self, action: RegisterAction) -> Vec<Effect> {
        match action {
            RegisterAction::Submit => {
                if self.submit.is_running() {
                    return Vec::new();
                }
                match self.form.validate() {
                    Ok(data) => {
                        self.form_errors = FieldErrors::default();
                        self.banner = None;
                        let task = self.submit.start(&mut self.seq);
                        vec![Effect::Register { task, data }]
                    }
                    Err(errors) => {
                        self.form_errors = errors;
                        Vec::new()
                    }
                }
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Authenticated { task, result } if self.submit.finish_if_active(task) => {
                match result {
                    Ok(user) => self.user = Some(user),
                    Err(e) => {
                        // Server-side validation lands next to the fields.
                        self.form_errors = FieldErrors::from_api(&e);
                        self.banner = Some(describe(&e, "Registration failed"));
                    }
                }
            }
            other => debug!(?other, "Outcome dropped by register page"),
        }
        Vec::new()
    }

    fn unmount(&mut self) {
        self.submit.clear();
    }
}
