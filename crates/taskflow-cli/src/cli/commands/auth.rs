//! Login, register, logout and whoami.

use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use taskflow_core::{Session, SessionState};
use taskflow_pages::{LoginAction, LoginPage, PageRuntime, RegisterAction, RegisterPage};

use super::{check_banner, check_form};
use crate::cli::RegisterArgs;

/// Reads the password from the first line of stdin.
fn read_password() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(session: &mut Session, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let mut page = LoginPage::new();
    page.form.email = email.to_string();
    page.form.password = password;

    let mut runtime = PageRuntime::new(session);
    runtime.dispatch(&mut page, LoginAction::Submit).await;

    check_form(&page.form_errors)?;
    check_banner(page.banner.as_deref())?;
    let Some(user) = page.user else {
        bail!("Login failed");
    };
    println!("Logged in as {} ({})", user.display_name(), user.email);
    Ok(())
}

pub async fn register(session: &mut Session, args: RegisterArgs) -> Result<()> {
    let mut page = RegisterPage::new();
    page.form.password_confirm = args.password_confirm.unwrap_or_else(|| args.password.clone());
    page.form.email = args.email;
    page.form.username = args.username;
    page.form.first_name = args.first_name;
    page.form.last_name = args.last_name;
    page.form.password = args.password;

    let mut runtime = PageRuntime::new(session);
    runtime.dispatch(&mut page, RegisterAction::Submit).await;

    check_form(&page.form_errors)?;
    check_banner(page.banner.as_deref())?;
    let Some(user) = page.user else {
        bail!("Registration failed");
    };
    println!("Registered and logged in as {}", user.display_name());
    Ok(())
}

pub async fn logout(session: &mut Session) -> Result<()> {
    session.logout().await;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(session: &mut Session) -> Result<()> {
    match session.init().await {
        SessionState::Authenticated(user) => {
            println!("{} <{}>", user.display_name(), user.email);
            println!("Role: {}", user.role);
            Ok(())
        }
        _ => bail!("Not logged in"),
    }
}
