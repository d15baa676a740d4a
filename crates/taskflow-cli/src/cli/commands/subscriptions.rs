//! Subscription command handlers.

use anyhow::{Context, Result};
use taskflow_core::Session;
use taskflow_core::api::subscriptions;
use taskflow_types::Id;

use crate::cli::render;

pub async fn plans(session: &Session) -> Result<()> {
    let page = subscriptions::plans(session.client())
        .await
        .context("fetch plans")?;
    if page.is_empty() {
        println!("No plans available.");
    } else {
        println!("{}", render::plans(&page.results));
    }
    Ok(())
}

pub async fn show(session: &Session) -> Result<()> {
    let subscription = subscriptions::my_subscription(session.client())
        .await
        .context("fetch subscription")?;
    println!("{}", render::subscription(&subscription));
    Ok(())
}

pub async fn change(session: &Session, plan_id: Id) -> Result<()> {
    let subscription = subscriptions::change_plan(session.client(), plan_id)
        .await
        .with_context(|| format!("change to plan {plan_id}"))?;
    println!("Switched to {}", subscription.plan.name);
    Ok(())
}

pub async fn limits(session: &Session) -> Result<()> {
    let usage = subscriptions::check_limits(session.client())
        .await
        .context("check limits")?;
    println!("{}", render::limits(&usage));
    Ok(())
}

pub async fn start_trial(session: &Session) -> Result<()> {
    let trial = subscriptions::start_trial(session.client())
        .await
        .context("start trial")?;
    println!("{}", trial.message);
    if trial.trial_end_date.is_some() {
        println!("Trial ends: {}", render::date(trial.trial_end_date));
    }
    Ok(())
}
