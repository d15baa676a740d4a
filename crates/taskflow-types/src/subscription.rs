//! Subscription plans and billing status (read-only display data).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::de::number_or_string;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal price; the API encodes it as a string.
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    pub projects_limit: u32,
    pub team_members_limit: u32,
    pub tasks_limit: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl SubscriptionPlan {
    pub fn is_free(&self) -> bool {
        self.price.abs() < f64::EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    Cancelled,
    PastDue,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::PastDue => "past_due",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: Id,
    pub user: Id,
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub plan_id: Option<Id>,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trial_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub stripe_subscription_id: Option<String>,
    #[serde(default)]
    pub is_active_subscription: bool,
    #[serde(default)]
    pub days_until_expiry: Option<i64>,
    #[serde(default)]
    pub is_trial_period: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePlanRequest {
    pub plan_id: Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub projects_limit: u32,
    pub team_members_limit: u32,
    pub tasks_limit: u32,
}

/// Response of `GET /subscriptions/check-limits/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub within_limits: bool,
    #[serde(default)]
    pub message: String,
    pub limits: PlanLimits,
}

/// Response of `POST /subscriptions/start-trial/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialStarted {
    pub message: String,
    #[serde(default)]
    pub trial_end_date: Option<DateTime<Utc>>,
}

/// Generic `{message}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
