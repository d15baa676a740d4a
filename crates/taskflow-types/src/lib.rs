//! Shared API payload shapes for the Taskflow client.
//!
//! Every type here mirrors a record returned by (or sent to) the REST API.
//! Records are value objects: they are replaced wholesale after each
//! successful call and never patched locally.

pub mod activity;
mod de;
pub mod page;
pub mod project;
pub mod subscription;
pub mod task;
pub mod user;

pub use activity::{ActivityAction, ActivityLog, Notification, NotificationType, TargetDetails};
pub use page::Page;
pub use project::{CreateProjectData, MemberRequest, Project};
pub use subscription::{
    ChangePlanRequest, MessageResponse, PlanLimits, SubscriptionPlan, SubscriptionStatus,
    TrialStarted, UsageLimits, UserSubscription,
};
pub use task::{
    AssignRequest, CreateTaskData, DependencyRequest, ProjectSummary, Related, StatusRequest,
    Task, TaskEnvelope, TaskPriority, TaskStatus, UserSummary,
};
pub use user::{
    AuthResponse, LoginCredentials, LogoutRequest, RefreshRequest, RegisterData, Role, TokenPair,
    User,
};

/// Numeric identifier used by every API resource.
pub type Id = i64;
