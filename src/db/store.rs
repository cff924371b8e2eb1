use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{travel_plan::TravelPlan, user::User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("duplicate key: {0}")]
    Duplicate(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub plans_deleted: u64,
    pub users_deleted: u64,
}

/// Data access for plans and accounts. Built once at startup and handed to
/// handlers through the application state.
///
/// A plan and its attractions are always written and deleted together.
/// Every read returns attractions in ascending position order.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_plan(&self, plan: &TravelPlan) -> Result<(), StoreError>;

    async fn find_plan_for_owner(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<TravelPlan>, StoreError>;

    /// Newest first.
    async fn list_plans_for_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, StoreError>;

    /// Only returns the plan when its status is shared.
    async fn find_shared_plan(&self, id: &str) -> Result<Option<TravelPlan>, StoreError>;

    /// Returns false when no plan with this id belongs to the owner.
    async fn mark_plan_shared(&self, id: &str, owner_id: &str) -> Result<bool, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn reset(&self) -> Result<ResetSummary, StoreError>;
}
