use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{ResetSummary, Store, StoreError};
use crate::models::{
    travel_plan::{PlanStatus, TravelPlan},
    user::User,
};

/// Process-local store for development runs and tests. Same contract as the
/// MongoDB store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    plans: RwLock<Vec<TravelPlan>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn plan_count(&self) -> usize {
        self.plans.read().await.len()
    }
}

fn ordered(plan: &TravelPlan) -> TravelPlan {
    let mut plan = plan.clone();
    plan.sort_attractions();
    plan
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_plan(&self, plan: &TravelPlan) -> Result<(), StoreError> {
        let mut plans = self.plans.write().await;
        if plans.iter().any(|existing| existing.id == plan.id) {
            return Err(StoreError::Duplicate(format!("plan {}", plan.id)));
        }
        plans.push(plan.clone());
        Ok(())
    }

    async fn find_plan_for_owner(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<TravelPlan>, StoreError> {
        let plans = self.plans.read().await;
        Ok(plans
            .iter()
            .find(|plan| plan.id == id && plan.owner_id == owner_id)
            .map(ordered))
    }

    async fn list_plans_for_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, StoreError> {
        let plans = self.plans.read().await;
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut owned: Vec<TravelPlan> = plans
            .iter()
            .rev()
            .filter(|plan| plan.owner_id == owner_id)
            .map(ordered)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_shared_plan(&self, id: &str) -> Result<Option<TravelPlan>, StoreError> {
        let plans = self.plans.read().await;
        Ok(plans
            .iter()
            .find(|plan| plan.id == id && plan.is_shared())
            .map(ordered))
    }

    async fn mark_plan_shared(&self, id: &str, owner_id: &str) -> Result<bool, StoreError> {
        let mut plans = self.plans.write().await;
        match plans
            .iter_mut()
            .find(|plan| plan.id == id && plan.owner_id == owner_id)
        {
            Some(plan) => {
                plan.status = PlanStatus::Shared;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate(format!("user {}", user.email)));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn reset(&self) -> Result<ResetSummary, StoreError> {
        let mut plans = self.plans.write().await;
        let mut users = self.users.write().await;
        let summary = ResetSummary {
            plans_deleted: plans.len() as u64,
            users_deleted: users.len() as u64,
        };
        plans.clear();
        users.clear();
        Ok(summary)
    }
}
