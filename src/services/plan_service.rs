use log::info;
use url::Url;

use crate::db::store::{Store, StoreError};
use crate::models::travel_plan::TravelPlan;

/// Public link for a shared plan: `<base>/shared/<id>/view`.
pub fn share_url(base: &Url, plan_id: &str) -> Result<Url, url::ParseError> {
    base.join(&format!("shared/{}/view", plan_id))
}

pub async fn list_owned(store: &dyn Store, owner_id: &str) -> Result<Vec<TravelPlan>, StoreError> {
    store.list_plans_for_owner(owner_id).await
}

pub async fn get_owned(
    store: &dyn Store,
    plan_id: &str,
    owner_id: &str,
) -> Result<Option<TravelPlan>, StoreError> {
    store.find_plan_for_owner(plan_id, owner_id).await
}

pub async fn get_shared(store: &dyn Store, plan_id: &str) -> Result<Option<TravelPlan>, StoreError> {
    store.find_shared_plan(plan_id).await
}

/// Marks the plan shared and returns its public link, or `None` when the
/// caller does not own a plan with this id. Repeating the call is harmless.
pub async fn activate_share(
    store: &dyn Store,
    base: &Url,
    plan_id: &str,
    owner_id: &str,
) -> Result<Option<Url>, StoreError> {
    if !store.mark_plan_shared(plan_id, owner_id).await? {
        return Ok(None);
    }
    info!("Plan {} is now shared", plan_id);
    // Ids are uuids, so joining cannot fail for stored plans.
    Ok(share_url(base, plan_id).ok())
}
