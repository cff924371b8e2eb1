use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::{
    bson::{doc, DateTime},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::store::{ResetSummary, Store, StoreError};
use crate::models::{
    travel_plan::{Attraction, PlanStatus, TravelMode, TravelPlan},
    user::User,
};

const PLANS: &str = "Plans";
const USERS: &str = "Users";
const DUPLICATE_KEY: i32 = 11000;

pub async fn create_mongo_client(uri: &str) -> Result<Client, StoreError> {
    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    Ok(Client::with_options(client_options)?)
}

/// Plan as stored: attractions are embedded so the plan and its stops are
/// written by a single document insert.
#[derive(Debug, Serialize, Deserialize)]
struct PlanDocument {
    #[serde(rename = "_id")]
    id: String,
    owner_id: String,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    mode: TravelMode,
    status: PlanStatus,
    #[serde(default)]
    preferences: Vec<String>,
    created_at: DateTime,
    attractions: Vec<Attraction>,
}

impl From<&TravelPlan> for PlanDocument {
    fn from(plan: &TravelPlan) -> Self {
        Self {
            id: plan.id.clone(),
            owner_id: plan.owner_id.clone(),
            destination: plan.destination.clone(),
            start_date: plan.start_date,
            end_date: plan.end_date,
            mode: plan.mode,
            status: plan.status,
            preferences: plan.preferences.clone(),
            created_at: DateTime::from_chrono(plan.created_at),
            attractions: plan.attractions.clone(),
        }
    }
}

impl From<PlanDocument> for TravelPlan {
    fn from(doc: PlanDocument) -> Self {
        let mut plan = TravelPlan {
            id: doc.id,
            owner_id: doc.owner_id,
            destination: doc.destination,
            start_date: doc.start_date,
            end_date: doc.end_date,
            mode: doc.mode,
            status: doc.status,
            preferences: doc.preferences,
            created_at: doc.created_at.to_chrono(),
            attractions: doc.attractions,
        };
        plan.sort_attractions();
        plan
    }
}

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connects, verifies the server answers a ping, and makes sure the
    /// indexes the queries rely on exist.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB database {}", database);
        let client = create_mongo_client(uri).await?;
        let store = Self {
            database: client.database(database),
        };

        match store.ping().await {
            Ok(()) => info!("Successfully connected to MongoDB and verified with ping command"),
            Err(e) => {
                warn!("Connected to MongoDB but ping test failed: {}", e);
                warn!("The API may still work, but some functionality might be impaired");
            }
        }

        store.ensure_indexes().await?;
        Ok(store)
    }

    fn plans(&self) -> Collection<PlanDocument> {
        self.database.collection(PLANS)
    }

    fn users(&self) -> Collection<User> {
        self.database.collection(USERS)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_email).await?;

        let owner_recent = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "created_at": -1 })
            .build();
        self.plans().create_index(owner_recent).await?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
            write_error.code == DUPLICATE_KEY
        }
        _ => false,
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn insert_plan(&self, plan: &TravelPlan) -> Result<(), StoreError> {
        match self.plans().insert_one(PlanDocument::from(plan)).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate(format!("plan {}", plan.id))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_plan_for_owner(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<TravelPlan>, StoreError> {
        let filter = doc! { "_id": id, "owner_id": owner_id };
        Ok(self.plans().find_one(filter).await?.map(TravelPlan::from))
    }

    async fn list_plans_for_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, StoreError> {
        let cursor = self
            .plans()
            .find(doc! { "owner_id": owner_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let documents: Vec<PlanDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(TravelPlan::from).collect())
    }

    async fn find_shared_plan(&self, id: &str) -> Result<Option<TravelPlan>, StoreError> {
        let filter = doc! { "_id": id, "status": PlanStatus::Shared.as_str() };
        Ok(self.plans().find_one(filter).await?.map(TravelPlan::from))
    }

    async fn mark_plan_shared(&self, id: &str, owner_id: &str) -> Result<bool, StoreError> {
        let result = self
            .plans()
            .update_one(
                doc! { "_id": id, "owner_id": owner_id },
                doc! { "$set": { "status": PlanStatus::Shared.as_str() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate(format!("user {}", user.email))),
            Err(err) => Err(err.into()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn reset(&self) -> Result<ResetSummary, StoreError> {
        let plans = self.plans().delete_many(doc! {}).await?;
        let users = self.users().delete_many(doc! {}).await?;
        Ok(ResetSummary {
            plans_deleted: plans.deleted_count,
            users_deleted: users.deleted_count,
        })
    }
}
