use crate::{data::source::StoreConfig, MapError, Result};
use async_trait::async_trait;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Parent,
    Babysitter,
}

/// A row in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub clerk_user_id: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
}

/// Profile fields refreshed on `user.updated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Where identity events land
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: UserRecord) -> Result<()>;
    /// Updating a missing user is not an error
    async fn update(&self, clerk_user_id: &str, update: UserUpdate) -> Result<()>;
    /// Deleting a missing user is not an error
    async fn delete(&self, clerk_user_id: &str) -> Result<()>;
}

/// Users kept in memory, keyed by identity-provider id
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<FxHashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, clerk_user_id: &str) -> Option<UserRecord> {
        self.users.lock().ok()?.get(clerk_user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, FxHashMap<String, UserRecord>>> {
        self.users
            .lock()
            .map_err(|_| MapError::Store("user table lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: UserRecord) -> Result<()> {
        let mut users = self.lock()?;
        if users.contains_key(&user.clerk_user_id) {
            return Err(MapError::Store(format!(
                "duplicate key value for clerk_user_id {}",
                user.clerk_user_id
            )));
        }
        users.insert(user.clerk_user_id.clone(), user);
        Ok(())
    }

    async fn update(&self, clerk_user_id: &str, update: UserUpdate) -> Result<()> {
        if let Some(user) = self.lock()?.get_mut(clerk_user_id) {
            user.email = update.email;
            user.first_name = update.first_name;
            user.last_name = update.last_name;
        }
        Ok(())
    }

    async fn delete(&self, clerk_user_id: &str) -> Result<()> {
        self.lock()?.remove(clerk_user_id);
        Ok(())
    }
}

/// The hosted `users` table over its REST interface
pub struct RestUserStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl RestUserStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/users", self.config.url.trim_end_matches('/'))
    }

    fn row_url(&self, clerk_user_id: &str) -> String {
        format!("{}?clerk_user_id=eq.{}", self.table_url(), clerk_user_id)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }
}

#[async_trait]
impl UserStore for RestUserStore {
    async fn insert(&self, user: UserRecord) -> Result<()> {
        self.request(reqwest::Method::POST, self.table_url())
            .json(&user)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, clerk_user_id: &str, update: UserUpdate) -> Result<()> {
        self.request(reqwest::Method::PATCH, self.row_url(clerk_user_id))
            .json(&update)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, clerk_user_id: &str) -> Result<()> {
        self.request(reqwest::Method::DELETE, self.row_url(clerk_user_id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
