use crate::http::client::{AlohaApiClient, RequestType};
use crate::http::routes::Routes;
use crate::services::contracts::{CreateService, ListService, PermissionCatalog, UpdateService};
use aloha_error::{ApiError, ServiceError};
use aloha_types::*;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::marker::PhantomData;
use tracing::{debug, info};

/// Page size used when walking the whole permission catalog
pub const CATALOG_PAGE_SIZE: u32 = 100;
const MAX_CATALOG_PAGES: u32 = 1000;

/// A CRUD collection exposed under `{collection}` and `{collection}/{id}`
pub trait Resource: Send + Sync + 'static {
    type Record: Record<Key = String> + DeserializeOwned + Clone + Send + Sync;
    type Create: Serialize + Validate + Send + Sync;
    type Update: Serialize + Validate + Send + Sync;

    fn collection() -> Routes;
    fn item(id: String) -> Routes;
}

/// Collections that accept `DELETE {collection}` with a list of ids
pub trait BulkDelete: Resource {}

#[derive(Debug)]
pub struct Users;

impl Resource for Users {
    type Record = User;
    type Create = CreateUser;
    type Update = UpdateUser;

    fn collection() -> Routes {
        Routes::Users
    }

    fn item(id: String) -> Routes {
        Routes::User(id)
    }
}

impl BulkDelete for Users {}

#[derive(Debug)]
pub struct UserGroups;

impl Resource for UserGroups {
    type Record = UserGroup;
    type Create = CreateUserGroup;
    type Update = UpdateUserGroup;

    fn collection() -> Routes {
        Routes::UserGroups
    }

    fn item(id: String) -> Routes {
        Routes::UserGroup(id)
    }
}

#[derive(Debug)]
pub struct Permissions;

impl Resource for Permissions {
    type Record = Permission;
    type Create = CreatePermission;
    type Update = UpdatePermission;

    fn collection() -> Routes {
        Routes::Permissions
    }

    fn item(id: String) -> Routes {
        Routes::Permission(id)
    }
}

#[derive(Debug)]
pub struct Tweets;

impl Resource for Tweets {
    type Record = Tweet;
    type Create = CreateTweet;
    type Update = UpdateTweet;

    fn collection() -> Routes {
        Routes::Tweets
    }

    fn item(id: String) -> Routes {
        Routes::Tweet(id)
    }
}

impl BulkDelete for Tweets {}

pub type UserService = ResourceService<Users>;
pub type UserGroupService = ResourceService<UserGroups>;
pub type PermissionService = ResourceService<Permissions>;
pub type TweetService = ResourceService<Tweets>;

pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| {
        ServiceError::Api(ApiError::Error(format!(
            "Failed to serialize request body: {}",
            e
        )))
    })
}

pub(crate) fn check_id(id: &str, noun: &str) -> Result<(), ServiceError> {
    if id.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(format!(
            "A {} id is required",
            noun
        )));
    }
    Ok(())
}

/// Thin mapping from operations to requests for one collection
pub struct ResourceService<R: Resource> {
    client: AlohaApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: AlohaApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, ServiceError> {
        debug!(
            "Listing {} (page {}, size {})",
            <R::Record as Record>::PLURAL,
            query.page,
            query.size
        );

        let body = self
            .client
            .request_as::<ListBody<R::Record>>(
                R::collection(),
                RequestType::Get,
                None,
                Some(query.to_params()),
            )
            .await?;

        Ok(body.into_page(query))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<R::Record, ServiceError> {
        check_id(id, <R::Record as Record>::NOUN)?;

        let record = self
            .client
            .request_as::<R::Record>(R::item(id.to_string()), RequestType::Get, None, None)
            .await?;

        Ok(record)
    }

    /// Returns the created record when the backend echoes one back
    pub async fn create(&self, form: &R::Create) -> Result<Option<R::Record>, ServiceError> {
        let response = self
            .client
            .request(R::collection(), RequestType::Post, Some(to_body(form)?), None)
            .await?;

        info!("Created {}", <R::Record as Record>::NOUN);
        Ok(serde_json::from_value(response).ok())
    }

    pub async fn update(
        &self,
        id: &str,
        changes: &R::Update,
    ) -> Result<Option<R::Record>, ServiceError> {
        check_id(id, <R::Record as Record>::NOUN)?;

        let response = self
            .client
            .request(
                R::item(id.to_string()),
                RequestType::Put,
                Some(to_body(changes)?),
                None,
            )
            .await?;

        info!("Updated {} {}", <R::Record as Record>::NOUN, id);
        Ok(serde_json::from_value(response).ok())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        check_id(id, <R::Record as Record>::NOUN)?;

        self.client
            .request(R::item(id.to_string()), RequestType::Delete, None, None)
            .await?;

        info!("Deleted {} {}", <R::Record as Record>::NOUN, id);
        Ok(())
    }
}

impl<R: BulkDelete> ResourceService<R> {
    /// Deletes every id in one request and returns how many were removed.
    /// Backends that do not report a count are assumed to have removed all.
    pub async fn delete_many(&self, ids: &[String]) -> Result<usize, ServiceError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let response = self
            .client
            .request(R::collection(), RequestType::Delete, Some(to_body(&ids)?), None)
            .await?;

        let deleted = match &response {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => map
                .get("deleted")
                .or_else(|| map.get("count"))
                .and_then(Value::as_u64)
                .map(|n| n as usize),
            _ => None,
        }
        .unwrap_or(ids.len());

        info!("Deleted {} {}", deleted, <R::Record as Record>::PLURAL);
        Ok(deleted)
    }
}

impl ResourceService<Tweets> {
    pub async fn list_by_user(
        &self,
        query: &ListQuery,
        user_id: &str,
    ) -> Result<Page<Tweet>, ServiceError> {
        check_id(user_id, User::NOUN)?;
        self.list(&query.clone().with_filter("user_id", user_id))
            .await
    }
}

#[async_trait]
impl<R: Resource> ListService for ResourceService<R> {
    type Record = R::Record;

    async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, ServiceError> {
        ResourceService::list(self, query).await
    }

    async fn delete(&self, key: &String) -> Result<(), ServiceError> {
        ResourceService::delete(self, key).await
    }
}

#[async_trait]
impl<R: Resource> CreateService for ResourceService<R> {
    type Form = R::Create;

    async fn create(&self, form: &R::Create) -> Result<(), ServiceError> {
        ResourceService::create(self, form).await.map(|_| ())
    }
}

#[async_trait]
impl<R: Resource> UpdateService for ResourceService<R> {
    type Changes = R::Update;

    async fn update(&self, key: &String, changes: &R::Update) -> Result<(), ServiceError> {
        ResourceService::update(self, key, changes)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl PermissionCatalog for ResourceService<Permissions> {
    /// Walks the collection page by page until the backend reports no next page.
    /// A page without any unseen id also ends the walk.
    async fn catalog(&self) -> Result<Vec<Permission>, ServiceError> {
        let mut permissions = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;

        while page <= MAX_CATALOG_PAGES {
            let result = ResourceService::list(self, &ListQuery::new(page, CATALOG_PAGE_SIZE)).await?;
            let last = result.pagination.next_page.is_none();

            let before = permissions.len();
            permissions.extend(
                result
                    .data
                    .into_iter()
                    .filter(|permission| seen.insert(permission.id.clone())),
            );

            if last || permissions.len() == before {
                break;
            }
            page += 1;
        }

        debug!("Loaded {} permissions", permissions.len());
        Ok(permissions)
    }
}
