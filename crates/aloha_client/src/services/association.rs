use crate::http::client::{AlohaApiClient, RequestType};
use crate::http::routes::Routes;
use crate::services::contracts::{AssignmentService, CreateService, ListService};
use crate::services::resource::{check_id, to_body};
use aloha_error::ServiceError;
use aloha_types::*;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::marker::PhantomData;
use tracing::{debug, info};

/// A join table between a parent (group or user) and permissions. Rows are
/// addressed by the `{parent, permission_id}` pair rather than an id.
pub trait Association: Send + Sync + 'static {
    type Key: Serialize + Clone + Debug + PartialEq + Send + Sync;
    type Record: Record<Key = Self::Key> + DeserializeOwned + Clone + Send + Sync;
    type Create: Serialize + Validate + Send + Sync;

    /// Name of the parent side, used in messages
    const PARENT: &'static str;

    fn collection() -> Routes;
    fn by_parent(parent_id: String) -> Routes;
    fn by_permission(permission_id: String) -> Routes;
    fn create_form(parent_id: &str, permission_id: &str) -> Self::Create;
    fn key(parent_id: &str, permission_id: &str) -> Self::Key;
    fn permission_id(record: &Self::Record) -> &str;
}

#[derive(Debug)]
pub struct GroupPermissions;

impl Association for GroupPermissions {
    type Key = GroupPermissionKey;
    type Record = GroupPermission;
    type Create = CreateGroupPermission;

    const PARENT: &'static str = "group";

    fn collection() -> Routes {
        Routes::GroupPermissions
    }

    fn by_parent(parent_id: String) -> Routes {
        Routes::GroupPermissionsByGroup(parent_id)
    }

    fn by_permission(permission_id: String) -> Routes {
        Routes::GroupPermissionsByPermission(permission_id)
    }

    fn create_form(parent_id: &str, permission_id: &str) -> CreateGroupPermission {
        CreateGroupPermission {
            group_id: parent_id.to_string(),
            permission_id: permission_id.to_string(),
        }
    }

    fn key(parent_id: &str, permission_id: &str) -> GroupPermissionKey {
        GroupPermissionKey {
            group_id: parent_id.to_string(),
            permission_id: permission_id.to_string(),
        }
    }

    fn permission_id(record: &GroupPermission) -> &str {
        &record.permission_id
    }
}

#[derive(Debug)]
pub struct UserPermissions;

impl Association for UserPermissions {
    type Key = UserPermissionKey;
    type Record = UserPermission;
    type Create = CreateUserPermission;

    const PARENT: &'static str = "user";

    fn collection() -> Routes {
        Routes::UserPermissions
    }

    fn by_parent(parent_id: String) -> Routes {
        Routes::UserPermissionsByUser(parent_id)
    }

    fn by_permission(permission_id: String) -> Routes {
        Routes::UserPermissionsByPermission(permission_id)
    }

    fn create_form(parent_id: &str, permission_id: &str) -> CreateUserPermission {
        CreateUserPermission {
            user_id: parent_id.to_string(),
            permission_id: permission_id.to_string(),
        }
    }

    fn key(parent_id: &str, permission_id: &str) -> UserPermissionKey {
        UserPermissionKey {
            user_id: parent_id.to_string(),
            permission_id: permission_id.to_string(),
        }
    }

    fn permission_id(record: &UserPermission) -> &str {
        &record.permission_id
    }
}

pub type GroupPermissionService = AssociationService<GroupPermissions>;
pub type UserPermissionService = AssociationService<UserPermissions>;

pub struct AssociationService<A: Association> {
    client: AlohaApiClient,
    _association: PhantomData<fn() -> A>,
}

impl<A: Association> Clone for AssociationService<A> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _association: PhantomData,
        }
    }
}

impl<A: Association> AssociationService<A> {
    pub fn new(client: AlohaApiClient) -> Self {
        Self {
            client,
            _association: PhantomData,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<A::Record>, ServiceError> {
        // only page and size are understood by these collections
        let query = ListQuery::new(query.page, query.size);

        let body = self
            .client
            .request_as::<ListBody<A::Record>>(
                A::collection(),
                RequestType::Get,
                None,
                Some(query.to_params()),
            )
            .await?;

        Ok(body.into_page(&query))
    }

    pub async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<A::Record>, ServiceError> {
        check_id(parent_id, A::PARENT)?;

        let body = self
            .client
            .request_as::<ListBody<A::Record>>(
                A::by_parent(parent_id.to_string()),
                RequestType::Get,
                None,
                None,
            )
            .await?;

        Ok(body.into_items())
    }

    pub async fn list_by_permission(
        &self,
        permission_id: &str,
    ) -> Result<Vec<A::Record>, ServiceError> {
        check_id(permission_id, Permission::NOUN)?;

        let body = self
            .client
            .request_as::<ListBody<A::Record>>(
                A::by_permission(permission_id.to_string()),
                RequestType::Get,
                None,
                None,
            )
            .await?;

        Ok(body.into_items())
    }

    pub async fn create(&self, form: &A::Create) -> Result<Option<A::Record>, ServiceError> {
        let response = self
            .client
            .request(A::collection(), RequestType::Post, Some(to_body(form)?), None)
            .await?;

        Ok(serde_json::from_value(response).ok())
    }

    pub async fn delete(&self, parent_id: &str, permission_id: &str) -> Result<(), ServiceError> {
        check_id(parent_id, A::PARENT)?;
        check_id(permission_id, Permission::NOUN)?;
        self.delete_key(&A::key(parent_id, permission_id)).await
    }

    async fn delete_key(&self, key: &A::Key) -> Result<(), ServiceError> {
        self.client
            .request(A::collection(), RequestType::Delete, Some(to_body(key)?), None)
            .await?;

        debug!("Deleted {} {:?}", <A::Record as Record>::NOUN, key);
        Ok(())
    }

    /// Removes every permission of the parent
    pub async fn delete_by_parent(&self, parent_id: &str) -> Result<(), ServiceError> {
        check_id(parent_id, A::PARENT)?;

        self.client
            .request(
                A::by_parent(parent_id.to_string()),
                RequestType::Delete,
                None,
                None,
            )
            .await?;

        info!("Cleared permissions of {} {}", A::PARENT, parent_id);
        Ok(())
    }

    pub async fn delete_by_permission(&self, permission_id: &str) -> Result<(), ServiceError> {
        check_id(permission_id, Permission::NOUN)?;

        self.client
            .request(
                A::by_permission(permission_id.to_string()),
                RequestType::Delete,
                None,
                None,
            )
            .await?;

        info!(
            "Removed permission {} from every {}",
            permission_id,
            A::PARENT
        );
        Ok(())
    }
}

#[async_trait]
impl<A: Association> ListService for AssociationService<A> {
    type Record = A::Record;

    async fn list(&self, query: &ListQuery) -> Result<Page<A::Record>, ServiceError> {
        AssociationService::list(self, query).await
    }

    async fn delete(&self, key: &A::Key) -> Result<(), ServiceError> {
        self.delete_key(key).await
    }
}

#[async_trait]
impl<A: Association> CreateService for AssociationService<A> {
    type Form = A::Create;

    async fn create(&self, form: &A::Create) -> Result<(), ServiceError> {
        AssociationService::create(self, form).await.map(|_| ())
    }
}

#[async_trait]
impl<A: Association> AssignmentService for AssociationService<A> {
    async fn assigned(&self, parent_id: &str) -> Result<Vec<String>, ServiceError> {
        let records = self.list_by_parent(parent_id).await?;
        Ok(records
            .iter()
            .map(|record| A::permission_id(record).to_string())
            .collect())
    }

    async fn assign(&self, parent_id: &str, permission_id: &str) -> Result<(), ServiceError> {
        AssociationService::create(self, &A::create_form(parent_id, permission_id))
            .await
            .map(|_| ())
    }

    async fn unassign(&self, parent_id: &str, permission_id: &str) -> Result<(), ServiceError> {
        AssociationService::delete(self, parent_id, permission_id).await
    }
}
