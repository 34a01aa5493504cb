use aloha_error::ServiceError;
use aloha_types::{LoginCredentials, LoginResponse, ListQuery, Page, Permission, Record, Validate};
use async_trait::async_trait;

/// What a paginated list page needs from its backing service
#[async_trait]
pub trait ListService: Send + Sync {
    type Record: Record + Clone + Send + Sync;

    async fn list(&self, query: &ListQuery) -> Result<Page<Self::Record>, ServiceError>;
    async fn delete(&self, key: &<Self::Record as Record>::Key) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait CreateService: ListService {
    type Form: Validate + Send + Sync;

    async fn create(&self, form: &Self::Form) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait UpdateService: ListService {
    type Changes: Validate + Send + Sync;

    async fn update(
        &self,
        key: &<Self::Record as Record>::Key,
        changes: &Self::Changes,
    ) -> Result<(), ServiceError>;
}

/// Permission assignments of a single parent (a group or a user)
#[async_trait]
pub trait AssignmentService: Send + Sync {
    async fn assigned(&self, parent_id: &str) -> Result<Vec<String>, ServiceError>;
    async fn assign(&self, parent_id: &str, permission_id: &str) -> Result<(), ServiceError>;
    async fn unassign(&self, parent_id: &str, permission_id: &str) -> Result<(), ServiceError>;
}

/// Every permission that can be assigned
#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    async fn catalog(&self) -> Result<Vec<Permission>, ServiceError>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ServiceError>;
    async fn logout(&self) -> Result<(), ServiceError>;
}
