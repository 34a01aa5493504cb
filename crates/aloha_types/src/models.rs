use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A row the admin client can list and delete
pub trait Record {
    type Key: Clone + Debug + PartialEq + Send + Sync;

    /// Singular name used in prompts and messages
    const NOUN: &'static str;
    const PLURAL: &'static str;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub user_group_id: Option<String>,
}

impl Record for User {
    type Key = String;
    const NOUN: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: String,
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Record for UserGroup {
    type Key = String;
    const NOUN: &'static str = "user group";
    const PLURAL: &'static str = "user groups";

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Record for Permission {
    type Key = String;
    const NOUN: &'static str = "permission";
    const PLURAL: &'static str = "permissions";

    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub content: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Record for Tweet {
    type Key = String;
    const NOUN: &'static str = "tweet";
    const PLURAL: &'static str = "tweets";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Composite identity of a group permission; also the delete body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupPermissionKey {
    pub group_id: String,
    pub permission_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPermission {
    pub group_id: String,
    pub permission_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Record for GroupPermission {
    type Key = GroupPermissionKey;
    const NOUN: &'static str = "group permission";
    const PLURAL: &'static str = "group permissions";

    fn key(&self) -> GroupPermissionKey {
        GroupPermissionKey {
            group_id: self.group_id.clone(),
            permission_id: self.permission_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserPermissionKey {
    pub user_id: String,
    pub permission_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPermission {
    pub user_id: String,
    pub permission_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Record for UserPermission {
    type Key = UserPermissionKey;
    const NOUN: &'static str = "user permission";
    const PLURAL: &'static str = "user permissions";

    fn key(&self) -> UserPermissionKey {
        UserPermissionKey {
            user_id: self.user_id.clone(),
            permission_id: self.permission_id.clone(),
        }
    }
}
